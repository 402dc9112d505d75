use std::fs::File;

use text_huffman::{FrequencyTable, HuffmanCodec, HuffmanTree};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a sample file
    let sample_text = "Hello, world! Witaj świecie! Grüß dich, Welt! ⁂ \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    let dir = std::env::temp_dir();
    let sample_path = dir.join("sample.txt");
    let packed_path = dir.join("sample.huff");
    let unpacked_path = dir.join("decompressed.txt");

    std::fs::write(&sample_path, sample_text)?;
    println!(
        "📝 Created sample file: {} bytes, {} characters",
        sample_text.len(),
        sample_text.chars().count()
    );

    // Peek at the tree the encoder will build
    let frequencies: FrequencyTable = sample_text.chars().collect();
    if let Some(tree) = HuffmanTree::from_frequencies(&frequencies) {
        println!("🌳 {} distinct characters", tree.leaf_count());
        println!("   header: {}", tree.to_header_string());
    }

    // Compress the file
    let input = File::open(&sample_path)?;
    let output = File::create(&packed_path)?;
    let stats = HuffmanCodec::encode_from_file(input, output)?;

    println!(
        "🗜️  Compressed to: {} bytes ({:.1}% of original, header {} bytes)",
        stats.output_bytes,
        stats.ratio() * 100.0,
        stats.header_bytes
    );

    // Decompress the file
    let compressed = File::open(&packed_path)?;
    let decompressed = File::create(&unpacked_path)?;
    HuffmanCodec::decode_from_file(compressed, decompressed)?;

    // Verify the result
    let decompressed_text = std::fs::read_to_string(&unpacked_path)?;

    if sample_text == decompressed_text {
        println!("✅ Decompression successful! Data matches exactly.");
    } else {
        println!("❌ Decompression failed! Data mismatch.");
        return Err("Decompression verification failed".into());
    }

    // Cleanup
    std::fs::remove_file(&sample_path)?;
    std::fs::remove_file(&packed_path)?;
    std::fs::remove_file(&unpacked_path)?;

    println!("🧹 Cleaned up temporary files");

    Ok(())
}
