//! Property-based tests for the codec.
//!
//! - decode(encode(text)) == text for arbitrary Unicode text
//! - codes are prefix-free
//! - the heap pops in non-decreasing (weight, character) order
//! - a header read back yields the same code table

use std::io::Cursor;

use proptest::prelude::*;

use text_huffman::bit_stream::{BitReader, BitWriter};
use text_huffman::min_heap::MinHeap;
use text_huffman::{FrequencyTable, HuffNode, HuffmanCodec, HuffmanTree, CONTROL_CHAR};

/// Small alphabets force many weight ties.
fn tie_heavy_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ab]{0,64}",
        "[a-e ]{0,256}",
        "[ąęłó⁂😀x]{0,128}",
    ]
}

fn heap_op() -> impl Strategy<Value = Option<(usize, char)>> {
    prop_oneof![
        1 => Just(None),
        3 => (0usize..8, prop::char::range('a', 'h')).prop_map(Some),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_roundtrip_any_text(text in any::<String>()) {
        let packed = HuffmanCodec::compress_str(&text).unwrap();
        let unpacked = HuffmanCodec::decompress_to_string(&packed).unwrap();
        prop_assert_eq!(unpacked, text);
    }

    #[test]
    fn prop_roundtrip_tie_heavy(text in tie_heavy_text()) {
        let packed = HuffmanCodec::compress_str(&text).unwrap();
        prop_assert_eq!(HuffmanCodec::decompress_to_string(&packed).unwrap(), text);
    }

    #[test]
    fn prop_roundtrip_single_symbol(c in any::<char>(), n in 1usize..300) {
        let text: String = std::iter::repeat(c).take(n).collect();
        let packed = HuffmanCodec::compress_str(&text).unwrap();
        prop_assert_eq!(HuffmanCodec::decompress_to_string(&packed).unwrap(), text);
    }

    #[test]
    fn prop_encode_is_deterministic(text in tie_heavy_text()) {
        let mut first = Vec::new();
        let mut second = Vec::new();
        HuffmanCodec::encode(Cursor::new(text.as_bytes()), &mut first).unwrap();
        HuffmanCodec::encode(Cursor::new(text.as_bytes()), &mut second).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_codes_prefix_free(text in any::<String>()) {
        let frequencies: FrequencyTable = text.chars().collect();
        prop_assume!(frequencies.len() >= 2);
        let table = HuffmanTree::from_frequencies(&frequencies).unwrap().generate_table();

        prop_assert_eq!(table.len(), frequencies.len());
        for (a, code_a) in &table {
            prop_assert!(!code_a.is_empty());
            for (b, code_b) in &table {
                if a != b {
                    prop_assert!(
                        !code_b.starts_with(code_a.as_bitslice()),
                        "code of {:?} prefixes code of {:?}", a, b
                    );
                }
            }
        }
    }

    #[test]
    fn prop_heap_pops_in_order(ops in prop::collection::vec(heap_op(), 0..64)) {
        let mut heap = MinHeap::new();
        for op in ops {
            match op {
                Some((weight, c)) => heap.insert(HuffNode::new(c, weight)),
                None => {
                    heap.extract_min();
                }
            }
            prop_assert!(heap.valid_min_heap());
        }

        let mut previous: Option<HuffNode> = None;
        while let Some(node) = heap.extract_min() {
            if let Some(prev) = &previous {
                prop_assert!(
                    (prev.weight(), prev.symbol()) <= (node.weight(), node.symbol()),
                    "{:?} popped before {:?}", prev, node
                );
            }
            previous = Some(node);
        }
    }

    #[test]
    fn prop_header_idempotent(text in any::<String>()) {
        let frequencies: FrequencyTable = text.chars().collect();
        prop_assume!(frequencies.len() >= 2);
        let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();

        let mut writer = BitWriter::new(Vec::new());
        tree.write_header(&mut writer, CONTROL_CHAR).unwrap();
        let header = writer.into_inner();

        let mut reader = BitReader::new(header.as_slice());
        let rebuilt = HuffmanTree::read_header(&mut reader).unwrap();
        prop_assert_eq!(reader.read_char().unwrap(), CONTROL_CHAR);
        prop_assert_eq!(rebuilt.generate_table(), tree.generate_table());
    }
}
