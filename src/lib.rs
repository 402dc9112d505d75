//! # text_huffman
//!
//! Lossless Huffman compression for UTF-8 text. Characters (not bytes) are the
//! symbols; the tree travels in a compact pre-order header ahead of the payload.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text_huffman::HuffmanCodec;
//! use std::fs::File;
//!
//! // Compress a file
//! let input = File::open("input.txt")?;
//! let output = File::create("compressed.huff")?;
//! HuffmanCodec::encode_from_file(input, output)?;
//!
//! // Decompress a file
//! let compressed = File::open("compressed.huff")?;
//! let decompressed = File::create("output.txt")?;
//! HuffmanCodec::decode_from_file(compressed, decompressed)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! In memory:
//!
//! ```rust
//! use text_huffman::HuffmanCodec;
//!
//! let packed = HuffmanCodec::compress_str("abracadabra")?;
//! assert_eq!(HuffmanCodec::decompress_to_string(&packed)?, "abracadabra");
//! # Ok::<(), text_huffman::HuffmanError>(())
//! ```

pub mod bit_stream;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;
pub mod min_heap;
pub mod observer;
pub mod text;

// Re-export main types for convenience
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{CodecConfig, HuffmanCodec, CONTROL_CHAR};
pub use hufftree::{HuffNode, HuffmanTree};
pub use metadata::CompressionStats;
pub use observer::{CodecObserver, FrequencyReporter, GraphvizExporter, NoopObserver};
