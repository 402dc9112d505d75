use std::io::{Read, Write};

use crate::bit_stream::{BitReader, BitWriter};
use crate::error::Result;

/// Framing written between the padded tree header and the payload.
///
/// The symbol count tells the decoder exactly where the payload ends, so the
/// one-bits padding the last byte are never mistaken for codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamMetadata {
    pub symbol_count: u64,
}

impl StreamMetadata {
    /// Little-endian u64. Expects a byte-aligned writer.
    pub fn write_to<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        for byte in self.symbol_count.to_le_bytes() {
            writer.write_byte(byte)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let mut count_bytes = [0u8; 8];
        for byte in count_bytes.iter_mut() {
            *byte = reader.read_byte()?;
        }
        Ok(StreamMetadata {
            symbol_count: u64::from_le_bytes(count_bytes),
        })
    }
}

/// Sizes seen by one encode or decode pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    /// Bytes consumed from the source.
    pub input_bytes: u64,
    /// Bytes emitted to the sink.
    pub output_bytes: u64,
    /// Characters encoded or decoded.
    pub symbols: u64,
    pub distinct_symbols: usize,
    /// Padded header length, control character included.
    pub header_bytes: u64,
}

impl CompressionStats {
    /// Output size as a fraction of input size; zero for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}
