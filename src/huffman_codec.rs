use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use tracing::{debug, trace};

use crate::bit_stream::{BitReader, BitWriter};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{CodeTable, HuffNode, HuffmanTree};
use crate::metadata::{CompressionStats, StreamMetadata};
use crate::min_heap::MinHeap;
use crate::observer::{CodecObserver, NoopObserver};
use crate::text::{Utf8Chars, MAX_UTF8_LEN};

/// Code point that terminates the tree header (U+2042 ASTERISM).
pub const CONTROL_CHAR: char = '⁂';

#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Written after the tree header and expected back by the decoder.
    pub control_char: char,
    /// Decoder rejects padding bits other than `1` and bytes after the payload.
    pub strict_padding: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            control_char: CONTROL_CHAR,
            strict_padding: true,
        }
    }
}

/// A tree together with the code table derived from it.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    tree: HuffmanTree,
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let encode_table = tree.generate_table();
        HuffmanCodec { tree, encode_table }
    }

    /// `None` for an empty table.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        HuffmanTree::from_frequencies(frequencies).map(Self::new)
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn encode_table(&self) -> &CodeTable {
        &self.encode_table
    }

    /// Compress `input` into `output` with the default configuration.
    pub fn encode<R, W>(input: R, output: W) -> Result<CompressionStats>
    where
        R: Read + Seek,
        W: Write,
    {
        Self::encode_with(input, output, &CodecConfig::default(), NoopObserver)
    }

    /// Compress `input` into `output`.
    ///
    /// The input is scanned twice from its current position: once to count
    /// characters, then seeked back and scanned again to emit codes. Layout of
    /// the output:
    ///
    /// ```text
    /// tree header | control char | 1-padding | u64 LE symbol count | payload | 1-padding
    /// ```
    ///
    /// Empty input produces empty output.
    pub fn encode_with<R, W, O>(
        input: R,
        output: W,
        config: &CodecConfig,
        mut observer: O,
    ) -> Result<CompressionStats>
    where
        R: Read + Seek,
        W: Write,
        O: CodecObserver,
    {
        let mut reader = BufReader::new(input);
        let start = reader.stream_position()?;
        let frequencies = FrequencyTable::from_reader(&mut reader)?;
        debug!(
            symbols = frequencies.total(),
            distinct = frequencies.len(),
            "frequency table populated"
        );
        observer.on_frequencies(&frequencies)?;

        let mut stats = CompressionStats {
            input_bytes: frequencies.byte_len(),
            symbols: frequencies.total(),
            distinct_symbols: frequencies.len(),
            ..Default::default()
        };

        let queue = MinHeap::build(frequencies.to_node_list());
        observer.on_queue(&queue)?;

        let mut writer = BitWriter::new(output);
        let Some(tree) = HuffmanTree::from_heap(queue) else {
            debug!("empty input, nothing to encode");
            writer.get_mut().flush()?;
            return Ok(stats);
        };
        trace!("huffman tree:\n{}", tree);
        observer.on_tree(&tree)?;

        let codec = HuffmanCodec::new(tree);
        codec.tree.write_header(&mut writer, config.control_char)?;
        stats.header_bytes = writer.bytes_written();
        StreamMetadata {
            symbol_count: stats.symbols,
        }
        .write_to(&mut writer)?;

        reader.seek(SeekFrom::Start(start))?;
        let encoded = codec.write_payload(&mut reader, &mut writer)?;
        if encoded != stats.symbols {
            return Err(HuffmanError::InputChanged {
                expected: stats.symbols,
                actual: encoded,
            });
        }
        writer.flush(true)?;
        writer.get_mut().flush()?;

        stats.output_bytes = writer.bytes_written();
        debug!(
            header_bytes = stats.header_bytes,
            output_bytes = stats.output_bytes,
            ratio = stats.ratio(),
            "encoded"
        );
        Ok(stats)
    }

    /// Decompress `input` into `output` with the default configuration.
    pub fn decode<R: Read, W: Write>(input: R, output: W) -> Result<CompressionStats> {
        Self::decode_with(input, output, &CodecConfig::default(), NoopObserver)
    }

    /// Rebuild the tree from the header, then walk it bit by bit for exactly
    /// the number of symbols recorded after the header.
    pub fn decode_with<R, W, O>(
        input: R,
        mut output: W,
        config: &CodecConfig,
        mut observer: O,
    ) -> Result<CompressionStats>
    where
        R: Read,
        W: Write,
        O: CodecObserver,
    {
        let mut reader = BitReader::new(BufReader::new(input));
        let mut stats = CompressionStats::default();
        if !reader.has_more()? {
            debug!("empty input, nothing to decode");
            return Ok(stats);
        }

        let tree = HuffmanTree::read_header(&mut reader)?;
        let control = reader.read_char()?;
        if control != config.control_char {
            return Err(HuffmanError::header(format!(
                "expected control character {:?} after the tree, found {:?}",
                config.control_char, control
            )));
        }
        if config.strict_padding {
            reader
                .flush_expecting(true)
                .map_err(|_| HuffmanError::header("header padding bits are not all ones"))?;
        } else {
            reader.flush();
        }
        stats.header_bytes = reader.bytes_read();

        let meta = StreamMetadata::read_from(&mut reader)?;
        trace!("huffman tree:\n{}", tree);
        observer.on_tree(&tree)?;

        let codec = HuffmanCodec::new(tree);
        stats.distinct_symbols = codec.encode_table.len();
        stats.symbols = meta.symbol_count;
        stats.output_bytes = codec.read_payload(&mut reader, meta.symbol_count, &mut output)?;

        if config.strict_padding {
            reader.flush_expecting(true)?;
            if reader.has_more()? {
                return Err(HuffmanError::payload("trailing bytes after the payload"));
            }
        }
        output.flush()?;

        stats.input_bytes = reader.bytes_read();
        debug!(
            symbols = stats.symbols,
            output_bytes = stats.output_bytes,
            "decoded"
        );
        Ok(stats)
    }

    /// Emit the code of every character of `input`; returns how many were written.
    pub fn write_payload<R, W>(&self, input: R, writer: &mut BitWriter<W>) -> Result<u64>
    where
        R: BufRead,
        W: Write,
    {
        let mut count = 0;
        for c in Utf8Chars::new(input) {
            let c = c?;
            let code = self
                .encode_table
                .get(&c)
                .ok_or(HuffmanError::LookupMiss(c))?;
            writer.write_bits(code)?;
            count += 1;
        }
        Ok(count)
    }

    /// Decode `count` characters into `output`; returns the bytes written.
    pub fn read_payload<R, W>(
        &self,
        reader: &mut BitReader<R>,
        count: u64,
        output: &mut W,
    ) -> Result<u64>
    where
        R: Read,
        W: Write,
    {
        let mut buf = [0u8; MAX_UTF8_LEN];
        let mut written = 0;
        for _ in 0..count {
            let c = self.decode_symbol(reader)?;
            let encoded = c.encode_utf8(&mut buf);
            output.write_all(encoded.as_bytes())?;
            written += encoded.len() as u64;
        }
        Ok(written)
    }

    fn decode_symbol<R: Read>(&self, reader: &mut BitReader<R>) -> Result<char> {
        let mut current_node = self.tree.root();

        // lone leaf: every symbol is the single bit 0
        if let HuffNode::Leaf { symbol, .. } = current_node {
            if reader.read_bit()? {
                return Err(HuffmanError::payload("single-symbol stream holds a one bit"));
            }
            return Ok(*symbol);
        }

        // walk the tree until we hit a leaf
        loop {
            match current_node {
                HuffNode::Leaf { symbol, .. } => return Ok(*symbol),
                HuffNode::Internal { left, right, .. } => {
                    current_node = if reader.read_bit()? { right.as_ref() } else { left.as_ref() };
                }
            }
        }
    }

    pub fn encode_from_file(input: File, output: File) -> Result<CompressionStats> {
        Self::encode(input, BufWriter::new(output))
    }

    pub fn decode_from_file(input: File, output: File) -> Result<CompressionStats> {
        Self::decode(input, BufWriter::new(output))
    }

    pub fn compress_str(text: &str) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        Self::encode(std::io::Cursor::new(text.as_bytes()), &mut out)?;
        Ok(out)
    }

    pub fn decompress_to_string(data: &[u8]) -> Result<String> {
        let mut out = Vec::new();
        Self::decode(data, &mut out)?;
        // the decoder only ever writes whole characters
        String::from_utf8(out).map_err(|e| HuffmanError::malformed(e.as_bytes()))
    }
}
