use std::io::{self, Read, Write};

use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};
use crate::text::{decode_char, utf8_width, MAX_UTF8_LEN};

/// Owned bit sequence, most significant bit first.
pub type Bits = BitVec<u8, Msb0>;

/// Writes single bits and whole characters to a byte sink, MSB first.
#[derive(Debug)]
pub struct BitWriter<W> {
    inner: W,
    buffer: u8,
    // free bit slots left in `buffer`, 8 when empty
    alignment: u8,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            buffer: 0,
            alignment: 8,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn is_aligned(&self) -> bool {
        self.alignment == 8
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn emit(&mut self, byte: u8) -> Result<()> {
        self.inner.write_all(&[byte])?;
        self.bytes_written += 1;
        Ok(())
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            // set bit with OR and mask
            self.buffer |= 1 << (self.alignment - 1);
        }
        self.alignment -= 1;

        if self.alignment == 0 {
            let byte = self.buffer;
            self.buffer = 0;
            self.alignment = 8;
            self.emit(byte)?;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        for bit in bits.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Write a full byte at the current alignment. The high bits complete the
    /// pending byte, the low bits seed the next one.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        if self.alignment == 8 {
            return self.emit(byte);
        }
        let completed = self.buffer | (byte >> (8 - self.alignment));
        self.buffer = byte << self.alignment;
        self.emit(completed)
    }

    /// Write the UTF-8 encoding of `c`, byte by byte.
    pub fn write_char(&mut self, c: char) -> Result<()> {
        let mut buf = [0u8; MAX_UTF8_LEN];
        for &byte in c.encode_utf8(&mut buf).as_bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Pad a partial byte with `pad` and emit it. No-op when aligned.
    pub fn flush(&mut self, pad: bool) -> Result<()> {
        while !self.is_aligned() {
            self.write_bit(pad)?;
        }
        Ok(())
    }
}

/// Reads single bits and whole characters from a byte source, MSB first.
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    // unread bits sit at the top of `buffer`
    buffer: u8,
    remaining: u8,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            buffer: 0,
            remaining: 0,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn require_byte(&mut self) -> Result<u8> {
        self.next_byte()?.ok_or(HuffmanError::UnexpectedEof {
            bytes_read: self.bytes_read,
        })
    }

    /// Whether at least one more bit is available. Pulls a byte if the
    /// buffer is empty.
    pub fn has_more(&mut self) -> Result<bool> {
        if self.remaining > 0 {
            return Ok(true);
        }
        match self.next_byte()? {
            Some(byte) => {
                self.buffer = byte;
                self.remaining = 8;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            self.buffer = self.require_byte()?;
            self.remaining = 8;
        }
        self.remaining -= 1;
        let bit = self.buffer & 0x80 != 0;
        self.buffer <<= 1;
        Ok(bit)
    }

    /// Read eight bits as one byte, carrying partial bits across the source's
    /// byte boundary.
    pub fn read_byte(&mut self) -> Result<u8> {
        match self.remaining {
            0 => self.require_byte(),
            8 => {
                let byte = self.buffer;
                self.buffer = 0;
                self.remaining = 0;
                Ok(byte)
            }
            n => {
                let next = self.require_byte()?;
                let byte = self.buffer | (next >> n);
                self.buffer = next << (8 - n);
                Ok(byte)
            }
        }
    }

    /// Read one UTF-8 encoded character. At most four bytes are examined.
    pub fn read_char(&mut self) -> Result<char> {
        let mut buf = [0u8; MAX_UTF8_LEN];
        buf[0] = self.read_byte()?;
        let width = utf8_width(buf[0]).ok_or_else(|| HuffmanError::malformed(&buf[..1]))?;
        for i in 1..width {
            buf[i] = self.read_byte()?;
        }
        decode_char(&buf[..width])
    }

    /// Discard the unread bits of the current byte.
    pub fn flush(&mut self) {
        self.buffer = 0;
        self.remaining = 0;
    }

    /// Like [`flush`](Self::flush), but fails unless every discarded bit equals `pad`.
    pub fn flush_expecting(&mut self, pad: bool) -> Result<()> {
        let n = self.remaining;
        let leftover = self.buffer;
        self.flush();
        if n == 0 {
            return Ok(());
        }
        let expected = if pad { 0xffu8 << (8 - n) } else { 0 };
        if leftover != expected {
            return Err(HuffmanError::payload(format!(
                "padding bits {:08b} are not all {}",
                leftover >> (8 - n),
                u8::from(pad)
            )));
        }
        Ok(())
    }
}
