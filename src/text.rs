//! UTF-8 character iteration over byte sources.

use std::io::{self, BufRead};

use crate::error::{HuffmanError, Result};

/// Longest UTF-8 encoding of a single `char`.
pub const MAX_UTF8_LEN: usize = 4;

/// Expected encoded length for a lead byte, `None` if the byte cannot start a character.
pub fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

/// Decode exactly one character from `bytes`.
pub fn decode_char(bytes: &[u8]) -> Result<char> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        })
        .ok_or_else(|| HuffmanError::malformed(bytes))
}

/// Iterator over the characters of a buffered byte source.
///
/// Invalid UTF-8 surfaces as [`HuffmanError::MalformedChar`]; nothing is
/// replaced lossily.
pub struct Utf8Chars<R> {
    inner: R,
    bytes_read: u64,
}

impl<R: BufRead> Utf8Chars<R> {
    pub fn new(inner: R) -> Self {
        Utf8Chars {
            inner,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let Some(&byte) = available.first() else {
                return Ok(None);
            };
            self.inner.consume(1);
            self.bytes_read += 1;
            return Ok(Some(byte));
        }
    }

    fn read_char(&mut self) -> Result<Option<char>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let width = utf8_width(lead).ok_or_else(|| HuffmanError::malformed(&[lead]))?;

        let mut buf = [0u8; MAX_UTF8_LEN];
        buf[0] = lead;
        for i in 1..width {
            match self.next_byte()? {
                Some(byte) => buf[i] = byte,
                None => return Err(HuffmanError::malformed(&buf[..i])),
            }
        }
        decode_char(&buf[..width]).map(Some)
    }
}

impl<R: BufRead> Iterator for Utf8Chars<R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_char().transpose()
    }
}
