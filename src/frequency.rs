use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use crate::error::Result;
use crate::hufftree::HuffNode;
use crate::text::Utf8Chars;

/// Occurrence count per character of a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    table: HashMap<char, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            table: HashMap::new(),
        }
    }

    /// Count every character of `source` until it is exhausted.
    pub fn populate<R: BufRead>(&mut self, source: R) -> Result<()> {
        for c in Utf8Chars::new(source) {
            *self.table.entry(c?).or_insert(0) += 1;
        }
        Ok(())
    }

    pub fn from_reader<R: BufRead>(source: R) -> Result<Self> {
        let mut table = FrequencyTable::new();
        table.populate(source)?;
        Ok(table)
    }

    /// Count for `c`, zero when it never occurred.
    pub fn get(&self, c: char) -> usize {
        self.table.get(&c).copied().unwrap_or(0)
    }

    /// Number of distinct characters.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Total number of characters counted.
    pub fn total(&self) -> u64 {
        self.table.values().map(|&n| n as u64).sum()
    }

    /// Size of the counted text in UTF-8 bytes.
    pub fn byte_len(&self) -> u64 {
        self.table
            .iter()
            .map(|(c, &n)| (c.len_utf8() * n) as u64)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.table.iter().map(|(&c, &n)| (c, n))
    }

    /// One leaf per distinct character, lightest first, ties by code point.
    pub fn to_node_list(&self) -> Vec<HuffNode> {
        let mut nodes: Vec<HuffNode> = self.iter().map(|(c, n)| HuffNode::new(c, n)).collect();
        nodes.sort();
        nodes
    }

    /// Rank / character / count table, most frequent first.
    pub fn write_report<W: Write>(&self, mut out: W) -> io::Result<()> {
        let mut rows: Vec<(char, usize)> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let rank_width = rows.len().to_string().len() + 1;
        for (i, (c, count)) in rows.iter().enumerate() {
            let rank = format!("{}.", i + 1);
            let shown = format!("{:?}", c);
            writeln!(out, "{:<rank_width$} {:<8} {}", rank, shown, count)?;
        }
        out.flush()
    }
}

impl FromIterator<char> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for c in iter {
            *table.table.entry(c).or_insert(0) += 1;
        }
        table
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::HuffmanError;

    fn sample() -> String {
        let mut text = String::new();
        for (c, n) in [
            ('a', 10),
            ('b', 9),
            ('c', 8),
            ('ę', 6),
            ('i', 2),
            ('Ü', 6),
            ('Š', 4),
            ('Z', 11),
        ] {
            text.extend(std::iter::repeat(c).take(n));
        }
        text
    }

    #[test]
    fn test_frequency_table() {
        let text = sample();
        let table = FrequencyTable::from_reader(text.as_bytes()).unwrap();

        for (c, expected) in [
            ('a', 10),
            ('b', 9),
            ('c', 8),
            ('ę', 6),
            ('i', 2),
            ('Ü', 6),
            ('Š', 4),
            ('Z', 11),
            ('k', 0),
            ('m', 0),
        ] {
            assert_eq!(table.get(c), expected, "count for {:?}", c);
        }
        assert_eq!(table.len(), 8);
        assert_eq!(table.total(), 56);
        assert_eq!(table.byte_len(), text.len() as u64);
    }

    #[test]
    fn test_collect_matches_populate() {
        let text = sample();
        let collected: FrequencyTable = text.chars().collect();
        let populated = FrequencyTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(collected, populated);
    }

    #[test]
    fn test_node_list() {
        let table: FrequencyTable = "abracadabra".chars().collect();
        let leaves: Vec<(char, usize)> = table
            .to_node_list()
            .iter()
            .map(|n| (n.symbol().unwrap(), n.weight()))
            .collect();
        assert_eq!(
            leaves,
            vec![('c', 1), ('d', 1), ('b', 2), ('r', 2), ('a', 5)]
        );
    }

    #[test]
    fn test_empty_source() {
        let table = FrequencyTable::from_reader(&b""[..]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert!(table.to_node_list().is_empty());
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes: &[u8] = &[b'a', 0xff, b'b'];
        assert!(matches!(
            FrequencyTable::from_reader(bytes),
            Err(HuffmanError::MalformedChar { .. })
        ));
    }

    #[test]
    fn test_report() {
        let table: FrequencyTable = "aab".chars().collect();
        let mut out = Vec::new();
        table.write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1."));
        assert!(lines[0].contains("'a'"));
        assert!(lines[0].ends_with(" 2"));
        assert!(lines[1].contains("'b'"));
    }
}
