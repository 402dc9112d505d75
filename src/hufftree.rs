use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::{self, Read, Write};

use bitvec::prelude::*;

use crate::bit_stream::{BitReader, BitWriter, Bits};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Deepest leaf a header may describe.
pub const MAX_CODE_LENGTH: usize = 128;

/// Character -> code, left edges `0`, right edges `1`.
pub type CodeTable = BTreeMap<char, Bits>;

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    pub fn new(root: HuffNode) -> Self {
        HuffmanTree { root }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Repeatedly merge the two lightest nodes until one root remains.
    /// `None` when the heap is empty.
    pub fn from_heap(mut heap: MinHeap<HuffNode>) -> Option<Self> {
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;
            heap.insert(HuffNode::merge(x, y));
        }
        heap.extract_min().map(HuffmanTree::new)
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        HuffmanTree::from_heap(MinHeap::build(frequencies.to_node_list()))
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Code for every leaf. A tree that is a single leaf gives that leaf the
    /// one-bit code `0`, so every symbol still costs one payload bit.
    pub fn generate_table(&self) -> CodeTable {
        let mut table = BTreeMap::new();
        match &self.root {
            HuffNode::Leaf { symbol, .. } => {
                table.insert(*symbol, Bits::repeat(false, 1));
            }
            root => root.generate_table(&mut table, &mut Bits::new()),
        }
        table
    }

    /// Pre-order header: `0` per internal node, `1` plus the character per
    /// leaf, then `control` and one-bits up to the next byte boundary.
    pub fn write_header<W: Write>(&self, writer: &mut BitWriter<W>, control: char) -> Result<()> {
        self.root.write_header(writer)?;
        writer.write_char(control)?;
        writer.flush(true)
    }

    /// The header's pre-order sequence with bits spelled as `0`/`1` digits.
    pub fn to_header_string(&self) -> String {
        let mut out = String::new();
        self.root.push_header_digits(&mut out);
        out
    }

    /// Rebuild a tree from a header. Leaves the reader just before the
    /// control character. Weights are not transmitted and read back as zero.
    pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let mut seen = HashSet::new();
        let root = HuffNode::read_header(reader, 0, &mut seen)?;
        Ok(HuffmanTree { root })
    }

    /// Graphviz rendering of the tree.
    pub fn write_dot<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "graph {{")?;
        let mut next_id = 0;
        self.root.write_dot(out, &mut next_id)?;
        writeln!(out, "}}")
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &HuffNode,
        depth: usize,
        label: &str,
    ) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { symbol, weight } => {
                writeln!(
                    f,
                    "{}{}-> Leaf: {:?} (U+{:04X}) [weight: {}]",
                    indent, label, symbol, *symbol as u32, weight
                )
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                self.fmt_node(f, left, depth + 1, "L")?;
                self.fmt_node(f, right, depth + 1, "R")
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, &self.root, 0, "root")
    }
}

#[derive(Debug, Clone)]
pub enum HuffNode {
    Leaf {
        weight: usize,
        symbol: char,
    },
    Internal {
        weight: usize,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: char, weight: usize) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn symbol(&self) -> Option<char> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn merge(a: Self, b: Self) -> Self {
        // a is the smaller node and goes left
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn generate_table(&self, code_table: &mut CodeTable, path: &mut Bits) {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                code_table.insert(*symbol, path.clone());
            }
            HuffNode::Internal { left, right, .. } => {
                path.push(false);
                left.generate_table(code_table, path);
                path.pop();
                path.push(true);
                right.generate_table(code_table, path);
                path.pop();
            }
        }
    }

    fn write_header<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                writer.write_bit(true)?;
                writer.write_char(*symbol)
            }
            HuffNode::Internal { left, right, .. } => {
                writer.write_bit(false)?;
                left.write_header(writer)?;
                right.write_header(writer)
            }
        }
    }

    fn push_header_digits(&self, out: &mut String) {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                out.push('1');
                out.push(*symbol);
            }
            HuffNode::Internal { left, right, .. } => {
                out.push('0');
                left.push_header_digits(out);
                right.push_header_digits(out);
            }
        }
    }

    fn read_header<R: Read>(
        reader: &mut BitReader<R>,
        depth: usize,
        seen: &mut HashSet<char>,
    ) -> Result<Self> {
        if depth > MAX_CODE_LENGTH {
            return Err(HuffmanError::header(format!(
                "tree is deeper than {} levels",
                MAX_CODE_LENGTH
            )));
        }
        if reader.read_bit()? {
            let symbol = reader.read_char()?;
            if !seen.insert(symbol) {
                return Err(HuffmanError::header(format!("duplicate leaf {:?}", symbol)));
            }
            Ok(HuffNode::new(symbol, 0))
        } else {
            let left = HuffNode::read_header(reader, depth + 1, seen)?;
            let right = HuffNode::read_header(reader, depth + 1, seen)?;
            Ok(HuffNode::merge(left, right))
        }
    }

    fn write_dot<W: Write>(&self, out: &mut W, next_id: &mut usize) -> io::Result<usize> {
        let id = *next_id;
        *next_id += 1;
        match self {
            HuffNode::Leaf { symbol, weight } => {
                writeln!(
                    out,
                    "  node_{}[label=\"char: {}\\nrune: {}\\nfreq: {}\"];",
                    id,
                    symbol.escape_default(),
                    *symbol as u32,
                    weight
                )?;
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(out, "  node_{}[label=\"freq: {}\"];", id, weight)?;
                let l = left.write_dot(out, next_id)?;
                let r = right.write_dot(out, next_id)?;
                writeln!(out, "  node_{} -- node_{} [label=\"0\"];", id, l)?;
                writeln!(out, "  node_{} -- node_{} [label=\"1\"];", id, r)?;
            }
        }
        Ok(id)
    }
}

impl PartialEq for HuffNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HuffNode {}

impl PartialOrd for HuffNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HuffNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // weight first; ties put merged nodes ahead of leaves, leaves by code point
        self.weight().cmp(&other.weight()).then_with(|| match (self, other) {
            (HuffNode::Leaf { symbol: a, .. }, HuffNode::Leaf { symbol: b, .. }) => a.cmp(b),
            (HuffNode::Internal { .. }, HuffNode::Leaf { .. }) => Ordering::Less,
            (HuffNode::Leaf { .. }, HuffNode::Internal { .. }) => Ordering::Greater,
            (HuffNode::Internal { .. }, HuffNode::Internal { .. }) => Ordering::Equal,
        })
    }
}

/// Render a code as `0`/`1` digits.
pub fn code_string(code: &BitSlice<u8, Msb0>) -> String {
    code.iter().by_vals().map(|bit| if bit { '1' } else { '0' }).collect()
}
