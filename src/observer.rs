//! Optional side channels into the codec: diagnostics the pipeline reports to
//! but never reads back.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::min_heap::MinHeap;

/// Hooks called at each stage of a codec pass. Every hook defaults to a no-op.
pub trait CodecObserver {
    /// The finished frequency table (encode only).
    fn on_frequencies(&mut self, _frequencies: &FrequencyTable) -> Result<()> {
        Ok(())
    }

    /// The priority queue before any merge (encode only).
    fn on_queue(&mut self, _queue: &MinHeap<HuffNode>) -> Result<()> {
        Ok(())
    }

    /// The tree built by the encoder or rebuilt by the decoder.
    fn on_tree(&mut self, _tree: &HuffmanTree) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CodecObserver for NoopObserver {}

impl<T: CodecObserver + ?Sized> CodecObserver for &mut T {
    fn on_frequencies(&mut self, frequencies: &FrequencyTable) -> Result<()> {
        (**self).on_frequencies(frequencies)
    }

    fn on_queue(&mut self, queue: &MinHeap<HuffNode>) -> Result<()> {
        (**self).on_queue(queue)
    }

    fn on_tree(&mut self, tree: &HuffmanTree) -> Result<()> {
        (**self).on_tree(tree)
    }
}

impl<T: CodecObserver> CodecObserver for Option<T> {
    fn on_frequencies(&mut self, frequencies: &FrequencyTable) -> Result<()> {
        match self {
            Some(inner) => inner.on_frequencies(frequencies),
            None => Ok(()),
        }
    }

    fn on_queue(&mut self, queue: &MinHeap<HuffNode>) -> Result<()> {
        match self {
            Some(inner) => inner.on_queue(queue),
            None => Ok(()),
        }
    }

    fn on_tree(&mut self, tree: &HuffmanTree) -> Result<()> {
        match self {
            Some(inner) => inner.on_tree(tree),
            None => Ok(()),
        }
    }
}

impl<A: CodecObserver, B: CodecObserver> CodecObserver for (A, B) {
    fn on_frequencies(&mut self, frequencies: &FrequencyTable) -> Result<()> {
        self.0.on_frequencies(frequencies)?;
        self.1.on_frequencies(frequencies)
    }

    fn on_queue(&mut self, queue: &MinHeap<HuffNode>) -> Result<()> {
        self.0.on_queue(queue)?;
        self.1.on_queue(queue)
    }

    fn on_tree(&mut self, tree: &HuffmanTree) -> Result<()> {
        self.0.on_tree(tree)?;
        self.1.on_tree(tree)
    }
}

/// Writes `queue.dot` and `tree.dot` into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct GraphvizExporter {
    dir: PathBuf,
}

impl GraphvizExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        GraphvizExporter { dir: dir.into() }
    }

    fn create(&self, name: &str) -> Result<BufWriter<File>> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        debug!(path = %path.display(), "writing graphviz export");
        Ok(BufWriter::new(File::create(path)?))
    }
}

impl CodecObserver for GraphvizExporter {
    fn on_queue(&mut self, queue: &MinHeap<HuffNode>) -> Result<()> {
        let mut out = self.create("queue.dot")?;
        queue.write_dot(&mut out, |node| match node.symbol() {
            Some(c) => format!(
                "char: {}\\nrune: {}\\nfreq: {}",
                c.escape_default(),
                c as u32,
                node.weight()
            ),
            None => format!("freq: {}", node.weight()),
        })?;
        out.flush()?;
        Ok(())
    }

    fn on_tree(&mut self, tree: &HuffmanTree) -> Result<()> {
        let mut out = self.create("tree.dot")?;
        tree.write_dot(&mut out)?;
        out.flush()?;
        Ok(())
    }
}

/// Writes the human-readable frequency report to any sink.
#[derive(Debug)]
pub struct FrequencyReporter<W> {
    out: W,
}

impl<W: Write> FrequencyReporter<W> {
    pub fn new(out: W) -> Self {
        FrequencyReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CodecObserver for FrequencyReporter<W> {
    fn on_frequencies(&mut self, frequencies: &FrequencyTable) -> Result<()> {
        frequencies.write_report(&mut self.out)?;
        Ok(())
    }
}
