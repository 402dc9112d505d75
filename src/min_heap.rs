use std::io::{self, Write};

/// Binary min-heap in array form: the children of `i` live at `2i + 1` and `2i + 2`.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { elements: vec![] }
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn parent(&self, i: usize) -> usize {
        (i - 1) / 2
    }

    pub fn left(&self, i: usize) -> usize {
        2 * i + 1
    }

    pub fn right(&self, i: usize) -> usize {
        2 * i + 2
    }

    /// Elements in array order.
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Graphviz rendering of the array as a binary tree.
    pub fn write_dot<W, F>(&self, out: &mut W, label: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&T) -> String,
    {
        writeln!(out, "graph {{")?;
        for (i, element) in self.elements.iter().enumerate() {
            writeln!(out, "  node_{}[label=\"{}\"];", i, label(element))?;
        }
        for i in 0..self.heap_size() {
            for child in [self.left(i), self.right(i)] {
                if child < self.heap_size() {
                    writeln!(out, "  node_{} -- node_{};", i, child)?;
                }
            }
        }
        writeln!(out, "}}")
    }
}

impl<T: Ord> MinHeap<T> {
    /// Sorts `source`, then inserts each element in turn. The layout depends
    /// only on the elements, never on the order they arrive in.
    pub fn build(mut source: Vec<T>) -> Self {
        source.sort();
        let mut heap = MinHeap {
            elements: Vec::with_capacity(source.len()),
        };
        for value in source {
            heap.insert(value);
        }
        heap
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[self.parent(i)] <= self.elements[i])
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.heap_size() - 1);
    }

    /// Remove the smallest element; `None` on an empty heap.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // the last element takes the root's place
        let result = self.elements.swap_remove(0);
        self.min_heapify(0);
        Some(result)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = self.parent(i);
            if self.elements[i] >= self.elements[p] {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    fn min_heapify(&mut self, i: usize) {
        let l = self.left(i);
        let r = self.right(i);
        let mut smallest = i;

        // a node may have a left child and no right child
        if l < self.heap_size() && self.elements[l] < self.elements[smallest] {
            smallest = l;
        }
        if r < self.heap_size() && self.elements[r] < self.elements[smallest] {
            smallest = r;
        }

        if smallest != i {
            self.elements.swap(i, smallest);
            self.min_heapify(smallest);
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::hufftree::HuffNode;

    fn drain<T: Ord>(heap: &mut MinHeap<T>) -> Vec<T> {
        std::iter::from_fn(|| heap.extract_min()).collect()
    }

    #[test]
    fn test_pop_order() {
        let mut heap = MinHeap::build(vec![5, 3, 9, 1, 4, 1, 8, 2]);
        assert!(heap.valid_min_heap());
        assert_eq!(drain(&mut heap), vec![1, 1, 2, 3, 4, 5, 8, 9]);
    }

    #[test]
    fn test_empty_pop() {
        let mut heap: MinHeap<u32> = MinHeap::new();
        assert_eq!(heap.extract_min(), None);
        heap.insert(7);
        assert_eq!(heap.extract_min(), Some(7));
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn test_interleaved_insert_and_pop() {
        let mut heap = MinHeap::new();
        heap.insert(10);
        heap.insert(4);
        assert_eq!(heap.extract_min(), Some(4));
        heap.insert(6);
        heap.insert(2);
        heap.insert(12);
        assert_eq!(heap.peek(), Some(&2));
        assert!(heap.valid_min_heap());
        assert_eq!(drain(&mut heap), vec![2, 6, 10, 12]);
    }

    #[test]
    fn test_left_child_only() {
        // root with a single (left) child after the pop
        let mut heap = MinHeap::build(vec![1, 3, 2]);
        assert_eq!(heap.extract_min(), Some(1));
        assert_eq!(heap.as_slice().len(), 2);
        assert!(heap.valid_min_heap());
        assert_eq!(heap.extract_min(), Some(2));
        assert_eq!(heap.extract_min(), Some(3));
    }

    #[test]
    fn test_priority_queue_from_frequencies() {
        let text = "zzzzyyyxxwwv😀😀😀ęęęęaaaa";
        let table: FrequencyTable = text.chars().collect();
        let mut heap = MinHeap::build(table.to_node_list());
        let popped = drain(&mut heap);
        assert_eq!(popped.len(), table.len());
        for pair in popped.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            assert!(
                prev.weight() < cur.weight()
                    || (prev.weight() == cur.weight() && prev.symbol() < cur.symbol()),
                "{:?} popped before {:?}",
                prev,
                cur
            );
        }
    }

    #[test]
    fn test_equal_weights_pop_by_char() {
        let nodes = vec![
            HuffNode::new('d', 3),
            HuffNode::new('a', 3),
            HuffNode::new('c', 3),
            HuffNode::new('b', 3),
        ];
        let mut heap = MinHeap::build(nodes);
        let order: Vec<char> = drain(&mut heap)
            .into_iter()
            .filter_map(|n| n.symbol())
            .collect();
        assert_eq!(order, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn test_internal_before_leaf_of_equal_weight() {
        let merged = HuffNode::merge(HuffNode::new('x', 1), HuffNode::new('y', 1));
        let mut heap = MinHeap::build(vec![HuffNode::new('\0', 2), merged, HuffNode::new('a', 1)]);
        assert_eq!(heap.extract_min().and_then(|n| n.symbol()), Some('a'));
        let next = heap.extract_min().unwrap();
        assert!(!next.is_leaf());
        assert_eq!(next.weight(), 2);
        assert_eq!(heap.extract_min().and_then(|n| n.symbol()), Some('\0'));
    }

    #[test]
    fn test_write_dot() {
        let heap = MinHeap::build(vec![3, 1, 2]);
        let mut out = Vec::new();
        heap.write_dot(&mut out, |v| v.to_string()).unwrap();
        let dot = String::from_utf8(out).unwrap();
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("node_0[label=\"1\"];"));
        assert!(dot.contains("node_0 -- node_1;"));
        assert!(dot.contains("node_0 -- node_2;"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
