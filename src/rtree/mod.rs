//! Static 2D R-tree with bulk loading and best-first search.
//!
//! The tree is built once by [`RTree::bulk_load`] and read-only after
//! that, so concurrent searches need no synchronisation. Node fan-out is
//! fixed at 2..=4 children.

mod bulk;

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::primitives::Envelope;

/// An item to be bulk loaded: a bounding box plus a caller-chosen id.
///
/// Record ids are opaque to the tree; zero is not special here.
#[derive(Debug, Clone, Copy)]
pub struct BulkItem {
    /// Bounding box of the record.
    pub bounds: Envelope,
    /// Caller-chosen record id.
    pub record_id: i64,
}

impl BulkItem {
    /// Creates a bulk item.
    pub fn new(bounds: Envelope, record_id: i64) -> Self {
        Self { bounds, record_id }
    }
}

#[derive(Debug, Clone, Copy)]
enum Child {
    Node(usize),
    Record(i64),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    bounds: Envelope,
    child: Child,
}

#[derive(Debug)]
struct Node {
    entries: Vec<Entry>,
}

/// A static spatial index over axis-aligned boxes.
#[derive(Debug, Default)]
pub struct RTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl RTree {
    /// Returns true if the tree holds no records.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Visits the id of every record whose box intersects the query box.
    pub fn range_search(&self, query: Envelope, mut visit: impl FnMut(i64)) {
        let Some(root) = self.root else { return };
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            for entry in &self.nodes[idx].entries {
                if !entry.bounds.intersects(query) {
                    continue;
                }
                match entry.child {
                    Child::Node(n) => stack.push(n),
                    Child::Record(id) => visit(id),
                }
            }
        }
    }

    /// Visits record ids in ascending distance of their box from the
    /// query box. The visitor returns false to stop the traversal.
    pub fn priority_search(&self, query: Envelope, mut visit: impl FnMut(i64) -> bool) {
        let Some(root) = self.root else { return };
        let mut queue: BinaryHeap<Reverse<QueueEntry>> = BinaryHeap::new();
        let mut seq = 0usize;
        queue.push(Reverse(QueueEntry { dist: 0.0, seq, child: Child::Node(root) }));
        while let Some(Reverse(item)) = queue.pop() {
            match item.child {
                Child::Node(n) => {
                    for entry in &self.nodes[n].entries {
                        seq += 1;
                        queue.push(Reverse(QueueEntry {
                            dist: entry.bounds.distance(query),
                            seq,
                            child: entry.child,
                        }));
                    }
                }
                Child::Record(id) => {
                    if !visit(id) {
                        return;
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
struct QueueEntry {
    dist: f64,
    /// Queue insertion order; makes equal-distance pops deterministic.
    seq: usize,
    child: Child,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::XY;

    fn boxes(count: usize, seed: u64) -> Vec<BulkItem> {
        let mut state = seed;
        let mut rnd = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 1000) as f64 / 10.0
        };
        (0..count)
            .map(|i| {
                let (x, y) = (rnd(), rnd());
                let (w, h) = (rnd() / 20.0, rnd() / 20.0);
                BulkItem::new(
                    Envelope::from_corners(XY::new(x, y), XY::new(x + w, y + h)),
                    i as i64,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = RTree::bulk_load(Vec::new());
        assert!(tree.is_empty());
        let mut hits = 0;
        tree.range_search(
            Envelope::from_corners(XY::new(0.0, 0.0), XY::new(1.0, 1.0)),
            |_| hits += 1,
        );
        tree.priority_search(
            Envelope::from_corners(XY::new(0.0, 0.0), XY::new(1.0, 1.0)),
            |_| {
                hits += 1;
                true
            },
        );
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_range_search_exhaustive_agreement() {
        for count in [1, 2, 5, 6, 7, 8, 9, 20, 100] {
            let items = boxes(count, 12345);
            let tree = RTree::bulk_load(items.clone());
            let query = Envelope::from_corners(XY::new(20.0, 20.0), XY::new(70.0, 70.0));

            let mut got: Vec<i64> = Vec::new();
            tree.range_search(query, |id| got.push(id));
            got.sort_unstable();

            let mut want: Vec<i64> = items
                .iter()
                .filter(|it| it.bounds.intersects(query))
                .map(|it| it.record_id)
                .collect();
            want.sort_unstable();
            assert_eq!(got, want, "count={count}");
        }
    }

    #[test]
    fn test_priority_search_ascending() {
        let items = boxes(200, 999);
        let tree = RTree::bulk_load(items.clone());
        let query = Envelope::from_xy(XY::new(50.0, 50.0));

        let mut dists: Vec<f64> = Vec::new();
        tree.priority_search(query, |id| {
            dists.push(items[id as usize].bounds.distance(query));
            true
        });
        assert_eq!(dists.len(), items.len());
        for pair in dists.windows(2) {
            assert!(pair[0] <= pair[1], "distances must not decrease");
        }
    }

    #[test]
    fn test_priority_search_early_stop_omits_no_closer_record() {
        let items = boxes(150, 7);
        let tree = RTree::bulk_load(items.clone());
        let query = Envelope::from_xy(XY::new(10.0, 90.0));

        let mut seen: Vec<i64> = Vec::new();
        tree.priority_search(query, |id| {
            seen.push(id);
            seen.len() < 10
        });
        assert_eq!(seen.len(), 10);
        let cutoff = items[*seen.last().unwrap() as usize].bounds.distance(query);
        for item in &items {
            if item.bounds.distance(query) < cutoff {
                assert!(
                    seen.contains(&item.record_id),
                    "record {} closer than the cutoff was skipped",
                    item.record_id
                );
            }
        }
    }

    #[test]
    fn test_deterministic_build() {
        let items = boxes(64, 3);
        let (t1, t2) = (RTree::bulk_load(items.clone()), RTree::bulk_load(items));
        let query = Envelope::from_xy(XY::new(42.0, 24.0));
        let (mut a, mut b) = (Vec::new(), Vec::new());
        t1.priority_search(query, |id| {
            a.push(id);
            true
        });
        t2.priority_search(query, |id| {
            b.push(id);
            true
        });
        assert_eq!(a, b);
    }
}
