//! Bulk loading for the R-tree.
//!
//! Recursive top-down packing, hardcoded around the 2..=4 node
//! cardinality: fewer than 6 items split two ways (3 ways needs 2+2+2),
//! fewer than 8 split three ways, everything else four ways. Splits use
//! a quickselect-style partial partition along the longer axis of the
//! enclosing box.

use super::{BulkItem, Child, Entry, Node, RTree};
use crate::primitives::Envelope;

const MAX_CHILDREN: usize = 4;

impl RTree {
    /// Builds a tree over the given items.
    ///
    /// The build is deterministic: the pivot generator is seeded from a
    /// fixed constant, so the same input always yields the same tree.
    pub fn bulk_load(mut items: Vec<BulkItem>) -> RTree {
        if items.is_empty() {
            return RTree::default();
        }
        let levels = calculate_levels(items.len());
        let mut nodes = Vec::new();
        let root = bulk_insert(&mut items, levels, &mut nodes);
        RTree { nodes, root: Some(root) }
    }
}

/// Number of levels needed so that 4^levels >= the item count, computed
/// with integer arithmetic to avoid float off-by-one issues.
fn calculate_levels(num_items: usize) -> usize {
    let mut levels = 1;
    let mut count = MAX_CHILDREN;
    while count < num_items {
        count *= MAX_CHILDREN;
        levels += 1;
    }
    levels
}

fn bulk_insert(items: &mut [BulkItem], levels: usize, nodes: &mut Vec<Node>) -> usize {
    if levels == 1 {
        let entries = items
            .iter()
            .map(|it| Entry { bounds: it.bounds, child: Child::Record(it.record_id) })
            .collect();
        nodes.push(Node { entries });
        return nodes.len() - 1;
    }

    if items.len() < 6 {
        let split = items.len() / 2;
        quick_partition(items, split, longer_axis_is_x(items));
        let (a, b) = items.split_at_mut(split);
        let children = vec![
            bulk_insert(a, levels - 1, nodes),
            bulk_insert(b, levels - 1, nodes),
        ];
        return push_parent(children, nodes);
    }

    if items.len() < 8 {
        // 6 or 7 items: 2 + 2 + the rest.
        let horizontal = longer_axis_is_x(items);
        quick_partition(items, 2, horizontal);
        quick_partition(&mut items[3..], 1, horizontal);
        let (a, rest) = items.split_at_mut(2);
        let (b, c) = rest.split_at_mut(2);
        let children = vec![
            bulk_insert(a, levels - 1, nodes),
            bulk_insert(b, levels - 1, nodes),
            bulk_insert(c, levels - 1, nodes),
        ];
        return push_parent(children, nodes);
    }

    // 4-way split via three 2-way splits.
    let half = items.len() / 2;
    quick_partition(items, half, longer_axis_is_x(items));
    let (first, second) = items.split_at_mut(half);
    let q1 = first.len() / 2;
    quick_partition(first, q1, longer_axis_is_x(first));
    let q3 = second.len() / 2;
    quick_partition(second, q3, longer_axis_is_x(second));
    let (a, b) = first.split_at_mut(q1);
    let (c, d) = second.split_at_mut(q3);
    let children = vec![
        bulk_insert(a, levels - 1, nodes),
        bulk_insert(b, levels - 1, nodes),
        bulk_insert(c, levels - 1, nodes),
        bulk_insert(d, levels - 1, nodes),
    ];
    push_parent(children, nodes)
}

fn push_parent(children: Vec<usize>, nodes: &mut Vec<Node>) -> usize {
    let entries = children
        .into_iter()
        .map(|child| Entry { bounds: node_bounds(&nodes[child]), child: Child::Node(child) })
        .collect();
    nodes.push(Node { entries });
    nodes.len() - 1
}

fn node_bounds(node: &Node) -> Envelope {
    let mut bounds = node.entries[0].bounds;
    for entry in &node.entries[1..] {
        bounds = bounds.union(entry.bounds);
    }
    bounds
}

fn longer_axis_is_x(items: &[BulkItem]) -> bool {
    let mut bounds = items[0].bounds;
    for item in &items[1..] {
        bounds = bounds.union(item.bounds);
    }
    bounds.max.x - bounds.min.x > bounds.max.y - bounds.min.y
}

/// Partially sorts so that items 0..k are <= item k and items k+1.. are
/// >= item k, comparing box centres along the chosen axis.
///
/// Pivots come from a linear congruential generator rather than a real
/// RNG: pivot quality is not security-sensitive and the fixed seed keeps
/// repeated builds identical.
fn quick_partition(items: &mut [BulkItem], k: usize, horizontal: bool) {
    let less = |a: &BulkItem, b: &BulkItem| {
        if horizontal {
            a.bounds.min.x + a.bounds.max.x < b.bounds.min.x + b.bounds.max.x
        } else {
            a.bounds.min.y + a.bounds.max.y < b.bounds.min.y + b.bounds.max.y
        }
    };

    let mut rnd_state: i64 = 0;
    let mut rnd = move |n: usize| {
        rnd_state = (1664525 * rnd_state + 1013904223) % (1i64 << 32);
        (rnd_state as usize) % n
    };

    let mut k = k;
    let (mut left, mut right) = (0usize, items.len() - 1);
    loop {
        let pivot = left + rnd(right - left + 1);
        items.swap(pivot, right);

        let mut j = left;
        for i in left..=right {
            if less(&items[i], &items[right]) {
                items.swap(i, j);
                j += 1;
            }
        }
        items.swap(right, j);

        if j - left < k {
            k -= j - left + 1;
            left = j + 1;
        } else if j - left > k {
            right = j - 1;
        } else {
            return;
        }
    }
}
