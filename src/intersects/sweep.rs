//! Sweep line for multi-line against multi-line intersection tests.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::primitives::{segments_intersect, Segment};

/// A segment in an active set, keyed by its right endpoint.
#[derive(Debug, PartialEq, Eq)]
struct ActiveSeg {
    seg: Segment,
    /// Insertion sequence; the final tie-breaker keeps the order
    /// deterministic when endpoints coincide.
    seq: usize,
}

impl Ord for ActiveSeg {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seg
            .b
            .x
            .total_cmp(&other.seg.b.x)
            .then(self.seg.b.y.total_cmp(&other.seg.b.y))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ActiveSeg {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Side {
    /// Segments not yet reached by the sweep, ascending by left endpoint.
    unprocessed: Vec<Segment>,
    cursor: usize,
    /// Segments currently cut by the sweep line, keyed by right-x.
    active: BinaryHeap<Reverse<ActiveSeg>>,
    /// Segments that entered the active set this iteration.
    fresh: Vec<Segment>,
    seq: usize,
}

impl Side {
    fn new(mut segs: Vec<Segment>) -> Self {
        for s in &mut segs {
            *s = s.canonical();
        }
        segs.sort_by(|a, b| {
            a.a.x
                .total_cmp(&b.a.x)
                .then(a.a.y.total_cmp(&b.a.y))
        });
        Self {
            unprocessed: segs,
            cursor: 0,
            active: BinaryHeap::new(),
            fresh: Vec::new(),
            seq: 0,
        }
    }

    fn next_start_x(&self) -> Option<f64> {
        self.unprocessed.get(self.cursor).map(|s| s.a.x)
    }

    /// Retires segments wholly left of the sweep line and admits the
    /// segments that start on it.
    fn advance(&mut self, sweep_x: f64) {
        while let Some(Reverse(top)) = self.active.peek() {
            if top.seg.b.x < sweep_x {
                self.active.pop();
            } else {
                break;
            }
        }
        self.fresh.clear();
        while let Some(&seg) = self.unprocessed.get(self.cursor) {
            if seg.a.x != sweep_x {
                break;
            }
            self.fresh.push(seg);
            self.active.push(Reverse(ActiveSeg { seg, seq: self.seq }));
            self.seq += 1;
            self.cursor += 1;
        }
    }
}

/// Returns true if any segment of one set intersects any of the other.
///
/// A vertical sweep moves left to right. Each side keeps an active set of
/// segments currently cut by the sweep line; a segment entering on one
/// side is tested only against the other side's active set.
pub(crate) fn any_segments_intersect(segs1: Vec<Segment>, segs2: Vec<Segment>) -> bool {
    let mut sides = [Side::new(segs1), Side::new(segs2)];

    loop {
        let sweep_x = match (sides[0].next_start_x(), sides[1].next_start_x()) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return false,
        };
        for side in &mut sides {
            side.advance(sweep_x);
        }
        let (left, right) = sides.split_at_mut(1);
        if fresh_hits_active(&left[0], &right[0]) || fresh_hits_active(&right[0], &left[0]) {
            return true;
        }
    }
}

fn fresh_hits_active(side: &Side, other: &Side) -> bool {
    side.fresh.iter().any(|&fresh| {
        other
            .active
            .iter()
            .any(|Reverse(act)| segments_intersect(act.seg, fresh))
    })
}
