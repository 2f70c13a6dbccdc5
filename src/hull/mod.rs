//! Convex hull via a Graham scan with a polar-angle sort.

use crate::geometry::{ConstructOpts, Geometry, LineString, Point, Polygon};
use crate::primitives::{orientation, Orientation, XY};

/// Convex hull of all positions of a geometry.
///
/// The hull of an empty geometry is the geometry itself (mirroring
/// PostGIS). Otherwise the result collapses with the hull cardinality:
/// one point gives a Point, a collinear set gives a LineString, anything
/// else a Polygon.
pub(crate) fn convex_hull(g: &Geometry) -> Geometry {
    if g.is_empty() {
        return g.clone();
    }
    let mut pts = Vec::new();
    g.for_each_xy(&mut |p| pts.push(p));

    let hull = graham_scan(pts);
    match hull.len() {
        1 => Point::new(hull[0])
            .expect("hull points come from a validated geometry")
            .into(),
        2 => LineString::from_xys(&hull)
            .expect("bug in graham scan: produced two coincident points")
            .into(),
        _ => {
            let mut ring = hull;
            ring.push(ring[0]);
            let ring = LineString::from_xys(&ring)
                .expect("bug in graham scan: produced a degenerate ring");
            Polygon::new(vec![ring], ConstructOpts::default())
                .expect("bug in graham scan: produced an invalid ring")
                .into()
        }
    }
}

/// Returns the hull vertices in counter-clockwise order, unclosed.
fn graham_scan(mut ps: Vec<XY>) -> Vec<XY> {
    if ps.len() <= 1 {
        return ps;
    }

    sort_by_polar_angle(&mut ps);
    ps.dedup();
    if ps.len() <= 2 {
        return ps;
    }

    let mut stack: Vec<XY> = vec![ps[0], ps[1]];
    for &p in &ps[2..] {
        while stack.len() >= 2
            && orientation(stack[stack.len() - 2], stack[stack.len() - 1], p)
                != Orientation::LeftTurn
        {
            stack.pop();
        }
        stack.push(p);
    }
    stack
}

/// Sorts the points by polar angle around the lowest-then-leftmost
/// anchor; angle ties are broken by distance from the anchor so that the
/// scan keeps the farthest collinear point.
fn sort_by_polar_angle(ps: &mut [XY]) {
    let anchor_idx = lowest_then_leftmost(ps);
    ps.swap(0, anchor_idx);
    let anchor = ps[0];

    ps[1..].sort_by(|&a, &b| match orientation(anchor, a, b) {
        Orientation::LeftTurn => std::cmp::Ordering::Less,
        Orientation::RightTurn => std::cmp::Ordering::Greater,
        Orientation::Collinear => dist_sq(anchor, a).total_cmp(&dist_sq(anchor, b)),
    });
}

fn lowest_then_leftmost(ps: &[XY]) -> usize {
    let mut best = 0;
    for (i, p) in ps.iter().enumerate().skip(1) {
        let b = ps[best];
        if p.y < b.y || (p.y == b.y && p.x < b.x) {
            best = i;
        }
    }
    best
}

fn dist_sq(p: XY, q: XY) -> f64 {
    let d = p.sub(q);
    d.dot(d)
}
