//! Exact geometric predicates.
//!
//! These are tolerance-free: every decision is the sign of an f64
//! expression, so the predicates are total and never error. They are not
//! robust against adversarial near-collinear inputs; the rest of the
//! crate only relies on their self-consistency.

use crate::primitives::{Segment, XY};

/// Result of the three-point orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `s` lies to the left of the directed line p -> q.
    LeftTurn,
    /// The three points lie on one line.
    Collinear,
    /// `s` lies to the right of the directed line p -> q.
    RightTurn,
}

/// Orientation of `s` relative to the directed line from `p` through `q`.
///
/// The sign of the cross product `(q - p) x (s - q)`.
#[inline]
pub fn orientation(p: XY, q: XY, s: XY) -> Orientation {
    let cross = q.sub(p).cross(s.sub(q));
    if cross > 0.0 {
        Orientation::LeftTurn
    } else if cross < 0.0 {
        Orientation::RightTurn
    } else {
        Orientation::Collinear
    }
}

/// Returns true if the point lies on the closed segment.
///
/// An envelope rejection test followed by an exact collinearity check.
#[inline]
pub fn point_on_segment(p: XY, seg: Segment) -> bool {
    if !seg.envelope().contains_xy(p) {
        return false;
    }
    let lhs = (p.x - seg.a.x) * (seg.b.y - seg.a.y);
    let rhs = (p.y - seg.a.y) * (seg.b.x - seg.a.x);
    lhs == rhs
}

/// Returns true if two closed segments share at least one point.
///
/// The four-orientation test; when all four orientations are collinear the
/// decision falls back to checking whether any endpoint lies on the
/// opposite segment.
pub fn segments_intersect(s1: Segment, s2: Segment) -> bool {
    let o1 = orientation(s1.a, s1.b, s2.a);
    let o2 = orientation(s1.a, s1.b, s2.b);
    let o3 = orientation(s2.a, s2.b, s1.a);
    let o4 = orientation(s2.a, s2.b, s1.b);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    if o1 == Orientation::Collinear && o2 == Orientation::Collinear {
        return point_on_segment(s2.a, s1)
            || point_on_segment(s2.b, s1)
            || point_on_segment(s1.a, s2)
            || point_on_segment(s1.b, s2);
    }

    false
}

/// Which side of a ring a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingSide {
    /// Strictly inside the ring.
    Interior,
    /// On one of the ring's edges.
    Boundary,
    /// Strictly outside the ring.
    Exterior,
}

/// Locates a point relative to a closed ring given as its edge list.
///
/// Ray casting with a horizontal ray towards +x. A crossing through a
/// vertex is counted only for the edge whose other endpoint is strictly
/// above the ray, so every crossing contributes exactly once.
pub fn point_ring_side<I>(pt: XY, edges: I) -> RingSide
where
    I: IntoIterator<Item = Segment>,
{
    let mut inside = false;
    for edge in edges {
        if point_on_segment(pt, edge) {
            return RingSide::Boundary;
        }
        let (p1, p2) = (edge.a, edge.b);
        if (p1.y > pt.y) != (p2.y > pt.y) {
            let x_cross = p1.x + (pt.y - p1.y) / (p2.y - p1.y) * (p2.x - p1.x);
            if pt.x < x_cross {
                inside = !inside;
            }
        }
    }
    if inside {
        RingSide::Interior
    } else {
        RingSide::Exterior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(XY::new(ax, ay), XY::new(bx, by))
    }

    fn square_edges() -> Vec<Segment> {
        vec![
            seg(0.0, 0.0, 4.0, 0.0),
            seg(4.0, 0.0, 4.0, 4.0),
            seg(4.0, 4.0, 0.0, 4.0),
            seg(0.0, 4.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_orientation() {
        let p = XY::new(0.0, 0.0);
        let q = XY::new(2.0, 0.0);
        assert_eq!(orientation(p, q, XY::new(1.0, 1.0)), Orientation::LeftTurn);
        assert_eq!(orientation(p, q, XY::new(1.0, -1.0)), Orientation::RightTurn);
        assert_eq!(orientation(p, q, XY::new(5.0, 0.0)), Orientation::Collinear);
    }

    #[test]
    fn test_point_on_segment() {
        let s = seg(0.0, 0.0, 2.0, 4.0);
        assert!(point_on_segment(XY::new(1.0, 2.0), s));
        assert!(point_on_segment(XY::new(0.0, 0.0), s));
        assert!(point_on_segment(XY::new(2.0, 4.0), s));
        assert!(!point_on_segment(XY::new(1.0, 2.5), s));
        // Collinear but beyond the endpoint.
        assert!(!point_on_segment(XY::new(3.0, 6.0), s));
    }

    #[test]
    fn test_segments_crossing() {
        assert!(segments_intersect(seg(0.0, 0.0, 2.0, 2.0), seg(0.0, 2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_segments_touching_at_endpoint() {
        assert!(segments_intersect(seg(0.0, 0.0, 1.0, 1.0), seg(1.0, 1.0, 2.0, 0.0)));
    }

    #[test]
    fn test_segments_t_junction() {
        assert!(segments_intersect(seg(0.0, 0.0, 4.0, 0.0), seg(2.0, -1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_segments_disjoint() {
        assert!(!segments_intersect(seg(0.0, 0.0, 1.0, 0.0), seg(0.0, 1.0, 1.0, 1.0)));
        assert!(!segments_intersect(seg(0.0, 0.0, 1.0, 1.0), seg(3.0, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn test_segments_collinear() {
        // Overlapping.
        assert!(segments_intersect(seg(0.0, 0.0, 4.0, 0.0), seg(2.0, 0.0, 6.0, 0.0)));
        // Contained.
        assert!(segments_intersect(seg(0.0, 0.0, 4.0, 0.0), seg(1.0, 0.0, 3.0, 0.0)));
        // Touching end to end.
        assert!(segments_intersect(seg(0.0, 0.0, 2.0, 0.0), seg(2.0, 0.0, 4.0, 0.0)));
        // Separated.
        assert!(!segments_intersect(seg(0.0, 0.0, 1.0, 0.0), seg(2.0, 0.0, 3.0, 0.0)));
    }

    #[test]
    fn test_ring_side_interior_exterior() {
        assert_eq!(
            point_ring_side(XY::new(2.0, 2.0), square_edges()),
            RingSide::Interior
        );
        assert_eq!(
            point_ring_side(XY::new(5.0, 2.0), square_edges()),
            RingSide::Exterior
        );
        assert_eq!(
            point_ring_side(XY::new(-1.0, 0.0), square_edges()),
            RingSide::Exterior
        );
    }

    #[test]
    fn test_ring_side_boundary() {
        assert_eq!(
            point_ring_side(XY::new(4.0, 2.0), square_edges()),
            RingSide::Boundary
        );
        assert_eq!(
            point_ring_side(XY::new(0.0, 0.0), square_edges()),
            RingSide::Boundary
        );
    }

    #[test]
    fn test_ring_side_ray_through_vertex() {
        // A diamond: the ray from the centre-left point passes exactly
        // through the right vertex.
        let diamond = vec![
            seg(0.0, 0.0, 2.0, -2.0),
            seg(2.0, -2.0, 4.0, 0.0),
            seg(4.0, 0.0, 2.0, 2.0),
            seg(2.0, 2.0, 0.0, 0.0),
        ];
        assert_eq!(
            point_ring_side(XY::new(2.0, 0.0), diamond.clone()),
            RingSide::Interior
        );
        assert_eq!(
            point_ring_side(XY::new(-1.0, 0.0), diamond),
            RingSide::Exterior
        );
    }
}
