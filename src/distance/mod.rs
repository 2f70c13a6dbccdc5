//! Shortest distance between geometries.
//!
//! Both operands are decomposed into points and segments (areal types
//! contribute their boundary). The second operand's primitives are bulk
//! loaded into an R-tree; each primitive of the first then runs a
//! best-first search that stops as soon as the next envelope is further
//! away than the best distance found so far.

use crate::geometry::Geometry;
use crate::primitives::{Envelope, Segment, XY};
use crate::rtree::{BulkItem, RTree};

/// Shortest distance between the operands.
///
/// `None` when either operand is empty; zero when they intersect.
pub(crate) fn distance(g1: &Geometry, g2: &Geometry) -> Option<f64> {
    if g1.intersects(g2) {
        return Some(0.0);
    }

    let (xys1, segs1) = extract_xys_and_segments(g1);
    let (xys2, segs2) = extract_xys_and_segments(g2);
    let tree = load_tree(&xys2, &segs2);
    let mut min_dist = f64::INFINITY;

    // Record ids decode as +(i+1) for the i-th point and -(i+1) for the
    // i-th segment, keeping zero unused.
    let mut search = |env: Envelope, dist_of: &dyn Fn(i64) -> f64| {
        tree.priority_search(env, |record_id| {
            let record_env = if record_id > 0 {
                Envelope::from_xy(xys2[(record_id - 1) as usize])
            } else {
                segs2[(-record_id - 1) as usize].envelope()
            };
            if record_env.distance(env) > min_dist {
                return false;
            }
            min_dist = min_dist.min(dist_of(record_id));
            true
        });
    };

    for &xy in &xys1 {
        search(Envelope::from_xy(xy), &|record_id| {
            if record_id > 0 {
                dist_xy_xy(xy, xys2[(record_id - 1) as usize])
            } else {
                dist_xy_segment(xy, segs2[(-record_id - 1) as usize])
            }
        });
    }
    for &seg in &segs1 {
        search(seg.envelope(), &|record_id| {
            if record_id > 0 {
                dist_xy_segment(xys2[(record_id - 1) as usize], seg)
            } else {
                dist_segment_segment(seg, segs2[(-record_id - 1) as usize])
            }
        });
    }

    min_dist.is_finite().then_some(min_dist)
}

/// Decomposes a geometry into bare points and segments.
fn extract_xys_and_segments(g: &Geometry) -> (Vec<XY>, Vec<Segment>) {
    let mut xys = Vec::new();
    let mut segs = Vec::new();
    collect(g, &mut xys, &mut segs);
    (xys, segs)
}

fn collect(g: &Geometry, xys: &mut Vec<XY>, segs: &mut Vec<Segment>) {
    match g {
        Geometry::Point(p) => xys.extend(p.xy()),
        Geometry::MultiPoint(mp) => xys.extend(mp.xys()),
        Geometry::LineString(ls) => segs.extend(ls.segments()),
        Geometry::MultiLineString(mls) => segs.extend(mls.all_segments()),
        Geometry::Polygon(p) => segs.extend(p.all_segments()),
        Geometry::MultiPolygon(mp) => segs.extend(mp.all_segments()),
        Geometry::GeometryCollection(gc) => {
            for child in gc.geometries() {
                collect(child, xys, segs);
            }
        }
    }
}

fn load_tree(xys: &[XY], segs: &[Segment]) -> RTree {
    let mut items = Vec::with_capacity(xys.len() + segs.len());
    for (i, &xy) in xys.iter().enumerate() {
        items.push(BulkItem::new(Envelope::from_xy(xy), (i + 1) as i64));
    }
    for (i, &seg) in segs.iter().enumerate() {
        items.push(BulkItem::new(seg.envelope(), -((i + 1) as i64)));
    }
    RTree::bulk_load(items)
}

fn dist_xy_xy(a: XY, b: XY) -> f64 {
    a.sub(b).length()
}

/// Distance from a point to a closed segment via parametric projection.
fn dist_xy_segment(p: XY, seg: Segment) -> f64 {
    let ab = seg.b.sub(seg.a);
    let ab_len = ab.length();
    if ab_len == 0.0 {
        return dist_xy_xy(p, seg.a);
    }
    let proj = p.sub(seg.a).dot(ab) / ab_len;
    let closest = if proj < 0.0 {
        seg.a
    } else if proj > ab_len {
        seg.b
    } else {
        seg.a.add(ab.scale(proj / ab_len))
    };
    dist_xy_xy(p, closest)
}

/// Distance between two non-crossing segments: the minimum of the four
/// endpoint projections.
fn dist_segment_segment(s1: Segment, s2: Segment) -> f64 {
    [
        dist_xy_segment(s1.a, s2),
        dist_xy_segment(s1.b, s2),
        dist_xy_segment(s2.a, s1),
        dist_xy_segment(s2.b, s1),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ConstructOpts, GeometryCollection, LineString, Point, Polygon};
    use approx::assert_relative_eq;

    fn pt(x: f64, y: f64) -> Geometry {
        Point::new(XY::new(x, y)).unwrap().into()
    }

    fn ls(xys: &[(f64, f64)]) -> Geometry {
        let xys: Vec<XY> = xys.iter().map(|&(x, y)| XY::new(x, y)).collect();
        LineString::from_xys(&xys).unwrap().into()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        let ring = LineString::from_xys(&[
            XY::new(x0, y0),
            XY::new(x1, y0),
            XY::new(x1, y1),
            XY::new(x0, y1),
            XY::new(x0, y0),
        ])
        .unwrap();
        Polygon::new(vec![ring], ConstructOpts::default())
            .unwrap()
            .into()
    }

    #[test]
    fn test_point_to_line_string() {
        // Seed scenario: distance from POINT(0 0) to LINESTRING(3 0, 3 4).
        assert_relative_eq!(
            pt(0.0, 0.0).distance(&ls(&[(3.0, 0.0), (3.0, 4.0)])).unwrap(),
            3.0
        );
    }

    #[test]
    fn test_point_to_polygon_corner() {
        // Seed scenario: nearest point of the square is its corner.
        let d = pt(0.0, 0.0).distance(&square(10.0, 10.0, 11.0, 11.0)).unwrap();
        assert_relative_eq!(d, 200.0_f64.sqrt());
    }

    #[test]
    fn test_intersecting_distance_is_zero() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, 1.0, 3.0, 3.0);
        assert_eq!(a.distance(&b), Some(0.0));
    }

    #[test]
    fn test_empty_operand_has_no_distance() {
        assert_eq!(pt(0.0, 0.0).distance(&Point::empty().into()), None);
        assert_eq!(
            Geometry::from(GeometryCollection::empty()).distance(&pt(0.0, 0.0)),
            None
        );
    }

    #[test]
    fn test_symmetry() {
        let a = ls(&[(0.0, 0.0), (1.0, 5.0), (2.0, 0.0)]);
        let b = square(4.0, 1.0, 6.0, 3.0);
        assert_relative_eq!(a.distance(&b).unwrap(), b.distance(&a).unwrap());
    }

    #[test]
    fn test_triangle_inequality() {
        let a = pt(0.0, 0.0);
        let b = square(5.0, 0.0, 6.0, 1.0);
        let c = ls(&[(10.0, 0.0), (10.0, 5.0)]);
        let (ab, bc, ac) = (
            a.distance(&b).unwrap(),
            b.distance(&c).unwrap(),
            a.distance(&c).unwrap(),
        );
        assert!(ac <= ab + bc + 1e-9);
    }

    #[test]
    fn test_segment_to_segment() {
        let a = ls(&[(0.0, 0.0), (0.0, 4.0)]);
        let b = ls(&[(3.0, 1.0), (5.0, 3.0)]);
        assert_relative_eq!(a.distance(&b).unwrap(), 3.0);
    }

    #[test]
    fn test_many_segments_uses_nearest() {
        // A long chain against a point: only one vertex is closest.
        let mut chain = Vec::new();
        for i in 0..100 {
            chain.push((i as f64, (i % 2) as f64 + 5.0));
        }
        let g = ls(&chain);
        let d = pt(37.0, 0.0).distance(&g).unwrap();
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_distance_between_collections() {
        let gc: Geometry = GeometryCollection::new(vec![
            pt(0.0, 0.0),
            ls(&[(10.0, 10.0), (11.0, 11.0)]),
        ])
        .into();
        let d = gc.distance(&pt(0.0, 3.0)).unwrap();
        assert_relative_eq!(d, 3.0);
    }
}
