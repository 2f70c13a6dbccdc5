//! The intersection-predicate engine.
//!
//! Operands are ordered by a fixed variant rank so every pair is handled
//! exactly once, collections recurse over their children, and the
//! multi-line against multi-line case runs on a sweep line instead of
//! the quadratic segment grid.

mod sweep;

pub(crate) use sweep::any_segments_intersect;

use crate::geometry::polygon::locate_in_polygon;
use crate::geometry::{Geometry, LineString, Polygon};
use crate::primitives::{point_on_segment, RingSide, Segment, XY};

/// Returns true if the operands share at least one point.
pub(crate) fn intersects(g1: &Geometry, g2: &Geometry) -> bool {
    if g1.is_empty() || g2.is_empty() {
        return false;
    }

    let (g1, g2) = if g1.rank() > g2.rank() { (g2, g1) } else { (g1, g2) };

    if let Geometry::GeometryCollection(gc) = g2 {
        return gc.geometries().iter().any(|child| intersects(g1, child));
    }

    use Geometry as G;
    match (g1, g2) {
        (G::Point(_), G::Point(_))
        | (G::Point(_), G::MultiPoint(_))
        | (G::MultiPoint(_), G::MultiPoint(_)) => puntal_puntal(&xys_of(g1), &xys_of(g2)),

        (G::Point(_), G::LineString(_))
        | (G::Point(_), G::MultiLineString(_))
        | (G::MultiPoint(_), G::MultiLineString(_)) => puntal_lineal(&xys_of(g1), &lines_of(g2)),
        (G::LineString(_), G::MultiPoint(_)) => puntal_lineal(&xys_of(g2), &lines_of(g1)),

        (G::Point(_), G::Polygon(_))
        | (G::Point(_), G::MultiPolygon(_))
        | (G::MultiPoint(_), G::MultiPolygon(_)) => puntal_areal(&xys_of(g1), &polys_of(g2)),
        (G::Polygon(_), G::MultiPoint(_)) => puntal_areal(&xys_of(g2), &polys_of(g1)),

        (G::LineString(_), G::LineString(_))
        | (G::LineString(_), G::MultiLineString(_))
        | (G::MultiLineString(_), G::MultiLineString(_)) => {
            any_segments_intersect(line_segments(&lines_of(g1)), line_segments(&lines_of(g2)))
        }

        (G::LineString(_), G::Polygon(_))
        | (G::LineString(_), G::MultiPolygon(_))
        | (G::MultiLineString(_), G::MultiPolygon(_)) => lineal_areal(&lines_of(g1), &polys_of(g2)),
        (G::Polygon(_), G::MultiLineString(_)) => lineal_areal(&lines_of(g2), &polys_of(g1)),

        (G::Polygon(_), G::Polygon(_))
        | (G::Polygon(_), G::MultiPolygon(_))
        | (G::MultiPolygon(_), G::MultiPolygon(_)) => areal_areal(&polys_of(g1), &polys_of(g2)),

        _ => panic!(
            "implementation error: unhandled geometry pair {} and {}",
            g1.geometry_type(),
            g2.geometry_type()
        ),
    }
}

fn xys_of(g: &Geometry) -> Vec<XY> {
    match g {
        Geometry::Point(p) => p.xy().into_iter().collect(),
        Geometry::MultiPoint(mp) => mp.xys().collect(),
        _ => unreachable!("puntal operand expected"),
    }
}

fn lines_of(g: &Geometry) -> Vec<&LineString> {
    match g {
        Geometry::LineString(ls) => vec![ls],
        Geometry::MultiLineString(mls) => mls.line_strings().iter().collect(),
        _ => unreachable!("lineal operand expected"),
    }
}

fn polys_of(g: &Geometry) -> Vec<&Polygon> {
    match g {
        Geometry::Polygon(p) => vec![p],
        Geometry::MultiPolygon(mp) => mp.polygons().iter().collect(),
        _ => unreachable!("areal operand expected"),
    }
}

fn line_segments(lines: &[&LineString]) -> Vec<Segment> {
    lines.iter().flat_map(|ls| ls.segments()).collect()
}

fn boundary_segments(polys: &[&Polygon]) -> Vec<Segment> {
    polys.iter().flat_map(|p| p.all_segments()).collect()
}

fn puntal_puntal(xys1: &[XY], xys2: &[XY]) -> bool {
    xys1.iter().any(|p| xys2.contains(p))
}

fn puntal_lineal(xys: &[XY], lines: &[&LineString]) -> bool {
    xys.iter().any(|&p| {
        lines
            .iter()
            .any(|ls| ls.segments().any(|seg| point_on_segment(p, seg)))
    })
}

/// A point meets a polygon unless it is outside the exterior ring or
/// strictly inside one of the holes.
fn point_in_any_polygon(p: XY, polys: &[&Polygon]) -> bool {
    polys
        .iter()
        .any(|poly| locate_in_polygon(poly, p) != RingSide::Exterior)
}

fn puntal_areal(xys: &[XY], polys: &[&Polygon]) -> bool {
    xys.iter().any(|&p| point_in_any_polygon(p, polys))
}

/// Linework meets an areal geometry if it meets the boundary, otherwise
/// each component is wholly inside or outside and one control point per
/// component decides.
fn lineal_areal(lines: &[&LineString], polys: &[&Polygon]) -> bool {
    if any_segments_intersect(line_segments(lines), boundary_segments(polys)) {
        return true;
    }
    lines.iter().any(|ls| {
        ls.start_xy()
            .map_or(false, |p| point_in_any_polygon(p, polys))
    })
}

fn areal_areal(polys1: &[&Polygon], polys2: &[&Polygon]) -> bool {
    polys1
        .iter()
        .any(|p1| polys2.iter().any(|p2| polygon_polygon(p1, p2)))
}

/// Boundaries meet, or one polygon's exterior-ring vertex is inside the
/// other (in either direction).
fn polygon_polygon(p1: &Polygon, p2: &Polygon) -> bool {
    if any_segments_intersect(p1.all_segments().collect(), p2.all_segments().collect()) {
        return true;
    }
    let v1 = p1.exterior_ring().and_then(LineString::start_xy);
    let v2 = p2.exterior_ring().and_then(LineString::start_xy);
    v1.map_or(false, |p| point_in_any_polygon(p, &[p2]))
        || v2.map_or(false, |p| point_in_any_polygon(p, &[p1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{
        ConstructOpts, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, Point,
    };

    fn ls(xys: &[(f64, f64)]) -> LineString {
        let xys: Vec<XY> = xys.iter().map(|&(x, y)| XY::new(x, y)).collect();
        LineString::from_xys(&xys).unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new(
            vec![ls(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])],
            ConstructOpts::default(),
        )
        .unwrap()
    }

    fn pt(x: f64, y: f64) -> Geometry {
        Point::new(XY::new(x, y)).unwrap().into()
    }

    #[test]
    fn test_empty_never_intersects() {
        let g = pt(1.0, 1.0);
        assert!(!Geometry::from(Point::empty()).intersects(&g));
        assert!(!g.intersects(&Point::empty().into()));
        assert!(!Geometry::from(Point::empty()).intersects(&Point::empty().into()));
    }

    #[test]
    fn test_self_intersection_iff_nonempty() {
        let g: Geometry = ls(&[(0.0, 0.0), (2.0, 4.0)]).into();
        assert!(g.intersects(&g));
        let e: Geometry = LineString::empty().into();
        assert!(!e.intersects(&e));
    }

    #[test]
    fn test_point_on_line_string() {
        // Seed scenario: POINT(1 2) on LINESTRING(0 0, 2 4).
        let p = pt(1.0, 2.0);
        let l: Geometry = ls(&[(0.0, 0.0), (2.0, 4.0)]).into();
        assert!(p.intersects(&l));
        assert!(l.intersects(&p));
        assert!(!pt(1.0, 3.0).intersects(&l));
    }

    #[test]
    fn test_point_point() {
        assert!(pt(1.0, 2.0).intersects(&pt(1.0, 2.0)));
        assert!(!pt(1.0, 2.0).intersects(&pt(2.0, 1.0)));
    }

    #[test]
    fn test_point_polygon_with_hole() {
        let poly = Polygon::new(
            vec![
                ls(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
                ls(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0), (2.0, 2.0)]),
            ],
            ConstructOpts::default(),
        )
        .unwrap();
        let g: Geometry = poly.into();
        assert!(pt(5.0, 5.0).intersects(&g));
        assert!(pt(0.0, 5.0).intersects(&g)); // on the shell
        assert!(pt(2.0, 3.0).intersects(&g)); // on the hole boundary
        assert!(!pt(3.0, 3.0).intersects(&g)); // inside the hole
        assert!(!pt(11.0, 5.0).intersects(&g));
    }

    #[test]
    fn test_line_line() {
        let a: Geometry = ls(&[(0.0, 0.0), (2.0, 2.0)]).into();
        let b: Geometry = ls(&[(0.0, 2.0), (2.0, 0.0)]).into();
        let c: Geometry = ls(&[(5.0, 5.0), (6.0, 6.0)]).into();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_line_polygon_fully_inside() {
        let g: Geometry = square(0.0, 0.0, 10.0, 10.0).into();
        let inner: Geometry = ls(&[(2.0, 2.0), (3.0, 3.0)]).into();
        let outer: Geometry = ls(&[(20.0, 20.0), (30.0, 30.0)]).into();
        assert!(inner.intersects(&g));
        assert!(g.intersects(&inner));
        assert!(!outer.intersects(&g));
    }

    #[test]
    fn test_multi_line_polygon_any_component_inside() {
        // The first component is outside; the second is inside. Every
        // component must be probed, not just the first.
        let mls: Geometry = MultiLineString::new(vec![
            ls(&[(20.0, 20.0), (30.0, 30.0)]),
            ls(&[(2.0, 2.0), (3.0, 3.0)]),
        ])
        .into();
        let g: Geometry = square(0.0, 0.0, 10.0, 10.0).into();
        assert!(mls.intersects(&g));
    }

    #[test]
    fn test_polygon_polygon() {
        let a: Geometry = square(0.0, 0.0, 2.0, 2.0).into();
        let b: Geometry = square(1.0, 1.0, 3.0, 3.0).into();
        let c: Geometry = square(5.0, 5.0, 6.0, 6.0).into();
        let inner: Geometry = square(0.5, 0.5, 1.5, 1.5).into();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.intersects(&inner)); // containment without boundary contact
    }

    #[test]
    fn test_multi_polygon() {
        let mp: Geometry = MultiPolygon::new(
            vec![square(0.0, 0.0, 1.0, 1.0), square(5.0, 5.0, 6.0, 6.0)],
            ConstructOpts::default(),
        )
        .unwrap()
        .into();
        assert!(pt(5.5, 5.5).intersects(&mp));
        assert!(!pt(3.0, 3.0).intersects(&mp));
    }

    #[test]
    fn test_multi_point_multi_point() {
        let a: Geometry = MultiPoint::from_xys(&[XY::new(0.0, 0.0), XY::new(1.0, 1.0)])
            .unwrap()
            .into();
        let b: Geometry = MultiPoint::from_xys(&[XY::new(2.0, 2.0), XY::new(1.0, 1.0)])
            .unwrap()
            .into();
        let c: Geometry = MultiPoint::from_xys(&[XY::new(9.0, 9.0)]).unwrap().into();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_collection_recursion() {
        let gc: Geometry = GeometryCollection::new(vec![
            pt(9.0, 9.0),
            GeometryCollection::new(vec![ls(&[(0.0, 0.0), (2.0, 4.0)]).into()]).into(),
        ])
        .into();
        assert!(pt(1.0, 2.0).intersects(&gc));
        assert!(gc.intersects(&pt(1.0, 2.0)));
        assert!(!pt(8.0, 8.0).intersects(&gc));
    }
}
