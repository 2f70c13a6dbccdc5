//! Extracting set-operation results from a labelled overlay.
//!
//! Faces satisfying the operation's predicate are re-polygonised; edges
//! that satisfy it but bound no included face become linework; vertices
//! that satisfy it and are covered by neither become points.

use std::collections::HashMap;

use super::overlay::Overlay;
use super::{EdgeId, Operand, SetOp, VertexId};
use crate::error::GeometryError;
use crate::geometry::polygon::signed_area;
use crate::geometry::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use crate::primitives::{point_ring_side, RingSide, Segment, XY};
use crate::relate::Location;

pub(crate) fn extract(ov: &Overlay, op: SetOp) -> Result<Geometry, GeometryError> {
    let dcel = &ov.dcel;
    let included: Vec<bool> = dcel
        .faces
        .iter()
        .map(|f| op.keep(f.label.is_inside(Operand::A), f.label.is_inside(Operand::B)))
        .collect();

    let polys = polygonize(ov, &included)?;

    let mut chains: Vec<Vec<XY>> = Vec::new();
    for e in 0..dcel.edges.len() {
        let e = EdgeId(e);
        if e.is_forward() && linework_included(ov, e, op, &included) {
            chains.push(dcel.edge_xys(e));
        }
    }
    let lines = sew_chains(chains);

    let mut points: Vec<XY> = Vec::new();
    for v in 0..dcel.verts.len() {
        let v = VertexId(v);
        let in_a = ov.vertex_location(v, Operand::A) != Location::Exterior;
        let in_b = ov.vertex_location(v, Operand::B) != Location::Exterior;
        if !op.keep(in_a, in_b) {
            continue;
        }
        let covered = dcel.verts[v.0].incidents.iter().any(|&e| {
            linework_included(ov, e, op, &included)
                || face_included(ov, e, &included)
                || face_included(ov, e.twin(), &included)
        });
        if !covered {
            points.push(dcel.verts[v.0].xy);
        }
    }

    Ok(assemble(polys, lines, points))
}

fn face_included(ov: &Overlay, e: EdgeId, included: &[bool]) -> bool {
    match ov.dcel.edges[e.0].face {
        Some(f) => included[f.0],
        None => false,
    }
}

/// An undirected edge belongs to the result's linework when it satisfies
/// the operation but neither of its sides is an included face.
fn linework_included(ov: &Overlay, e: EdgeId, op: SetOp, included: &[bool]) -> bool {
    let fwd = if e.is_forward() { e } else { e.twin() };
    if face_included(ov, fwd, included) || face_included(ov, fwd.twin(), included) {
        return false;
    }
    let in_a = ov.edge_location(fwd, Operand::A) != Location::Exterior;
    let in_b = ov.edge_location(fwd, Operand::B) != Location::Exterior;
    op.keep(in_a, in_b)
}

/// Traces the boundary of the included region and assembles polygons.
///
/// A boundary half-edge has an included face on its side and an excluded
/// face across. Tracing follows `next`, rotating across internal walls
/// (edges with included faces on both sides), so ghost subdivisions and
/// walls between merged faces vanish. Positive-area rings are shells,
/// negative-area rings are holes assigned to the smallest shell that
/// contains a point of them.
fn polygonize(ov: &Overlay, included: &[bool]) -> Result<Vec<Polygon>, GeometryError> {
    let dcel = &ov.dcel;
    let is_boundary = |e: EdgeId| -> bool {
        face_included(ov, e, included) && !face_included(ov, e.twin(), included)
    };

    let mut shells: Vec<(Vec<XY>, f64)> = Vec::new();
    let mut holes: Vec<(Vec<XY>, XY)> = Vec::new();
    let mut visited = vec![false; dcel.edges.len()];

    for start in 0..dcel.edges.len() {
        let start = EdgeId(start);
        if visited[start.0] || !is_boundary(start) {
            continue;
        }
        let mut ring: Vec<XY> = Vec::new();
        let mut e = start;
        loop {
            visited[e.0] = true;
            ring.push(dcel.origin_xy(e));
            ring.extend_from_slice(&dcel.edges[e.0].intermediate);

            let mut nxt = dcel.edges[e.0].next;
            let mut guard = 0;
            while !is_boundary(nxt) {
                nxt = dcel.edges[nxt.twin().0].next;
                guard += 1;
                if guard > dcel.edges.len() {
                    return Err(GeometryError::ImplementationBug(
                        "region boundary trace found no continuation",
                    ));
                }
            }
            e = nxt;
            if e == start {
                break;
            }
        }
        let area = signed_area(&ring);
        if area > 0.0 {
            shells.push((ring, area));
        } else if area < 0.0 {
            let rep = ring[0].midpoint(ring[1]);
            holes.push((ring, rep));
        }
    }

    let mut hole_lists: Vec<Vec<Vec<XY>>> = vec![Vec::new(); shells.len()];
    for (ring, rep) in holes {
        let mut best: Option<(usize, f64)> = None;
        for (i, (shell, area)) in shells.iter().enumerate() {
            if point_ring_side(rep, ring_segments(shell)) == RingSide::Interior
                && best.map_or(true, |(_, a)| *area < a)
            {
                best = Some((i, *area));
            }
        }
        match best {
            Some((i, _)) => hole_lists[i].push(ring),
            None => {
                return Err(GeometryError::ImplementationBug(
                    "extracted hole lies in no shell",
                ))
            }
        }
    }

    let mut polys = Vec::with_capacity(shells.len());
    for ((shell, _), hole_rings) in shells.into_iter().zip(hole_lists) {
        let mut rings = Vec::with_capacity(1 + hole_rings.len());
        rings.push(close_ring(shell));
        rings.extend(hole_rings.into_iter().map(close_ring));
        polys.push(Polygon::from_rings_unvalidated(rings));
    }
    Ok(polys)
}

fn ring_segments(open_ring: &[XY]) -> impl Iterator<Item = Segment> + '_ {
    let n = open_ring.len();
    (0..n).map(move |i| Segment::new(open_ring[i], open_ring[(i + 1) % n]))
}

fn close_ring(mut open_ring: Vec<XY>) -> LineString {
    open_ring.push(open_ring[0]);
    LineString::from_xys_unvalidated(open_ring)
}

/// Joins chains end to end wherever exactly two chains meet, producing
/// maximal linestrings. Chains keep junction vertices (degree other than
/// two) as endpoints.
fn sew_chains(mut chains: Vec<Vec<XY>>) -> Vec<Vec<XY>> {
    loop {
        let mut deg: HashMap<XY, usize> = HashMap::new();
        for c in &chains {
            *deg.entry(c[0]).or_insert(0) += 1;
            *deg.entry(*c.last().expect("chains are never empty")).or_insert(0) += 1;
        }
        let mut merged = false;
        'pairs: for i in 0..chains.len() {
            for j in (i + 1)..chains.len() {
                if let Some(joined) = join(&chains[i], &chains[j], &deg) {
                    chains[i] = joined;
                    chains.swap_remove(j);
                    merged = true;
                    break 'pairs;
                }
            }
        }
        if !merged {
            break;
        }
    }
    for c in &mut chains {
        if c.last() < c.first() {
            c.reverse();
        }
    }
    chains
}

fn join(a: &[XY], b: &[XY], deg: &HashMap<XY, usize>) -> Option<Vec<XY>> {
    let (a0, a1) = (a[0], *a.last().unwrap());
    let (b0, b1) = (b[0], *b.last().unwrap());
    if a0 == a1 || b0 == b1 {
        return None; // closed chains stay as they are
    }
    let at = |p: XY| deg.get(&p).copied() == Some(2);
    if a1 == b0 && at(a1) {
        return Some(a.iter().chain(&b[1..]).copied().collect());
    }
    if a1 == b1 && at(a1) {
        return Some(a.iter().chain(b[..b.len() - 1].iter().rev()).copied().collect());
    }
    if a0 == b1 && at(a0) {
        return Some(b.iter().chain(&a[1..]).copied().collect());
    }
    if a0 == b0 && at(a0) {
        return Some(b.iter().rev().chain(&a[1..]).copied().collect());
    }
    None
}

fn assemble(polys: Vec<Polygon>, lines: Vec<Vec<XY>>, points: Vec<XY>) -> Geometry {
    let poly_part: Option<Geometry> = match polys.len() {
        0 => None,
        1 => Some(polys.into_iter().next().unwrap().into()),
        _ => Some(MultiPolygon::from_polygons_unvalidated(polys).into()),
    };
    let line_part: Option<Geometry> = match lines.len() {
        0 => None,
        1 => Some(LineString::from_xys_unvalidated(lines.into_iter().next().unwrap()).into()),
        _ => Some(
            MultiLineString::new(
                lines.into_iter().map(LineString::from_xys_unvalidated).collect(),
            )
            .into(),
        ),
    };
    let point_part: Option<Geometry> = match points.len() {
        0 => None,
        1 => Some(
            Point::new(points[0])
                .expect("overlay vertices are finite")
                .into(),
        ),
        _ => Some(
            MultiPoint::new(
                points
                    .into_iter()
                    .map(|p| Point::new(p).expect("overlay vertices are finite"))
                    .collect(),
            )
            .into(),
        ),
    };

    let mut parts: Vec<Geometry> =
        [point_part, line_part, poly_part].into_iter().flatten().collect();
    match parts.len() {
        0 => GeometryCollection::empty().into(),
        1 => parts.pop().unwrap(),
        _ => GeometryCollection::new(parts).into(),
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{
        ConstructOpts, EqualsExactOpts, Geometry, LineString, MultiPoint, Point, Polygon,
    };
    use crate::primitives::XY;

    fn ls(xys: &[(f64, f64)]) -> Geometry {
        let xys: Vec<XY> = xys.iter().map(|&(x, y)| XY::new(x, y)).collect();
        LineString::from_xys(&xys).unwrap().into()
    }

    fn ring(xys: &[(f64, f64)]) -> LineString {
        let xys: Vec<XY> = xys.iter().map(|&(x, y)| XY::new(x, y)).collect();
        LineString::from_xys(&xys).unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Polygon::new(
            vec![ring(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])],
            ConstructOpts::default(),
        )
        .unwrap()
        .into()
    }

    fn pt(x: f64, y: f64) -> Geometry {
        Point::new(XY::new(x, y)).unwrap().into()
    }

    #[test]
    fn test_union_of_overlapping_squares() {
        // Seed scenario 3.
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, 1.0, 3.0, 3.0);
        let got = a.union(&b).unwrap();
        let want = Polygon::new(
            vec![ring(&[
                (0.0, 0.0),
                (2.0, 0.0),
                (2.0, 1.0),
                (3.0, 1.0),
                (3.0, 3.0),
                (1.0, 3.0),
                (1.0, 2.0),
                (0.0, 2.0),
                (0.0, 0.0),
            ])],
            ConstructOpts::default(),
        )
        .unwrap()
        .into();
        assert!(
            got.equals_exact(&want, EqualsExactOpts::ignore_order()),
            "got {got:?}"
        );
    }

    #[test]
    fn test_intersection_of_overlapping_squares() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, 1.0, 3.0, 3.0);
        let got = a.intersection(&b).unwrap();
        let want = square(1.0, 1.0, 2.0, 2.0);
        assert!(
            got.equals_exact(&want, EqualsExactOpts::ignore_order()),
            "got {got:?}"
        );
    }

    #[test]
    fn test_difference_carves_a_hole() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let inner = square(4.0, 4.0, 6.0, 6.0);
        let got = outer.difference(&inner).unwrap();
        match &got {
            Geometry::Polygon(p) => {
                assert_eq!(p.num_interior_rings(), 1);
            }
            other => panic!("expected Polygon with a hole, got {other:?}"),
        }
        // The hole region is gone, the rest stays.
        assert!(!got.intersects(&pt(5.0, 5.0)));
        assert!(got.intersects(&pt(1.0, 1.0)));
        assert!(got.intersects(&pt(4.0, 5.0))); // hole boundary survives
    }

    #[test]
    fn test_symmetric_difference_of_squares() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, 1.0, 3.0, 3.0);
        let got = a.symmetric_difference(&b).unwrap();
        assert!(got.intersects(&pt(0.5, 0.5)));
        assert!(got.intersects(&pt(2.5, 2.5)));
        // The lens interior is removed, but its boundary belongs to the
        // closure of both remaining parts.
        assert!(!got.intersects(&pt(1.5, 1.6)));
        match got {
            Geometry::MultiPolygon(mp) => assert_eq!(mp.num_polygons(), 2),
            other => panic!("expected MultiPolygon, got {other:?}"),
        }
    }

    #[test]
    fn test_union_of_disjoint_squares() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);
        let got = a.union(&b).unwrap();
        match got {
            Geometry::MultiPolygon(mp) => assert_eq!(mp.num_polygons(), 2),
            other => panic!("expected MultiPolygon, got {other:?}"),
        }
    }

    #[test]
    fn test_intersection_of_disjoint_squares_is_empty() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);
        let got = a.intersection(&b).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn test_intersection_of_edge_adjacent_squares_is_a_line() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(1.0, 0.0, 2.0, 1.0);
        let got = a.intersection(&b).unwrap();
        let want = ls(&[(1.0, 0.0), (1.0, 1.0)]);
        assert!(
            got.equals_exact(&want, EqualsExactOpts::ignore_order()),
            "got {got:?}"
        );
    }

    #[test]
    fn test_intersection_of_corner_touching_squares_is_a_point() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(1.0, 1.0, 2.0, 2.0);
        let got = a.intersection(&b).unwrap();
        assert!(
            got.equals_exact(&pt(1.0, 1.0), EqualsExactOpts::ignore_order()),
            "got {got:?}"
        );
    }

    #[test]
    fn test_intersection_of_crossing_lines_is_their_crossing() {
        let a = ls(&[(0.0, 0.0), (2.0, 2.0)]);
        let b = ls(&[(0.0, 2.0), (2.0, 0.0)]);
        let got = a.intersection(&b).unwrap();
        assert!(
            got.equals_exact(&pt(1.0, 1.0), EqualsExactOpts::ignore_order()),
            "got {got:?}"
        );
    }

    #[test]
    fn test_line_clipped_by_polygon() {
        let poly = square(0.0, 0.0, 4.0, 4.0);
        let line = ls(&[(-2.0, 2.0), (6.0, 2.0)]);
        let got = line.intersection(&poly).unwrap();
        let want = ls(&[(0.0, 2.0), (4.0, 2.0)]);
        assert!(
            got.equals_exact(&want, EqualsExactOpts::ignore_order()),
            "got {got:?}"
        );
        let outside = line.difference(&poly).unwrap();
        match outside {
            Geometry::MultiLineString(mls) => assert_eq!(mls.num_line_strings(), 2),
            other => panic!("expected MultiLineString, got {other:?}"),
        }
    }

    #[test]
    fn test_union_idempotent_for_each_dimension() {
        let opts = EqualsExactOpts::ignore_order();
        for g in [
            pt(3.0, 4.0),
            ls(&[(0.0, 0.0), (1.0, 0.0), (2.0, 1.0)]),
            square(0.0, 0.0, 2.0, 2.0),
        ] {
            let u = g.union(&g).unwrap();
            assert!(u.equals_exact(&g, opts), "union(g, g) != g for {g:?}, got {u:?}");
        }
    }

    #[test]
    fn test_union_of_point_and_line() {
        let p = pt(5.0, 5.0);
        let l = ls(&[(0.0, 0.0), (1.0, 1.0)]);
        let got = p.union(&l).unwrap();
        match &got {
            Geometry::GeometryCollection(gc) => assert_eq!(gc.num_geometries(), 2),
            other => panic!("expected GeometryCollection, got {other:?}"),
        }
        assert!(got.intersects(&p));
        assert!(got.intersects(&ls(&[(0.5, 0.5), (0.7, 0.7)])));
    }

    #[test]
    fn test_point_absorbed_by_covering_operand() {
        let p = pt(0.5, 0.5);
        let l = ls(&[(0.0, 0.0), (1.0, 1.0)]);
        let got = p.union(&l).unwrap();
        // The absorbed point survives only as a noding vertex: the
        // result is a single line string covering the same point set.
        assert!(matches!(got, Geometry::LineString(_)), "got {got:?}");
        assert!(got.equals(&l).unwrap());
    }

    #[test]
    fn test_difference_of_point_sets() {
        let a: Geometry = MultiPoint::from_xys(&[XY::new(0.0, 0.0), XY::new(1.0, 1.0)])
            .unwrap()
            .into();
        let b = ls(&[(1.0, 1.0), (2.0, 2.0)]);
        let got = a.difference(&b).unwrap();
        assert!(
            got.equals_exact(&pt(0.0, 0.0), EqualsExactOpts::ignore_order()),
            "got {got:?}"
        );
    }

    #[test]
    fn test_collection_operand_rejected() {
        use crate::error::GeometryError;
        use crate::geometry::GeometryCollection;
        let gc: Geometry = GeometryCollection::new(vec![pt(0.0, 0.0)]).into();
        let other = square(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            gc.union(&other),
            Err(GeometryError::MismatchedVariant { operation: "union", .. })
        ));
    }
}
