//! Merging the per-operand DCELs and labelling the faces.

use std::collections::HashMap;

use super::{build, renode, Dcel, EdgeId, FaceId, Label, Operand, VertexId};
use crate::error::GeometryError;
use crate::geometry::polygon::signed_area;
use crate::geometry::Geometry;
use crate::primitives::XY;
use crate::relate::{locate, Dimension, IntersectionMatrix, Location};

/// The labelled planar subdivision of two operands, plus the re-noded
/// operands themselves for point-location fallbacks.
pub(crate) struct Overlay {
    pub(crate) dcel: Dcel,
    pub(crate) a: Geometry,
    pub(crate) b: Geometry,
}

impl Overlay {
    /// Builds the overlay of two non-empty, non-collection operands.
    pub(crate) fn build(a: &Geometry, b: &Geometry) -> Result<Overlay, GeometryError> {
        let input = renode::prepare(a, b);

        let mut dcel = build::build_from_geometry(&input.a, Operand::A, &input.interactions);
        build::add_ghosts(&mut dcel, &input.ghosts, Operand::A, &input.interactions);

        let mut dcel_b = build::build_from_geometry(&input.b, Operand::B, &input.interactions);
        build::add_ghosts(&mut dcel_b, &input.ghosts, Operand::B, &input.interactions);

        merge(&mut dcel, &dcel_b);
        dcel.fix_all_vertices();
        assign_faces(&mut dcel)?;

        let overlay = Overlay { dcel, a: input.a, b: input.b };
        Ok(overlay.with_face_labels())
    }

    fn with_face_labels(mut self) -> Overlay {
        for f in 0..self.dcel.faces.len() {
            let face = FaceId(f);
            let mut or_label = Label::default();
            for e in cycle_edges(&self.dcel, self.dcel.faces[face.0].cycle) {
                or_label = or_label.or(self.dcel.edges[e.0].face_label);
            }
            let mut label = Label::default();
            for op in Operand::BOTH {
                if or_label.is_populated(op) {
                    label = label.or(if or_label.is_inside(op) {
                        Label::inside(op)
                    } else {
                        Label::populated(op)
                    });
                } else {
                    // No cycle edge knows this operand; the whole face is
                    // strictly inside or outside it, so probing one
                    // boundary point settles it.
                    let e0 = self.dcel.faces[face.0].cycle;
                    let probe = self.dcel.origin_xy(e0).midpoint(self.dcel.second_xy(e0));
                    let inside = locate(self.operand(op), probe) == Location::Interior;
                    label = label.or(if inside {
                        Label::inside(op)
                    } else {
                        Label::populated(op)
                    });
                }
            }
            self.dcel.faces[face.0].label = label;
        }
        self
    }

    fn operand(&self, op: Operand) -> &Geometry {
        match op {
            Operand::A => &self.a,
            Operand::B => &self.b,
        }
    }

    /// Location of an undirected edge's one-dimensional interior
    /// relative to an operand.
    pub(crate) fn edge_location(&self, e: EdgeId, op: Operand) -> Location {
        let label = self.dcel.edges[e.0].edge_label;
        if label.is_boundary(op) {
            return Location::Boundary;
        }
        if label.is_inside(op) {
            return Location::Interior;
        }
        // Not part of the operand's linework; the edge sits wholly in
        // one face region, whose area membership decides.
        match self.dcel.edges[e.0].face {
            Some(f) if self.dcel.faces[f.0].label.is_inside(op) => Location::Interior,
            _ => Location::Exterior,
        }
    }

    /// Location of a vertex relative to an operand.
    pub(crate) fn vertex_location(&self, v: VertexId, op: Operand) -> Location {
        let label = self.dcel.verts[v.0].label;
        if label.is_boundary(op) {
            return Location::Boundary;
        }
        if label.is_inside(op) {
            return Location::Interior;
        }
        if label.is_populated(op) {
            return Location::Exterior;
        }
        locate(self.operand(op), self.dcel.verts[v.0].xy)
    }

    /// Accumulates the DE-9IM matrix from the labelled subdivision.
    pub(crate) fn matrix(&self) -> IntersectionMatrix {
        let mut m = IntersectionMatrix::new();
        // Both operands are bounded: their exteriors always meet in a
        // two-dimensional region.
        m.upgrade(Location::Exterior, Location::Exterior, Dimension::Two);

        for f in 0..self.dcel.faces.len() {
            let label = self.dcel.faces[f].label;
            let loc = |op: Operand| {
                if label.is_inside(op) {
                    Location::Interior
                } else {
                    Location::Exterior
                }
            };
            m.upgrade(loc(Operand::A), loc(Operand::B), Dimension::Two);
        }

        for e in 0..self.dcel.edges.len() {
            let e = EdgeId(e);
            if !e.is_forward() {
                continue;
            }
            m.upgrade(
                self.edge_location(e, Operand::A),
                self.edge_location(e, Operand::B),
                Dimension::One,
            );
        }

        for v in 0..self.dcel.verts.len() {
            let v = VertexId(v);
            m.upgrade(
                self.vertex_location(v, Operand::A),
                self.vertex_location(v, Operand::B),
                Dimension::Zero,
            );
        }
        m
    }
}

/// Folds the second operand's DCEL into the first.
///
/// Vertices merge by position with labels OR-ed; a half-edge whose full
/// geometry already exists merges its labels into the existing record,
/// anything else is copied across.
fn merge(dst: &mut Dcel, src: &Dcel) {
    for v in &src.verts {
        let dv = dst.ensure_vertex(v.xy);
        dst.verts[dv.0].label = dst.verts[dv.0].label.or(v.label);
    }

    let mut key_map: HashMap<Vec<XY>, EdgeId> = HashMap::new();
    for e in 0..dst.edges.len() {
        key_map.insert(dst.edge_key(EdgeId(e)), EdgeId(e));
    }

    for e in 0..src.edges.len() {
        let e = EdgeId(e);
        if !e.is_forward() {
            continue;
        }
        let key = src.edge_key(e);
        if let Some(&existing) = key_map.get(&key) {
            let twin = existing.twin();
            dst.edges[existing.0].edge_label =
                dst.edges[existing.0].edge_label.or(src.edges[e.0].edge_label);
            dst.edges[existing.0].face_label =
                dst.edges[existing.0].face_label.or(src.edges[e.0].face_label);
            dst.edges[twin.0].edge_label =
                dst.edges[twin.0].edge_label.or(src.edges[e.twin().0].edge_label);
            dst.edges[twin.0].face_label =
                dst.edges[twin.0].face_label.or(src.edges[e.twin().0].face_label);
        } else {
            let va = dst.ensure_vertex(src.origin_xy(e));
            let vb = dst.ensure_vertex(src.dest_xy(e));
            let fwd = dst.add_edge_pair(
                va,
                vb,
                src.edges[e.0].intermediate.clone(),
                src.edges[e.0].edge_label,
                src.edges[e.0].face_label,
                src.edges[e.twin().0].edge_label,
                src.edges[e.twin().0].face_label,
            );
            key_map.insert(key, fwd);
            key_map.insert(dst.edge_key(fwd.twin()), fwd.twin());
        }
    }
}

/// Walks every next-cycle once, creating a face per cycle.
fn assign_faces(dcel: &mut Dcel) -> Result<(), GeometryError> {
    for start in 0..dcel.edges.len() {
        if dcel.edges[start].face.is_some() {
            continue;
        }
        let face = FaceId(dcel.faces.len());
        dcel.faces.push(super::Face { cycle: EdgeId(start), label: Label::default() });
        let mut e = EdgeId(start);
        let mut steps = 0;
        loop {
            dcel.edges[e.0].face = Some(face);
            e = dcel.edges[e.0].next;
            steps += 1;
            if e == EdgeId(start) {
                break;
            }
            if steps > dcel.edges.len() {
                return Err(GeometryError::ImplementationBug(
                    "overlay next-chain does not close into a cycle",
                ));
            }
        }
    }
    Ok(())
}

/// The edges of the cycle through `start`, in traversal order.
pub(crate) fn cycle_edges(dcel: &Dcel, start: EdgeId) -> Vec<EdgeId> {
    let mut out = Vec::new();
    let mut e = start;
    loop {
        out.push(e);
        e = dcel.edges[e.0].next;
        if e == start {
            break;
        }
    }
    out
}

/// Signed area of a face cycle, intermediates included. Ghost and
/// pendant excursions contribute nothing; the unbounded face is the
/// unique cycle with non-positive area.
pub(crate) fn cycle_area(dcel: &Dcel, start: EdgeId) -> f64 {
    let mut xys: Vec<XY> = Vec::new();
    for e in cycle_edges(dcel, start) {
        xys.push(dcel.origin_xy(e));
        xys.extend_from_slice(&dcel.edges[e.0].intermediate);
    }
    signed_area(&xys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ConstructOpts, LineString, Point, Polygon};

    fn ls(xys: &[(f64, f64)]) -> LineString {
        let xys: Vec<XY> = xys.iter().map(|&(x, y)| XY::new(x, y)).collect();
        LineString::from_xys(&xys).unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Polygon::new(
            vec![ls(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])],
            ConstructOpts::default(),
        )
        .unwrap()
        .into()
    }

    fn check_structure(dcel: &Dcel) {
        // Twins pair up and next/prev are mutual inverses.
        for e in 0..dcel.edges.len() {
            let e = EdgeId(e);
            assert_eq!(e.twin().twin(), e);
            let n = dcel.edges[e.0].next;
            assert_eq!(dcel.edges[n.0].prev, e, "prev(next(e)) must be e");
            let p = dcel.edges[e.0].prev;
            assert_eq!(dcel.edges[p.0].next, e, "next(prev(e)) must be e");
            assert_eq!(dcel.dest_xy(e), dcel.origin_xy(n), "next must continue at the dest");
        }
        // Exactly one non-positive-area face; areas sum to zero.
        let mut non_positive = 0;
        let mut total = 0.0;
        for f in &dcel.faces {
            let area = cycle_area(dcel, f.cycle);
            if area <= 0.0 {
                non_positive += 1;
            }
            total += area;
        }
        if !dcel.faces.is_empty() {
            assert_eq!(non_positive, 1, "exactly one unbounded face expected");
            assert!(total.abs() < 1e-9, "face areas must cancel, got {total}");
        }
    }

    #[test]
    fn test_overlapping_squares_structure_and_labels() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, 1.0, 3.0, 3.0);
        let ov = Overlay::build(&a, &b).unwrap();
        check_structure(&ov.dcel);

        // Outer, B-only, the shared lens, and the A-only region, which
        // the ghost diagonal from (0,0) to (1,1) splits in two.
        assert_eq!(ov.dcel.faces.len(), 5);
        let mut kinds = Vec::new();
        for f in &ov.dcel.faces {
            kinds.push((f.label.is_inside(Operand::A), f.label.is_inside(Operand::B)));
        }
        kinds.sort();
        assert_eq!(
            kinds,
            vec![(false, false), (false, true), (true, false), (true, false), (true, true)]
        );
    }

    #[test]
    fn test_disjoint_squares_connected_by_ghosts() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);
        let ov = Overlay::build(&a, &b).unwrap();
        check_structure(&ov.dcel);
        // Outer face, the second square's interior, and the first
        // square's interior split in two by the ghost diagonal.
        assert_eq!(ov.dcel.faces.len(), 4);
        let inside_b = ov
            .dcel
            .faces
            .iter()
            .filter(|f| f.label.is_inside(Operand::B))
            .count();
        assert_eq!(inside_b, 1);
    }

    #[test]
    fn test_matrix_point_on_line_interior() {
        let p: Geometry = Point::new(XY::new(1.0, 2.0)).unwrap().into();
        let l: Geometry = ls(&[(0.0, 0.0), (2.0, 4.0)]).into();
        let m = p.relate(&l).unwrap();
        assert_eq!(m.to_string(), "0FFFFF102");
    }

    #[test]
    fn test_matrix_crossing_lines() {
        let a: Geometry = ls(&[(0.0, 0.0), (2.0, 2.0)]).into();
        let b: Geometry = ls(&[(0.0, 2.0), (2.0, 0.0)]).into();
        let m = a.relate(&b).unwrap();
        assert_eq!(m.to_string(), "0F1FF0102");
    }

    #[test]
    fn test_matrix_equal_squares() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(0.0, 0.0, 2.0, 2.0);
        let m = a.relate(&b).unwrap();
        assert_eq!(m.to_string(), "2FFF1FFF2");
    }

    #[test]
    fn test_matrix_contained_square() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let inner = square(2.0, 2.0, 4.0, 4.0);
        let m = outer.relate(&inner).unwrap();
        assert_eq!(m.to_string(), "212FF1FF2");
    }
}
