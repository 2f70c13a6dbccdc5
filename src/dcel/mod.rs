//! Doubly connected edge list overlay.
//!
//! The topological core behind the set operations and DE-9IM matrices.
//! Records live in arenas owned by a single [`Dcel`] value and refer to
//! each other by index, which breaks the twin/next/prev pointer cycles
//! and keeps traversals cache friendly. A DCEL never outlives the
//! operation that built it.

mod build;
mod extract;
mod overlay;
mod renode;

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::GeometryError;
use crate::geometry::{Geometry, GeometryType};
use crate::primitives::XY;
use crate::relate::IntersectionMatrix;

/// The set-theoretic operations served by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetOp {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl SetOp {
    /// Whether a piece belonging to the operands as given is part of the
    /// result.
    fn keep(self, in_a: bool, in_b: bool) -> bool {
        match self {
            SetOp::Union => in_a || in_b,
            SetOp::Intersection => in_a && in_b,
            SetOp::Difference => in_a && !in_b,
            SetOp::SymmetricDifference => in_a != in_b,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SetOp::Union => "union",
            SetOp::Intersection => "intersection",
            SetOp::Difference => "difference",
            SetOp::SymmetricDifference => "symmetric difference",
        }
    }
}

/// Runs a set operation through the overlay.
pub(crate) fn overlay_op(
    a: &Geometry,
    b: &Geometry,
    op: SetOp,
) -> Result<Geometry, GeometryError> {
    for g in [a, b] {
        if g.geometry_type() == GeometryType::GeometryCollection {
            return Err(GeometryError::MismatchedVariant {
                operation: op.name(),
                variant: GeometryType::GeometryCollection,
            });
        }
    }
    let overlay = overlay::Overlay::build(a, b)?;
    extract::extract(&overlay, op)
}

/// Computes the DE-9IM matrix of two non-empty, non-collection operands.
pub(crate) fn relate_matrix(
    a: &Geometry,
    b: &Geometry,
) -> Result<IntersectionMatrix, GeometryError> {
    let overlay = overlay::Overlay::build(a, b)?;
    Ok(overlay.matrix())
}

/// One of the two overlay inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    A,
    B,
}

impl Operand {
    pub(crate) const BOTH: [Operand; 2] = [Operand::A, Operand::B];

    fn bit(self) -> u8 {
        match self {
            Operand::A => 0,
            Operand::B => 1,
        }
    }
}

/// Per-record label bits: a populated flag plus location flags for each
/// overlay operand.
///
/// "Populated" means the record's relation to that operand is known;
/// ghost records are populated with no location bits, meaning "known to
/// contribute nothing". Unpopulated relations are resolved lazily by
/// point location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Label(u8);

const POPULATED: u8 = 0b0000_0001;
const INSIDE: u8 = 0b0000_0100;
const BOUNDARY: u8 = 0b0001_0000;

impl Label {
    pub(crate) fn populated(op: Operand) -> Self {
        Label(POPULATED << op.bit())
    }

    pub(crate) fn inside(op: Operand) -> Self {
        Label((POPULATED | INSIDE) << op.bit())
    }

    pub(crate) fn boundary(op: Operand) -> Self {
        Label((POPULATED | BOUNDARY) << op.bit())
    }

    pub(crate) fn is_populated(self, op: Operand) -> bool {
        self.0 & (POPULATED << op.bit()) != 0
    }

    pub(crate) fn is_inside(self, op: Operand) -> bool {
        self.0 & (INSIDE << op.bit()) != 0
    }

    pub(crate) fn is_boundary(self, op: Operand) -> bool {
        self.0 & (BOUNDARY << op.bit()) != 0
    }

    pub(crate) fn or(self, other: Label) -> Label {
        Label(self.0 | other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct VertexId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EdgeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FaceId(pub(crate) usize);

impl EdgeId {
    /// Half-edges are allocated in pairs; the twin is the pair sibling.
    pub(crate) fn twin(self) -> EdgeId {
        EdgeId(self.0 ^ 1)
    }

    /// True for the first half-edge of its pair; used to visit each
    /// undirected edge once.
    pub(crate) fn is_forward(self) -> bool {
        self.0 % 2 == 0
    }
}

#[derive(Debug)]
pub(crate) struct Vertex {
    pub(crate) xy: XY,
    /// Outgoing half-edges, ordered by bearing after vertex fixing.
    pub(crate) incidents: Vec<EdgeId>,
    pub(crate) label: Label,
}

#[derive(Debug)]
pub(crate) struct HalfEdge {
    pub(crate) origin: VertexId,
    pub(crate) next: EdgeId,
    pub(crate) prev: EdgeId,
    pub(crate) face: Option<FaceId>,
    /// Points interior to the edge geometry that are not subdivision
    /// vertices, in travel order.
    pub(crate) intermediate: Vec<XY>,
    /// Linework membership per operand.
    pub(crate) edge_label: Label,
    /// Area membership of this half-edge's incident side per operand.
    pub(crate) face_label: Label,
}

#[derive(Debug)]
pub(crate) struct Face {
    pub(crate) cycle: EdgeId,
    pub(crate) label: Label,
}

/// The arena-backed planar subdivision.
#[derive(Debug, Default)]
pub(crate) struct Dcel {
    pub(crate) verts: Vec<Vertex>,
    pub(crate) edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
    lookup: HashMap<XY, VertexId>,
}

impl Dcel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Finds or creates the vertex at a position.
    pub(crate) fn ensure_vertex(&mut self, xy: XY) -> VertexId {
        if let Some(&v) = self.lookup.get(&xy) {
            return v;
        }
        let v = VertexId(self.verts.len());
        self.verts.push(Vertex { xy, incidents: Vec::new(), label: Label::default() });
        self.lookup.insert(xy, v);
        v
    }

    pub(crate) fn vertex_at(&self, xy: XY) -> Option<VertexId> {
        self.lookup.get(&xy).copied()
    }

    /// Creates a twinned half-edge pair wired as a local two-cycle and
    /// registers both on their origin vertices. Returns the forward id.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn add_edge_pair(
        &mut self,
        va: VertexId,
        vb: VertexId,
        intermediate_fwd: Vec<XY>,
        fwd_edge_label: Label,
        fwd_face_label: Label,
        rev_edge_label: Label,
        rev_face_label: Label,
    ) -> EdgeId {
        let fwd = EdgeId(self.edges.len());
        let rev = fwd.twin();
        let intermediate_rev: Vec<XY> = intermediate_fwd.iter().rev().copied().collect();
        self.edges.push(HalfEdge {
            origin: va,
            next: rev,
            prev: rev,
            face: None,
            intermediate: intermediate_fwd,
            edge_label: fwd_edge_label,
            face_label: fwd_face_label,
        });
        self.edges.push(HalfEdge {
            origin: vb,
            next: fwd,
            prev: fwd,
            face: None,
            intermediate: intermediate_rev,
            edge_label: rev_edge_label,
            face_label: rev_face_label,
        });
        self.verts[va.0].incidents.push(fwd);
        self.verts[vb.0].incidents.push(rev);
        fwd
    }

    pub(crate) fn origin_xy(&self, e: EdgeId) -> XY {
        self.verts[self.edges[e.0].origin.0].xy
    }

    pub(crate) fn dest_xy(&self, e: EdgeId) -> XY {
        self.origin_xy(e.twin())
    }

    /// The second position along the edge: the first intermediate, or
    /// the destination when there are none. Bearings at the origin are
    /// computed from it.
    pub(crate) fn second_xy(&self, e: EdgeId) -> XY {
        match self.edges[e.0].intermediate.first() {
            Some(&xy) => xy,
            None => self.dest_xy(e),
        }
    }

    /// Identity of a half-edge's full geometry, origin to destination.
    pub(crate) fn edge_key(&self, e: EdgeId) -> Vec<XY> {
        let mut key = Vec::with_capacity(self.edges[e.0].intermediate.len() + 2);
        key.push(self.origin_xy(e));
        key.extend_from_slice(&self.edges[e.0].intermediate);
        key.push(self.dest_xy(e));
        key
    }

    /// All positions along a half-edge, origin to destination.
    pub(crate) fn edge_xys(&self, e: EdgeId) -> Vec<XY> {
        self.edge_key(e)
    }

    /// Re-sorts every vertex's outgoing edges by bearing and relinks the
    /// next/prev chains so that `twin.next` is the next outgoing edge
    /// clockwise around the shared origin.
    pub(crate) fn fix_all_vertices(&mut self) {
        for v in 0..self.verts.len() {
            self.fix_vertex(VertexId(v));
        }
    }

    pub(crate) fn fix_vertex(&mut self, v: VertexId) {
        let origin = self.verts[v.0].xy;
        let mut outgoing = self.verts[v.0].incidents.clone();
        if outgoing.is_empty() {
            return;
        }
        outgoing.sort_by(|&e1, &e2| {
            let d1 = self.second_xy(e1).sub(origin);
            let d2 = self.second_xy(e2).sub(origin);
            bearing_cmp(d1, d2).then_with(|| self.second_xy(e1).cmp(&self.second_xy(e2)))
        });
        let k = outgoing.len();
        for i in 0..k {
            let curr = outgoing[i];
            let cw_next = outgoing[(i + k - 1) % k];
            let t = curr.twin();
            self.edges[t.0].next = cw_next;
            self.edges[cw_next.0].prev = t;
        }
        self.verts[v.0].incidents = outgoing;
    }
}

/// Compares two direction vectors by bearing, counter-clockwise from
/// the positive x axis, without trigonometry: first by half-plane, then
/// by cross-product sign.
fn bearing_cmp(d1: XY, d2: XY) -> Ordering {
    let h1 = lower_half(d1);
    let h2 = lower_half(d2);
    if h1 != h2 {
        return h1.cmp(&h2);
    }
    let cross = d1.cross(d2);
    if cross > 0.0 {
        Ordering::Less
    } else if cross < 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn lower_half(d: XY) -> u8 {
    // Half 0 covers bearings in [0, pi), half 1 the rest.
    if d.y > 0.0 || (d.y == 0.0 && d.x > 0.0) {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_bits() {
        let l = Label::inside(Operand::A).or(Label::boundary(Operand::B));
        assert!(l.is_populated(Operand::A));
        assert!(l.is_inside(Operand::A));
        assert!(!l.is_boundary(Operand::A));
        assert!(l.is_populated(Operand::B));
        assert!(l.is_boundary(Operand::B));
        assert!(!l.is_inside(Operand::B));
        let ghost = Label::populated(Operand::A);
        assert!(ghost.is_populated(Operand::A));
        assert!(!ghost.is_inside(Operand::A));
        assert!(!ghost.is_populated(Operand::B));
    }

    #[test]
    fn test_twin_pairing() {
        assert_eq!(EdgeId(4).twin(), EdgeId(5));
        assert_eq!(EdgeId(5).twin(), EdgeId(4));
        assert_eq!(EdgeId(4).twin().twin(), EdgeId(4));
        assert!(EdgeId(0).is_forward());
        assert!(!EdgeId(1).is_forward());
    }

    #[test]
    fn test_bearing_order() {
        let dirs = [
            XY::new(1.0, 0.0),   // 0 degrees
            XY::new(1.0, 1.0),   // 45
            XY::new(0.0, 1.0),   // 90
            XY::new(-1.0, 0.0),  // 180
            XY::new(-1.0, -1.0), // 225
            XY::new(0.0, -1.0),  // 270
            XY::new(1.0, -1.0),  // 315
        ];
        for w in dirs.windows(2) {
            assert_eq!(bearing_cmp(w[0], w[1]), Ordering::Less, "{:?} < {:?}", w[0], w[1]);
        }
        assert_eq!(bearing_cmp(dirs[6], dirs[0]), Ordering::Greater);
    }

    #[test]
    fn test_edge_pair_wiring() {
        let mut dcel = Dcel::new();
        let a = dcel.ensure_vertex(XY::new(0.0, 0.0));
        let b = dcel.ensure_vertex(XY::new(2.0, 0.0));
        let fwd = dcel.add_edge_pair(
            a,
            b,
            vec![XY::new(1.0, 0.5)],
            Label::inside(Operand::A),
            Label::populated(Operand::A),
            Label::inside(Operand::A),
            Label::populated(Operand::A),
        );
        let rev = fwd.twin();
        assert_eq!(dcel.origin_xy(fwd), XY::new(0.0, 0.0));
        assert_eq!(dcel.dest_xy(fwd), XY::new(2.0, 0.0));
        assert_eq!(dcel.second_xy(fwd), XY::new(1.0, 0.5));
        assert_eq!(dcel.second_xy(rev), XY::new(1.0, 0.5));
        assert_eq!(dcel.edges[fwd.0].next, rev);
        assert_eq!(dcel.edge_key(rev), vec![XY::new(2.0, 0.0), XY::new(1.0, 0.5), XY::new(0.0, 0.0)]);
    }

    #[test]
    fn test_ensure_vertex_dedupes() {
        let mut dcel = Dcel::new();
        let a = dcel.ensure_vertex(XY::new(1.0, 1.0));
        let b = dcel.ensure_vertex(XY::new(1.0, 1.0));
        assert_eq!(a, b);
        assert_eq!(dcel.verts.len(), 1);
    }
}
