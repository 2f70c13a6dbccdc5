//! DCEL construction from re-noded primitive geometries.

use std::collections::{HashMap, HashSet};

use super::{Dcel, EdgeId, Label, Operand};
use crate::geometry::{Geometry, LineString, MultiLineString, Polygon};
use crate::primitives::XY;

/// Builds a DCEL for one operand. The geometry must already be re-noded
/// against the other operand and the ghosts, with `interactions` naming
/// every position that becomes a subdivision vertex.
pub(crate) fn build_from_geometry(
    g: &Geometry,
    op: Operand,
    interactions: &HashSet<XY>,
) -> Dcel {
    let mut dcel = Dcel::new();
    match g {
        Geometry::Polygon(p) => add_polygons(&mut dcel, std::slice::from_ref(p), op, interactions),
        Geometry::MultiPolygon(mp) => add_polygons(&mut dcel, mp.polygons(), op, interactions),
        Geometry::LineString(ls) => {
            add_linework(&mut dcel, std::slice::from_ref(ls), op, interactions)
        }
        Geometry::MultiLineString(mls) => {
            add_linework(&mut dcel, mls.line_strings(), op, interactions)
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => {
            let mut xys = Vec::new();
            g.for_each_xy(&mut |p| xys.push(p));
            add_points(&mut dcel, &xys, op);
        }
        Geometry::GeometryCollection(_) => {
            unreachable!("collections are rejected before the overlay")
        }
    }
    dcel
}

/// Adds every ring of every polygon. Rings arrive in canonical winding
/// (exterior CCW, holes CW), so the forward half-edge of each chain has
/// the polygon's area on its left.
fn add_polygons(dcel: &mut Dcel, polys: &[Polygon], op: Operand, interactions: &HashSet<XY>) {
    for poly in polys {
        for ring in poly.rings() {
            let xys: Vec<XY> = ring.seq().xys().collect();

            for &xy in &xys {
                if interactions.contains(&xy) {
                    let v = dcel.ensure_vertex(xy);
                    dcel.verts[v.0].label = dcel.verts[v.0].label.or(Label::boundary(op));
                }
            }

            let mut new_edges: Vec<EdgeId> = Vec::new();
            for_each_non_interacting_segment(&xys, interactions, &mut |chunk| {
                let va = dcel.ensure_vertex(chunk[0]);
                let vb = dcel.ensure_vertex(chunk[chunk.len() - 1]);
                let intermediate = chunk[1..chunk.len() - 1].to_vec();
                let internal = dcel.add_edge_pair(
                    va,
                    vb,
                    intermediate,
                    Label::boundary(op),
                    Label::inside(op),
                    Label::boundary(op),
                    Label::populated(op),
                );
                new_edges.push(internal);
                new_edges.push(internal.twin());
            });

            // Cyclic wiring: internal edges chain forwards along the
            // ring, external edges chain backwards.
            let n = new_edges.len();
            for i in 0..n / 2 {
                let internal = new_edges[2 * i];
                let external = new_edges[2 * i + 1];
                dcel.edges[internal.0].next = new_edges[(2 * i + 2) % n];
                dcel.edges[external.0].next = new_edges[(2 * i + n - 1) % n];
                dcel.edges[internal.0].prev = new_edges[(2 * i + n - 2) % n];
                dcel.edges[external.0].prev = new_edges[(2 * i + 3) % n];
            }
        }
    }
}

/// Adds line strings. Vertex boundary labels follow the mod-2 rule: a
/// position is a boundary vertex iff it ends an odd number of open
/// members.
fn add_linework(dcel: &mut Dcel, lines: &[LineString], op: Operand, interactions: &HashSet<XY>) {
    let mut endpoint_parity: HashMap<XY, usize> = HashMap::new();
    for ls in lines {
        if ls.is_closed() || ls.is_empty() {
            continue;
        }
        for xy in ls.boundary_xys() {
            *endpoint_parity.entry(xy).or_insert(0) += 1;
        }
    }

    for ls in lines {
        for xy in ls.seq().xys() {
            if !interactions.contains(&xy) {
                continue;
            }
            let v = dcel.ensure_vertex(xy);
            let loc = if endpoint_parity.get(&xy).map_or(false, |c| c % 2 == 1) {
                Label::boundary(op)
            } else {
                Label::inside(op)
            };
            dcel.verts[v.0].label = dcel.verts[v.0].label.or(loc);
        }
    }

    let mut edge_set: HashSet<Vec<XY>> = HashSet::new();
    for ls in lines {
        let xys: Vec<XY> = ls.seq().xys().collect();
        for_each_non_interacting_segment(&xys, interactions, &mut |chunk| {
            if edge_set.contains(chunk) {
                return;
            }
            edge_set.insert(chunk.to_vec());
            edge_set.insert(chunk.iter().rev().copied().collect());

            let va = dcel.ensure_vertex(chunk[0]);
            let vb = dcel.ensure_vertex(chunk[chunk.len() - 1]);
            dcel.add_edge_pair(
                va,
                vb,
                chunk[1..chunk.len() - 1].to_vec(),
                Label::inside(op),
                Label::populated(op),
                Label::inside(op),
                Label::populated(op),
            );
        });
    }
}

fn add_points(dcel: &mut Dcel, xys: &[XY], op: Operand) {
    for &xy in xys {
        let v = dcel.ensure_vertex(xy);
        dcel.verts[v.0].label = dcel.verts[v.0].label.or(Label::inside(op));
    }
}

/// Overlays topology-only connector linework.
///
/// Ghost edges carry a populated-only label ("known to be no part of
/// this operand") and introduce unlabelled vertices. A ghost duplicating
/// an existing edge is a no-op.
pub(crate) fn add_ghosts(
    dcel: &mut Dcel,
    ghosts: &MultiLineString,
    op: Operand,
    interactions: &HashSet<XY>,
) {
    let mut edge_set: HashSet<Vec<XY>> = HashSet::new();
    for e in 0..dcel.edges.len() {
        edge_set.insert(dcel.edge_key(EdgeId(e)));
    }

    for ls in ghosts.line_strings() {
        let xys: Vec<XY> = ls.seq().xys().collect();
        for_each_non_interacting_segment(&xys, interactions, &mut |chunk| {
            if edge_set.contains(chunk) {
                return;
            }
            edge_set.insert(chunk.to_vec());
            edge_set.insert(chunk.iter().rev().copied().collect());

            let va = dcel.ensure_vertex(chunk[0]);
            let vb = dcel.ensure_vertex(chunk[chunk.len() - 1]);
            dcel.add_edge_pair(
                va,
                vb,
                chunk[1..chunk.len() - 1].to_vec(),
                Label::populated(op),
                Label::default(),
                Label::populated(op),
                Label::default(),
            );
            dcel.fix_vertex(va);
            dcel.fix_vertex(vb);
        });
    }
}

/// Calls `f` once per maximal chain between two interaction points.
/// The first and last positions of the walk are always interaction
/// points; positions strictly between them become the chain's
/// intermediate list.
fn for_each_non_interacting_segment(
    xys: &[XY],
    interactions: &HashSet<XY>,
    f: &mut dyn FnMut(&[XY]),
) {
    let n = xys.len();
    let mut i = 0;
    while i + 1 < n {
        let mut end = i + 1;
        while end < n - 1 && !interactions.contains(&xys[end]) {
            end += 1;
        }
        f(&xys[i..=end]);
        i = end;
    }
}
