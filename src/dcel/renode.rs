//! Overlay preparation: ghost generation, re-noding and interaction
//! points.
//!
//! Re-noding splits every segment of both operands (and of the ghost
//! linework) at its intersections with every other segment, so that the
//! DCEL construction only ever sees segments that meet at shared
//! vertices. Interaction points are the positions that must become
//! subdivision vertices: chain endpoints, positions shared between
//! walks, and isolated points.

use std::collections::HashSet;

use crate::geometry::{Geometry, LineString, MultiLineString, MultiPolygon, Polygon};
use crate::primitives::{
    orientation, point_on_segment, Envelope, Orientation, Segment, XY,
};
use crate::rtree::{BulkItem, RTree};

pub(crate) struct OverlayInput {
    /// First operand, re-noded.
    pub(crate) a: Geometry,
    /// Second operand, re-noded.
    pub(crate) b: Geometry,
    /// Topology-only connector linework, re-noded.
    pub(crate) ghosts: MultiLineString,
    /// Positions that must become subdivision vertices.
    pub(crate) interactions: HashSet<XY>,
}

/// Prepares both operands for the overlay.
pub(crate) fn prepare(a: &Geometry, b: &Geometry) -> OverlayInput {
    let mut ctrl = Vec::new();
    control_points(a, &mut ctrl);
    control_points(b, &mut ctrl);
    let ghosts: Geometry = spanning_path(ctrl).into();

    // Gather every segment of the three inputs in walk order.
    let mut segs: Vec<Segment> = Vec::new();
    for g in [a, b, &ghosts] {
        walk_sequences(g, &mut |xys| {
            for w in xys.windows(2) {
                segs.push(Segment::new(w[0], w[1]));
            }
        });
    }
    let mut pts: Vec<XY> = Vec::new();
    for g in [a, b] {
        walk_point_xys(g, &mut |p| pts.push(p));
    }

    let items = segs
        .iter()
        .enumerate()
        .map(|(i, s)| BulkItem::new(s.envelope(), i as i64))
        .collect();
    let tree = RTree::bulk_load(items);

    // Cut positions per segment, registered once per unordered pair so
    // both sides receive bit-identical coordinates.
    let mut cuts: Vec<Vec<XY>> = vec![Vec::new(); segs.len()];
    for (i, &s) in segs.iter().enumerate() {
        tree.range_search(s.envelope(), |j| {
            let j = j as usize;
            if j <= i {
                return;
            }
            let t = segs[j];
            for p in intersection_candidates(s, t) {
                if p != s.a && p != s.b {
                    cuts[i].push(p);
                }
                if p != t.a && p != t.b {
                    cuts[j].push(p);
                }
            }
        });
    }
    for &p in &pts {
        tree.range_search(Envelope::from_xy(p), |j| {
            let j = j as usize;
            let t = segs[j];
            if p != t.a && p != t.b && point_on_segment(p, t) {
                cuts[j].push(p);
            }
        });
    }
    for (i, cut) in cuts.iter_mut().enumerate() {
        order_along(segs[i], cut);
    }

    // Rebuild the three inputs with the cuts inserted, consuming the cut
    // lists in the same walk order they were gathered in.
    let mut cursor = 0usize;
    let a = rebuild(a, &cuts, &mut cursor);
    let b = rebuild(b, &cuts, &mut cursor);
    let ghosts = match rebuild(&ghosts, &cuts, &mut cursor) {
        Geometry::MultiLineString(mls) => mls,
        _ => unreachable!("ghosts are always a multi line string"),
    };

    let ghost_geom: Geometry = ghosts.clone().into();
    let interactions = interaction_points(&[&a, &b, &ghost_geom]);

    OverlayInput { a, b, ghosts, interactions }
}

/// Positions where two segments meet. For collinear segments these are
/// the endpoints resting on the other segment; for transversal segments
/// the single computed crossing.
fn intersection_candidates(s: Segment, t: Segment) -> Vec<XY> {
    let o1 = orientation(s.a, s.b, t.a);
    let o2 = orientation(s.a, s.b, t.b);
    let o3 = orientation(t.a, t.b, s.a);
    let o4 = orientation(t.a, t.b, s.b);

    let mut out = Vec::new();
    if o1 == Orientation::Collinear && o2 == Orientation::Collinear {
        for p in [t.a, t.b] {
            if point_on_segment(p, s) {
                out.push(p);
            }
        }
        for p in [s.a, s.b] {
            if point_on_segment(p, t) {
                out.push(p);
            }
        }
        return out;
    }

    for p in [t.a, t.b] {
        if point_on_segment(p, s) {
            out.push(p);
        }
    }
    for p in [s.a, s.b] {
        if point_on_segment(p, t) {
            out.push(p);
        }
    }
    if out.is_empty() && o1 != o2 && o3 != o4 {
        let d1 = s.b.sub(s.a);
        let d2 = t.b.sub(t.a);
        let denom = d1.cross(d2);
        let tp = t.a.sub(s.a).cross(d2) / denom;
        out.push(s.a.add(d1.scale(tp)));
    }
    out
}

/// Sorts cut positions by travel order along the segment and removes
/// duplicates.
fn order_along(seg: Segment, cut: &mut Vec<XY>) {
    let d = seg.b.sub(seg.a);
    cut.sort_by(|&p, &q| {
        p.sub(seg.a)
            .dot(d)
            .total_cmp(&q.sub(seg.a).dot(d))
            .then_with(|| p.cmp(&q))
    });
    cut.dedup();
}

fn rebuild(g: &Geometry, cuts: &[Vec<XY>], cursor: &mut usize) -> Geometry {
    match g {
        Geometry::Point(_) | Geometry::MultiPoint(_) => g.clone(),
        Geometry::LineString(ls) => rebuild_line(ls, cuts, cursor).into(),
        Geometry::MultiLineString(mls) => MultiLineString::new(
            mls.line_strings()
                .iter()
                .map(|ls| rebuild_line(ls, cuts, cursor))
                .collect(),
        )
        .into(),
        Geometry::Polygon(p) => rebuild_polygon(p, cuts, cursor).into(),
        Geometry::MultiPolygon(mp) => MultiPolygon::from_polygons_unvalidated(
            mp.polygons()
                .iter()
                .map(|p| rebuild_polygon(p, cuts, cursor))
                .collect(),
        )
        .into(),
        Geometry::GeometryCollection(_) => {
            unreachable!("collections are rejected before the overlay")
        }
    }
}

fn rebuild_polygon(p: &Polygon, cuts: &[Vec<XY>], cursor: &mut usize) -> Polygon {
    Polygon::from_rings_unvalidated(
        p.rings()
            .iter()
            .map(|r| rebuild_line(r, cuts, cursor))
            .collect(),
    )
}

fn rebuild_line(ls: &LineString, cuts: &[Vec<XY>], cursor: &mut usize) -> LineString {
    let xys: Vec<XY> = ls.seq().xys().collect();
    let mut out: Vec<XY> = Vec::with_capacity(xys.len());
    for i in 0..xys.len().saturating_sub(1) {
        let seg_cuts = &cuts[*cursor];
        *cursor += 1;
        if out.last() != Some(&xys[i]) {
            out.push(xys[i]);
        }
        for &p in seg_cuts {
            if out.last() != Some(&p) {
                out.push(p);
            }
        }
    }
    if let Some(&last) = xys.last() {
        if out.last() != Some(&last) {
            out.push(last);
        }
    }
    LineString::from_xys_unvalidated(out)
}

/// Chain endpoints, positions seen by more than one walk, and isolated
/// points.
fn interaction_points(geoms: &[&Geometry]) -> HashSet<XY> {
    let mut seen: HashSet<XY> = HashSet::new();
    let mut interactions: HashSet<XY> = HashSet::new();
    for g in geoms {
        walk_point_xys(g, &mut |p| {
            interactions.insert(p);
            seen.insert(p);
        });
        walk_sequences(g, &mut |xys| {
            for (i, &p) in xys.iter().enumerate() {
                let endpoint = i == 0 || i == xys.len() - 1;
                let already = !seen.insert(p);
                if endpoint || already {
                    interactions.insert(p);
                }
            }
        });
    }
    interactions
}

/// One representative position per connected component: ring and line
/// starts plus every isolated point.
fn control_points(g: &Geometry, out: &mut Vec<XY>) {
    match g {
        Geometry::Point(p) => out.extend(p.xy()),
        Geometry::MultiPoint(mp) => out.extend(mp.xys()),
        Geometry::LineString(ls) => out.extend(ls.start_xy()),
        Geometry::MultiLineString(mls) => {
            out.extend(mls.line_strings().iter().filter_map(LineString::start_xy))
        }
        Geometry::Polygon(p) => out.extend(p.rings().iter().filter_map(LineString::start_xy)),
        Geometry::MultiPolygon(mp) => {
            for p in mp.polygons() {
                out.extend(p.rings().iter().filter_map(LineString::start_xy));
            }
        }
        Geometry::GeometryCollection(gc) => {
            for child in gc.geometries() {
                control_points(child, out);
            }
        }
    }
}

/// Connects all control points with a single sorted polyline. The path
/// is geometry-free topology: it only exists so that face extraction
/// sees one connected graph.
fn spanning_path(mut pts: Vec<XY>) -> MultiLineString {
    pts.sort();
    pts.dedup();
    if pts.len() < 2 {
        return MultiLineString::empty();
    }
    MultiLineString::new(vec![LineString::from_xys_unvalidated(pts)])
}

fn walk_sequences(g: &Geometry, f: &mut dyn FnMut(&[XY])) {
    match g {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        Geometry::LineString(ls) => {
            if !ls.is_empty() {
                f(&ls.seq().xys().collect::<Vec<_>>());
            }
        }
        Geometry::MultiLineString(mls) => {
            for ls in mls.line_strings() {
                if !ls.is_empty() {
                    f(&ls.seq().xys().collect::<Vec<_>>());
                }
            }
        }
        Geometry::Polygon(p) => {
            for r in p.rings() {
                f(&r.seq().xys().collect::<Vec<_>>());
            }
        }
        Geometry::MultiPolygon(mp) => {
            for p in mp.polygons() {
                for r in p.rings() {
                    f(&r.seq().xys().collect::<Vec<_>>());
                }
            }
        }
        Geometry::GeometryCollection(gc) => {
            for child in gc.geometries() {
                walk_sequences(child, f);
            }
        }
    }
}

fn walk_point_xys(g: &Geometry, f: &mut dyn FnMut(XY)) {
    match g {
        Geometry::Point(p) => {
            if let Some(xy) = p.xy() {
                f(xy);
            }
        }
        Geometry::MultiPoint(mp) => mp.xys().for_each(f),
        Geometry::GeometryCollection(gc) => {
            for child in gc.geometries() {
                walk_point_xys(child, f);
            }
        }
        _ => {}
    }
}
