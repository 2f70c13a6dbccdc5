//! The Polygon variant and ring validation.

use crate::error::GeometryError;
use crate::geometry::{ConstructOpts, Geometry, LineString};
use crate::primitives::{
    orientation, point_on_segment, point_ring_side, Orientation, RingSide, Segment, XY,
};

/// An areal geometry bounded by an exterior ring and zero or more holes.
///
/// Every ring is a closed simple line string of at least four points
/// (the closing point repeating the first). Rings never cross; holes lie
/// inside the exterior ring; touching rings may not disconnect the
/// interior. Orientation is normalised on construction: the exterior
/// ring winds counter-clockwise, holes wind clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    rings: Vec<LineString>,
}

impl Polygon {
    /// Creates a polygon from its rings; `rings[0]` is the exterior.
    pub fn new(rings: Vec<LineString>, opts: ConstructOpts) -> Result<Self, GeometryError> {
        let mut rings = rings;
        if opts.omit_ring_closing {
            for ring in &mut rings {
                if !ring.is_empty() && !ring.is_closed() {
                    let closed = ring.seq().with_point_appended(0);
                    *ring = LineString::new(closed, ConstructOpts::skip())?;
                }
            }
        }

        if !opts.skip_validations {
            validate_rings(&rings)?;
        }

        // Canonical winding: exterior CCW, holes CW.
        Ok(Self::from_rings_unvalidated(rings))
    }

    /// The empty polygon.
    pub fn empty() -> Self {
        Self { rings: Vec::new() }
    }

    /// Builds a polygon from rings known to be valid, still normalising
    /// ring orientation.
    pub(crate) fn from_rings_unvalidated(rings: Vec<LineString>) -> Self {
        let mut rings = rings;
        for (i, ring) in rings.iter_mut().enumerate() {
            let area = ring_signed_area(ring);
            let want_ccw = i == 0;
            if (area > 0.0) != want_ccw && area != 0.0 {
                *ring = ring.reversed();
            }
        }
        Self { rings }
    }

    /// Returns true if the polygon has no rings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// The exterior ring, unless empty.
    #[inline]
    pub fn exterior_ring(&self) -> Option<&LineString> {
        self.rings.first()
    }

    /// Number of interior rings.
    #[inline]
    pub fn num_interior_rings(&self) -> usize {
        self.rings.len().saturating_sub(1)
    }

    /// The i-th interior ring.
    #[inline]
    pub fn interior_ring_n(&self, i: usize) -> &LineString {
        &self.rings[i + 1]
    }

    /// All rings, exterior first.
    #[inline]
    pub fn rings(&self) -> &[LineString] {
        &self.rings
    }

    /// Every boundary segment of every ring.
    pub fn all_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.rings.iter().flat_map(|r| r.segments())
    }

    pub(crate) fn transform_xy(&self, f: &dyn Fn(XY) -> XY) -> Result<Self, GeometryError> {
        let rings = self
            .rings
            .iter()
            .map(|r| r.transform_xy(f))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rings, ConstructOpts::default())
    }
}

/// Signed shoelace area of a cyclic point list (closing edge implied).
pub(crate) fn signed_area(xys: &[XY]) -> f64 {
    if xys.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    let n = xys.len();
    for i in 0..n {
        let j = (i + 1) % n;
        area += xys[i].x * xys[j].y - xys[j].x * xys[i].y;
    }
    area / 2.0
}

/// Signed area of a closed ring (positive when counter-clockwise).
pub(crate) fn ring_signed_area(ring: &LineString) -> f64 {
    let xys: Vec<XY> = ring.seq().xys().collect();
    match xys.split_last() {
        Some((_, open)) => signed_area(open),
        None => 0.0,
    }
}

/// Locates a point relative to a polygon's closed point set.
pub(crate) fn locate_in_polygon(poly: &Polygon, pt: XY) -> RingSide {
    let Some(ext) = poly.exterior_ring() else {
        return RingSide::Exterior;
    };
    match point_ring_side(pt, ext.segments()) {
        RingSide::Exterior => RingSide::Exterior,
        RingSide::Boundary => RingSide::Boundary,
        RingSide::Interior => {
            for i in 0..poly.num_interior_rings() {
                match point_ring_side(pt, poly.interior_ring_n(i).segments()) {
                    RingSide::Interior => return RingSide::Exterior,
                    RingSide::Boundary => return RingSide::Boundary,
                    RingSide::Exterior => {}
                }
            }
            RingSide::Interior
        }
    }
}

/// How two segments from different rings meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SegRelation {
    Disjoint,
    /// A single shared point.
    Touch(XY),
    /// A transversal crossing or a positive-length overlap.
    Cross,
}

/// Classifies the intersection of two segments that do not belong to the
/// same chain.
pub(crate) fn segment_relation(s1: Segment, s2: Segment) -> SegRelation {
    let o1 = orientation(s1.a, s1.b, s2.a);
    let o2 = orientation(s1.a, s1.b, s2.b);
    let o3 = orientation(s2.a, s2.b, s1.a);
    let o4 = orientation(s2.a, s2.b, s1.b);

    let all_collinear = o1 == Orientation::Collinear
        && o2 == Orientation::Collinear
        && o3 == Orientation::Collinear
        && o4 == Orientation::Collinear;
    if all_collinear {
        let mut shared: Vec<XY> = Vec::new();
        for p in [s2.a, s2.b] {
            if point_on_segment(p, s1) {
                shared.push(p);
            }
        }
        for p in [s1.a, s1.b] {
            if point_on_segment(p, s2) {
                shared.push(p);
            }
        }
        shared.sort();
        shared.dedup();
        return match shared.len() {
            0 => SegRelation::Disjoint,
            1 => SegRelation::Touch(shared[0]),
            _ => SegRelation::Cross,
        };
    }

    // An endpoint resting on the other segment is the only possible
    // contact for non-collinear segments.
    for p in [s2.a, s2.b] {
        if point_on_segment(p, s1) {
            return SegRelation::Touch(p);
        }
    }
    for p in [s1.a, s1.b] {
        if point_on_segment(p, s2) {
            return SegRelation::Touch(p);
        }
    }

    if o1 != o2 && o3 != o4 {
        return SegRelation::Cross;
    }
    SegRelation::Disjoint
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    /// Merges two sets; false if they were already one set.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}

fn validate_rings(rings: &[LineString]) -> Result<(), GeometryError> {
    for (i, ring) in rings.iter().enumerate() {
        if ring.num_points() < 4 {
            return Err(GeometryError::InsufficientPoints { got: ring.num_points(), min: 4 });
        }
        if !ring.is_closed() {
            return Err(GeometryError::RingNotClosed { ring: i });
        }
        if !ring.is_simple() {
            return Err(GeometryError::RingNotSimple { ring: i });
        }
    }

    // Rings may touch at isolated points but never cross. Every touch is
    // an edge in the ring connectivity graph; a cycle there pinches the
    // interior apart.
    let mut uf = UnionFind::new(rings.len());
    for i in 0..rings.len() {
        for j in (i + 1)..rings.len() {
            let mut touches: Vec<XY> = Vec::new();
            for si in rings[i].segments() {
                for sj in rings[j].segments() {
                    match segment_relation(si, sj) {
                        SegRelation::Cross => {
                            return Err(GeometryError::RingsCross { first: i, second: j })
                        }
                        SegRelation::Touch(p) => touches.push(p),
                        SegRelation::Disjoint => {}
                    }
                }
            }
            touches.sort();
            touches.dedup();
            for _ in &touches {
                if !uf.union(i, j) {
                    return Err(GeometryError::InteriorDisconnected);
                }
            }
        }
    }

    // Holes lie inside the exterior ring and outside each other.
    let shell = &rings[0];
    for (k, hole) in rings.iter().enumerate().skip(1) {
        match ring_location(hole, shell) {
            Some(RingSide::Interior) | None => {}
            _ => return Err(GeometryError::HolesNotInsideShell { hole: k }),
        }
        for (m, other) in rings.iter().enumerate().skip(1) {
            if m == k {
                continue;
            }
            if ring_location(hole, other) == Some(RingSide::Interior) {
                return Err(GeometryError::HolesNotInsideShell { hole: k });
            }
        }
    }

    Ok(())
}

/// Where a ring sits relative to another ring, decided by its first
/// strictly classified vertex (falling back to edge midpoints when every
/// vertex lies on the other ring's boundary).
fn ring_location(ring: &LineString, other: &LineString) -> Option<RingSide> {
    for p in ring.seq().xys() {
        match point_ring_side(p, other.segments()) {
            RingSide::Boundary => {}
            side => return Some(side),
        }
    }
    for seg in ring.segments() {
        match point_ring_side(seg.midpoint(), other.segments()) {
            RingSide::Boundary => {}
            side => return Some(side),
        }
    }
    None
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Geometry::Polygon(p)
    }
}
