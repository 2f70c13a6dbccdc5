//! The MultiPolygon variant.

use crate::error::GeometryError;
use crate::geometry::polygon::{locate_in_polygon, segment_relation, SegRelation};
use crate::geometry::{ConstructOpts, Geometry, Polygon};
use crate::primitives::{Envelope, RingSide, Segment, XY};

/// A collection of polygons with pairwise disjoint interiors.
///
/// Member boundaries may touch at finitely many points but never cross,
/// and no member may lie inside another (a member inside another's hole
/// is fine).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon {
    polys: Vec<Polygon>,
}

impl MultiPolygon {
    /// Creates a multi polygon from its members.
    pub fn new(polys: Vec<Polygon>, opts: ConstructOpts) -> Result<Self, GeometryError> {
        if !opts.skip_validations {
            validate_members(&polys)?;
        }
        Ok(Self { polys })
    }

    /// The empty multi polygon.
    pub fn empty() -> Self {
        Self { polys: Vec::new() }
    }

    /// Builds a multi polygon from members known to be valid.
    pub(crate) fn from_polygons_unvalidated(polys: Vec<Polygon>) -> Self {
        Self { polys }
    }

    /// Returns true if every member is empty.
    pub fn is_empty(&self) -> bool {
        self.polys.iter().all(Polygon::is_empty)
    }

    /// Number of member polygons.
    #[inline]
    pub fn num_polygons(&self) -> usize {
        self.polys.len()
    }

    /// The i-th member.
    #[inline]
    pub fn polygon_n(&self, i: usize) -> &Polygon {
        &self.polys[i]
    }

    /// All members.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polys
    }

    /// Every boundary segment of every member.
    pub fn all_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.polys.iter().flat_map(|p| p.all_segments())
    }

    /// Locates a point relative to the union of the members.
    pub(crate) fn locate(&self, pt: XY) -> RingSide {
        let mut side = RingSide::Exterior;
        for poly in &self.polys {
            match locate_in_polygon(poly, pt) {
                RingSide::Interior => return RingSide::Interior,
                RingSide::Boundary => side = RingSide::Boundary,
                RingSide::Exterior => {}
            }
        }
        side
    }

    pub(crate) fn transform_xy(&self, f: &dyn Fn(XY) -> XY) -> Result<Self, GeometryError> {
        let polys = self
            .polys
            .iter()
            .map(|p| p.transform_xy(f))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(polys, ConstructOpts::default())
    }
}

fn validate_members(polys: &[Polygon]) -> Result<(), GeometryError> {
    let envs: Vec<Option<Envelope>> = polys
        .iter()
        .map(|p| Envelope::from_xys(p.all_segments().map(|s| s.a)))
        .collect();

    for i in 0..polys.len() {
        for j in (i + 1)..polys.len() {
            let (Some(ei), Some(ej)) = (envs[i], envs[j]) else {
                continue;
            };
            if !ei.intersects(ej) {
                continue;
            }
            // Boundaries may touch but not cross or share segments.
            for si in polys[i].all_segments() {
                for sj in polys[j].all_segments() {
                    if let SegRelation::Cross = segment_relation(si, sj) {
                        return Err(GeometryError::PolygonsOverlap { first: i, second: j });
                    }
                }
            }
            // Neither polygon may sit inside the other's interior.
            if polygon_inside(&polys[j], &polys[i]) || polygon_inside(&polys[i], &polys[j]) {
                return Err(GeometryError::PolygonsOverlap { first: i, second: j });
            }
        }
    }
    Ok(())
}

/// Returns true if some part of `inner` lies strictly inside `outer`.
fn polygon_inside(inner: &Polygon, outer: &Polygon) -> bool {
    let Some(ext) = inner.exterior_ring() else {
        return false;
    };
    for p in ext.seq().xys() {
        match locate_in_polygon(outer, p) {
            RingSide::Interior => return true,
            RingSide::Exterior => return false,
            RingSide::Boundary => {}
        }
    }
    for seg in ext.segments() {
        match locate_in_polygon(outer, seg.midpoint()) {
            RingSide::Interior => return true,
            RingSide::Exterior => return false,
            RingSide::Boundary => {}
        }
    }
    false
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Geometry::MultiPolygon(mp)
    }
}
