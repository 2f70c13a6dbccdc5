//! The geometry data model: a closed sum of seven variants.

mod collection;
mod equality;
mod line_string;
mod multi_line_string;
mod multi_point;
mod multi_polygon;
mod options;
mod point;
pub(crate) mod polygon;
mod sequence;

pub use collection::GeometryCollection;
pub use equality::EqualsExactOpts;
pub use line_string::LineString;
pub use multi_line_string::MultiLineString;
pub use multi_point::MultiPoint;
pub use multi_polygon::MultiPolygon;
pub use options::ConstructOpts;
pub use point::Point;
pub use polygon::Polygon;
pub use sequence::{CoordDim, CoordSeq, Coordinates};

use std::fmt;

use crate::dcel::{self, SetOp};
use crate::distance;
use crate::error::GeometryError;
use crate::hull;
use crate::intersects;
use crate::primitives::{Envelope, XY};
use crate::relate::{self, IntersectionMatrix};

/// Discriminant of the geometry variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        };
        f.write_str(name)
    }
}

/// Any geometry value.
///
/// Geometries are immutable: every "transforming" method returns a new
/// value, so sharing across threads needs no synchronisation.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// The variant discriminant.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Returns true if the geometry holds no positions.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(g) => g.is_empty(),
            Geometry::LineString(g) => g.is_empty(),
            Geometry::Polygon(g) => g.is_empty(),
            Geometry::MultiPoint(g) => g.is_empty(),
            Geometry::MultiLineString(g) => g.is_empty(),
            Geometry::MultiPolygon(g) => g.is_empty(),
            Geometry::GeometryCollection(g) => g.is_empty(),
        }
    }

    /// Topological dimension: 0 for puntal, 1 for lineal, 2 for areal
    /// variants; the maximum over children for collections.
    pub fn dimension(&self) -> usize {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => 1,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => 2,
            Geometry::GeometryCollection(gc) => gc
                .geometries()
                .iter()
                .map(Geometry::dimension)
                .max()
                .unwrap_or(0),
        }
    }

    /// Bounding envelope, or `None` for an empty geometry.
    pub fn envelope(&self) -> Option<Envelope> {
        let mut env: Option<Envelope> = None;
        self.for_each_xy(&mut |p| {
            env = Some(match env {
                Some(e) => e.expand_to_include(p),
                None => Envelope::from_xy(p),
            });
        });
        env
    }

    /// OGC simplicity, or `None` where it is not defined
    /// (GeometryCollection).
    pub fn is_simple(&self) -> Option<bool> {
        match self {
            Geometry::Point(_) => Some(true),
            Geometry::LineString(g) => Some(g.is_simple()),
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Some(true),
            Geometry::MultiPoint(g) => Some(g.is_simple()),
            Geometry::MultiLineString(g) => Some(g.is_simple()),
            Geometry::GeometryCollection(_) => None,
        }
    }

    /// The combinatorial boundary per OGC (mod-2 rule for linework).
    pub fn boundary(&self) -> Geometry {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => GeometryCollection::empty().into(),
            Geometry::LineString(ls) => boundary_multi_point(ls.boundary_xys()),
            Geometry::MultiLineString(mls) => boundary_multi_point(mls.boundary_xys()),
            Geometry::Polygon(p) => MultiLineString::new(p.rings().to_vec()).into(),
            Geometry::MultiPolygon(mp) => {
                let rings = mp
                    .polygons()
                    .iter()
                    .flat_map(|p| p.rings().iter().cloned())
                    .collect();
                MultiLineString::new(rings).into()
            }
            Geometry::GeometryCollection(gc) => GeometryCollection::new(
                gc.geometries().iter().map(Geometry::boundary).collect(),
            )
            .into(),
        }
    }

    /// All coordinate values in traversal order.
    pub fn coordinates(&self) -> Vec<Coordinates> {
        let mut out = Vec::new();
        self.collect_coordinates(&mut out);
        out
    }

    fn collect_coordinates(&self, out: &mut Vec<Coordinates>) {
        match self {
            Geometry::Point(p) => out.extend(p.coordinates()),
            Geometry::LineString(ls) => {
                out.extend((0..ls.num_points()).map(|i| ls.seq().coordinates(i)))
            }
            Geometry::Polygon(p) => {
                for r in p.rings() {
                    out.extend((0..r.num_points()).map(|i| r.seq().coordinates(i)));
                }
            }
            Geometry::MultiPoint(mp) => {
                out.extend((0..mp.num_points()).filter_map(|i| mp.point_n(i).coordinates()))
            }
            Geometry::MultiLineString(mls) => {
                for ls in mls.line_strings() {
                    out.extend((0..ls.num_points()).map(|i| ls.seq().coordinates(i)));
                }
            }
            Geometry::MultiPolygon(mp) => {
                for p in mp.polygons() {
                    for r in p.rings() {
                        out.extend((0..r.num_points()).map(|i| r.seq().coordinates(i)));
                    }
                }
            }
            Geometry::GeometryCollection(gc) => {
                for g in gc.geometries() {
                    g.collect_coordinates(out);
                }
            }
        }
    }

    /// Applies a 2D transform to every position, revalidating the result.
    pub fn transform_xy(&self, f: impl Fn(XY) -> XY) -> Result<Geometry, GeometryError> {
        self.transform_xy_dyn(&f)
    }

    fn transform_xy_dyn(&self, f: &dyn Fn(XY) -> XY) -> Result<Geometry, GeometryError> {
        Ok(match self {
            Geometry::Point(g) => g.transform_xy(f)?.into(),
            Geometry::LineString(g) => g.transform_xy(f)?.into(),
            Geometry::Polygon(g) => g.transform_xy(f)?.into(),
            Geometry::MultiPoint(g) => g.transform_xy(f)?.into(),
            Geometry::MultiLineString(g) => g.transform_xy(f)?.into(),
            Geometry::MultiPolygon(g) => g.transform_xy(f)?.into(),
            Geometry::GeometryCollection(g) => g.transform_xy(f)?.into(),
        })
    }

    /// Convex hull of all positions.
    ///
    /// Mirrors PostGIS behaviour: the hull of an empty geometry is the
    /// geometry itself; degenerate hulls collapse to Point or LineString.
    pub fn convex_hull(&self) -> Geometry {
        hull::convex_hull(self)
    }

    /// Returns true if the two geometries share at least one point.
    pub fn intersects(&self, other: &Geometry) -> bool {
        intersects::intersects(self, other)
    }

    /// Returns true if the two geometries share no point.
    pub fn disjoint(&self, other: &Geometry) -> bool {
        !self.intersects(other)
    }

    /// Computes the DE-9IM intersection matrix of the two operands.
    pub fn relate(&self, other: &Geometry) -> Result<IntersectionMatrix, GeometryError> {
        relate::relate(self, other)
    }

    /// Spatial equality: the operands cover exactly the same point set.
    pub fn equals(&self, other: &Geometry) -> Result<bool, GeometryError> {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Ok(true),
            (true, false) | (false, true) => Ok(false),
            _ => Ok(self.relate(other)?.matches("T*F**FFF*")),
        }
    }

    /// The operands touch: boundaries meet but interiors do not.
    pub fn touches(&self, other: &Geometry) -> Result<bool, GeometryError> {
        if self.is_empty() || other.is_empty() {
            return Ok(false);
        }
        let m = self.relate(other)?;
        Ok(m.matches("FT*******") || m.matches("F**T*****") || m.matches("F***T****"))
    }

    /// `other` lies in this geometry's interior-plus-boundary, and the
    /// interiors meet.
    pub fn contains(&self, other: &Geometry) -> Result<bool, GeometryError> {
        if self.is_empty() || other.is_empty() {
            return Ok(false);
        }
        Ok(self.relate(other)?.matches("T*****FF*"))
    }

    /// No point of `other` escapes this geometry.
    pub fn covers(&self, other: &Geometry) -> Result<bool, GeometryError> {
        if self.is_empty() || other.is_empty() {
            return Ok(false);
        }
        let m = self.relate(other)?;
        Ok(m.matches("T*****FF*")
            || m.matches("*T****FF*")
            || m.matches("***T**FF*")
            || m.matches("****T*FF*"))
    }

    /// Reflection of [`Geometry::contains`].
    pub fn within(&self, other: &Geometry) -> Result<bool, GeometryError> {
        if self.is_empty() || other.is_empty() {
            return Ok(false);
        }
        Ok(self.relate(other)?.matches("T*F**F***"))
    }

    /// Reflection of [`Geometry::covers`].
    pub fn covered_by(&self, other: &Geometry) -> Result<bool, GeometryError> {
        if self.is_empty() || other.is_empty() {
            return Ok(false);
        }
        let m = self.relate(other)?;
        Ok(m.matches("T*F**F***")
            || m.matches("*TF**F***")
            || m.matches("**FT*F***")
            || m.matches("**F*TF***"))
    }

    /// The operands cross per OGC: interiors meet and each reaches
    /// outside the other, with the dimension conditions.
    pub fn crosses(&self, other: &Geometry) -> Result<bool, GeometryError> {
        if self.is_empty() || other.is_empty() {
            return Ok(false);
        }
        let (da, db) = (self.dimension(), other.dimension());
        let m = self.relate(other)?;
        Ok(if da < db {
            m.matches("T*T******")
        } else if da > db {
            m.matches("T*****T**")
        } else if da == 1 {
            m.matches("0********")
        } else {
            false
        })
    }

    /// The operands overlap per OGC: same dimension, interiors meet, and
    /// neither contains the other.
    pub fn overlaps(&self, other: &Geometry) -> Result<bool, GeometryError> {
        if self.is_empty() || other.is_empty() {
            return Ok(false);
        }
        let (da, db) = (self.dimension(), other.dimension());
        let m = self.relate(other)?;
        Ok(if da == db && (da == 0 || da == 2) {
            m.matches("T*T***T**")
        } else if da == db && da == 1 {
            m.matches("1*T***T**")
        } else {
            false
        })
    }

    /// Set union of the operands.
    pub fn union(&self, other: &Geometry) -> Result<Geometry, GeometryError> {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Ok(GeometryCollection::empty().into()),
            (true, false) => Ok(other.clone()),
            (false, true) => Ok(self.clone()),
            _ => dcel::overlay_op(self, other, SetOp::Union),
        }
    }

    /// Set intersection of the operands.
    pub fn intersection(&self, other: &Geometry) -> Result<Geometry, GeometryError> {
        if self.is_empty() || other.is_empty() {
            return Ok(GeometryCollection::empty().into());
        }
        dcel::overlay_op(self, other, SetOp::Intersection)
    }

    /// Set difference: the parts of this geometry outside `other`.
    pub fn difference(&self, other: &Geometry) -> Result<Geometry, GeometryError> {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => Ok(GeometryCollection::empty().into()),
            (false, true) => Ok(self.clone()),
            _ => dcel::overlay_op(self, other, SetOp::Difference),
        }
    }

    /// Symmetric set difference of the operands.
    pub fn symmetric_difference(&self, other: &Geometry) -> Result<Geometry, GeometryError> {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Ok(GeometryCollection::empty().into()),
            (true, false) => Ok(other.clone()),
            (false, true) => Ok(self.clone()),
            _ => dcel::overlay_op(self, other, SetOp::SymmetricDifference),
        }
    }

    /// Shortest distance between the operands.
    ///
    /// `None` when either operand is empty (the distance is undefined);
    /// zero when the operands intersect.
    pub fn distance(&self, other: &Geometry) -> Option<f64> {
        distance::distance(self, other)
    }

    /// Structural equality on the stored representation.
    pub fn equals_exact(&self, other: &Geometry, opts: EqualsExactOpts) -> bool {
        equality::equals_exact(self, other, opts)
    }

    /// Dispatch rank; lower ranks come first in pairwise handlers.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Geometry::Point(_) => 1,
            Geometry::LineString(_) => 2,
            Geometry::Polygon(_) => 3,
            Geometry::MultiPoint(_) => 4,
            Geometry::MultiLineString(_) => 5,
            Geometry::MultiPolygon(_) => 6,
            Geometry::GeometryCollection(_) => 7,
        }
    }

    /// Visits the 2D projection of every stored position.
    pub(crate) fn for_each_xy(&self, f: &mut dyn FnMut(XY)) {
        match self {
            Geometry::Point(p) => {
                if let Some(xy) = p.xy() {
                    f(xy);
                }
            }
            Geometry::LineString(ls) => ls.seq().xys().for_each(f),
            Geometry::Polygon(p) => {
                for r in p.rings() {
                    r.seq().xys().for_each(&mut *f);
                }
            }
            Geometry::MultiPoint(mp) => mp.xys().for_each(f),
            Geometry::MultiLineString(mls) => {
                for ls in mls.line_strings() {
                    ls.seq().xys().for_each(&mut *f);
                }
            }
            Geometry::MultiPolygon(mp) => {
                for p in mp.polygons() {
                    for r in p.rings() {
                        r.seq().xys().for_each(&mut *f);
                    }
                }
            }
            Geometry::GeometryCollection(gc) => {
                for g in gc.geometries() {
                    g.for_each_xy(f);
                }
            }
        }
    }
}

fn boundary_multi_point(xys: Vec<XY>) -> Geometry {
    let pts = xys
        .into_iter()
        .map(|p| Point::new(p).expect("boundary of a valid geometry is finite"))
        .collect();
    MultiPoint::new(pts).into()
}
