//! flatgeom - planar vector geometry with OGC Simple Features semantics.
//!
//! A closed algebra over 2D geometries: points, linework, polygons and
//! their multi-part collections, with topological predicates, DE-9IM
//! relates, constructive set operations backed by a doubly connected
//! edge list overlay, convex hulls and R-tree accelerated distance.
//!
//! All geometry values are immutable and validated at construction;
//! operations are pure functions over them.

pub mod error;
pub mod geometry;
pub mod primitives;
pub mod relate;
pub mod rtree;

mod dcel;
mod distance;
mod hull;
mod intersects;

pub use error::GeometryError;
pub use geometry::{
    ConstructOpts, CoordDim, CoordSeq, Coordinates, EqualsExactOpts, Geometry,
    GeometryCollection, GeometryType, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
pub use primitives::{Envelope, Orientation, RingSide, Segment, XY};
pub use relate::{Dimension, IntersectionMatrix, Location};
