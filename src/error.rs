//! Error types for geometry construction and operations.

use crate::geometry::GeometryType;
use thiserror::Error;

/// Errors reported by constructors and fallible operations.
///
/// Validation errors name the first violated invariant, along with the
/// offending index where one exists. Operations only ever consume valid
/// geometries, so they never re-report validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A coordinate value is NaN or infinite.
    #[error("invalid coordinate at index {index}: values must be finite")]
    InvalidCoordinate {
        /// Index of the coordinate within its sequence.
        index: usize,
    },

    /// Two consecutive points of a line string are identical.
    #[error("repeated point at index {index}: consecutive points must be distinct")]
    RepeatedPoint {
        /// Index of the second of the two identical points.
        index: usize,
    },

    /// A polygon ring does not end where it starts.
    #[error("ring {ring} is not closed")]
    RingNotClosed {
        /// Ring index within the polygon (0 is the exterior ring).
        ring: usize,
    },

    /// A polygon ring intersects itself.
    #[error("ring {ring} is not simple")]
    RingNotSimple {
        /// Ring index within the polygon (0 is the exterior ring).
        ring: usize,
    },

    /// Two rings of a polygon cross each other.
    #[error("rings {first} and {second} cross")]
    RingsCross {
        /// Index of the first ring involved.
        first: usize,
        /// Index of the second ring involved.
        second: usize,
    },

    /// An interior ring is not contained in the exterior ring.
    #[error("interior ring {hole} is not inside the exterior ring")]
    HolesNotInsideShell {
        /// Index of the offending ring within the polygon.
        hole: usize,
    },

    /// Touching rings disconnect the polygon interior.
    #[error("polygon interior is disconnected")]
    InteriorDisconnected,

    /// Two polygons of a multi polygon have overlapping interiors.
    #[error("polygons {first} and {second} have overlapping interiors")]
    PolygonsOverlap {
        /// Index of the first polygon involved.
        first: usize,
        /// Index of the second polygon involved.
        second: usize,
    },

    /// A sequence is too short for the geometry being built.
    #[error("not enough points: got {got}, need at least {min}")]
    InsufficientPoints {
        /// Number of points supplied.
        got: usize,
        /// Minimum number of points required.
        min: usize,
    },

    /// A raw coordinate list does not match its dimensionality tag.
    #[error("coordinate list of length {len} is not a multiple of the coordinate size {size}")]
    UnsupportedDimensionality {
        /// Length of the raw value list.
        len: usize,
        /// Number of values per coordinate for the requested tag.
        size: usize,
    },

    /// An operation received a geometry variant it does not accept.
    #[error("{operation} does not accept {variant} operands")]
    MismatchedVariant {
        /// Name of the rejected operation.
        operation: &'static str,
        /// The offending operand variant.
        variant: GeometryType,
    },

    /// An internal invariant was violated. Always a bug in this crate.
    #[error("implementation bug: {0}")]
    ImplementationBug(&'static str),
}
