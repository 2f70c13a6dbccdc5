//! Coordinate, segment and envelope primitives plus exact predicates.

mod envelope;
mod predicates;
mod segment;
mod xy;

pub use envelope::Envelope;
pub use predicates::{
    orientation, point_on_segment, point_ring_side, segments_intersect, Orientation, RingSide,
};
pub use segment::Segment;
pub use xy::XY;
