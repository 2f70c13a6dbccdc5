//! The LineString variant.

use crate::error::GeometryError;
use crate::geometry::{ConstructOpts, CoordSeq, Geometry};
use crate::primitives::{orientation, segments_intersect, Orientation, Segment, XY};

/// An ordered curve through two or more points.
///
/// Consecutive points must be distinct in 2D. A line string is closed
/// when its first and last points coincide, and simple when it has no
/// self-intersection other than the shared endpoint of a closed curve.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    seq: CoordSeq,
}

impl LineString {
    /// Creates a line string from a coordinate sequence.
    pub fn new(seq: CoordSeq, opts: ConstructOpts) -> Result<Self, GeometryError> {
        if !opts.skip_validations {
            if seq.len() == 1 {
                return Err(GeometryError::InsufficientPoints { got: 1, min: 2 });
            }
            for i in 1..seq.len() {
                if seq.xy(i) == seq.xy(i - 1) {
                    return Err(GeometryError::RepeatedPoint { index: i });
                }
            }
        }
        Ok(Self { seq })
    }

    /// Creates a 2D line string from a list of XYs.
    pub fn from_xys(xys: &[XY]) -> Result<Self, GeometryError> {
        Self::new(CoordSeq::from_xys(xys)?, ConstructOpts::default())
    }

    pub(crate) fn from_xys_unvalidated(xys: Vec<XY>) -> Self {
        Self { seq: CoordSeq::from_xys_raw(xys) }
    }

    /// The empty line string.
    pub fn empty() -> Self {
        Self { seq: CoordSeq::empty() }
    }

    /// Returns true if the line string has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.seq.len()
    }

    /// The 2D projection of the i-th point.
    #[inline]
    pub fn xy_n(&self, i: usize) -> XY {
        self.seq.xy(i)
    }

    /// The underlying coordinate sequence.
    #[inline]
    pub fn seq(&self) -> &CoordSeq {
        &self.seq
    }

    /// First point, unless empty.
    pub fn start_xy(&self) -> Option<XY> {
        (!self.is_empty()).then(|| self.seq.xy(0))
    }

    /// Last point, unless empty.
    pub fn end_xy(&self) -> Option<XY> {
        (!self.is_empty()).then(|| self.seq.xy(self.seq.len() - 1))
    }

    /// Returns true if the first and last points coincide in 2D.
    pub fn is_closed(&self) -> bool {
        match (self.start_xy(), self.end_xy()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// The constituent segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.seq.len().saturating_sub(1))
            .map(move |i| Segment::new(self.seq.xy(i), self.seq.xy(i + 1)))
    }

    /// The line string traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self { seq: self.seq.reversed() }
    }

    /// Returns true if the curve has no self-intersections except the
    /// shared endpoint of a closed curve.
    pub fn is_simple(&self) -> bool {
        let segs: Vec<Segment> = self.segments().collect();
        let m = segs.len();
        let closed = self.is_closed();
        for i in 0..m {
            for j in (i + 1)..m {
                if j == i + 1 {
                    if spur(segs[i].a, segs[i].b, segs[j].b) {
                        return false;
                    }
                } else if closed && i == 0 && j == m - 1 {
                    if spur(segs[j].a, segs[i].a, segs[i].b) {
                        return false;
                    }
                } else if segments_intersect(segs[i], segs[j]) {
                    return false;
                }
            }
        }
        true
    }

    /// Endpoints of the curve under the mod-2 rule: both ends for an open
    /// curve, nothing for a closed or empty one.
    pub(crate) fn boundary_xys(&self) -> Vec<XY> {
        match (self.start_xy(), self.end_xy()) {
            (Some(a), Some(b)) if a != b => vec![a, b],
            _ => Vec::new(),
        }
    }

    pub(crate) fn transform_xy(&self, f: &dyn Fn(XY) -> XY) -> Result<Self, GeometryError> {
        let seq = self.seq.map_xy(f);
        for (i, p) in seq.xys().enumerate() {
            if !p.is_finite() {
                return Err(GeometryError::InvalidCoordinate { index: i });
            }
        }
        Self::new(seq, ConstructOpts::default())
    }
}

/// Returns true if `next` folds back onto the segment arriving at
/// `shared` from `prev`.
fn spur(prev: XY, shared: XY, next: XY) -> bool {
    orientation(prev, shared, next) == Orientation::Collinear
        && next.sub(shared).dot(prev.sub(shared)) > 0.0
}

impl From<LineString> for Geometry {
    fn from(ls: LineString) -> Self {
        Geometry::LineString(ls)
    }
}
