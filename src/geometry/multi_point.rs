//! The MultiPoint variant.

use crate::error::GeometryError;
use crate::geometry::{Geometry, Point};
use crate::primitives::XY;

/// An unordered collection of points.
///
/// Duplicates are allowed; the stored order is preserved but carries no
/// meaning. Empty member points are permitted and ignored by operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPoint {
    pts: Vec<Point>,
}

impl MultiPoint {
    /// Creates a multi point from its members.
    pub fn new(pts: Vec<Point>) -> Self {
        Self { pts }
    }

    /// Creates a multi point from 2D positions.
    pub fn from_xys(xys: &[XY]) -> Result<Self, GeometryError> {
        let pts = xys.iter().map(|&p| Point::new(p)).collect::<Result<_, _>>()?;
        Ok(Self { pts })
    }

    /// The empty multi point.
    pub fn empty() -> Self {
        Self { pts: Vec::new() }
    }

    /// Returns true if no member holds a position.
    pub fn is_empty(&self) -> bool {
        self.pts.iter().all(Point::is_empty)
    }

    /// Number of member points (empty members included).
    #[inline]
    pub fn num_points(&self) -> usize {
        self.pts.len()
    }

    /// The i-th member.
    #[inline]
    pub fn point_n(&self, i: usize) -> &Point {
        &self.pts[i]
    }

    /// The 2D positions of all non-empty members.
    pub fn xys(&self) -> impl Iterator<Item = XY> + '_ {
        self.pts.iter().filter_map(Point::xy)
    }

    /// A multi point is simple when no position repeats.
    pub fn is_simple(&self) -> bool {
        let mut seen: Vec<XY> = self.xys().collect();
        let before = seen.len();
        seen.sort();
        seen.dedup();
        seen.len() == before
    }

    pub(crate) fn transform_xy(&self, f: &dyn Fn(XY) -> XY) -> Result<Self, GeometryError> {
        let pts = self
            .pts
            .iter()
            .map(|p| p.transform_xy(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pts })
    }
}

impl From<MultiPoint> for Geometry {
    fn from(mp: MultiPoint) -> Self {
        Geometry::MultiPoint(mp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_semantics() {
        assert!(MultiPoint::empty().is_empty());
        let mp = MultiPoint::new(vec![Point::empty(), Point::empty()]);
        assert!(mp.is_empty());
        assert_eq!(mp.num_points(), 2);
    }

    #[test]
    fn test_is_simple() {
        let mp = MultiPoint::from_xys(&[XY::new(1.0, 2.0), XY::new(3.0, 4.0)]).unwrap();
        assert!(mp.is_simple());
        let dup = MultiPoint::from_xys(&[XY::new(1.0, 2.0), XY::new(1.0, 2.0)]).unwrap();
        assert!(!dup.is_simple());
    }
}
