//! The Point variant.

use crate::error::GeometryError;
use crate::geometry::{Coordinates, Geometry};
use crate::primitives::XY;

/// A single location, or the empty point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    coords: Option<Coordinates>,
}

impl Point {
    /// Creates a point from a 2D position.
    pub fn new(xy: XY) -> Result<Self, GeometryError> {
        Self::from_coordinates(Coordinates::from_xy(xy))
    }

    /// Creates a point carrying Z and/or M values.
    pub fn from_coordinates(coords: Coordinates) -> Result<Self, GeometryError> {
        let finite = coords.xy.is_finite()
            && coords.z.map_or(true, f64::is_finite)
            && coords.m.map_or(true, f64::is_finite);
        if !finite {
            return Err(GeometryError::InvalidCoordinate { index: 0 });
        }
        Ok(Self { coords: Some(coords) })
    }

    /// The empty point.
    pub fn empty() -> Self {
        Self { coords: None }
    }

    /// Returns true if this is the empty point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_none()
    }

    /// The 2D position, if any.
    #[inline]
    pub fn xy(&self) -> Option<XY> {
        self.coords.map(|c| c.xy)
    }

    /// The full coordinate values, if any.
    #[inline]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coords
    }

    pub(crate) fn transform_xy(&self, f: &dyn Fn(XY) -> XY) -> Result<Self, GeometryError> {
        match self.coords {
            None => Ok(Self::empty()),
            Some(c) => Self::from_coordinates(Coordinates { xy: f(c.xy), ..c }),
        }
    }
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Geometry::Point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let p = Point::new(XY::new(1.0, 2.0)).unwrap();
        assert!(!p.is_empty());
        assert_eq!(p.xy(), Some(XY::new(1.0, 2.0)));
    }

    #[test]
    fn test_empty() {
        let p = Point::empty();
        assert!(p.is_empty());
        assert_eq!(p.xy(), None);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(
            Point::new(XY::new(f64::NAN, 0.0)).unwrap_err(),
            GeometryError::InvalidCoordinate { index: 0 }
        );
        let coords = Coordinates { xy: XY::new(0.0, 0.0), z: Some(f64::INFINITY), m: None };
        assert!(Point::from_coordinates(coords).is_err());
    }
}
