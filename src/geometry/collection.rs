//! The GeometryCollection variant.

use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::primitives::XY;

/// A heterogeneous collection of geometries.
///
/// Collections may nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryCollection {
    geoms: Vec<Geometry>,
}

impl GeometryCollection {
    /// Creates a collection from its children.
    pub fn new(geoms: Vec<Geometry>) -> Self {
        Self { geoms }
    }

    /// The empty collection.
    pub fn empty() -> Self {
        Self { geoms: Vec::new() }
    }

    /// Returns true if every child is empty.
    pub fn is_empty(&self) -> bool {
        self.geoms.iter().all(Geometry::is_empty)
    }

    /// Number of direct children.
    #[inline]
    pub fn num_geometries(&self) -> usize {
        self.geoms.len()
    }

    /// The i-th direct child.
    #[inline]
    pub fn geometry_n(&self, i: usize) -> &Geometry {
        &self.geoms[i]
    }

    /// All direct children.
    #[inline]
    pub fn geometries(&self) -> &[Geometry] {
        &self.geoms
    }

    pub(crate) fn transform_xy(&self, f: &dyn Fn(XY) -> XY) -> Result<Self, GeometryError> {
        let geoms = self
            .geoms
            .iter()
            .map(|g| g.transform_xy(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { geoms })
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(gc: GeometryCollection) -> Self {
        Geometry::GeometryCollection(gc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_empty() {
        assert!(GeometryCollection::empty().is_empty());
        let gc = GeometryCollection::new(vec![Point::empty().into()]);
        assert!(gc.is_empty());
        assert_eq!(gc.num_geometries(), 1);
    }

    #[test]
    fn test_nesting() {
        let inner = GeometryCollection::new(vec![Point::new(XY::new(1.0, 2.0)).unwrap().into()]);
        let outer = GeometryCollection::new(vec![inner.into()]);
        assert!(!outer.is_empty());
    }
}
