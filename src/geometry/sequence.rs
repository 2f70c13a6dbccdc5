//! Packed coordinate sequences with a dimensionality tag.

use crate::error::GeometryError;
use crate::primitives::XY;

/// Which per-point values a sequence stores.
///
/// Z and M values are carried verbatim but ignored by every 2D
/// computation; equality across tags is defined on the XY projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordDim {
    /// x, y
    #[default]
    Xy,
    /// x, y, z
    Xyz,
    /// x, y, m
    Xym,
    /// x, y, z, m
    Xyzm,
}

impl CoordDim {
    /// Number of stored values per point.
    #[inline]
    pub fn size(self) -> usize {
        match self {
            CoordDim::Xy => 2,
            CoordDim::Xyz | CoordDim::Xym => 3,
            CoordDim::Xyzm => 4,
        }
    }

    /// Returns true if the tag carries a Z value.
    #[inline]
    pub fn has_z(self) -> bool {
        matches!(self, CoordDim::Xyz | CoordDim::Xyzm)
    }

    /// Returns true if the tag carries an M value.
    #[inline]
    pub fn has_m(self) -> bool {
        matches!(self, CoordDim::Xym | CoordDim::Xyzm)
    }
}

/// A single point's worth of coordinate values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// The 2D position.
    pub xy: XY,
    /// Optional elevation value.
    pub z: Option<f64>,
    /// Optional measure value.
    pub m: Option<f64>,
}

impl Coordinates {
    /// Coordinates holding only a 2D position.
    #[inline]
    pub fn from_xy(xy: XY) -> Self {
        Self { xy, z: None, m: None }
    }

    /// The dimensionality tag implied by which values are present.
    pub fn dim(self) -> CoordDim {
        match (self.z.is_some(), self.m.is_some()) {
            (false, false) => CoordDim::Xy,
            (true, false) => CoordDim::Xyz,
            (false, true) => CoordDim::Xym,
            (true, true) => CoordDim::Xyzm,
        }
    }
}

/// An ordered, possibly empty list of coordinates in packed storage.
#[derive(Debug, Clone)]
pub struct CoordSeq {
    vals: Vec<f64>,
    dim: CoordDim,
}

impl CoordSeq {
    /// Creates a sequence from packed values.
    ///
    /// Fails if the value count is not a multiple of the per-point size,
    /// or if any value is NaN or infinite.
    pub fn new(vals: Vec<f64>, dim: CoordDim) -> Result<Self, GeometryError> {
        let size = dim.size();
        if vals.len() % size != 0 {
            return Err(GeometryError::UnsupportedDimensionality { len: vals.len(), size });
        }
        for (i, chunk) in vals.chunks_exact(size).enumerate() {
            if chunk.iter().any(|v| !v.is_finite()) {
                return Err(GeometryError::InvalidCoordinate { index: i });
            }
        }
        Ok(Self { vals, dim })
    }

    /// Creates a 2D sequence from a list of XYs, validating finiteness.
    pub fn from_xys(xys: &[XY]) -> Result<Self, GeometryError> {
        for (i, p) in xys.iter().enumerate() {
            if !p.is_finite() {
                return Err(GeometryError::InvalidCoordinate { index: i });
            }
        }
        Ok(Self::from_xys_raw(xys.to_vec()))
    }

    /// Creates a 2D sequence from XYs already known to be finite.
    pub(crate) fn from_xys_raw(xys: Vec<XY>) -> Self {
        let mut vals = Vec::with_capacity(xys.len() * 2);
        for p in xys {
            vals.push(p.x);
            vals.push(p.y);
        }
        Self { vals, dim: CoordDim::Xy }
    }

    /// An empty 2D sequence.
    pub fn empty() -> Self {
        Self { vals: Vec::new(), dim: CoordDim::Xy }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.vals.len() / self.dim.size()
    }

    /// Returns true if the sequence holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    /// The dimensionality tag.
    #[inline]
    pub fn dim(&self) -> CoordDim {
        self.dim
    }

    /// The 2D projection of the i-th point.
    #[inline]
    pub fn xy(&self, i: usize) -> XY {
        let base = i * self.dim.size();
        XY::new(self.vals[base], self.vals[base + 1])
    }

    /// All values of the i-th point.
    pub fn coordinates(&self, i: usize) -> Coordinates {
        let base = i * self.dim.size();
        let (z, m) = match self.dim {
            CoordDim::Xy => (None, None),
            CoordDim::Xyz => (Some(self.vals[base + 2]), None),
            CoordDim::Xym => (None, Some(self.vals[base + 2])),
            CoordDim::Xyzm => (Some(self.vals[base + 2]), Some(self.vals[base + 3])),
        };
        Coordinates { xy: self.xy(i), z, m }
    }

    /// Iterates the 2D projections of all points.
    pub fn xys(&self) -> impl Iterator<Item = XY> + '_ {
        (0..self.len()).map(move |i| self.xy(i))
    }

    /// The sequence with point order reversed.
    pub fn reversed(&self) -> Self {
        let size = self.dim.size();
        let mut vals = Vec::with_capacity(self.vals.len());
        for chunk in self.vals.chunks_exact(size).rev() {
            vals.extend_from_slice(chunk);
        }
        Self { vals, dim: self.dim }
    }

    /// The sequence with the i-th point's values appended.
    pub(crate) fn with_point_appended(&self, i: usize) -> Self {
        let size = self.dim.size();
        let mut vals = self.vals.clone();
        vals.extend_from_slice(&self.vals[i * size..(i + 1) * size]);
        Self { vals, dim: self.dim }
    }

    /// Applies a 2D transform to every point, keeping Z/M values.
    pub(crate) fn map_xy(&self, f: &dyn Fn(XY) -> XY) -> Self {
        let size = self.dim.size();
        let mut vals = self.vals.clone();
        for chunk in vals.chunks_exact_mut(size) {
            let mapped = f(XY::new(chunk[0], chunk[1]));
            chunk[0] = mapped.x;
            chunk[1] = mapped.y;
        }
        Self { vals, dim: self.dim }
    }
}

impl PartialEq for CoordSeq {
    /// Bit-exact equality on the stored values, tags included.
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim
            && self.vals.len() == other.vals.len()
            && self
                .vals
                .iter()
                .zip(&other.vals)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
