//! DE-9IM intersection matrices and point location.

use std::fmt;

use crate::dcel;
use crate::error::GeometryError;
use crate::geometry::polygon::locate_in_polygon;
use crate::geometry::{Geometry, GeometryType, LineString};
use crate::primitives::{point_on_segment, RingSide, XY};

/// One of the three topological parts of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    fn index(self) -> usize {
        match self {
            Location::Interior => 0,
            Location::Boundary => 1,
            Location::Exterior => 2,
        }
    }
}

/// Dimension of an intersection region in a DE-9IM matrix entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Dimension {
    /// The regions do not intersect ("F").
    #[default]
    Empty,
    /// A zero-dimensional (point) intersection.
    Zero,
    /// A one-dimensional (curve) intersection.
    One,
    /// A two-dimensional (area) intersection.
    Two,
}

impl Dimension {
    fn of(dim: usize) -> Self {
        match dim {
            0 => Dimension::Zero,
            1 => Dimension::One,
            _ => Dimension::Two,
        }
    }

    fn symbol(self) -> char {
        match self {
            Dimension::Empty => 'F',
            Dimension::Zero => '0',
            Dimension::One => '1',
            Dimension::Two => '2',
        }
    }
}

/// The 3x3 DE-9IM matrix of intersection dimensions between the
/// interior, boundary and exterior of two geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntersectionMatrix {
    entries: [[Dimension; 3]; 3],
}

impl IntersectionMatrix {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The entry for a pair of locations.
    pub fn get(&self, a: Location, b: Location) -> Dimension {
        self.entries[a.index()][b.index()]
    }

    /// Raises an entry to at least the given dimension.
    pub(crate) fn upgrade(&mut self, a: Location, b: Location, dim: Dimension) {
        let cell = &mut self.entries[a.index()][b.index()];
        *cell = (*cell).max(dim);
    }

    /// Matches the matrix against a nine-character DE-9IM pattern over
    /// the alphabet `T F 0 1 2 *`, row-major from interior to exterior.
    ///
    /// Panics on a malformed pattern; patterns are compiled-in constants,
    /// so a bad one is a programming error.
    pub fn matches(&self, pattern: &str) -> bool {
        assert_eq!(pattern.len(), 9, "DE-9IM pattern must have nine symbols");
        pattern.chars().enumerate().all(|(i, want)| {
            let got = self.entries[i / 3][i % 3];
            match want {
                '*' => true,
                'T' => got != Dimension::Empty,
                'F' => got == Dimension::Empty,
                '0' => got == Dimension::Zero,
                '1' => got == Dimension::One,
                '2' => got == Dimension::Two,
                _ => panic!("invalid DE-9IM pattern symbol {want:?}"),
            }
        })
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.entries {
            for d in row {
                write!(f, "{}", d.symbol())?;
            }
        }
        Ok(())
    }
}

/// Computes the DE-9IM matrix of two operands.
///
/// GeometryCollection operands are rejected: the overlay works on
/// primitive geometries only.
pub(crate) fn relate(a: &Geometry, b: &Geometry) -> Result<IntersectionMatrix, GeometryError> {
    for g in [a, b] {
        if g.geometry_type() == GeometryType::GeometryCollection {
            return Err(GeometryError::MismatchedVariant {
                operation: "relate",
                variant: GeometryType::GeometryCollection,
            });
        }
    }

    let mut m = IntersectionMatrix::new();
    // Both operands are bounded, so their exteriors always share a
    // two-dimensional region of the plane.
    m.upgrade(Location::Exterior, Location::Exterior, Dimension::Two);

    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ok(m),
        (false, true) => {
            fill_one_sided(&mut m, a, true);
            Ok(m)
        }
        (true, false) => {
            fill_one_sided(&mut m, b, false);
            Ok(m)
        }
        (false, false) => dcel::relate_matrix(a, b),
    }
}

/// Fills the matrix rows for a non-empty operand against an empty one.
fn fill_one_sided(m: &mut IntersectionMatrix, g: &Geometry, first_operand: bool) {
    let mut set = |loc: Location, dim: Dimension| {
        if first_operand {
            m.upgrade(loc, Location::Exterior, dim);
        } else {
            m.upgrade(Location::Exterior, loc, dim);
        }
    };
    set(Location::Interior, Dimension::of(g.dimension()));
    let boundary = g.boundary();
    if !boundary.is_empty() {
        set(Location::Boundary, Dimension::of(boundary.dimension()));
    }
}

/// Locates a 2D position relative to a geometry's point set.
pub(crate) fn locate(g: &Geometry, xy: XY) -> Location {
    match g {
        Geometry::Point(p) => {
            if p.xy() == Some(xy) {
                Location::Interior
            } else {
                Location::Exterior
            }
        }
        Geometry::MultiPoint(mp) => {
            if mp.xys().any(|p| p == xy) {
                Location::Interior
            } else {
                Location::Exterior
            }
        }
        Geometry::LineString(ls) => locate_lineal(std::slice::from_ref(ls), &ls.boundary_xys(), xy),
        Geometry::MultiLineString(mls) => {
            locate_lineal(mls.line_strings(), &mls.boundary_xys(), xy)
        }
        Geometry::Polygon(p) => ring_side_to_location(locate_in_polygon(p, xy)),
        Geometry::MultiPolygon(mp) => ring_side_to_location(mp.locate(xy)),
        Geometry::GeometryCollection(gc) => {
            let mut best = Location::Exterior;
            for child in gc.geometries() {
                match locate(child, xy) {
                    Location::Interior => return Location::Interior,
                    Location::Boundary => best = Location::Boundary,
                    Location::Exterior => {}
                }
            }
            best
        }
    }
}

fn locate_lineal(lines: &[LineString], boundary: &[XY], xy: XY) -> Location {
    if boundary.contains(&xy) {
        return Location::Boundary;
    }
    for ls in lines {
        if ls.segments().any(|seg| point_on_segment(xy, seg)) {
            return Location::Interior;
        }
    }
    Location::Exterior
}

fn ring_side_to_location(side: RingSide) -> Location {
    match side {
        RingSide::Interior => Location::Interior,
        RingSide::Boundary => Location::Boundary,
        RingSide::Exterior => Location::Exterior,
    }
}
