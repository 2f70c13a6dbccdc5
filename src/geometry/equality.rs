//! Structural (exact) geometry equality.

use crate::geometry::{Coordinates, Geometry, LineString};

/// Options for [`Geometry::equals_exact`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualsExactOpts {
    /// Treat collections as multisets, rings as equal up to rotation and
    /// line strings as equal up to reversal.
    pub ignore_order: bool,
}

impl EqualsExactOpts {
    /// Convenience constructor enabling `ignore_order`.
    pub fn ignore_order() -> Self {
        Self { ignore_order: true }
    }
}

pub(crate) fn equals_exact(a: &Geometry, b: &Geometry, opts: EqualsExactOpts) -> bool {
    match (a, b) {
        (Geometry::Point(a), Geometry::Point(b)) => a == b,
        (Geometry::LineString(a), Geometry::LineString(b)) => line_strings_eq(a, b, opts),
        (Geometry::Polygon(a), Geometry::Polygon(b)) => polygons_eq(a, b, opts),
        (Geometry::MultiPoint(a), Geometry::MultiPoint(b)) => {
            let xs: Vec<Geometry> = (0..a.num_points())
                .map(|i| a.point_n(i).clone().into())
                .collect();
            let ys: Vec<Geometry> = (0..b.num_points())
                .map(|i| b.point_n(i).clone().into())
                .collect();
            elements_eq(&xs, &ys, opts)
        }
        (Geometry::MultiLineString(a), Geometry::MultiLineString(b)) => {
            let xs: Vec<Geometry> = a.line_strings().iter().cloned().map(Into::into).collect();
            let ys: Vec<Geometry> = b.line_strings().iter().cloned().map(Into::into).collect();
            elements_eq(&xs, &ys, opts)
        }
        (Geometry::MultiPolygon(a), Geometry::MultiPolygon(b)) => {
            let xs: Vec<Geometry> = a.polygons().iter().cloned().map(Into::into).collect();
            let ys: Vec<Geometry> = b.polygons().iter().cloned().map(Into::into).collect();
            elements_eq(&xs, &ys, opts)
        }
        (Geometry::GeometryCollection(a), Geometry::GeometryCollection(b)) => {
            elements_eq(a.geometries(), b.geometries(), opts)
        }
        _ => false,
    }
}

fn elements_eq(xs: &[Geometry], ys: &[Geometry], opts: EqualsExactOpts) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    if !opts.ignore_order {
        return xs
            .iter()
            .zip(ys)
            .all(|(x, y)| equals_exact(x, y, opts));
    }
    // Multiset matching.
    let mut used = vec![false; ys.len()];
    'outer: for x in xs {
        for (j, y) in ys.iter().enumerate() {
            if !used[j] && equals_exact(x, y, opts) {
                used[j] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

fn line_strings_eq(a: &LineString, b: &LineString, opts: EqualsExactOpts) -> bool {
    if a.seq() == b.seq() {
        return true;
    }
    opts.ignore_order && *a.seq() == b.seq().reversed()
}

fn polygons_eq(
    a: &crate::geometry::Polygon,
    b: &crate::geometry::Polygon,
    opts: EqualsExactOpts,
) -> bool {
    if a.rings().len() != b.rings().len() {
        return false;
    }
    if a.rings().is_empty() {
        return true;
    }
    if !rings_eq(&a.rings()[0], &b.rings()[0], opts) {
        return false;
    }
    let holes_a = &a.rings()[1..];
    let holes_b = &b.rings()[1..];
    if !opts.ignore_order {
        return holes_a
            .iter()
            .zip(holes_b)
            .all(|(x, y)| rings_eq(x, y, opts));
    }
    let mut used = vec![false; holes_b.len()];
    'outer: for x in holes_a {
        for (j, y) in holes_b.iter().enumerate() {
            if !used[j] && rings_eq(x, y, opts) {
                used[j] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

/// Ring equality; with `ignore_order` the rings may start at different
/// vertices (orientation is already canonical, so no reversal applies).
fn rings_eq(a: &LineString, b: &LineString, opts: EqualsExactOpts) -> bool {
    if a.seq() == b.seq() {
        return true;
    }
    if !opts.ignore_order || a.num_points() != b.num_points() || a.num_points() == 0 {
        return false;
    }
    if a.seq().dim() != b.seq().dim() {
        return false;
    }
    let open_a: Vec<Coordinates> = (0..a.num_points() - 1)
        .map(|i| a.seq().coordinates(i))
        .collect();
    let open_b: Vec<Coordinates> = (0..b.num_points() - 1)
        .map(|i| b.seq().coordinates(i))
        .collect();
    let n = open_a.len();
    (0..n).any(|shift| (0..n).all(|i| open_a[i] == open_b[(i + shift) % n]))
}
