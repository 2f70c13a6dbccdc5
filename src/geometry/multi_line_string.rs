//! The MultiLineString variant.

use std::collections::HashMap;

use crate::error::GeometryError;
use crate::geometry::polygon::{segment_relation, SegRelation};
use crate::geometry::{Geometry, LineString};
use crate::primitives::{Segment, XY};

/// A collection of line strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiLineString {
    line_strings: Vec<LineString>,
}

impl MultiLineString {
    /// Creates a multi line string from its members.
    pub fn new(line_strings: Vec<LineString>) -> Self {
        Self { line_strings }
    }

    /// The empty multi line string.
    pub fn empty() -> Self {
        Self { line_strings: Vec::new() }
    }

    /// Returns true if every member is empty.
    pub fn is_empty(&self) -> bool {
        self.line_strings.iter().all(LineString::is_empty)
    }

    /// Number of member line strings.
    #[inline]
    pub fn num_line_strings(&self) -> usize {
        self.line_strings.len()
    }

    /// The i-th member.
    #[inline]
    pub fn line_string_n(&self, i: usize) -> &LineString {
        &self.line_strings[i]
    }

    /// All members.
    #[inline]
    pub fn line_strings(&self) -> &[LineString] {
        &self.line_strings
    }

    /// Every segment of every member.
    pub fn all_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.line_strings.iter().flat_map(|ls| ls.segments())
    }

    /// Simplicity per OGC: every member is simple and members meet only
    /// at points belonging to the boundaries of both.
    pub fn is_simple(&self) -> bool {
        if !self.line_strings.iter().all(LineString::is_simple) {
            return false;
        }
        for i in 0..self.line_strings.len() {
            for j in (i + 1)..self.line_strings.len() {
                let (a, b) = (&self.line_strings[i], &self.line_strings[j]);
                let (ba, bb) = (a.boundary_xys(), b.boundary_xys());
                for sa in a.segments() {
                    for sb in b.segments() {
                        match segment_relation(sa, sb) {
                            SegRelation::Cross => return false,
                            SegRelation::Touch(p) => {
                                if !ba.contains(&p) || !bb.contains(&p) {
                                    return false;
                                }
                            }
                            SegRelation::Disjoint => {}
                        }
                    }
                }
            }
        }
        true
    }

    /// Boundary positions under the mod-2 rule: a position is on the
    /// boundary iff it is an endpoint of an odd number of open members.
    pub(crate) fn boundary_xys(&self) -> Vec<XY> {
        let mut order: Vec<XY> = Vec::new();
        let mut count: HashMap<XY, usize> = HashMap::new();
        for ls in &self.line_strings {
            if ls.is_closed() || ls.is_empty() {
                continue;
            }
            for p in ls.boundary_xys() {
                let c = count.entry(p).or_insert(0);
                if *c == 0 {
                    order.push(p);
                }
                *c += 1;
            }
        }
        order.retain(|p| count[p] % 2 == 1);
        order
    }

    pub(crate) fn transform_xy(&self, f: &dyn Fn(XY) -> XY) -> Result<Self, GeometryError> {
        let line_strings = self
            .line_strings
            .iter()
            .map(|ls| ls.transform_xy(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { line_strings })
    }
}

impl From<MultiLineString> for Geometry {
    fn from(mls: MultiLineString) -> Self {
        Geometry::MultiLineString(mls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ls(xys: &[(f64, f64)]) -> LineString {
        let xys: Vec<XY> = xys.iter().map(|&(x, y)| XY::new(x, y)).collect();
        LineString::from_xys(&xys).unwrap()
    }

    #[test]
    fn test_boundary_mod2() {
        // Three open curves sharing the origin: it is an endpoint an odd
        // number of times, so it stays on the boundary.
        let mls = MultiLineString::new(vec![
            ls(&[(0.0, 0.0), (1.0, 0.0)]),
            ls(&[(0.0, 0.0), (0.0, 1.0)]),
            ls(&[(0.0, 0.0), (-1.0, 0.0)]),
        ]);
        let b = mls.boundary_xys();
        assert!(b.contains(&XY::new(0.0, 0.0)));
        assert_eq!(b.len(), 4);

        // Two curves sharing the origin: even count, interior there.
        let mls = MultiLineString::new(vec![
            ls(&[(0.0, 0.0), (1.0, 0.0)]),
            ls(&[(0.0, 0.0), (0.0, 1.0)]),
        ]);
        let b = mls.boundary_xys();
        assert!(!b.contains(&XY::new(0.0, 0.0)));
        assert_eq!(b, vec![XY::new(1.0, 0.0), XY::new(0.0, 1.0)]);
    }

    #[test]
    fn test_closed_members_have_no_boundary() {
        let mls = MultiLineString::new(vec![ls(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 0.0),
        ])]);
        assert!(mls.boundary_xys().is_empty());
    }

    #[test]
    fn test_is_simple() {
        // Meeting at mutual endpoints is fine.
        let touching = MultiLineString::new(vec![
            ls(&[(0.0, 0.0), (1.0, 1.0)]),
            ls(&[(2.0, 2.0), (1.0, 1.0)]),
        ]);
        assert!(touching.is_simple());

        // Crossing mid-segment is not.
        let crossing = MultiLineString::new(vec![
            ls(&[(0.0, 0.0), (2.0, 2.0)]),
            ls(&[(0.0, 2.0), (2.0, 0.0)]),
        ]);
        assert!(!crossing.is_simple());

        // An endpoint resting on another member's interior is not.
        let t_junction = MultiLineString::new(vec![
            ls(&[(0.0, 0.0), (4.0, 0.0)]),
            ls(&[(2.0, 0.0), (2.0, 3.0)]),
        ]);
        assert!(!t_junction.is_simple());
    }
}
