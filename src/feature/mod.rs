use anyhow::ensure;
use itertools::Itertools;
use nalgebra::{Matrix3, Point2};

use crate::{
    curve::CubicBezier,
    misc::{FloatingPoint, Invertible, Transformable},
};

/// What a run of cubics represents on a polygon outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureKind {
    /// A straight side between two corners.
    Edge,
    /// A (possibly rounded) vertex.
    Corner { convex: bool },
}

/// A contiguous run of cubics on a polygon outline that is either a corner or an edge.
/// Corners are matched between shapes while morphing, edges are ignored.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature<T: FloatingPoint> {
    kind: FeatureKind,
    cubics: Vec<CubicBezier<T>>,
}

impl<T: FloatingPoint> Feature<T> {
    /// Create a feature of the given kind from a continuous list of cubics.
    /// # Failures
    /// - if the list is empty
    /// - if a cubic does not start where the preceding one ends
    pub fn try_new(kind: FeatureKind, cubics: Vec<CubicBezier<T>>) -> anyhow::Result<Self> {
        ensure!(!cubics.is_empty(), "Features need at least one cubic");
        ensure!(
            cubics.iter().tuple_windows().all(|(a, b)| a.connects_to(b)),
            "Feature must be continuous, with the anchor points of all cubics matching the anchor points of the preceding and succeeding cubics"
        );
        Ok(Self { kind, cubics })
    }

    /// Create an edge feature, which is ignored while matching shapes.
    pub fn try_ignorable(cubics: Vec<CubicBezier<T>>) -> anyhow::Result<Self> {
        Self::try_new(FeatureKind::Edge, cubics)
    }

    /// Create an edge made of a single cubic.
    pub fn edge(cubic: CubicBezier<T>) -> Self {
        Self {
            kind: FeatureKind::Edge,
            cubics: vec![cubic],
        }
    }

    pub fn try_convex_corner(cubics: Vec<CubicBezier<T>>) -> anyhow::Result<Self> {
        Self::try_new(FeatureKind::Corner { convex: true }, cubics)
    }

    pub fn try_concave_corner(cubics: Vec<CubicBezier<T>>) -> anyhow::Result<Self> {
        Self::try_new(FeatureKind::Corner { convex: false }, cubics)
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn cubics(&self) -> &[CubicBezier<T>] {
        &self.cubics
    }

    pub fn is_edge(&self) -> bool {
        self.kind == FeatureKind::Edge
    }

    pub fn is_ignorable(&self) -> bool {
        self.is_edge()
    }

    pub fn is_corner(&self) -> bool {
        matches!(self.kind, FeatureKind::Corner { .. })
    }

    pub fn is_convex_corner(&self) -> bool {
        self.kind == FeatureKind::Corner { convex: true }
    }

    pub fn is_concave_corner(&self) -> bool {
        self.kind == FeatureKind::Corner { convex: false }
    }

    /// Midpoint between the start of the first cubic and the end of the last one,
    /// used to compare feature positions across shapes.
    pub fn representative_point(&self) -> Point2<T> {
        let (first, last) = match (self.cubics.first(), self.cubics.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Point2::origin(),
        };
        nalgebra::center(first.anchor0(), last.anchor1())
    }

    /// Map every point of the feature through `f`, keeping its kind.
    pub fn map_points<F: Fn(&Point2<T>) -> Point2<T>>(&self, f: F) -> Self {
        Self {
            kind: self.kind,
            cubics: self.cubics.iter().map(|c| c.map_points(&f)).collect(),
        }
    }
}

/// Reversing a feature reverses its cubics. A corner keeps its kind,
/// but its convexity flips since the outline is now traversed the other way around.
impl<T: FloatingPoint> Invertible for Feature<T> {
    fn invert(&mut self) {
        self.cubics.reverse();
        self.cubics.iter_mut().for_each(|c| c.invert());
        if let FeatureKind::Corner { convex } = self.kind {
            self.kind = FeatureKind::Corner { convex: !convex };
        }
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix3<T>> for Feature<T> {
    fn transform(&mut self, transform: &'a Matrix3<T>) {
        self.cubics.iter_mut().for_each(|c| c.transform(transform));
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> CubicBezier<f64> {
        CubicBezier::straight_line(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    #[test]
    fn cannot_build_empty_features() {
        assert!(Feature::<f64>::try_convex_corner(vec![]).is_err());
        assert!(Feature::<f64>::try_concave_corner(vec![]).is_err());
        assert!(Feature::<f64>::try_ignorable(vec![]).is_err());
    }

    #[test]
    fn cannot_build_non_continuous_features() {
        let cubics = vec![line(0., 0., 1., 1.), line(10., 10., 11., 11.)];
        assert!(Feature::try_convex_corner(cubics.clone()).is_err());
        assert!(Feature::try_concave_corner(cubics.clone()).is_err());
        assert!(Feature::try_ignorable(cubics).is_err());
    }

    #[test]
    fn builds_concave_corner() {
        let cubic = line(0., 0., 1., 0.);
        let f = Feature::try_concave_corner(vec![cubic]).unwrap();
        assert!(f.is_concave_corner());
        assert!(!f.is_convex_corner());
        assert!(!f.is_edge());
        assert!(!f.is_ignorable());
        assert_eq!(f.cubics(), &[cubic]);
    }

    #[test]
    fn builds_convex_corner() {
        let cubic = line(0., 0., 1., 0.);
        let f = Feature::try_convex_corner(vec![cubic]).unwrap();
        assert!(f.is_convex_corner());
        assert!(!f.is_concave_corner());
        assert!(f.is_corner());
        assert!(!f.is_ignorable());
        assert_eq!(f.cubics(), &[cubic]);
    }

    #[test]
    fn builds_edge() {
        let cubic = line(0., 0., 1., 0.);
        for f in [
            Feature::edge(cubic),
            Feature::try_ignorable(vec![cubic]).unwrap(),
        ] {
            assert!(f.is_edge());
            assert!(f.is_ignorable());
            assert!(!f.is_convex_corner());
            assert!(!f.is_concave_corner());
            assert_eq!(f.cubics(), &[cubic]);
        }
    }

    #[test]
    fn reversed_corner_flips_convexity() {
        let f = Feature::try_convex_corner(vec![line(0., 0., 1., 0.), line(1., 0., 1., 1.)])
            .unwrap();
        let r = f.inverse();
        assert!(r.is_concave_corner());
        assert_eq!(r.cubics()[0].anchor0(), &Point2::new(1., 1.));
        assert_eq!(r.cubics()[1].anchor1(), &Point2::new(0., 0.));
        assert_eq!(r.inverse(), f);
    }

    #[test]
    fn representative_point() {
        let f = Feature::try_convex_corner(vec![line(0., 0., 1., 0.), line(1., 0., 1., 1.)])
            .unwrap();
        assert_eq!(f.representative_point(), Point2::new(0.5, 0.5));
    }
}
