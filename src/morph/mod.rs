mod matching;


use crate::{
    bounding_box::BoundingBox,
    curve::CubicBezier,
    measure::{LengthMeasurer, Measurer},
    misc::FloatingPoint,
    polygon::RoundedPolygon,
};

/// A morph between two rounded polygons.
///
/// The outlines of both shapes are matched into pairs of cubics once, at construction.
/// Any intermediate shape is then obtained by interpolating every pair at the same progress,
/// 0 giving the start shape and 1 the end shape.
#[derive(Clone, Debug)]
pub struct Morph<T: FloatingPoint> {
    start: RoundedPolygon<T>,
    end: RoundedPolygon<T>,
    morph_match: Vec<(CubicBezier<T>, CubicBezier<T>)>,
}

impl<T: FloatingPoint> Morph<T> {
    /// Create a morph between two polygons, matching their outlines by approximate arc length.
    ///
    /// # Arguments
    ///
    /// * `start` - The shape at progress 0
    /// * `end` - The shape at progress 1
    ///
    /// # Returns
    ///
    /// The morph, or an error if the outlines cannot be matched
    ///
    /// # Example
    /// ```
    /// use shapemorph::prelude::*;
    /// use nalgebra::Point2;
    ///
    /// let triangle = RoundedPolygon::try_from_vertex_count(3, 1., PolygonOption::default()).unwrap();
    /// let circle = RoundedPolygon::try_circle(8, 1., Point2::origin()).unwrap();
    /// let morph = Morph::try_new(triangle, circle).unwrap();
    /// let halfway = morph.as_cubics(0.5);
    /// assert_eq!(halfway.first().unwrap().anchor0(), halfway.last().unwrap().anchor1());
    /// ```
    pub fn try_new(start: RoundedPolygon<T>, end: RoundedPolygon<T>) -> anyhow::Result<Self> {
        Self::try_new_with_measurer(start, end, &LengthMeasurer)
    }

    /// Create a morph between two polygons, measuring their outlines with `measurer`.
    pub fn try_new_with_measurer<M: Measurer<T>>(
        start: RoundedPolygon<T>,
        end: RoundedPolygon<T>,
        measurer: &M,
    ) -> anyhow::Result<Self> {
        let morph_match = matching::match_outlines(measurer, &start, &end)?;
        Ok(Self {
            start,
            end,
            morph_match,
        })
    }

    pub fn start(&self) -> &RoundedPolygon<T> {
        &self.start
    }

    pub fn end(&self) -> &RoundedPolygon<T> {
        &self.end
    }

    /// The matched pairs of start and end cubics.
    pub fn morph_match(&self) -> &[(CubicBezier<T>, CubicBezier<T>)] {
        &self.morph_match
    }

    /// Get the outline of the shape at `progress`.
    /// The last cubic ends exactly where the first one starts.
    pub fn as_cubics(&self, progress: T) -> Vec<CubicBezier<T>> {
        let mut cubics = self.cubics(progress).collect::<Vec<_>>();
        let first = cubics.first().map(|c| *c.anchor0());
        if let (Some(first), Some(last)) = (first, cubics.last_mut()) {
            *last = last.with_anchor1(first);
        }
        cubics
    }

    /// Iterate over the cubics of the shape at `progress`, computing them lazily.
    pub fn cubics(&self, progress: T) -> impl Iterator<Item = CubicBezier<T>> + '_ {
        self.morph_match
            .iter()
            .map(move |(start, end)| CubicBezier::interpolate(start, end, progress))
    }

    /// Call `f` with every cubic of the shape at `progress`.
    pub fn for_each_cubic<F: FnMut(&CubicBezier<T>)>(&self, progress: T, mut f: F) {
        self.cubics(progress).for_each(|c| f(&c));
    }

    /// Bounds containing both shapes.
    /// See [`CubicBezier::calculate_bounds`] for the meaning of `approximate`.
    pub fn calculate_bounds(&self, approximate: bool) -> BoundingBox<T> {
        self.start
            .calculate_bounds(approximate)
            .union(&self.end.calculate_bounds(approximate))
    }

    /// Bounds containing both shapes under any rotation about their centers.
    pub fn calculate_max_bounds(&self) -> BoundingBox<T> {
        self.start
            .calculate_max_bounds()
            .union(&self.end.calculate_max_bounds())
    }
}
