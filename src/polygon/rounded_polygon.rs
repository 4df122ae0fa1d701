use anyhow::ensure;
use itertools::Itertools;
use nalgebra::{Matrix3, Point2};
use simba::scalar::SupersetOf;

use crate::{
    bounding_box::BoundingBox,
    curve::CubicBezier,
    feature::{Feature, FeatureKind},
    misc::{is_convex, radial_to_cartesian, FloatingPoint, Transformable},
};

use super::{PolygonOption, RoundedCorner};

/// A closed outline made of corner and edge features,
/// whose corners may be rounded by circular arcs and smoothed into the edges.
///
/// Besides the features, the polygon keeps a flattened list of the non degenerate cubics
/// tracing the outline, starting in the middle of the first corner so that the seam
/// of the closed path lies on a smooth part of the outline.
#[derive(Clone, Debug)]
pub struct RoundedPolygon<T: FloatingPoint> {
    features: Vec<Feature<T>>,
    cubics: Vec<CubicBezier<T>>,
    center: Point2<T>,
}

impl<T: FloatingPoint> RoundedPolygon<T> {
    /// Create a regular polygon with `num_vertices` vertices on a circle of `radius`
    /// around the option's center (origin by default). The first vertex lies on the +x axis.
    /// # Example
    /// ```
    /// use shapemorph::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// let square = RoundedPolygon::try_from_vertex_count(4, 1., PolygonOption::default()).unwrap();
    /// assert_eq!(square.cubics().len(), 4);
    /// assert_relative_eq!(square.cubics()[0].anchor0(), &Point2::new(1., 0.));
    /// ```
    pub fn try_from_vertex_count(
        num_vertices: usize,
        radius: T,
        option: PolygonOption<T>,
    ) -> anyhow::Result<Self> {
        ensure!(
            num_vertices >= 3,
            "Polygons must have at least 3 vertices, got {}",
            num_vertices
        );
        let center = option.center.unwrap_or_else(Point2::origin);
        let n = T::from_usize(num_vertices).unwrap();
        let vertices = (0..num_vertices)
            .map(|i| {
                let angle = T::pi() / n * T::from_usize(2 * i).unwrap();
                center + radial_to_cartesian(radius, angle)
            })
            .collect_vec();
        Self::try_from_vertices(&vertices, option.with_center(center))
    }

    /// Create a polygon from its vertices, rounding each of them as the option describes.
    /// # Failures
    /// - if there are fewer than 3 vertices
    /// - if a per-vertex rounding list is given whose length differs from the number of vertices
    /// # Example
    /// ```
    /// use shapemorph::prelude::*;
    /// use nalgebra::Point2;
    ///
    /// let vertices = [
    ///     Point2::new(0., 0.),
    ///     Point2::new(1., 0.),
    ///     Point2::new(1., 1.),
    ///     Point2::new(0., 1.),
    /// ];
    /// let option = PolygonOption::default().with_rounding(CornerRounding::from_radius(0.25));
    /// let rounded = RoundedPolygon::try_from_vertices(&vertices, option).unwrap();
    /// assert_eq!(rounded.features().len(), 8);
    /// assert_eq!(rounded.center(), &Point2::new(0.5, 0.5));
    /// ```
    pub fn try_from_vertices(
        vertices: &[Point2<T>],
        option: PolygonOption<T>,
    ) -> anyhow::Result<Self> {
        let n = vertices.len();
        ensure!(n >= 3, "Polygons must have at least 3 vertices, got {}", n);
        if let Some(per_vertex) = option.per_vertex_rounding.as_ref() {
            ensure!(
                per_vertex.len() == n,
                "per-vertex rounding list should be the same size as the number of vertices ({}), got {}",
                n,
                per_vertex.len()
            );
        }

        let corners = (0..n)
            .map(|i| {
                RoundedCorner::new(
                    vertices[(i + n - 1) % n],
                    vertices[i],
                    vertices[(i + 1) % n],
                    &option.rounding_at(i),
                )
            })
            .collect_vec();

        // How much of the expected cuts fit on each side: the ratio of the round cut
        // that fits, and the ratio of the smoothing part that fits in what is left.
        let cut_adjusts = (0..n)
            .map(|ix| {
                let (c0, c1) = (&corners[ix], &corners[(ix + 1) % n]);
                let expected_round_cut = c0.expected_round_cut() + c1.expected_round_cut();
                let expected_cut = c0.expected_cut() + c1.expected_cut();
                let side = nalgebra::distance(&vertices[ix], &vertices[(ix + 1) % n]);
                if expected_round_cut > side {
                    #[cfg(feature = "log")]
                    log::trace!("side {} too short for round cuts: {:?} > {:?}", ix, expected_round_cut, side);
                    (side / expected_round_cut, T::zero())
                } else if expected_cut > side {
                    (
                        T::one(),
                        (side - expected_round_cut) / (expected_cut - expected_round_cut),
                    )
                } else {
                    (T::one(), T::one())
                }
            })
            .collect_vec();

        let corner_cubics = corners
            .iter()
            .enumerate()
            .map(|(i, corner)| {
                let allowed = |delta: usize| {
                    let (round_cut_ratio, cut_ratio) = cut_adjusts[(i + n - 1 + delta) % n];
                    corner.expected_round_cut() * round_cut_ratio
                        + (corner.expected_cut() - corner.expected_round_cut()) * cut_ratio
                };
                corner.cubics(allowed(0), allowed(1))
            })
            .collect_vec();

        let mut features = Vec::with_capacity(n * 2);
        for i in 0..n {
            let convex = is_convex(
                &vertices[(i + n - 1) % n],
                &vertices[i],
                &vertices[(i + 1) % n],
            );
            let cubics = &corner_cubics[i];
            let next = &corner_cubics[(i + 1) % n];
            let edge = match (cubics.last(), next.first()) {
                (Some(last), Some(first)) => {
                    CubicBezier::straight_line(*last.anchor1(), *first.anchor0())
                }
                _ => anyhow::bail!("Rounded corners must have at least one cubic"),
            };
            features.push(Feature::try_new(
                FeatureKind::Corner { convex },
                cubics.clone(),
            )?);
            features.push(Feature::edge(edge));
        }

        let center = option.center.unwrap_or_else(|| centroid(vertices.iter()));
        Self::try_new(features, center)
    }

    /// Create a polygon from a list of features forming a closed outline.
    /// The center defaults to the centroid of the start anchors of every feature cubic.
    /// # Failures
    /// - if there are fewer than 2 features
    /// - if the features do not connect into a continuous closed outline
    pub fn try_from_features(
        features: Vec<Feature<T>>,
        center: Option<Point2<T>>,
    ) -> anyhow::Result<Self> {
        ensure!(
            features.len() >= 2,
            "Polygons must have at least 2 features, got {}",
            features.len()
        );
        let center = center.unwrap_or_else(|| {
            centroid(
                features
                    .iter()
                    .flat_map(|f| f.cubics().iter().map(|c| c.anchor0())),
            )
        });
        Self::try_new(features, center)
    }

    fn try_new(features: Vec<Feature<T>>, center: Point2<T>) -> anyhow::Result<Self> {
        let cubics = flatten(&features, &center);
        ensure!(
            cubics
                .iter()
                .circular_tuple_windows()
                .all(|(prev, next)| prev.connects_to(next)),
            "RoundedPolygon must be contiguous, with the anchor points of all curves matching the anchor points of the preceding and succeeding cubics"
        );
        Ok(Self {
            features,
            cubics,
            center,
        })
    }

    pub fn features(&self) -> &[Feature<T>] {
        &self.features
    }

    /// The flattened closed outline.
    pub fn cubics(&self) -> &[CubicBezier<T>] {
        &self.cubics
    }

    pub fn center(&self) -> &Point2<T> {
        &self.center
    }

    /// Compute the bounding box of the outline.
    /// See [`CubicBezier::calculate_bounds`] for the meaning of `approximate`.
    pub fn calculate_bounds(&self, approximate: bool) -> BoundingBox<T> {
        self.cubics
            .iter()
            .map(|c| c.calculate_bounds(approximate))
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| BoundingBox::from_point(self.center))
    }

    /// Compute a square around the center that contains the shape under any rotation
    /// about the center.
    pub fn calculate_max_bounds(&self) -> BoundingBox<T> {
        let max_dist_squared = self
            .cubics
            .iter()
            .flat_map(|c| [*c.anchor0(), c.point_at(T::half())])
            .map(|p| (p - self.center).norm_squared())
            .fold(T::zero(), |a, b| a.max(b));
        let distance = max_dist_squared.sqrt();
        let offset = nalgebra::Vector2::new(distance, distance);
        BoundingBox::new(self.center - offset, self.center + offset)
    }

    /// Map every point of the polygon through `f`, rebuilding and validating the outline.
    pub fn map_points<F: Fn(&Point2<T>) -> Point2<T>>(&self, f: F) -> anyhow::Result<Self> {
        let center = f(&self.center);
        let features = self.features.iter().map(|x| x.map_points(&f)).collect();
        Self::try_new(features, center)
    }

    /// Scale and translate the polygon so that it fits centered in the unit square,
    /// keeping its aspect ratio.
    pub fn normalized(&self) -> anyhow::Result<Self> {
        let bounds = self.calculate_bounds(true);
        let side = bounds.width().max(bounds.height());
        ensure!(side > T::zero(), "Cannot normalize a polygon with empty bounds");
        let two = T::from_usize(2).unwrap();
        let offset_x = (side - bounds.width()) / two - bounds.left();
        let offset_y = (side - bounds.height()) / two - bounds.top();
        self.map_points(|p| Point2::new((p.x + offset_x) / side, (p.y + offset_y) / side))
    }

    /// Cast the polygon to another floating point type.
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> anyhow::Result<RoundedPolygon<F>> {
        let features = self
            .features
            .iter()
            .map(|f| Feature::try_new(f.kind(), f.cubics().iter().map(|c| c.cast()).collect()))
            .collect::<anyhow::Result<Vec<_>>>()?;
        RoundedPolygon::try_new(features, self.center.cast())
    }
}

/// Polygons are equal if their features are.
impl<T: FloatingPoint> PartialEq for RoundedPolygon<T> {
    fn eq(&self, other: &Self) -> bool {
        self.features == other.features
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix3<T>> for RoundedPolygon<T> {
    fn transform(&mut self, transform: &'a Matrix3<T>) {
        self.features
            .iter_mut()
            .for_each(|f| f.transform(transform));
        self.center.transform(transform);
        self.cubics = flatten(&self.features, &self.center);
    }
}

fn centroid<'a, T: FloatingPoint, I: Iterator<Item = &'a Point2<T>>>(points: I) -> Point2<T> {
    let (sum, count) = points.fold((Point2::origin(), 0usize), |(sum, count), p| {
        (sum + p.coords, count + 1)
    });
    if count == 0 {
        sum
    } else {
        sum / T::from_usize(count).unwrap()
    }
}

/// Flatten the features into the list of cubics tracing the outline.
///
/// When the first feature is a rounded corner, the outline starts in the middle of its arc.
/// Zero length cubics are dropped, extending the preceding cubic to keep the outline connected,
/// and the last cubic ends exactly where the first one starts.
/// An outline without any non degenerate cubic becomes a single empty cubic at `center`.
fn flatten<T: FloatingPoint>(features: &[Feature<T>], center: &Point2<T>) -> Vec<CubicBezier<T>> {
    let split = features
        .first()
        .filter(|f| f.cubics().len() == 3)
        .map(|f| {
            let (start, end) = f.cubics()[1].split(T::half());
            (vec![f.cubics()[0], start], vec![end, f.cubics()[2]])
        });

    let runs = match split.as_ref() {
        Some((split_start, split_end)) => std::iter::once(split_end.as_slice())
            .chain(features.iter().skip(1).map(|f| f.cubics()))
            .chain(std::iter::once(split_start.as_slice()))
            .collect_vec(),
        None => features.iter().map(|f| f.cubics()).collect_vec(),
    };

    let mut cubics = vec![];
    let mut first: Option<CubicBezier<T>> = None;
    let mut last: Option<CubicBezier<T>> = None;

    for cubic in runs.into_iter().flatten() {
        if !cubic.is_zero_length() {
            if let Some(last) = last.take() {
                cubics.push(last);
            }
            last = Some(*cubic);
            first.get_or_insert(*cubic);
        } else if let Some(l) = last.as_mut() {
            *l = l.with_anchor1(*cubic.anchor1());
        }
    }

    match (first, last) {
        (Some(first), Some(last)) => cubics.push(last.with_anchor1(*first.anchor0())),
        _ => cubics.push(CubicBezier::empty(*center)),
    }

    cubics
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for RoundedPolygon<T>
where
    T: FloatingPoint + serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RoundedPolygon", 2)?;
        state.serialize_field("features", &self.features)?;
        state.serialize_field("center", &self.center)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for RoundedPolygon<T>
where
    T: FloatingPoint + serde::Deserialize<'de>,
{
    fn deserialize<S>(deserializer: S) -> Result<Self, S::Error>
    where
        S: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};

        #[derive(Debug)]
        enum Field {
            Features,
            Center,
        }

        impl<'de> serde::Deserialize<'de> for Field {
            fn deserialize<S>(deserializer: S) -> Result<Self, S::Error>
            where
                S: serde::Deserializer<'de>,
            {
                struct FieldVisitor;

                impl Visitor<'_> for FieldVisitor {
                    type Value = Field;

                    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                        formatter.write_str("`features` or `center`")
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Field, E>
                    where
                        E: de::Error,
                    {
                        match value {
                            "features" => Ok(Field::Features),
                            "center" => Ok(Field::Center),
                            _ => Err(de::Error::unknown_field(value, FIELDS)),
                        }
                    }
                }

                deserializer.deserialize_identifier(FieldVisitor)
            }
        }

        struct RoundedPolygonVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T> Visitor<'de> for RoundedPolygonVisitor<T>
        where
            T: FloatingPoint + serde::Deserialize<'de>,
        {
            type Value = RoundedPolygon<T>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("struct RoundedPolygon")
            }

            fn visit_map<V>(self, mut map: V) -> Result<Self::Value, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut features = None;
                let mut center = None;
                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Features => {
                            if features.is_some() {
                                return Err(de::Error::duplicate_field("features"));
                            }
                            features = Some(map.next_value()?);
                        }
                        Field::Center => {
                            if center.is_some() {
                                return Err(de::Error::duplicate_field("center"));
                            }
                            center = Some(map.next_value()?);
                        }
                    }
                }
                let features = features.ok_or_else(|| de::Error::missing_field("features"))?;
                let center = center.ok_or_else(|| de::Error::missing_field("center"))?;
                RoundedPolygon::try_new(features, center).map_err(de::Error::custom)
            }
        }

        const FIELDS: &[&str] = &["features", "center"];
        deserializer.deserialize_struct(
            "RoundedPolygon",
            FIELDS,
            RoundedPolygonVisitor(std::marker::PhantomData),
        )
    }
}
