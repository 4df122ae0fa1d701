use anyhow::ensure;
use itertools::Itertools;
use nalgebra::{Point2, Vector2};

use crate::{
    curve::CornerRounding,
    misc::{radial_to_cartesian, FloatingPoint},
};

use super::{PillStarOption, PolygonOption, RoundedPolygon, StarOption};

impl<T: FloatingPoint> RoundedPolygon<T> {
    /// Create a circle approximated by `num_vertices` rounded corners.
    /// The underlying polygon is sized so that its rounded corners lie on the circle.
    /// # Example
    /// ```
    /// use shapemorph::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// let circle = RoundedPolygon::try_circle(8, 2., Point2::origin()).unwrap();
    /// for cubic in circle.cubics() {
    ///     assert_relative_eq!(cubic.anchor0().coords.norm(), 2., epsilon = 1e-4);
    /// }
    /// ```
    pub fn try_circle(num_vertices: usize, radius: T, center: Point2<T>) -> anyhow::Result<Self> {
        ensure!(
            num_vertices >= 3,
            "Circle must have at least three vertices, got {}",
            num_vertices
        );
        // half of the angle between two adjacent vertices
        let theta = T::pi() / T::from_usize(num_vertices).unwrap();
        let polygon_radius = radius / theta.cos();
        Self::try_from_vertex_count(
            num_vertices,
            polygon_radius,
            PolygonOption::default()
                .with_rounding(CornerRounding::from_radius(radius))
                .with_center(center),
        )
    }

    /// Create an axis aligned rectangle of the given size around the option's center.
    pub fn try_rectangle(width: T, height: T, option: PolygonOption<T>) -> anyhow::Result<Self> {
        let center = option.center.unwrap_or_else(Point2::origin);
        let half_width = width * T::half();
        let half_height = height * T::half();
        let vertices = [
            center + Vector2::new(half_width, half_height),
            center + Vector2::new(-half_width, half_height),
            center + Vector2::new(-half_width, -half_height),
            center + Vector2::new(half_width, -half_height),
        ];
        Self::try_from_vertices(&vertices, option.with_center(center))
    }

    /// Create a star with `num_vertices_per_radius` outer vertices,
    /// alternating with as many inner vertices.
    /// # Failures
    /// - if either radius is not positive
    /// - if the inner radius is not smaller than the outer one
    pub fn try_star(num_vertices_per_radius: usize, option: StarOption<T>) -> anyhow::Result<Self> {
        ensure!(
            option.radius > T::zero() && option.inner_radius > T::zero(),
            "Star radii must both be greater than 0"
        );
        ensure!(
            option.inner_radius < option.radius,
            "inner radius must be less than radius"
        );

        let n = T::from_usize(num_vertices_per_radius).unwrap();
        let vertices = (0..num_vertices_per_radius)
            .flat_map(|i| {
                let i = T::from_usize(i).unwrap();
                let two = T::from_usize(2).unwrap();
                [
                    option.center + radial_to_cartesian(option.radius, T::pi() / n * two * i),
                    option.center
                        + radial_to_cartesian(option.inner_radius, T::pi() / n * (two * i + T::one())),
                ]
            })
            .collect_vec();

        let per_vertex_rounding = alternate_rounding(
            num_vertices_per_radius,
            option.rounding,
            option.inner_rounding,
            option.per_vertex_rounding,
        );
        Self::try_from_vertices(
            &vertices,
            PolygonOption {
                rounding: option.rounding,
                per_vertex_rounding,
                center: Some(option.center),
            },
        )
    }

    /// Create a pill: a rectangle whose shorter sides are fully rounded into half circles.
    pub fn try_pill(width: T, height: T, smoothing: T, center: Point2<T>) -> anyhow::Result<Self> {
        ensure!(
            width > T::zero() && height > T::zero(),
            "Pill shapes must have positive width and height"
        );
        let half_width = width * T::half();
        let half_height = height * T::half();
        Self::try_rectangle(
            width,
            height,
            PolygonOption::default()
                .with_rounding(CornerRounding::new(half_width.min(half_height), smoothing))
                .with_center(center),
        )
    }

    /// Create a star whose vertices are distributed along the outline of a pill.
    /// # Failures
    /// - if the size is not positive
    /// - if the inner radius ratio is not in `(0, 1]`
    pub fn try_pill_star(option: PillStarOption<T>) -> anyhow::Result<Self> {
        ensure!(
            option.width > T::zero() && option.height > T::zero(),
            "Pill shapes must have positive width and height"
        );
        ensure!(
            option.inner_radius_ratio > T::zero() && option.inner_radius_ratio <= T::one(),
            "inner radius ratio must be between 0 and 1"
        );

        let vertices = pill_star_vertices(&option);
        let per_vertex_rounding = alternate_rounding(
            option.num_vertices_per_radius,
            option.rounding,
            option.inner_rounding,
            option.per_vertex_rounding,
        );
        Self::try_from_vertices(
            &vertices,
            PolygonOption {
                rounding: option.rounding,
                per_vertex_rounding,
                center: Some(option.center),
            },
        )
    }
}

/// Expand an inner rounding into a per-vertex list alternating outer and inner roundings,
/// unless an explicit per-vertex list is given.
fn alternate_rounding<T: FloatingPoint>(
    num_vertices_per_radius: usize,
    rounding: CornerRounding<T>,
    inner_rounding: Option<CornerRounding<T>>,
    per_vertex_rounding: Option<Vec<CornerRounding<T>>>,
) -> Option<Vec<CornerRounding<T>>> {
    per_vertex_rounding.or_else(|| {
        inner_rounding.map(|inner| {
            (0..num_vertices_per_radius)
                .flat_map(|_| [rounding, inner])
                .collect()
        })
    })
}

/// Walk along the pill outline, placing vertices at equal steps and alternating
/// between the outer and the inner radius.
///
/// The outline is split into sections starting on the right side at mid height:
/// half the right side, the bottom right end cap quarter, the bottom side,
/// the bottom left quarter, the left side, the top left quarter, the top side,
/// the top right quarter and the other half of the right side.
fn pill_star_vertices<T: FloatingPoint>(option: &PillStarOption<T>) -> Vec<Point2<T>> {
    let zero = T::zero();
    let two = T::from_usize(2).unwrap();
    let four = T::from_usize(4).unwrap();
    let frac_pi_2 = T::frac_pi_2();

    let PillStarOption {
        width,
        height,
        num_vertices_per_radius,
        inner_radius_ratio,
        vertex_spacing,
        start_location,
        center,
        ..
    } = *option;

    let endcap_radius = width.min(height) / two;
    let v_seg_len = (height - width).max(zero);
    let h_seg_len = (width - height).max(zero);
    let v_seg_half = v_seg_len / two;
    let h_seg_half = h_seg_len / two;

    let spacing_ratio = inner_radius_ratio + (T::one() - inner_radius_ratio) * vertex_spacing;
    let circle_perimeter = T::two_pi() * endcap_radius * spacing_ratio;
    let perimeter = two * h_seg_len + two * v_seg_len + circle_perimeter;

    let quarter = circle_perimeter / four;
    let lengths = [
        v_seg_half, quarter, h_seg_len, quarter, v_seg_len, quarter, h_seg_len, quarter,
        v_seg_half,
    ];
    let mut sections = Vec::with_capacity(lengths.len() + 2);
    sections.push(zero);
    for length in lengths {
        let last = sections.last().copied().unwrap_or(zero);
        sections.push(last + length);
    }
    sections.push(perimeter);
    let section_count = sections.len();

    let t_per_vertex = perimeter / T::from_usize(2 * num_vertices_per_radius).unwrap();

    let rect_br = Vector2::new(h_seg_half, v_seg_half);
    let rect_bl = Vector2::new(-h_seg_half, v_seg_half);
    let rect_tl = Vector2::new(-h_seg_half, -v_seg_half);
    let rect_tr = Vector2::new(h_seg_half, -v_seg_half);

    let mut inner = false;
    let mut section = 0;
    let mut section_start = sections[0];
    let mut section_end = sections[1];
    let mut t = start_location * perimeter;
    let mut vertices = Vec::with_capacity(num_vertices_per_radius * 2);

    for _ in 0..num_vertices_per_radius * 2 {
        let bounded_t = t % perimeter;
        if bounded_t < section_start {
            section = 0;
            section_start = sections[0];
            section_end = sections[1];
        }
        while bounded_t >= sections[(section + 1) % section_count] {
            section = (section + 1) % section_count;
            section_start = sections[section];
            section_end = sections[(section + 1) % section_count];
        }

        let t_in_section = bounded_t - section_start;
        let section_length = section_end - section_start;
        let proportion = if section_length <= T::distance_epsilon() {
            zero
        } else {
            t_in_section / section_length
        };

        let radius = if inner {
            endcap_radius * inner_radius_ratio
        } else {
            endcap_radius
        };

        let quarter_arc = |start_angle: T| proportion * frac_pi_2 + start_angle;
        let vertex = match section {
            0 => Vector2::new(radius, proportion * v_seg_half),
            1 => radial_to_cartesian(radius, quarter_arc(zero)) + rect_br,
            2 => Vector2::new(h_seg_half - proportion * h_seg_len, radius),
            3 => radial_to_cartesian(radius, quarter_arc(frac_pi_2)) + rect_bl,
            4 => Vector2::new(-radius, v_seg_half - proportion * v_seg_len),
            5 => radial_to_cartesian(radius, quarter_arc(T::pi())) + rect_tl,
            6 => Vector2::new(-h_seg_half + proportion * h_seg_len, -radius),
            7 => radial_to_cartesian(radius, quarter_arc(T::pi() + frac_pi_2)) + rect_tr,
            _ => Vector2::new(radius, -v_seg_half + proportion * v_seg_half),
        };
        vertices.push(center + vertex);

        t += t_per_vertex;
        inner = !inner;
    }

    vertices
}
