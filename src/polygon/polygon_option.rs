use nalgebra::Point2;

use crate::{curve::CornerRounding, misc::FloatingPoint};

/// Options for building a rounded polygon from vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonOption<T: FloatingPoint> {
    /// Rounding applied to every vertex unless `per_vertex_rounding` is given
    pub rounding: CornerRounding<T>,
    /// Rounding for each vertex, in vertex order
    pub per_vertex_rounding: Option<Vec<CornerRounding<T>>>,
    /// Center of the shape, defaults to the centroid of the vertices
    pub center: Option<Point2<T>>,
}

impl<T: FloatingPoint> Default for PolygonOption<T> {
    fn default() -> Self {
        Self {
            rounding: CornerRounding::unrounded(),
            per_vertex_rounding: None,
            center: None,
        }
    }
}

impl<T: FloatingPoint> PolygonOption<T> {
    pub fn with_rounding(mut self, rounding: CornerRounding<T>) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_per_vertex_rounding(mut self, per_vertex_rounding: Vec<CornerRounding<T>>) -> Self {
        self.per_vertex_rounding = Some(per_vertex_rounding);
        self
    }

    pub fn with_center(mut self, center: Point2<T>) -> Self {
        self.center = Some(center);
        self
    }

    /// Rounding of the vertex at `index`.
    pub(crate) fn rounding_at(&self, index: usize) -> CornerRounding<T> {
        self.per_vertex_rounding
            .as_ref()
            .and_then(|r| r.get(index).copied())
            .unwrap_or(self.rounding)
    }
}

/// Options for building a star with alternating outer and inner vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct StarOption<T: FloatingPoint> {
    pub radius: T,
    pub inner_radius: T,
    pub rounding: CornerRounding<T>,
    /// Rounding of the inner vertices, `rounding` is used when not given
    pub inner_rounding: Option<CornerRounding<T>>,
    /// Rounding for each vertex, outer and inner alternating, starting with an outer one.
    /// Takes precedence over `rounding` and `inner_rounding`
    pub per_vertex_rounding: Option<Vec<CornerRounding<T>>>,
    pub center: Point2<T>,
}

impl<T: FloatingPoint> Default for StarOption<T> {
    fn default() -> Self {
        Self {
            radius: T::one(),
            inner_radius: T::half(),
            rounding: CornerRounding::unrounded(),
            inner_rounding: None,
            per_vertex_rounding: None,
            center: Point2::origin(),
        }
    }
}

impl<T: FloatingPoint> StarOption<T> {
    pub fn with_radius(mut self, radius: T) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_inner_radius(mut self, inner_radius: T) -> Self {
        self.inner_radius = inner_radius;
        self
    }

    pub fn with_rounding(mut self, rounding: CornerRounding<T>) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_inner_rounding(mut self, inner_rounding: CornerRounding<T>) -> Self {
        self.inner_rounding = Some(inner_rounding);
        self
    }

    pub fn with_per_vertex_rounding(mut self, per_vertex_rounding: Vec<CornerRounding<T>>) -> Self {
        self.per_vertex_rounding = Some(per_vertex_rounding);
        self
    }

    pub fn with_center(mut self, center: Point2<T>) -> Self {
        self.center = center;
        self
    }
}

/// Options for building a star whose vertices are laid out along a pill shaped outline.
#[derive(Clone, Debug, PartialEq)]
pub struct PillStarOption<T: FloatingPoint> {
    pub width: T,
    pub height: T,
    pub num_vertices_per_radius: usize,
    /// Ratio of the inner vertices' distance to the outer ones', in `(0, 1]`
    pub inner_radius_ratio: T,
    pub rounding: CornerRounding<T>,
    pub inner_rounding: Option<CornerRounding<T>>,
    pub per_vertex_rounding: Option<Vec<CornerRounding<T>>>,
    /// How vertices on the round ends are spaced:
    /// 0 spaces them evenly along the inner radius, 1 along the outer radius
    pub vertex_spacing: T,
    /// Where along the outline the first vertex is placed, as a fraction of the perimeter
    pub start_location: T,
    pub center: Point2<T>,
}

impl<T: FloatingPoint> Default for PillStarOption<T> {
    fn default() -> Self {
        Self {
            width: T::from_usize(2).unwrap(),
            height: T::one(),
            num_vertices_per_radius: 8,
            inner_radius_ratio: T::half(),
            rounding: CornerRounding::unrounded(),
            inner_rounding: None,
            per_vertex_rounding: None,
            vertex_spacing: T::half(),
            start_location: T::zero(),
            center: Point2::origin(),
        }
    }
}

impl<T: FloatingPoint> PillStarOption<T> {
    pub fn with_size(mut self, width: T, height: T) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_num_vertices_per_radius(mut self, num_vertices_per_radius: usize) -> Self {
        self.num_vertices_per_radius = num_vertices_per_radius;
        self
    }

    pub fn with_inner_radius_ratio(mut self, inner_radius_ratio: T) -> Self {
        self.inner_radius_ratio = inner_radius_ratio;
        self
    }

    pub fn with_rounding(mut self, rounding: CornerRounding<T>) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_inner_rounding(mut self, inner_rounding: CornerRounding<T>) -> Self {
        self.inner_rounding = Some(inner_rounding);
        self
    }

    pub fn with_per_vertex_rounding(mut self, per_vertex_rounding: Vec<CornerRounding<T>>) -> Self {
        self.per_vertex_rounding = Some(per_vertex_rounding);
        self
    }

    pub fn with_vertex_spacing(mut self, vertex_spacing: T) -> Self {
        self.vertex_spacing = vertex_spacing;
        self
    }

    pub fn with_start_location(mut self, start_location: T) -> Self {
        self.start_location = start_location;
        self
    }

    pub fn with_center(mut self, center: Point2<T>) -> Self {
        self.center = center;
        self
    }
}
