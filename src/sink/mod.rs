use nalgebra::Point2;

use crate::{curve::CubicBezier, misc::FloatingPoint, morph::Morph, polygon::RoundedPolygon};

/// Receiver of closed outlines made of cubic curves,
/// e.g. a path builder of a rendering backend.
pub trait CurveSink<T: FloatingPoint> {
    /// Start a new contour at `start`.
    fn begin_contour(&mut self, start: &Point2<T>);

    /// Append a cubic curve from the current point to `end`.
    fn cubic_to(&mut self, control0: &Point2<T>, control1: &Point2<T>, end: &Point2<T>);

    /// Close the current contour.
    fn end_contour(&mut self);
}

/// Shapes that can emit their outline into a [`CurveSink`].
pub trait DrawContour<T: FloatingPoint> {
    fn draw<S: CurveSink<T>>(&self, sink: &mut S);
}

/// Emit a contour made of `cubics`. Nothing is emitted for an empty list.
pub fn draw_cubics<'a, T, S, I>(cubics: I, sink: &mut S)
where
    T: FloatingPoint + 'a,
    S: CurveSink<T>,
    I: IntoIterator<Item = &'a CubicBezier<T>>,
{
    let mut iter = cubics.into_iter().peekable();
    let Some(first) = iter.peek() else {
        return;
    };
    sink.begin_contour(first.anchor0());
    for cubic in iter {
        sink.cubic_to(cubic.control0(), cubic.control1(), cubic.anchor1());
    }
    sink.end_contour();
}

impl<T: FloatingPoint> DrawContour<T> for RoundedPolygon<T> {
    fn draw<S: CurveSink<T>>(&self, sink: &mut S) {
        draw_cubics(self.cubics(), sink);
    }
}

impl<T: FloatingPoint> Morph<T> {
    /// Emit the outline of the shape at `progress`.
    pub fn draw<S: CurveSink<T>>(&self, progress: T, sink: &mut S) {
        draw_cubics(self.as_cubics(progress).iter(), sink);
    }
}

/// A recorded drawing command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand<T: FloatingPoint> {
    MoveTo(Point2<T>),
    CubicTo {
        control0: Point2<T>,
        control1: Point2<T>,
        end: Point2<T>,
    },
    Close,
}

/// Records the commands, in order.
impl<T: FloatingPoint> CurveSink<T> for Vec<PathCommand<T>> {
    fn begin_contour(&mut self, start: &Point2<T>) {
        self.push(PathCommand::MoveTo(*start));
    }

    fn cubic_to(&mut self, control0: &Point2<T>, control1: &Point2<T>, end: &Point2<T>) {
        self.push(PathCommand::CubicTo {
            control0: *control0,
            control1: *control1,
            end: *end,
        });
    }

    fn end_contour(&mut self) {
        self.push(PathCommand::Close);
    }
}
