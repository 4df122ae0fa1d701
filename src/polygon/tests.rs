use approx::assert_relative_eq;
use nalgebra::{Matrix3, Point2, Vector2};

use crate::{
    curve::{CornerRounding, CubicBezier},
    feature::Feature,
    misc::Transformable,
};

use super::{PillStarOption, PolygonOption, RoundedPolygon, StarOption};

const EPSILON: f64 = 1e-4;

fn assert_cubics_eq(expected: &[CubicBezier<f64>], actual: &[CubicBezier<f64>]) {
    assert_eq!(expected.len(), actual.len());
    for (e, a) in expected.iter().zip(actual.iter()) {
        for (p, q) in e.points().iter().zip(a.points().iter()) {
            assert_relative_eq!(p, q, epsilon = EPSILON);
        }
    }
}

fn assert_in_bounds(cubics: &[CubicBezier<f64>], min: Point2<f64>, max: Point2<f64>) {
    for cubic in cubics {
        for p in cubic.points() {
            assert!(
                min.x - EPSILON <= p.x && p.x <= max.x + EPSILON,
                "{} not in [{}, {}]",
                p.x,
                min.x,
                max.x
            );
            assert!(
                min.y - EPSILON <= p.y && p.y <= max.y + EPSILON,
                "{} not in [{}, {}]",
                p.y,
                min.y,
                max.y
            );
        }
    }
}

fn rounded(radius: f64) -> PolygonOption<f64> {
    PolygonOption::default().with_rounding(CornerRounding::from_radius(radius))
}

fn square() -> RoundedPolygon<f64> {
    RoundedPolygon::try_from_vertex_count(4, 1., PolygonOption::default()).unwrap()
}

fn diamond() -> [Point2<f64>; 4] {
    [
        Point2::new(1., 0.),
        Point2::new(0., 1.),
        Point2::new(-1., 0.),
        Point2::new(0., -1.),
    ]
}

#[test]
fn vertex_count_constructor() {
    assert!(RoundedPolygon::<f64>::try_from_vertex_count(2, 1., PolygonOption::default()).is_err());

    let min = Point2::new(-1., -1.);
    let max = Point2::new(1., 1.);
    assert_in_bounds(square().cubics(), min, max);

    let double = RoundedPolygon::try_from_vertex_count(4, 2., PolygonOption::default()).unwrap();
    assert_in_bounds(double.cubics(), min * 2., max * 2.);

    let rounded_square = RoundedPolygon::try_from_vertex_count(4, 1., rounded(0.1)).unwrap();
    assert_in_bounds(rounded_square.cubics(), min, max);

    let per_vertex = PolygonOption::default()
        .with_per_vertex_rounding(vec![CornerRounding::from_radius(0.1); 4]);
    let pv_square = RoundedPolygon::try_from_vertex_count(4, 1., per_vertex).unwrap();
    assert_in_bounds(pv_square.cubics(), min, max);

    let offset = PolygonOption::default().with_center(Point2::new(1., 2.));
    let offset_square = RoundedPolygon::try_from_vertex_count(4, 1., offset).unwrap();
    assert_in_bounds(offset_square.cubics(), Point2::new(0., 1.), Point2::new(2., 3.));
    assert_eq!(offset_square.center(), &Point2::new(1., 2.));
}

#[test]
fn vertices_constructor() {
    let [p0, p1, p2, p3] = diamond();
    assert!(RoundedPolygon::try_from_vertices(&[p0, p1], PolygonOption::default()).is_err());

    let min = Point2::new(-1., -1.);
    let max = Point2::new(1., 1.);
    let manual = RoundedPolygon::try_from_vertices(&diamond(), PolygonOption::default()).unwrap();
    assert_in_bounds(manual.cubics(), min, max);

    let offset = Vector2::new(1., 2.);
    let moved = RoundedPolygon::try_from_vertices(
        &[p0 + offset, p1 + offset, p2 + offset, p3 + offset],
        PolygonOption::default().with_center(offset.into()),
    )
    .unwrap();
    assert_in_bounds(moved.cubics(), Point2::new(0., 1.), Point2::new(2., 3.));

    let manual_rounded = RoundedPolygon::try_from_vertices(&diamond(), rounded(0.1)).unwrap();
    assert_in_bounds(manual_rounded.cubics(), min, max);
}

#[test]
fn per_vertex_rounding_must_match_vertex_count() {
    let option = PolygonOption::default()
        .with_per_vertex_rounding(vec![CornerRounding::from_radius(0.1); 3]);
    assert!(RoundedPolygon::try_from_vertices(&diamond(), option).is_err());
}

#[test]
fn features_constructor_rejects_too_few_features() {
    assert!(RoundedPolygon::<f64>::try_from_features(vec![], None).is_err());
    let corner = Feature::try_convex_corner(vec![CubicBezier::empty(Point2::<f64>::origin())]).unwrap();
    assert!(RoundedPolygon::try_from_features(vec![corner], None).is_err());
}

#[test]
fn features_constructor_rejects_non_continuous_features() {
    let c1 = CubicBezier::straight_line(Point2::new(0., 0.), Point2::new(1., 0.));
    let c2 = CubicBezier::straight_line(Point2::new(10., 10.), Point2::new(20., 20.));
    assert!(
        RoundedPolygon::try_from_features(vec![Feature::edge(c1), Feature::edge(c2)], None)
            .is_err()
    );
}

fn assert_reconstructs(base: &RoundedPolygon<f64>) {
    let actual = RoundedPolygon::try_from_features(base.features().to_vec(), None).unwrap();
    assert_cubics_eq(base.cubics(), actual.cubics());
    assert_eq!(&actual, base);
}

#[test]
fn features_constructor_reconstructs_shapes() {
    assert_reconstructs(&RoundedPolygon::try_rectangle(2., 2., PolygonOption::default()).unwrap());
    assert_reconstructs(
        &RoundedPolygon::try_rectangle(
            2.,
            2.,
            PolygonOption::default().with_rounding(CornerRounding::new(0.5, 0.2)),
        )
        .unwrap(),
    );
    assert_reconstructs(&RoundedPolygon::try_pill(2., 1., 0., Point2::origin()).unwrap());
    assert_reconstructs(
        &RoundedPolygon::try_pill_star(
            PillStarOption::default().with_rounding(CornerRounding::new(0.5, 0.2)),
        )
        .unwrap(),
    );
}

#[test]
fn features_constructor_reconstructs_circles_and_stars() {
    for n in 3..=20 {
        assert_reconstructs(&RoundedPolygon::try_circle(n, 1., Point2::origin()).unwrap());
        assert_reconstructs(&RoundedPolygon::try_star(n, StarOption::default()).unwrap());
        assert_reconstructs(
            &RoundedPolygon::try_star(
                n,
                StarOption::default().with_rounding(CornerRounding::new(0.5, 0.2)),
            )
            .unwrap(),
        );
    }
}

#[test]
fn compute_center() {
    let polygon = RoundedPolygon::try_from_vertices(
        &[
            Point2::new(0., 0.),
            Point2::new(1., 0.),
            Point2::new(0., 1.),
            Point2::new(1., 1.),
        ],
        PolygonOption::default(),
    )
    .unwrap();
    assert_relative_eq!(polygon.center(), &Point2::new(0.5, 0.5), epsilon = EPSILON);
    assert_relative_eq!(square().center(), &Point2::origin(), epsilon = EPSILON);
}

#[test]
fn rounding_space_usage() {
    let vertices = [Point2::new(0., 0.), Point2::new(1., 0.), Point2::new(0.5, 1.)];
    let option = PolygonOption::default().with_per_vertex_rounding(vec![
        CornerRounding::new(1., 0.),
        CornerRounding::new(1., 1.),
        CornerRounding::unrounded(),
    ]);
    let polygon = RoundedPolygon::try_from_vertices(&vertices, option).unwrap();

    let lower_edge = polygon.features().iter().find(|f| f.is_edge()).unwrap();
    assert_eq!(lower_edge.cubics().len(), 1);
    let edge = &lower_edge.cubics()[0];
    assert_relative_eq!(edge.anchor0(), &Point2::new(0.5, 0.), epsilon = EPSILON);
    assert_relative_eq!(edge.anchor1(), &Point2::new(0.5, 0.), epsilon = EPSILON);
}

/// Round two corners sharing the left side of a 5 x 1 rectangle and check how much of the
/// bottom and left sides they cut.
fn check_uneven_smoothing(
    rounding0: CornerRounding<f64>,
    rounding3: CornerRounding<f64>,
    expected_v0_sx: f64,
    expected_v0_sy: f64,
    expected_v3_sy: f64,
) {
    let vertices = [
        Point2::new(0., 0.),
        Point2::new(5., 0.),
        Point2::new(5., 1.),
        Point2::new(0., 1.),
    ];
    let option = PolygonOption::default().with_per_vertex_rounding(vec![
        rounding0,
        CornerRounding::unrounded(),
        CornerRounding::unrounded(),
        rounding3,
    ]);
    let polygon = RoundedPolygon::try_from_vertices(&vertices, option).unwrap();
    let edges: Vec<_> = polygon.features().iter().filter(|f| f.is_edge()).collect();
    let e01 = &edges[0].cubics()[0];
    let e30 = &edges[3].cubics()[0];

    assert_relative_eq!(expected_v0_sx, e01.anchor0().x, epsilon = EPSILON);
    assert_relative_eq!(expected_v0_sy, e30.anchor1().y, epsilon = EPSILON);
    assert_relative_eq!(expected_v3_sy, 1. - e30.anchor0().y, epsilon = EPSILON);
}

const STEPS: usize = 20;

#[test]
fn uneven_smoothing() {
    for i in 0..=STEPS {
        let smooth = i as f64 / STEPS as f64;
        check_uneven_smoothing(
            CornerRounding::new(0.4, smooth),
            CornerRounding::from_radius(0.5),
            0.4 * (1. + smooth),
            (0.4 * (1. + smooth)).min(0.5),
            0.5,
        );
    }
}

#[test]
fn uneven_smoothing_shares_the_side() {
    for i in 0..=STEPS {
        let smooth = i as f64 / STEPS as f64;
        let wanted_v0 = 0.4 * smooth;
        let wanted_v3 = 0.2;
        let factor = (0.4 / (wanted_v0 + wanted_v3)).min(1.);
        check_uneven_smoothing(
            CornerRounding::new(0.4, smooth),
            CornerRounding::new(0.2, 1.),
            0.4 * (1. + smooth),
            0.4 + factor * wanted_v0,
            0.2 + factor * wanted_v3,
        );
    }
}

#[test]
fn uneven_smoothing_without_room() {
    for i in 0..=STEPS {
        let smooth = i as f64 / STEPS as f64;
        check_uneven_smoothing(
            CornerRounding::new(0.4, smooth),
            CornerRounding::from_radius(0.6),
            0.4 * (1. + smooth),
            0.4,
            0.6,
        );
    }
}

#[test]
fn creating_full_size() {
    let radius = 400.;
    let inner_factor = 0.35;
    let rounding_factor = 0.32;

    let full_size = RoundedPolygon::try_star(
        4,
        StarOption::default()
            .with_radius(radius)
            .with_inner_radius(radius * inner_factor)
            .with_rounding(CornerRounding::from_radius(radius * rounding_factor))
            .with_inner_rounding(CornerRounding::from_radius(radius * rounding_factor))
            .with_center(Point2::new(radius, radius)),
    )
    .unwrap()
    .map_points(|p| Point2::new((p.x - radius) / radius, (p.y - radius) / radius))
    .unwrap();

    let canonical = RoundedPolygon::try_star(
        4,
        StarOption::default()
            .with_inner_radius(inner_factor)
            .with_rounding(CornerRounding::from_radius(rounding_factor))
            .with_inner_rounding(CornerRounding::from_radius(rounding_factor)),
    )
    .unwrap();

    assert_cubics_eq(canonical.cubics(), full_size.cubics());
}

#[test]
fn bounds() {
    let bounds = square().calculate_bounds(true);
    assert_relative_eq!(bounds.left(), -1., epsilon = EPSILON);
    assert_relative_eq!(bounds.top(), -1., epsilon = EPSILON);
    assert_relative_eq!(bounds.right(), 1., epsilon = EPSILON);
    assert_relative_eq!(bounds.bottom(), 1., epsilon = EPSILON);

    let better = square().calculate_bounds(false);
    assert_relative_eq!(better.left(), -1., epsilon = EPSILON);
    assert_relative_eq!(better.right(), 1., epsilon = EPSILON);

    let rounded_square = RoundedPolygon::try_from_vertex_count(4, 1., rounded(0.2)).unwrap();
    let bounds = rounded_square.calculate_bounds(true);
    let better = rounded_square.calculate_bounds(false);
    assert!(better.width() < bounds.width());

    let pentagon = RoundedPolygon::try_from_vertex_count(5, 1., PolygonOption::default()).unwrap();
    let bounds = pentagon.calculate_bounds(true);
    let max_bounds = pentagon.calculate_max_bounds();
    assert!(max_bounds.width() > bounds.width());
}

#[test]
fn transform() {
    let square = square();
    let copy = square.transformed(&Matrix3::identity());
    assert_cubics_eq(square.cubics(), copy.cubics());

    let offset = Vector2::new(1., 2.);
    let moved = square.transformed(&Matrix3::new_translation(&offset));
    let expected: Vec<_> = square
        .cubics()
        .iter()
        .map(|c| c.map_points(|p| p + offset))
        .collect();
    assert_cubics_eq(&expected, moved.cubics());
    assert_relative_eq!(moved.center(), &Point2::new(1., 2.));

    let mapped = square.map_points(|p| p + offset).unwrap();
    assert_cubics_eq(&expected, mapped.cubics());
}

#[test]
fn flattened_cubics_match_features() {
    let square = square();
    let nonzero: Vec<_> = square
        .features()
        .iter()
        .flat_map(|f| f.cubics().iter().copied())
        .filter(|c| !c.is_zero_length())
        .collect();
    assert_cubics_eq(square.cubics(), &nonzero);
}

#[test]
fn flattened_outline_is_closed() {
    let shapes = [
        square(),
        RoundedPolygon::try_from_vertex_count(5, 1., rounded(0.3)).unwrap(),
        RoundedPolygon::try_star(5, StarOption::default().with_rounding(CornerRounding::new(0.1, 0.5)))
            .unwrap(),
    ];
    for shape in shapes.iter() {
        let cubics = shape.cubics();
        for (i, c) in cubics.iter().enumerate() {
            let next = &cubics[(i + 1) % cubics.len()];
            assert_relative_eq!(c.anchor1(), next.anchor0(), epsilon = EPSILON);
        }
        assert_eq!(cubics.last().unwrap().anchor1(), cubics[0].anchor0());
    }
}

#[test]
fn rounded_outline_starts_mid_arc() {
    let polygon = RoundedPolygon::try_from_vertex_count(4, 1., rounded(0.2)).unwrap();
    // the first corner is at (1, 0) and symmetric, so its arc midpoint is on the x axis
    let start = polygon.cubics()[0].anchor0();
    assert_relative_eq!(start.y, 0., epsilon = 1e-9);
    assert!(start.x < 1.);
}

#[test]
fn empty_polygon() {
    let polygon = RoundedPolygon::try_from_vertex_count(6, 0., rounded(0.1)).unwrap();
    assert_eq!(polygon.cubics().len(), 1);

    let scale = Matrix3::new_nonuniform_scaling(&Vector2::new(10., 20.));
    let still_empty = polygon.transformed(&scale);
    assert_eq!(still_empty.cubics().len(), 1);
    assert!(still_empty.cubics()[0].is_zero_length());
}

#[test]
fn empty_side() {
    let poly1 = RoundedPolygon::try_from_vertices(
        &[
            Point2::new(0., 0.),
            Point2::new(1., 0.),
            Point2::new(1., 0.),
            Point2::new(0., 1.),
        ],
        PolygonOption::default(),
    )
    .unwrap();
    let poly2 = RoundedPolygon::try_from_vertices(
        &[Point2::new(0., 0.), Point2::new(1., 0.), Point2::new(0., 1.)],
        PolygonOption::default(),
    )
    .unwrap();
    assert_cubics_eq(poly1.cubics(), poly2.cubics());
}

#[test]
fn normalized_fits_unit_square() {
    let polygon = RoundedPolygon::try_rectangle(
        4.,
        2.,
        PolygonOption::default().with_center(Point2::new(10., -3.)),
    )
    .unwrap();
    let normalized = polygon.normalized().unwrap();
    let bounds = normalized.calculate_bounds(true);
    assert_relative_eq!(bounds.left(), 0., epsilon = 1e-9);
    assert_relative_eq!(bounds.right(), 1., epsilon = 1e-9);
    assert_relative_eq!(bounds.top(), 0.25, epsilon = 1e-9);
    assert_relative_eq!(bounds.bottom(), 0.75, epsilon = 1e-9);
}

fn assert_on_circle(cubics: &[CubicBezier<f64>], radius: f64, center: Point2<f64>) {
    for cubic in cubics {
        for i in 0..=10 {
            let p = cubic.point_at(i as f64 / 10.);
            assert_relative_eq!(nalgebra::distance(&p, &center), radius, epsilon = 0.01);
        }
    }
}

#[test]
fn circle() {
    assert!(RoundedPolygon::try_circle(2, 1., Point2::origin()).is_err());

    for n in [3, 8, 20] {
        let circle = RoundedPolygon::try_circle(n, 1., Point2::origin()).unwrap();
        assert_on_circle(circle.cubics(), 1., Point2::origin());
    }

    let big = RoundedPolygon::try_circle(8, 3., Point2::origin()).unwrap();
    assert_on_circle(big.cubics(), 3., Point2::origin());

    let center = Point2::new(1., 2.);
    let offset = RoundedPolygon::try_circle(8, 1., center).unwrap();
    assert_on_circle(offset.cubics(), 1., center);
}

#[test]
fn star() {
    assert!(RoundedPolygon::try_star(4, StarOption::default().with_inner_radius(0.)).is_err());
    assert!(RoundedPolygon::try_star(4, StarOption::default().with_inner_radius(1.)).is_err());

    let star = RoundedPolygon::<f64>::try_star(4, StarOption::default()).unwrap();
    assert_eq!(star.features().len(), 16);
    for cubic in star.cubics() {
        for p in [cubic.anchor0(), cubic.anchor1()] {
            let d = p.coords.norm();
            assert!(
                (d - 1.).abs() < 0.01 || (d - 0.5).abs() < 0.01,
                "vertex at unexpected distance {}",
                d
            );
        }
    }

    let inner = RoundedPolygon::try_star(
        4,
        StarOption::default()
            .with_rounding(CornerRounding::from_radius(0.1))
            .with_inner_rounding(CornerRounding::unrounded()),
    )
    .unwrap();
    let corners: Vec<_> = inner.features().iter().filter(|f| f.is_corner()).collect();
    assert_eq!(corners[0].cubics().len(), 3);
    assert_eq!(corners[1].cubics().len(), 1);
    assert!(corners[0].is_convex_corner());
    assert!(corners[1].is_concave_corner());
}

#[test]
fn rectangle_and_pill() {
    let rect = RoundedPolygon::try_rectangle(4., 2., PolygonOption::default()).unwrap();
    let bounds = rect.calculate_bounds(false);
    assert_relative_eq!(bounds.width(), 4., epsilon = EPSILON);
    assert_relative_eq!(bounds.height(), 2., epsilon = EPSILON);

    assert!(RoundedPolygon::try_pill(0., 1., 0., Point2::origin()).is_err());
    let pill = RoundedPolygon::try_pill(2., 1., 0., Point2::origin()).unwrap();
    let bounds = pill.calculate_bounds(false);
    assert_relative_eq!(bounds.width(), 2., epsilon = EPSILON);
    assert_relative_eq!(bounds.height(), 1., epsilon = EPSILON);
    // the short sides are half circles, leaving only the long sides straight
    let edges: Vec<_> = pill
        .features()
        .iter()
        .filter(|f| f.is_edge() && !f.cubics()[0].is_zero_length())
        .collect();
    assert_eq!(edges.len(), 2);
}

#[test]
fn pill_star() {
    assert!(RoundedPolygon::try_pill_star(PillStarOption::default().with_size(0., 1.)).is_err());
    assert!(
        RoundedPolygon::try_pill_star(PillStarOption::default().with_inner_radius_ratio(1.5))
            .is_err()
    );

    let option = PillStarOption::<f64>::default().with_num_vertices_per_radius(10);
    let pill_star = RoundedPolygon::try_pill_star(option).unwrap();
    assert_eq!(pill_star.features().len(), 40);
    let bounds = pill_star.calculate_bounds(false);
    assert!(bounds.width() <= 2. + EPSILON);
    assert!(bounds.height() <= 1. + EPSILON);
}
