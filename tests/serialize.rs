use approx::assert_relative_eq;
use nalgebra::Point2;
use shapemorph::prelude::*;

#[test]
fn polygon_round_trip() {
    let star = RoundedPolygon::try_star(
        5,
        StarOption::default()
            .with_rounding(CornerRounding::new(0.1, 0.3))
            .with_center(Point2::new(0.5, 0.5)),
    )
    .unwrap();
    let json = serde_json::to_string_pretty(&star).unwrap();
    let restored: RoundedPolygon<f64> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, star);
    assert_eq!(restored.center(), star.center());
    assert_eq!(restored.cubics().len(), star.cubics().len());
    for (a, b) in restored.cubics().iter().zip(star.cubics()) {
        for (p, q) in a.points().iter().zip(b.points().iter()) {
            assert_relative_eq!(p, q, epsilon = 1e-12);
        }
    }
}

#[test]
fn broken_outline_is_rejected() {
    let square =
        RoundedPolygon::try_from_vertex_count(4, 1., PolygonOption::default()).unwrap();
    // two opposite sides, leaving gaps between them
    let sides = vec![square.features()[1].clone(), square.features()[5].clone()];
    let open = serde_json::json!({
        "features": serde_json::to_value(&sides).unwrap(),
        "center": serde_json::to_value(square.center()).unwrap(),
    });
    assert!(serde_json::from_value::<RoundedPolygon<f64>>(open).is_err());
}

#[test]
fn curve_and_feature_round_trip() {
    let cubic = CubicBezier::circular_arc(
        Point2::new(0., 0.),
        Point2::new(1., 0.),
        Point2::new(0., 1.),
    );
    let json = serde_json::to_string(&cubic).unwrap();
    let restored: CubicBezier<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, cubic);

    let feature = Feature::try_concave_corner(vec![cubic]).unwrap();
    let json = serde_json::to_string(&feature).unwrap();
    let restored: Feature<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, feature);
    assert!(restored.is_concave_corner());

    let rounding = CornerRounding::new(0.25, 0.5);
    let json = serde_json::to_string(&rounding).unwrap();
    let restored: CornerRounding<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, rounding);
}
