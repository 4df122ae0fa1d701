use crate::{
    curve::CubicBezier,
    mapping::feature_mapper,
    measure::{MeasuredCubic, MeasuredPolygon, Measurer},
    misc::{positive_modulo, FloatingPoint},
    polygon::RoundedPolygon,
};

/// Pair up the cubics of two outlines so that matching corners morph into each other.
///
/// Both outlines are measured and their corners mapped. The second outline is rotated
/// to start where the start of the first one maps to, then both are walked together,
/// cutting whichever cubic reaches further so that each pair covers the same span of progress.
/// The last cubic of either outline is only consumed together with the last cubic of the other,
/// so a sliver left at the end of one outline still gets a partner.
pub(crate) fn match_outlines<T: FloatingPoint, M: Measurer<T>>(
    measurer: &M,
    p1: &RoundedPolygon<T>,
    p2: &RoundedPolygon<T>,
) -> anyhow::Result<Vec<(CubicBezier<T>, CubicBezier<T>)>> {
    let measured1 = MeasuredPolygon::try_measure(measurer, p1)?;
    let measured2 = MeasuredPolygon::try_measure(measurer, p2)?;

    let mapper = feature_mapper(measured1.features(), measured2.features())?;
    let cut_point = mapper.map(T::zero())?;

    #[cfg(feature = "log")]
    log::debug!("cutting the end outline at progress {:?}", cut_point);

    let bs1 = measured1;
    let bs2 = measured2.cut_and_shift(cut_point)?;

    let one = T::one();
    let eps = T::angle_epsilon();
    let mut matched = vec![];

    let mut i1 = 0;
    let mut i2 = 0;
    let mut b1: Option<MeasuredCubic<T>> = next(&bs1, &mut i1);
    let mut b2: Option<MeasuredCubic<T>> = next(&bs2, &mut i2);

    while let (Some(c1), Some(c2)) = (b1, b2) {
        let last1 = i1 == bs1.len();
        let last2 = i2 == bs2.len();
        let b1a = if last1 {
            one
        } else {
            c1.end_outline_progress()
        };
        let b2a = if last2 {
            one
        } else {
            mapper.map_back(positive_modulo(c2.end_outline_progress() + cut_point, one))?
        };
        let minb = b1a.min(b2a);

        let (seg1, rest1) = if b1a > minb + eps || (last1 && !last2) {
            let (seg, rest) = c1.cut_at_progress(measurer, minb)?;
            (seg, Some(rest))
        } else {
            (c1, next(&bs1, &mut i1))
        };

        let (seg2, rest2) = if b2a > minb + eps || (last2 && !last1) {
            let target = positive_modulo(mapper.map(minb)? - cut_point, one);
            let (seg, rest) = c2.cut_at_progress(measurer, target)?;
            (seg, Some(rest))
        } else {
            (c2, next(&bs2, &mut i2))
        };

        matched.push((*seg1.cubic(), *seg2.cubic()));
        b1 = rest1;
        b2 = rest2;
    }

    anyhow::ensure!(
        b1.is_none() && b2.is_none(),
        "Expected both polygon's cubics to be fully matched"
    );

    #[cfg(feature = "log")]
    log::debug!("matched {} pairs of cubics", matched.len());

    Ok(matched)
}

fn next<T: FloatingPoint, M: Measurer<T>>(
    polygon: &MeasuredPolygon<'_, T, M>,
    index: &mut usize,
) -> Option<MeasuredCubic<T>> {
    let cubic = polygon.get(*index).copied();
    *index += 1;
    cubic
}
