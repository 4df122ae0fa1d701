use anyhow::ensure;
use itertools::Itertools;
use nalgebra::Point2;

use crate::{
    feature::{Feature, FeatureKind},
    measure::ProgressableFeature,
    misc::{is_progress_in_range, progress_distance, FloatingPoint},
};

use super::DoubleMapper;

/// Build the mapper sending the outline progress of the corners of one shape
/// to the progress of the matching corners of the other.
pub fn feature_mapper<T: FloatingPoint>(
    features1: &[ProgressableFeature<'_, T>],
    features2: &[ProgressableFeature<'_, T>],
) -> anyhow::Result<DoubleMapper<T>> {
    let corners1 = features1
        .iter()
        .filter(|f| f.feature().is_corner())
        .copied()
        .collect_vec();
    let corners2 = features2
        .iter()
        .filter(|f| f.feature().is_corner())
        .copied()
        .collect_vec();

    let mapping = do_mapping(&corners1, &corners2)?;

    #[cfg(feature = "log")]
    log::debug!("feature mapping: {:?}", mapping);

    DoubleMapper::try_new(&mapping)
}

/// Match features greedily, closest pairs first, keeping the matches in cyclic order.
/// Returns `(progress1, progress2)` pairs sorted by `progress1`.
///
/// Without any comparable pair, the identity correspondence is returned.
/// A single pair is completed with the pair half an outline away.
pub fn do_mapping<T: FloatingPoint>(
    features1: &[ProgressableFeature<'_, T>],
    features2: &[ProgressableFeature<'_, T>],
) -> anyhow::Result<Vec<(T, T)>> {
    let candidates = features1
        .iter()
        .enumerate()
        .cartesian_product(features2.iter().enumerate())
        .filter_map(|((i1, f1), (i2, f2))| {
            feature_dist_squared(f1.feature(), f2.feature()).map(|d| (d, i1, i2))
        })
        // sort_by is stable, ties keep the enumeration order
        .sorted_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .collect_vec();

    match candidates.as_slice() {
        [] => Ok(vec![(T::zero(), T::zero()), (T::half(), T::half())]),
        [(_, i1, i2)] => {
            let (p1, p2) = (features1[*i1].progress(), features2[*i2].progress());
            let one = T::one();
            Ok(vec![
                (p1, p2),
                ((p1 + T::half()) % one, (p2 + T::half()) % one),
            ])
        }
        _ => {
            let mut helper = MappingHelper::new();
            for &(_, i1, i2) in candidates.iter() {
                helper.add_mapping(i1, features1[i1].progress(), i2, features2[i2].progress())?;
            }
            Ok(helper.mapping)
        }
    }
}

/// Squared distance between the representative points of two features,
/// or `None` for corners of opposite convexity, which never match.
pub fn feature_dist_squared<T: FloatingPoint>(f1: &Feature<T>, f2: &Feature<T>) -> Option<T> {
    if let (FeatureKind::Corner { convex: c1 }, FeatureKind::Corner { convex: c2 }) =
        (f1.kind(), f2.kind())
    {
        if c1 != c2 {
            return None;
        }
    }
    let p1 = feature_representative_point(f1);
    let p2 = feature_representative_point(f2);
    Some((p1 - p2).norm_squared())
}

/// Midpoint between the start and the end of the feature.
pub fn feature_representative_point<T: FloatingPoint>(feature: &Feature<T>) -> Point2<T> {
    feature.representative_point()
}

/// Accumulated matches, with the indices of the features already used on each side.
struct MappingHelper<T> {
    mapping: Vec<(T, T)>,
    used1: Vec<usize>,
    used2: Vec<usize>,
}

impl<T: FloatingPoint> MappingHelper<T> {
    fn new() -> Self {
        Self {
            mapping: vec![],
            used1: vec![],
            used2: vec![],
        }
    }

    fn add_mapping(&mut self, i1: usize, p1: T, i2: usize, p2: T) -> anyhow::Result<()> {
        if self.used1.contains(&i1) || self.used2.contains(&i2) {
            return Ok(());
        }

        let insertion = self.mapping.partition_point(|(s, _)| *s < p1);
        ensure!(
            self.mapping.get(insertion).map_or(true, |(s, _)| *s != p1),
            "There can't be two features with the same progress"
        );

        let n = self.mapping.len();
        if n >= 1 {
            let (before1, before2) = self.mapping[(insertion + n - 1) % n];
            let (after1, after2) = self.mapping[insertion % n];
            let eps = T::distance_epsilon();
            if progress_distance(p1, before1) < eps
                || progress_distance(p1, after1) < eps
                || progress_distance(p2, before2) < eps
                || progress_distance(p2, after2) < eps
            {
                return Ok(());
            }
            if n > 1 && !is_progress_in_range(p2, before2, after2) {
                return Ok(());
            }
        }

        self.mapping.insert(insertion, (p1, p2));
        self.used1.push(i1);
        self.used2.push(i2);
        Ok(())
    }
}
