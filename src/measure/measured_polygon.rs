use anyhow::{anyhow, ensure};
use itertools::Itertools;

use crate::{
    curve::CubicBezier,
    feature::Feature,
    misc::{positive_modulo, FloatingPoint},
    polygon::RoundedPolygon,
};

use super::Measurer;

/// A feature together with its position on the outline, as outline progress in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressableFeature<'a, T: FloatingPoint> {
    progress: T,
    feature: &'a Feature<T>,
}

impl<'a, T: FloatingPoint> ProgressableFeature<'a, T> {
    pub fn new(progress: T, feature: &'a Feature<T>) -> Self {
        Self { progress, feature }
    }

    pub fn progress(&self) -> T {
        self.progress
    }

    pub fn feature(&self) -> &'a Feature<T> {
        self.feature
    }
}

/// A cubic of a measured outline, with its measure and the range of outline progress it covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasuredCubic<T: FloatingPoint> {
    cubic: CubicBezier<T>,
    measured_size: T,
    start_outline_progress: T,
    end_outline_progress: T,
}

impl<T: FloatingPoint> MeasuredCubic<T> {
    pub fn try_new<M: Measurer<T>>(
        measurer: &M,
        cubic: CubicBezier<T>,
        start_outline_progress: T,
        end_outline_progress: T,
    ) -> anyhow::Result<Self> {
        ensure!(
            end_outline_progress >= start_outline_progress,
            "end outline progress {:?} is expected to be equal or greater than start outline progress {:?}",
            end_outline_progress,
            start_outline_progress
        );
        let measured_size = measurer.measure_cubic(&cubic);
        ensure!(
            measured_size >= T::zero(),
            "Measured cubic is expected to be greater or equal to zero"
        );
        Ok(Self {
            cubic,
            measured_size,
            start_outline_progress,
            end_outline_progress,
        })
    }

    pub fn cubic(&self) -> &CubicBezier<T> {
        &self.cubic
    }

    pub fn measured_size(&self) -> T {
        self.measured_size
    }

    pub fn start_outline_progress(&self) -> T {
        self.start_outline_progress
    }

    pub fn end_outline_progress(&self) -> T {
        self.end_outline_progress
    }

    /// Get a copy covering another range of outline progress.
    pub fn with_progress_range(&self, start: T, end: T) -> anyhow::Result<Self> {
        ensure!(
            end >= start,
            "end outline progress {:?} is expected to be equal or greater than start outline progress {:?}",
            end,
            start
        );
        Ok(Self {
            start_outline_progress: start,
            end_outline_progress: end,
            ..*self
        })
    }

    /// Cut the cubic at the given outline progress, clamped to the range this cubic covers.
    /// Returns the parts before and after the cut.
    pub fn cut_at_progress<M: Measurer<T>>(
        &self,
        measurer: &M,
        cut_outline_progress: T,
    ) -> anyhow::Result<(Self, Self)> {
        let bounded = cut_outline_progress
            .clamp(self.start_outline_progress, self.end_outline_progress);
        let size = self.end_outline_progress - self.start_outline_progress;

        let (c1, c2) = if size <= T::zero() {
            (self.cubic, self.cubic)
        } else {
            let relative = (bounded - self.start_outline_progress) / size;
            let t = measurer.find_cubic_cut_point(&self.cubic, relative * self.measured_size);
            ensure!(
                T::zero() <= t && t <= T::one(),
                "Cubic cut point is expected to be between 0 and 1, got {:?}",
                t
            );
            self.cubic.split(t)
        };

        Ok((
            Self::try_new(measurer, c1, self.start_outline_progress, bounded)?,
            Self::try_new(measurer, c2, bounded, self.end_outline_progress)?,
        ))
    }
}

/// A polygon outline whose cubics are parametrized by outline progress,
/// the fraction of the total measure from the start of the outline.
/// Corner features are located by the progress of their middle.
pub struct MeasuredPolygon<'a, T: FloatingPoint, M: Measurer<T>> {
    measurer: &'a M,
    cubics: Vec<MeasuredCubic<T>>,
    features: Vec<ProgressableFeature<'a, T>>,
}

impl<'a, T: FloatingPoint, M: Measurer<T>> MeasuredPolygon<'a, T, M> {
    /// Measure the cubics of every feature of the polygon.
    pub fn try_measure(measurer: &'a M, polygon: &'a RoundedPolygon<T>) -> anyhow::Result<Self> {
        let mut cubics = vec![];
        let mut feature_to_cubic = vec![];

        for feature in polygon.features() {
            let middle = feature.cubics().len() / 2;
            for (index, cubic) in feature.cubics().iter().enumerate() {
                if feature.is_corner() && index == middle {
                    feature_to_cubic.push((feature, cubics.len()));
                }
                cubics.push(*cubic);
            }
        }

        let mut measures = Vec::with_capacity(cubics.len() + 1);
        measures.push(T::zero());
        for cubic in cubics.iter() {
            let size = measurer.measure_cubic(cubic);
            ensure!(
                size >= T::zero(),
                "Measured cubic is expected to be greater or equal to zero"
            );
            let last = measures.last().copied().unwrap_or(T::zero());
            measures.push(last + size);
        }

        let total = measures.last().copied().unwrap_or(T::zero());
        let mut outline_progress = if total <= T::zero() {
            // nothing to measure, spread the cubics evenly
            let denom = T::from_usize((measures.len() - 1).max(1)).unwrap();
            (0..measures.len())
                .map(|i| T::from_usize(i).unwrap() / denom)
                .collect_vec()
        } else {
            measures.iter().map(|m| *m / total).collect_vec()
        };
        if let Some(first) = outline_progress.first_mut() {
            *first = T::zero();
        }
        if let Some(last) = outline_progress.last_mut() {
            *last = T::one();
        }

        let two = T::from_usize(2).unwrap();
        let features = feature_to_cubic
            .into_iter()
            .map(|(feature, ix)| {
                let p = positive_modulo(
                    (outline_progress[ix] + outline_progress[ix + 1]) / two,
                    T::one(),
                );
                ProgressableFeature::new(p, feature)
            })
            .collect();

        Self::try_new(measurer, features, cubics, outline_progress)
    }

    /// Build the measured polygon from cubics and the outline progress at each cubic boundary.
    /// Cubics covering no more than `T::distance_epsilon()` of progress are merged into their successor.
    fn try_new(
        measurer: &'a M,
        features: Vec<ProgressableFeature<'a, T>>,
        cubics: Vec<CubicBezier<T>>,
        outline_progress: Vec<T>,
    ) -> anyhow::Result<Self> {
        ensure!(!cubics.is_empty(), "MeasuredPolygon expects at least one cubic");
        ensure!(
            outline_progress.len() == cubics.len() + 1,
            "Outline progress size is expected to be the cubics size + 1"
        );
        ensure!(
            outline_progress.first() == Some(&T::zero()),
            "First outline progress value is expected to be zero"
        );
        ensure!(
            outline_progress.last() == Some(&T::one()),
            "Last outline progress value is expected to be one"
        );

        let mut measured = Vec::with_capacity(cubics.len());
        let mut start = T::zero();
        for (cubic, (begin, end)) in cubics.iter().zip(outline_progress.iter().tuple_windows()) {
            if *end - *begin > T::distance_epsilon() {
                measured.push(MeasuredCubic::try_new(measurer, *cubic, start, *end)?);
                start = *end;
            }
        }

        match measured.last_mut() {
            Some(last) => *last = last.with_progress_range(last.start_outline_progress, T::one())?,
            None => measured.push(MeasuredCubic::try_new(measurer, cubics[0], T::zero(), T::one())?),
        }

        Ok(Self {
            measurer,
            cubics: measured,
            features,
        })
    }

    pub fn measurer(&self) -> &'a M {
        self.measurer
    }

    pub fn cubics(&self) -> &[MeasuredCubic<T>] {
        &self.cubics
    }

    pub fn features(&self) -> &[ProgressableFeature<'a, T>] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.cubics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubics.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MeasuredCubic<T>> {
        self.cubics.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MeasuredCubic<T>> {
        self.cubics.iter()
    }

    /// Rotate the outline so that it starts at `cutting_point`:
    /// the cubic containing the point is split there, and every progress value is shifted
    /// so that the point becomes progress 0.
    /// Cutting within `T::distance_epsilon()` of either end leaves the outline unchanged.
    pub fn cut_and_shift(&self, cutting_point: T) -> anyhow::Result<Self> {
        ensure!(
            T::zero() <= cutting_point && cutting_point <= T::one(),
            "Cutting point is expected to be between 0 and 1, got {:?}",
            cutting_point
        );
        if cutting_point < T::distance_epsilon()
            || T::one() - cutting_point < T::distance_epsilon()
        {
            return Ok(Self {
                measurer: self.measurer,
                cubics: self.cubics.clone(),
                features: self.features.clone(),
            });
        }

        let target_index = self
            .cubics
            .iter()
            .position(|c| {
                c.start_outline_progress <= cutting_point && cutting_point <= c.end_outline_progress
            })
            .ok_or_else(|| anyhow!("Could not find a cubic that crosses the cutting point"))?;
        let n = self.cubics.len();
        let (b1, b2) = self.cubics[target_index].cut_at_progress(self.measurer, cutting_point)?;

        let cubics = std::iter::once(b2.cubic)
            .chain((1..n).map(|i| self.cubics[(i + target_index) % n].cubic))
            .chain(std::iter::once(b1.cubic))
            .collect_vec();

        let outline_progress = (0..n + 2)
            .map(|index| {
                if index == 0 {
                    T::zero()
                } else if index == n + 1 {
                    T::one()
                } else {
                    let end = self.cubics[(target_index + index - 1) % n].end_outline_progress;
                    positive_modulo(end - cutting_point, T::one())
                }
            })
            .collect_vec();

        let features = self
            .features
            .iter()
            .map(|f| {
                ProgressableFeature::new(
                    positive_modulo(f.progress - cutting_point, T::one()),
                    f.feature,
                )
            })
            .collect();

        Self::try_new(self.measurer, features, cubics, outline_progress)
    }
}
