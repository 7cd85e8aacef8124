//! Four samples sharing the same MAE but with very different error
//! patterns. Each one draws fresh actual values from the shared rng, in the
//! order of [`ScenarioKind::ALL`].

use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::dataset::{uniform_actuals, DatasetError, Sample};
use crate::metrics::MetricsError;

/// Allowed distance between a scenario's MAE and the target before the
/// residuals get rescaled once more.
pub const MAE_TOLERANCE: f64 = 0.01;

const PERFECT_SHARE: f64 = 0.95;
const SLIGHT_VARIATION: f64 = 0.8;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("residuals have zero mean absolute error, cannot rescale to the target")]
    ZeroResiduals,

    #[error("{n} samples are too few to build every scenario")]
    TooFewSamples { n: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    Balanced,
    SlightVariation,
    HalfPerfect,
    FewOutliers,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::Balanced,
        ScenarioKind::SlightVariation,
        ScenarioKind::HalfPerfect,
        ScenarioKind::FewOutliers,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ScenarioKind::Balanced => "Normal: Balanced Errors",
            ScenarioKind::SlightVariation => "Normal: Slight Variation",
            ScenarioKind::HalfPerfect => "EXTREME: Half Perfect, Half Large Errors",
            ScenarioKind::FewOutliers => "EXTREME: Most Perfect, Few Massive Errors",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub sample: Sample,
}

impl Scenario {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Multiplies the residuals in `range` by `target / mae`, where `mae` is
/// taken over the whole sample.
fn rescale_to_target(
    sample: &mut Sample,
    range: Range<usize>,
    target: f64,
) -> Result<(), ScenarioError> {
    let mae = sample.mae()?;

    if mae == 0. {
        return Err(ScenarioError::ZeroResiduals);
    }

    sample.rescale_residuals(range, target / mae);

    Ok(())
}

fn gaussian<R: Rng>(
    rng: &mut R,
    n: usize,
    range: Range<f64>,
    std_dev: f64,
    target: f64,
) -> Result<Sample, ScenarioError> {
    let actual = uniform_actuals(rng, n, range);
    let mut sample = Sample::with_gaussian_noise(rng, actual, std_dev)?;

    rescale_to_target(&mut sample, 0..n, target)?;

    Ok(sample)
}

/// Points before `perfect` are exact, the rest share the whole error budget
/// `target * n` with random signs.
fn split_perfect<R: Rng>(
    rng: &mut R,
    n: usize,
    range: Range<f64>,
    perfect: usize,
    target: f64,
) -> Result<Sample, ScenarioError> {
    let wrong = n - perfect;
    if wrong == 0 {
        return Err(ScenarioError::TooFewSamples { n });
    }

    let actual = uniform_actuals(rng, n, range);
    let mut sample = Sample::perfect(actual)?;

    let per_point = target * n as f64 / wrong as f64;
    let residuals: Vec<f64> = (0..wrong)
        .map(|_| *[-1., 1.].choose(rng).unwrap_or(&1.) * per_point)
        .collect();

    sample.set_residuals(perfect..n, residuals);

    if (sample.mae()? - target).abs() > MAE_TOLERANCE {
        rescale_to_target(&mut sample, perfect..n, target)?;
    }

    Ok(sample)
}

/// Builds the four scenarios, all with an MAE within [`MAE_TOLERANCE`] of
/// `target`.
pub fn build_scenarios<R: Rng>(
    rng: &mut R,
    n: usize,
    range: Range<f64>,
    target: f64,
) -> Result<Vec<Scenario>, ScenarioError> {
    if n < 2 {
        return Err(ScenarioError::TooFewSamples { n });
    }

    ScenarioKind::ALL
        .into_iter()
        .map(|kind| {
            let sample = match kind {
                ScenarioKind::Balanced => gaussian(rng, n, range.clone(), target, target)?,
                ScenarioKind::SlightVariation => {
                    gaussian(rng, n, range.clone(), target * SLIGHT_VARIATION, target)?
                }
                ScenarioKind::HalfPerfect => split_perfect(rng, n, range.clone(), n / 2, target)?,
                ScenarioKind::FewOutliers => {
                    let perfect = (PERFECT_SHARE * n as f64) as usize;
                    split_perfect(rng, n, range.clone(), perfect, target)?
                }
            };

            Ok(Scenario { kind, sample })
        })
        .collect()
}
