use std::ops::Range;

use ndarray::{s, Array1, Zip};
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError, Uniform};

use crate::metrics::{check_pair, Metrics, MetricsError};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("invalid noise distribution: {0}")]
    Noise(#[from] NormalError),
}

/// Paired actual / predicted values. Both arrays always have the same,
/// non-zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    actual: Array1<f64>,
    predicted: Array1<f64>,
}

impl Sample {
    pub fn new(actual: Array1<f64>, predicted: Array1<f64>) -> Result<Self, MetricsError> {
        check_pair(&actual, &predicted)?;

        Ok(Sample { actual, predicted })
    }

    /// Every prediction equals its actual value.
    pub fn perfect(actual: Array1<f64>) -> Result<Self, MetricsError> {
        let predicted = actual.clone();
        Sample::new(actual, predicted)
    }

    pub fn with_gaussian_noise<R: Rng>(
        rng: &mut R,
        actual: Array1<f64>,
        std_dev: f64,
    ) -> Result<Self, DatasetError> {
        let normal = Normal::new(0., std_dev)?;

        let noise = Array1::from_iter(normal.sample_iter(&mut *rng).take(actual.len()));
        let predicted = &actual + &noise;

        Ok(Sample::new(actual, predicted)?)
    }

    pub fn actual(&self) -> &Array1<f64> {
        &self.actual
    }

    pub fn predicted(&self) -> &Array1<f64> {
        &self.predicted
    }

    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }

    /// `ŷ - y` per point.
    pub fn residuals(&self) -> Array1<f64> {
        &self.predicted - &self.actual
    }

    pub fn absolute_errors(&self) -> Array1<f64> {
        self.residuals().mapv(f64::abs)
    }

    pub fn squared_errors(&self) -> Array1<f64> {
        self.residuals().mapv(|e| e * e)
    }

    pub fn metrics(&self) -> Result<Metrics, MetricsError> {
        Metrics::compute(&self.actual, &self.predicted)
    }

    pub fn mae(&self) -> Result<f64, MetricsError> {
        self.metrics().map(|m| m.mae)
    }

    /// Multiplies the residuals in `range` by `factor`, keeping the actual
    /// values fixed.
    pub fn rescale_residuals(&mut self, range: Range<usize>, factor: f64) {
        Zip::from(self.predicted.slice_mut(s![range.clone()]))
            .and(self.actual.slice(s![range]))
            .for_each(|y_hat, &y| *y_hat = y + (*y_hat - y) * factor);
    }

    /// Overwrites the residuals in `range`, one value per index.
    pub fn set_residuals(&mut self, range: Range<usize>, residuals: impl IntoIterator<Item = f64>) {
        for (i, e) in range.zip(residuals) {
            self.predicted[i] = self.actual[i] + e;
        }
    }
}

pub fn uniform_actuals<R: Rng>(rng: &mut R, n: usize, range: Range<f64>) -> Array1<f64> {
    let uniform = Uniform::new(range.start, range.end);

    Array1::from_iter(uniform.sample_iter(&mut *rng).take(n))
}

/// The sample the overview charts are drawn from: uniform actual values
/// plus gaussian prediction noise.
pub fn base_sample<R: Rng>(
    rng: &mut R,
    n: usize,
    range: Range<f64>,
    noise_std: f64,
) -> Result<Sample, DatasetError> {
    let actual = uniform_actuals(rng, n, range);
    Sample::with_gaussian_noise(rng, actual, noise_std)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_validates_lengths() {
        assert_matches!(
            Sample::new(array![1.0, 2.0], array![1.0]),
            Err(MetricsError::LengthMismatch {
                actual: 2,
                predicted: 1
            })
        );
        assert_matches!(
            Sample::new(Array1::zeros(0), Array1::zeros(0)),
            Err(MetricsError::Empty)
        );
    }

    #[test]
    fn uniform_actuals_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let actual = uniform_actuals(&mut rng, 500, 10.0..30.0);

        assert_eq!(actual.len(), 500);
        assert!(actual.iter().all(|&y| (10.0..30.0).contains(&y)));
    }

    #[test]
    fn base_sample_is_reproducible() {
        let a = base_sample(&mut StdRng::seed_from_u64(7), 50, 10.0..30.0, 2.0).unwrap();
        let b = base_sample(&mut StdRng::seed_from_u64(7), 50, 10.0..30.0, 2.0).unwrap();
        let c = base_sample(&mut StdRng::seed_from_u64(8), 50, 10.0..30.0, 2.0).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn base_sample_noise_is_plausible() {
        let sample = base_sample(&mut StdRng::seed_from_u64(42), 2000, 10.0..30.0, 2.0).unwrap();
        let metrics = sample.metrics().unwrap();

        // E|N(0, 2)| = 2 * sqrt(2 / pi) ~ 1.596, E[N(0, 2)^2] = 4
        assert!((metrics.mae - 1.596).abs() < 0.15);
        assert!((metrics.mse - 4.0).abs() < 0.5);
    }

    #[test]
    fn negative_noise_is_rejected() {
        let actual = array![1.0, 2.0];
        assert_matches!(
            Sample::with_gaussian_noise(&mut StdRng::seed_from_u64(1), actual, -1.0),
            Err(DatasetError::Noise(_))
        );
    }

    #[test]
    fn rescale_only_touches_range() {
        let mut sample = Sample::new(array![10.0, 20.0, 30.0], array![12.0, 19.0, 33.0]).unwrap();

        sample.rescale_residuals(1..3, 2.0);

        assert_eq!(sample.predicted(), &array![12.0, 18.0, 36.0]);
        assert_eq!(sample.actual(), &array![10.0, 20.0, 30.0]);
    }

    #[test]
    fn error_views() {
        let mut sample = Sample::perfect(array![1.0, 2.0, 3.0]).unwrap();
        sample.set_residuals(0..2, [-2.0, 3.0]);

        assert_eq!(sample.residuals(), array![-2.0, 3.0, 0.0]);
        assert_eq!(sample.absolute_errors(), array![2.0, 3.0, 0.0]);
        assert_eq!(sample.squared_errors(), array![4.0, 9.0, 0.0]);
        assert!((sample.mae().unwrap() - 5.0 / 3.0).abs() < 1e-12);
    }
}
