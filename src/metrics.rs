use ndarray::Array1;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("actual and predicted must have the same length ({actual} != {predicted})")]
    LengthMismatch { actual: usize, predicted: usize },

    #[error("cannot compute a metric over zero samples")]
    Empty,
}

pub(crate) fn check_pair(actual: &Array1<f64>, predicted: &Array1<f64>) -> Result<(), MetricsError> {
    if actual.len() != predicted.len() {
        return Err(MetricsError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }

    if actual.is_empty() {
        return Err(MetricsError::Empty);
    }

    Ok(())
}

pub fn mean_absolute_error(
    actual: &Array1<f64>,
    predicted: &Array1<f64>,
) -> Result<f64, MetricsError> {
    check_pair(actual, predicted)?;

    let diff = actual - predicted;
    diff.mapv(f64::abs).mean().ok_or(MetricsError::Empty)
}

pub fn mean_squared_error(
    actual: &Array1<f64>,
    predicted: &Array1<f64>,
) -> Result<f64, MetricsError> {
    check_pair(actual, predicted)?;

    let diff = actual - predicted;
    diff.mapv(|x| x * x).mean().ok_or(MetricsError::Empty)
}

pub fn root_mean_squared_error(
    actual: &Array1<f64>,
    predicted: &Array1<f64>,
) -> Result<f64, MetricsError> {
    mean_squared_error(actual, predicted).map(f64::sqrt)
}

/// MAE, MSE and RMSE of one `(actual, predicted)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
}

impl Metrics {
    pub fn compute(actual: &Array1<f64>, predicted: &Array1<f64>) -> Result<Self, MetricsError> {
        let mae = mean_absolute_error(actual, predicted)?;
        let mse = mean_squared_error(actual, predicted)?;

        Ok(Metrics {
            mae,
            mse,
            rmse: mse.sqrt(),
        })
    }

    /// Same metrics spelled out as `sum / N` loops, printed next to
    /// [`Metrics::compute`] as a cross-check.
    pub fn manual(actual: &Array1<f64>, predicted: &Array1<f64>) -> Result<Self, MetricsError> {
        check_pair(actual, predicted)?;

        let n = actual.len() as f64;

        let mut abs_sum = 0.;
        let mut sq_sum = 0.;
        for (&y, &y_hat) in actual.iter().zip(predicted.iter()) {
            let e = y - y_hat;
            abs_sum += e.abs();
            sq_sum += e * e;
        }

        let mse = sq_sum / n;

        Ok(Metrics {
            mae: abs_sum / n,
            mse,
            rmse: mse.sqrt(),
        })
    }

    pub fn summary_lines(&self) -> [String; 3] {
        [
            format!("MAE: {:.2}", self.mae),
            format!("MSE: {:.2}", self.mse),
            format!("RMSE: {:.2}", self.rmse),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ndarray::array;

    #[test]
    fn test_mean_absolute_error() {
        let actual = array![1.0, 2.0, 3.0, 4.0];
        let predicted = array![2.0, 2.0, 1.0, 4.5];

        let mae = mean_absolute_error(&actual, &predicted).unwrap();
        assert!((mae - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_mean_squared_error() {
        let actual = array![1.0, 2.0, 3.0];
        let predicted = array![1.0, 2.0, 3.0];

        let mse = mean_squared_error(&actual, &predicted).unwrap();
        assert!((mse - 0.0).abs() < 1e-12);

        let predicted = array![2.0, 0.0, 3.0];
        let mse = mean_squared_error(&actual, &predicted).unwrap();
        assert!((mse - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rmse_is_sqrt_of_mse() {
        let actual = array![10.5, 12.25, 19.0, 27.75, 11.0];
        let predicted = array![11.0, 9.5, 19.5, 30.0, 10.0];

        let mse = mean_squared_error(&actual, &predicted).unwrap();
        let rmse = root_mean_squared_error(&actual, &predicted).unwrap();
        assert_eq!(rmse, mse.sqrt());

        let metrics = Metrics::compute(&actual, &predicted).unwrap();
        assert_eq!(metrics.rmse, metrics.mse.sqrt());
    }

    #[test]
    fn manual_matches_vectorised() {
        let actual = array![14.2, 27.9, 22.1, 10.3, 18.8, 29.5];
        let predicted = array![15.0, 25.1, 22.4, 12.9, 18.8, 26.0];

        let vectorised = Metrics::compute(&actual, &predicted).unwrap();
        let manual = Metrics::manual(&actual, &predicted).unwrap();

        assert!((vectorised.mae - manual.mae).abs() < 1e-9);
        assert!((vectorised.mse - manual.mse).abs() < 1e-9);
        assert!((vectorised.rmse - manual.rmse).abs() < 1e-9);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let actual = array![1.0, 2.0, 3.0];
        let predicted = array![1.0, 2.0];

        assert_matches!(
            mean_absolute_error(&actual, &predicted),
            Err(MetricsError::LengthMismatch {
                actual: 3,
                predicted: 2
            })
        );
        assert_matches!(
            Metrics::manual(&actual, &predicted),
            Err(MetricsError::LengthMismatch { .. })
        );
    }

    #[test]
    fn rejects_empty_input() {
        let empty = Array1::<f64>::zeros(0);

        assert_matches!(mean_squared_error(&empty, &empty), Err(MetricsError::Empty));
        assert_matches!(Metrics::compute(&empty, &empty), Err(MetricsError::Empty));
    }

    #[test]
    fn summary_lines_use_two_decimals() {
        let metrics = Metrics {
            mae: 1.234,
            mse: 4.0,
            rmse: 2.0,
        };

        assert_eq!(
            metrics.summary_lines(),
            [
                "MAE: 1.23".to_string(),
                "MSE: 4.00".to_string(),
                "RMSE: 2.00".to_string()
            ]
        );
    }
}
