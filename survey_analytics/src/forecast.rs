use log::{debug, info};
use serde::Serialize;

use crate::config::AnalyticsError;

/// Common trait for the time series predictors.
pub trait Predictor {
    /// Fits the model to the historical data, oldest first.
    fn fit(&mut self, data: &[f64]) -> Result<(), AnalyticsError>;

    /// Predicts the next `steps` values.
    fn predict(&self, steps: usize) -> Result<Vec<f64>, AnalyticsError>;

    fn is_fitted(&self) -> bool;
}

#[derive(PartialEq, Debug, Clone, Copy)]
struct FittedArima {
    phi: f64,
    sigma2: f64,
    last_value: f64,
    last_diff: f64,
}

/// ARIMA(1,1,0) without constant: an AR(1) model on the first differences.
///
/// The AR coefficient is estimated with the Yule-Walker equation, so that
/// |phi| <= 1 always holds. A differenced series with no variance (a constant
/// input) has phi = 0 and forecasts the last observed value.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Arima110 {
    fitted: Option<FittedArima>,
}

impl Arima110 {
    /// One lag of a differenced series needs three points.
    pub const MIN_POINTS: usize = 3;

    pub fn new() -> Arima110 {
        Arima110 { fitted: None }
    }

    pub fn phi(&self) -> Option<f64> {
        self.fitted.map(|f| f.phi)
    }

    /// The variance of the one-step residuals on the differenced series.
    pub fn sigma2(&self) -> Option<f64> {
        self.fitted.map(|f| f.sigma2)
    }
}

impl Predictor for Arima110 {
    fn fit(&mut self, data: &[f64]) -> Result<(), AnalyticsError> {
        if data.len() < Arima110::MIN_POINTS {
            return Err(AnalyticsError::SeriesTooShort {
                required: Arima110::MIN_POINTS,
                found: data.len(),
            });
        }
        if let Some(idx) = data.iter().position(|x| !x.is_finite()) {
            return Err(AnalyticsError::NonFiniteValue(idx));
        }

        let diffs: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
        let lag0: f64 = diffs.iter().map(|d| d * d).sum();
        let lag1: f64 = diffs.windows(2).map(|w| w[0] * w[1]).sum();
        let phi = if lag0 > 0.0 { lag1 / lag0 } else { 0.0 };

        let residuals: Vec<f64> = diffs.windows(2).map(|w| w[1] - phi * w[0]).collect();
        let sigma2 = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;

        let last_value = data[data.len() - 1];
        let last_diff = diffs[diffs.len() - 1];
        debug!(
            "Arima110::fit: n={} phi={} sigma2={} last_value={} last_diff={}",
            data.len(),
            phi,
            sigma2,
            last_value,
            last_diff
        );
        self.fitted = Some(FittedArima {
            phi,
            sigma2,
            last_value,
            last_diff,
        });
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>, AnalyticsError> {
        let f = self.fitted.ok_or(AnalyticsError::NotFitted)?;
        let mut level = f.last_value;
        let mut diff = f.last_diff;
        let mut res = Vec::with_capacity(steps);
        for _ in 0..steps {
            diff *= f.phi;
            level += diff;
            res.push(level);
        }
        Ok(res)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

/// The outcome of a forecast request.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ForecastOutcome {
    /// The predicted next value, and the number of points it was fitted on.
    Predicted { value: f64, history: usize },
    /// The history is too short, `missing` more submissions are needed.
    NeedMoreHistory { missing: usize },
}

/// Predicts the next value of the series with an ARIMA(1,1,0) model.
///
/// No fitting is attempted when the series has fewer than `minimum_history`
/// points (and never with fewer than [`Arima110::MIN_POINTS`]).
pub fn forecast_next(
    series: &[f64],
    minimum_history: usize,
) -> Result<ForecastOutcome, AnalyticsError> {
    let required = minimum_history.max(Arima110::MIN_POINTS);
    if series.len() < required {
        let missing = required - series.len();
        info!(
            "forecast_next: {} points, {} more needed",
            series.len(),
            missing
        );
        return Ok(ForecastOutcome::NeedMoreHistory { missing });
    }
    let mut model = Arima110::new();
    model.fit(series)?;
    let value = model.predict(1)?[0];
    info!("forecast_next: {} points -> {}", series.len(), value);
    Ok(ForecastOutcome::Predicted {
        value,
        history: series.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn short_history_asks_for_more() {
        init();
        assert_eq!(
            forecast_next(&[], 3),
            Ok(ForecastOutcome::NeedMoreHistory { missing: 3 })
        );
        assert_eq!(
            forecast_next(&[4.0, 5.0], 3),
            Ok(ForecastOutcome::NeedMoreHistory { missing: 1 })
        );
    }

    #[test]
    fn short_history_ignores_bad_values() {
        // No fitting happens, so the NaN is never looked at.
        assert_eq!(
            forecast_next(&[f64::NAN], 3),
            Ok(ForecastOutcome::NeedMoreHistory { missing: 2 })
        );
    }

    #[test]
    fn constant_series_forecasts_last_value() {
        init();
        assert_eq!(
            forecast_next(&[5.0, 5.0, 5.0], 3),
            Ok(ForecastOutcome::Predicted {
                value: 5.0,
                history: 3
            })
        );
    }

    #[test]
    fn increasing_series() {
        init();
        let mut m = Arima110::new();
        m.fit(&[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.phi(), Some(0.5));
        let p = m.predict(2).unwrap();
        assert!((p[0] - 6.5).abs() < 1e-12);
        assert!((p[1] - 6.75).abs() < 1e-12);
    }

    #[test]
    fn phi_is_bounded() {
        let mut m = Arima110::new();
        m.fit(&[1.0, 7.0, 1.0, 7.0, 1.0, 7.0]).unwrap();
        let phi = m.phi().unwrap();
        assert!((-1.0..=1.0).contains(&phi));
        assert!(phi < 0.0);
        assert!(m.sigma2().unwrap() >= 0.0);
    }

    #[test]
    fn non_finite_values_are_reported() {
        assert_eq!(
            forecast_next(&[4.0, f64::INFINITY, 5.0], 3),
            Err(AnalyticsError::NonFiniteValue(1))
        );
    }

    #[test]
    fn unfitted_model_does_not_predict() {
        let m = Arima110::new();
        assert!(!m.is_fitted());
        assert_eq!(m.predict(1), Err(AnalyticsError::NotFitted));
    }

    #[test]
    fn minimum_history_never_below_model_minimum() {
        assert_eq!(
            forecast_next(&[4.0, 5.0], 1),
            Ok(ForecastOutcome::NeedMoreHistory { missing: 1 })
        );
        assert!(matches!(
            forecast_next(&[4.0, 5.0, 6.0, 6.0], 4),
            Ok(ForecastOutcome::Predicted { history: 4, .. })
        ));
    }
}
