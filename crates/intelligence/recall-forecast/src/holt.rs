//! Holt's linear (additive trend) exponential smoothing.
//!
//! Smoothing weights are picked by exhaustive grid search, minimizing the
//! sum of squared one-step-ahead errors over the whole history. The level
//! starts at the first observation and the trend at the first difference.

use crate::{future_years, observed_points, Forecast, Forecaster, Result};
use recall_core::YearlyCountSeries;

/// Fitted smoothing state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltFit {
    /// Level smoothing weight
    pub alpha: f64,
    /// Trend smoothing weight
    pub beta: f64,
    /// Level after the last observation
    pub level: f64,
    /// Trend after the last observation
    pub trend: f64,
    /// Sum of squared one-step-ahead errors
    pub sse: f64,
}

impl HoltFit {
    /// Prediction `steps` periods past the last observation
    pub fn predict(&self, steps: usize) -> f64 {
        self.level + steps as f64 * self.trend
    }
}

/// Additive-trend exponential smoothing strategy
#[derive(Debug, Clone, Copy)]
pub struct ExponentialSmoothing {
    /// Grid resolution per parameter (weights tried: 0, 1/n, ..., 1)
    grid_steps: u32,
}

impl Default for ExponentialSmoothing {
    fn default() -> Self {
        Self { grid_steps: 100 }
    }
}

impl ExponentialSmoothing {
    pub fn with_grid_steps(grid_steps: u32) -> Self {
        Self {
            grid_steps: grid_steps.max(1),
        }
    }

    /// Fit on observed values, `None` with fewer than two of them
    pub fn fit(&self, values: &[f64]) -> Option<HoltFit> {
        if values.len() < 2 {
            return None;
        }

        let mut best: Option<HoltFit> = None;

        for a in 0..=self.grid_steps {
            let alpha = f64::from(a) / f64::from(self.grid_steps);
            for b in 0..=self.grid_steps {
                let beta = f64::from(b) / f64::from(self.grid_steps);
                let candidate = run(values, alpha, beta);
                if best.map_or(true, |current| candidate.sse < current.sse) {
                    best = Some(candidate);
                }
            }
        }

        best
    }
}

fn run(values: &[f64], alpha: f64, beta: f64) -> HoltFit {
    let mut level = values[0];
    let mut trend = values[1] - values[0];
    let mut sse = 0.0;

    for &observed in &values[1..] {
        let forecast = level + trend;
        let err = observed - forecast;
        sse += err * err;

        let next_level = alpha * observed + (1.0 - alpha) * (level + trend);
        trend = beta * (next_level - level) + (1.0 - beta) * trend;
        level = next_level;
    }

    HoltFit {
        alpha,
        beta,
        level,
        trend,
        sse,
    }
}

impl Forecaster for ExponentialSmoothing {
    fn name(&self) -> &'static str {
        "exponential_smoothing"
    }

    fn project(&self, series: &YearlyCountSeries, horizon: usize) -> Result<Forecast> {
        let points = observed_points(series)?;
        let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
        let Some(fit) = self.fit(&values) else {
            return Err(crate::Error::InsufficientData {
                needed: crate::MIN_POINTS,
                available: points.len(),
            });
        };

        tracing::debug!(
            alpha = fit.alpha,
            beta = fit.beta,
            sse = fit.sse,
            "Fitted exponential smoothing"
        );

        let last_year = points[points.len() - 1].0;
        Ok(future_years(last_year, horizon)
            .map(|(step, year)| (year, fit.predict(step)))
            .collect())
    }
}
