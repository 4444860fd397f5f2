//! # Recall Forecast
//!
//! Two interchangeable projections of a [`YearlyCountSeries`]:
//! - [`ExponentialSmoothing`]: Holt's additive trend method, no seasonality
//! - [`LinearRegression`]: ordinary least squares of count on year
//!
//! Both follow the same minimum-sample rule ([`MIN_POINTS`]) and return
//! `(year, predicted_count)` pairs for the years after the last observation.
//! Predictions are not clamped: a falling trend can project negative counts.

pub mod holt;
pub mod linear;

pub use holt::{ExponentialSmoothing, HoltFit};
pub use linear::{LinearFit, LinearRegression};

use recall_core::YearlyCountSeries;

/// Fewest distinct years either strategy will fit
pub const MIN_POINTS: usize = 2;

/// Years projected by the forecast charts
pub const DEFAULT_HORIZON: usize = 5;

/// Projected `(year, count)` pairs, strictly increasing years
pub type Forecast = Vec<(i32, f64)>;

/// Result type for forecast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from forecasting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Need at least {needed} years of recall data to forecast, found {available}")]
    InsufficientData { needed: usize, available: usize },
}

/// A trend projection strategy
pub trait Forecaster: Send + Sync {
    fn name(&self) -> &'static str;

    /// Project `horizon` years past the last observed year
    fn project(&self, series: &YearlyCountSeries, horizon: usize) -> Result<Forecast>;
}

/// Enforce the shared minimum and hand back the observed points
fn observed_points(series: &YearlyCountSeries) -> Result<Vec<(i32, f64)>> {
    if series.len() < MIN_POINTS {
        return Err(Error::InsufficientData {
            needed: MIN_POINTS,
            available: series.len(),
        });
    }
    Ok(series.points())
}

fn future_years(last_year: i32, horizon: usize) -> impl Iterator<Item = (usize, i32)> {
    (1..=horizon).map(move |step| (step, last_year + step as i32))
}
