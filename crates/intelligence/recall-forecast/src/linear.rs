//! Ordinary least squares of yearly count on year.

use crate::{future_years, observed_points, Forecast, Forecaster, Result};
use recall_core::YearlyCountSeries;

/// Fitted line, stored around the mean year for numerical stability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    mean_x: f64,
    mean_y: f64,
}

impl LinearFit {
    /// Least-squares fit; `None` when fewer than two distinct x values exist
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (x, y) in points {
            sxy += (x - mean_x) * (y - mean_y);
            sxx += (x - mean_x) * (x - mean_x);
        }
        if sxx == 0.0 {
            return None;
        }

        Some(Self {
            slope: sxy / sxx,
            mean_x,
            mean_y,
        })
    }

    pub fn intercept(&self) -> f64 {
        self.mean_y - self.slope * self.mean_x
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.mean_y + self.slope * (x - self.mean_x)
    }
}

/// Linear-regression strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression;

impl Forecaster for LinearRegression {
    fn name(&self) -> &'static str {
        "linear_regression"
    }

    fn project(&self, series: &YearlyCountSeries, horizon: usize) -> Result<Forecast> {
        let points = observed_points(series)?;
        let xy: Vec<(f64, f64)> = points.iter().map(|&(y, c)| (f64::from(y), c)).collect();

        // distinct years are guaranteed by the series, so the fit exists
        let Some(fit) = LinearFit::fit(&xy) else {
            return Err(crate::Error::InsufficientData {
                needed: crate::MIN_POINTS,
                available: points.len(),
            });
        };

        tracing::debug!(slope = fit.slope, intercept = fit.intercept(), "Fitted linear trend");

        let last_year = points[points.len() - 1].0;
        Ok(future_years(last_year, horizon)
            .map(|(_, year)| (year, fit.predict(f64::from(year))))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_line() {
        let series = YearlyCountSeries::from_counts([(2018, 2), (2019, 4), (2020, 6)]);
        let forecast = LinearRegression.project(&series, 5).unwrap();

        let expected = [(2021, 8.0), (2022, 10.0), (2023, 12.0), (2024, 14.0), (2025, 16.0)];
        assert_eq!(forecast.len(), expected.len());
        for ((year, value), (want_year, want_value)) in forecast.iter().zip(expected) {
            assert_eq!(*year, want_year);
            assert!(approx(*value, want_value));
        }
    }

    #[test]
    fn test_fit_coefficients() {
        let fit = LinearFit::fit(&[(1.0, 1.0), (2.0, 3.0), (3.0, 2.0)]).unwrap();
        assert!(approx(fit.slope, 0.5));
        assert!(approx(fit.intercept(), 1.0));
        assert!(approx(fit.predict(4.0), 3.0));
    }

    #[test]
    fn test_degenerate_fit() {
        assert!(LinearFit::fit(&[(1.0, 2.0)]).is_none());
        assert!(LinearFit::fit(&[(1.0, 2.0), (1.0, 5.0)]).is_none());
    }

    #[test]
    fn test_negative_projection_is_not_clamped() {
        let series = YearlyCountSeries::from_counts([(2019, 10), (2020, 5)]);
        let forecast = LinearRegression.project(&series, 3).unwrap();

        assert!(approx(forecast[0].1, 0.0));
        assert!(approx(forecast[2].1, -10.0));
    }
}
