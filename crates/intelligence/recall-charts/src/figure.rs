//! Chart aggregation: turns a recall table into a renderer-neutral figure.

use crate::stats::{kde_curve, Histogram};
use crate::{ChartKind, Error, Result};
use recall_core::{columns, RecallTable};
use recall_forecast::{ExponentialSmoothing, Forecaster, LinearRegression, DEFAULT_HORIZON};

/// Bars shown in the frequency charts
pub const TOP_N: usize = 10;

/// Bins in the score histograms
pub const HISTOGRAM_BINS: usize = 20;

const KDE_SAMPLES: usize = 200;

/// Categorical palette for bar charts
pub const PALETTE: [&str; 10] = [
    "#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3",
    "#937860", "#da8bc3", "#8c8c8c", "#ccb974", "#64b5cd",
];

const BLUE: &str = "#1f77b4";
const ORANGE: &str = "#ff7f0e";
const RED: &str = "#d62728";

/// How a data series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Line { dashed: bool, markers: bool },
    Scatter,
}

/// One named series on an x/y chart
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: Style,
    pub color: &'static str,
}

/// What sits inside the axes
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Category labels with counts, in display order
    Bars(Vec<(String, usize)>),
    /// Binned values with an optional density curve in count units
    Histogram {
        histogram: Histogram,
        density: Option<Vec<(f64, f64)>>,
    },
    Xy { series: Vec<Series>, legend: bool },
}

/// Renderer-neutral chart description
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: Body,
}

impl Figure {
    /// Aggregate `table` for `kind`.
    ///
    /// Fails with [`Error::InsufficientData`] when there is nothing to plot.
    pub fn build(kind: ChartKind, table: &RecallTable) -> Result<Self> {
        if table.is_empty() {
            return Err(insufficient(kind, "no recall records"));
        }

        match kind {
            ChartKind::Component => top_counts(kind, table, columns::COMPONENT, "Component"),
            ChartKind::Manufacturer => {
                top_counts(kind, table, columns::MANUFACTURER, "Manufacturer")
            }
            ChartKind::Severity => length_histogram(
                kind,
                table,
                columns::CONSEQUENCE,
                "Severity Score (Text Length of Consequence)",
            ),
            ChartKind::ImpactScore => length_histogram(
                kind,
                table,
                columns::SUMMARY,
                "Impact Score (Text Length of Summary)",
            ),
            ChartKind::RemedyScore => length_histogram(
                kind,
                table,
                columns::REMEDY,
                "Remedy Score (Text Length of Remedy)",
            ),
            ChartKind::RecallTrend => trend(table),
            ChartKind::RecallForecast => forecast(
                kind,
                table,
                &ExponentialSmoothing::default(),
                Series {
                    label: "Historical Data".into(),
                    points: Vec::new(),
                    style: Style::Line { dashed: false, markers: true },
                    color: BLUE,
                },
                Series {
                    label: "Forecast".into(),
                    points: Vec::new(),
                    style: Style::Line { dashed: true, markers: true },
                    color: ORANGE,
                },
            ),
            ChartKind::RecallForecastLr => forecast(
                kind,
                table,
                &LinearRegression,
                Series {
                    label: "Actual Data".into(),
                    points: Vec::new(),
                    style: Style::Scatter,
                    color: BLUE,
                },
                Series {
                    label: "Predicted Recalls".into(),
                    points: Vec::new(),
                    style: Style::Line { dashed: true, markers: false },
                    color: RED,
                },
            ),
        }
    }
}

fn insufficient(chart: ChartKind, reason: impl Into<String>) -> Error {
    Error::InsufficientData {
        chart,
        reason: reason.into(),
    }
}

fn top_counts(kind: ChartKind, table: &RecallTable, column: &str, x_label: &str) -> Result<Figure> {
    let mut counts = table.value_counts(column);
    if counts.is_empty() {
        return Err(insufficient(kind, format!("no {column} values")));
    }
    counts.truncate(TOP_N);

    Ok(Figure {
        kind,
        title: kind.title().into(),
        x_label: x_label.into(),
        y_label: "Count".into(),
        body: Body::Bars(counts),
    })
}

fn length_histogram(
    kind: ChartKind,
    table: &RecallTable,
    column: &str,
    x_label: &str,
) -> Result<Figure> {
    let values: Vec<f64> = table
        .text_lengths(column)
        .into_iter()
        .map(|len| len as f64)
        .collect();
    let histogram = Histogram::compute(&values, HISTOGRAM_BINS)
        .ok_or_else(|| insufficient(kind, format!("no {column} values")))?;
    let density = kde_curve(&values, histogram.range(), histogram.bin_width(), KDE_SAMPLES);

    Ok(Figure {
        kind,
        title: kind.title().into(),
        x_label: x_label.into(),
        y_label: "Frequency".into(),
        body: Body::Histogram { histogram, density },
    })
}

fn trend(table: &RecallTable) -> Result<Figure> {
    let kind = ChartKind::RecallTrend;
    let series = table.yearly_counts();
    if series.is_empty() {
        return Err(insufficient(kind, "no parseable report dates"));
    }

    Ok(Figure {
        kind,
        title: kind.title().into(),
        x_label: "Year".into(),
        y_label: "Number of Recalls".into(),
        body: Body::Xy {
            series: vec![Series {
                label: "Recalls".into(),
                points: year_points(&series.points()),
                style: Style::Line { dashed: false, markers: true },
                color: BLUE,
            }],
            legend: false,
        },
    })
}

fn forecast(
    kind: ChartKind,
    table: &RecallTable,
    model: &dyn Forecaster,
    mut history: Series,
    mut projection: Series,
) -> Result<Figure> {
    let series = table.yearly_counts();
    let predicted = model
        .project(&series, DEFAULT_HORIZON)
        .map_err(|e| insufficient(kind, e.to_string()))?;

    tracing::debug!(
        chart = %kind,
        model = model.name(),
        years = series.len(),
        "Projected recall counts"
    );

    history.points = year_points(&series.points());
    projection.points = year_points(&predicted);

    Ok(Figure {
        kind,
        title: kind.title().into(),
        x_label: "Year".into(),
        y_label: "Number of Recalls".into(),
        body: Body::Xy {
            series: vec![history, projection],
            legend: true,
        },
    })
}

fn year_points(points: &[(i32, f64)]) -> Vec<(f64, f64)> {
    points.iter().map(|&(y, v)| (f64::from(y), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(rows: serde_json::Value) -> RecallTable {
        RecallTable::from_results(rows.as_array().unwrap())
    }

    #[test]
    fn test_empty_table_is_insufficient_for_every_chart() {
        let empty = RecallTable::default();
        for kind in ChartKind::ALL {
            assert!(
                matches!(
                    Figure::build(kind, &empty),
                    Err(Error::InsufficientData { chart, .. }) if chart == kind
                ),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_component_counts() {
        let t = table(json!([
            {"Component": "BRAKES"},
            {"Component": "AIRBAG"},
            {"Component": "BRAKES"}
        ]));
        let figure = Figure::build(ChartKind::Component, &t).unwrap();

        assert_eq!(figure.title, "Top 10 Most Commonly Recalled Components");
        assert_eq!(figure.x_label, "Component");
        assert_eq!(
            figure.body,
            Body::Bars(vec![("BRAKES".into(), 2), ("AIRBAG".into(), 1)])
        );
    }

    #[test]
    fn test_bars_keep_top_ten() {
        let rows: Vec<_> = (0..15)
            .flat_map(|i| std::iter::repeat(json!({"Manufacturer": format!("M{i:02}")})).take(i + 1))
            .collect();
        let t = RecallTable::from_results(&rows);
        let figure = Figure::build(ChartKind::Manufacturer, &t).unwrap();

        let Body::Bars(bars) = figure.body else {
            panic!("expected bars");
        };
        assert_eq!(bars.len(), TOP_N);
        assert_eq!(bars[0], ("M14".into(), 15));
        assert_eq!(bars[9], ("M05".into(), 6));
    }

    #[test]
    fn test_missing_column_has_no_bars() {
        let t = table(json!([{"Summary": "x"}]));
        assert!(matches!(
            Figure::build(ChartKind::Component, &t),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_severity_histogram_covers_every_row() {
        let t = table(json!([
            {"Consequence": "short"},
            {"Consequence": "a considerably longer consequence"},
            {"Summary": "no consequence here"}
        ]));
        let figure = Figure::build(ChartKind::Severity, &t).unwrap();

        assert_eq!(figure.y_label, "Frequency");
        let Body::Histogram { histogram, density } = figure.body else {
            panic!("expected histogram");
        };
        assert_eq!(histogram.counts.len(), HISTOGRAM_BINS);
        assert_eq!(histogram.total(), 3);
        // placeholder text for the missing consequence is three characters long
        assert_eq!(histogram.range().0, 3.0);
        assert!(density.is_some());
    }

    #[test]
    fn test_trend_series() {
        let t = table(json!([
            {"ReportReceivedDate": "15/03/2019"},
            {"ReportReceivedDate": "01/07/2019"},
            {"ReportReceivedDate": "02/02/2021"},
            {"ReportReceivedDate": "not a date"}
        ]));
        let figure = Figure::build(ChartKind::RecallTrend, &t).unwrap();

        let Body::Xy { series, legend } = figure.body else {
            panic!("expected xy");
        };
        assert!(!legend);
        assert_eq!(series[0].points, vec![(2019.0, 2.0), (2021.0, 1.0)]);
    }

    #[test]
    fn test_forecast_needs_two_years() {
        let t = table(json!([
            {"ReportReceivedDate": "15/03/2019"},
            {"ReportReceivedDate": "20/05/2019"}
        ]));
        for kind in [ChartKind::RecallForecast, ChartKind::RecallForecastLr] {
            assert!(matches!(
                Figure::build(kind, &t),
                Err(Error::InsufficientData { .. })
            ));
        }
    }

    #[test]
    fn test_forecast_series() {
        let t = table(json!([
            {"ReportReceivedDate": "15/03/2018"},
            {"ReportReceivedDate": "15/03/2019"},
            {"ReportReceivedDate": "16/03/2019"}
        ]));
        let figure = Figure::build(ChartKind::RecallForecastLr, &t).unwrap();

        let Body::Xy { series, legend } = figure.body else {
            panic!("expected xy");
        };
        assert!(legend);
        assert_eq!(series[0].label, "Actual Data");
        assert_eq!(series[0].style, Style::Scatter);
        assert_eq!(series[1].label, "Predicted Recalls");
        let years: Vec<f64> = series[1].points.iter().map(|(x, _)| *x).collect();
        assert_eq!(years, vec![2020.0, 2021.0, 2022.0, 2023.0, 2024.0]);
        assert!((series[1].points[0].1 - 3.0).abs() < 1e-9);
    }
}
