//! The fixed set of chart identifiers accepted by `/get_chart`.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Chart identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Component,
    Manufacturer,
    Severity,
    RecallTrend,
    ImpactScore,
    RemedyScore,
    RecallForecast,
    RecallForecastLr,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Component,
        ChartKind::Manufacturer,
        ChartKind::Severity,
        ChartKind::RecallTrend,
        ChartKind::ImpactScore,
        ChartKind::RemedyScore,
        ChartKind::RecallForecast,
        ChartKind::RecallForecastLr,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Component => "component",
            ChartKind::Manufacturer => "manufacturer",
            ChartKind::Severity => "severity",
            ChartKind::RecallTrend => "recall_trend",
            ChartKind::ImpactScore => "impact_score",
            ChartKind::RemedyScore => "remedy_score",
            ChartKind::RecallForecast => "recall_forecast",
            ChartKind::RecallForecastLr => "recall_forecast_lr",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Component => "Top 10 Most Commonly Recalled Components",
            ChartKind::Manufacturer => "Top 10 Manufacturers with Most Recalls",
            ChartKind::Severity => "Distribution of Recall Severity Scores",
            ChartKind::RecallTrend => "Recall Reports Over Time",
            ChartKind::ImpactScore => "Distribution of Customer Impact Scores",
            ChartKind::RemedyScore => "Distribution of Remedy Effectiveness Scores",
            ChartKind::RecallForecast => "Future Recall Prediction",
            ChartKind::RecallForecastLr => "Predicted Recalls for Next 5 Years",
        }
    }

    /// One-line summary for the chart listing endpoint
    pub fn description(&self) -> &'static str {
        match self {
            ChartKind::Component => "Bar chart of the ten most frequent recalled components",
            ChartKind::Manufacturer => "Bar chart of the ten manufacturers with the most recalls",
            ChartKind::Severity => "Histogram of consequence text lengths",
            ChartKind::RecallTrend => "Recall reports per year",
            ChartKind::ImpactScore => "Histogram of summary text lengths",
            ChartKind::RemedyScore => "Histogram of remedy text lengths",
            ChartKind::RecallForecast => "Yearly recalls with a five-year exponential smoothing forecast",
            ChartKind::RecallForecastLr => "Yearly recalls with a five-year linear regression forecast",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownChart(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_identifier() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.as_str().parse::<ChartKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_identifier() {
        assert_eq!(
            "foo".parse::<ChartKind>(),
            Err(Error::UnknownChart("foo".into()))
        );
        // identifiers are case sensitive
        assert!("Component".parse::<ChartKind>().is_err());
        assert!("".parse::<ChartKind>().is_err());
    }
}
