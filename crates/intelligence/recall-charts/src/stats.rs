//! Histogram binning and Gaussian kernel density for the score charts.

/// Equal-width histogram over the data range
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets spanning min..=max.
    ///
    /// The last bucket is closed on the right. A constant sample is spread
    /// over `value ± 0.5`. Returns `None` for an empty sample.
    pub fn compute(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Scott's rule bandwidth: sample standard deviation times `n^(-1/5)`.
///
/// `None` when there are fewer than two values or no spread.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = var.sqrt();
    if std <= 0.0 || !std.is_finite() {
        return None;
    }
    Some(std * n.powf(-0.2))
}

/// Gaussian KDE sampled at `samples` evenly spaced points over `range`,
/// scaled to histogram counts (`density * n * bin_width`).
pub fn kde_curve(
    values: &[f64],
    range: (f64, f64),
    bin_width: f64,
    samples: usize,
) -> Option<Vec<(f64, f64)>> {
    let bw = scott_bandwidth(values)?;
    if samples < 2 {
        return None;
    }

    let n = values.len() as f64;
    let norm = 1.0 / (n * bw * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n * bin_width;
    let step = (range.1 - range.0) / (samples - 1) as f64;

    Some(
        (0..samples)
            .map(|i| {
                let x = range.0 + step * i as f64;
                let density: f64 = values
                    .iter()
                    .map(|v| {
                        let z = (x - v) / bw;
                        (-0.5 * z * z).exp()
                    })
                    .sum::<f64>()
                    * norm;
                (x, density * scale)
            })
            .collect(),
    )
}
