//! # Recall Charts
//!
//! Renders the eight recall statistics charts as PNG images.
//!
//! Rendering happens in three steps: [`Figure::build`] aggregates the
//! recall table, [`svg::render`] lays the figure out as SVG, and
//! [`raster::svg_to_png`] rasterizes it in memory. Nothing touches disk
//! and no state is kept between calls, so concurrent renders are safe.

pub mod figure;
pub mod kind;
pub mod raster;
pub mod stats;
pub mod svg;

pub use figure::{Body, Figure, Series, Style};
pub use kind::ChartKind;
pub use svg::{MIN_HEIGHT, MIN_WIDTH};

use recall_core::RecallTable;

/// Result type for chart operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from chart rendering
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown chart type '{0}'")]
    UnknownChart(String),

    #[error("Not enough data for the {chart} chart: {reason}")]
    InsufficientData { chart: ChartKind, reason: String },

    #[error("Chart rendering failed: {0}")]
    Render(String),
}

/// Chart renderer with a fixed output size
#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(1000, 500)
    }
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render `kind` for `table` as an SVG document
    ///
    /// Fails with [`Error::Render`] when the canvas is smaller than
    /// [`MIN_WIDTH`] x [`MIN_HEIGHT`], since the fixed margins would leave
    /// no room for the plot area.
    pub fn render_svg(&self, kind: ChartKind, table: &RecallTable) -> Result<String> {
        if self.width < MIN_WIDTH || self.height < MIN_HEIGHT {
            return Err(Error::Render(format!(
                "Canvas {}x{} is smaller than the {MIN_WIDTH}x{MIN_HEIGHT} minimum",
                self.width, self.height
            )));
        }
        let figure = Figure::build(kind, table)?;
        Ok(svg::render(&figure, self.width, self.height))
    }

    /// Render `kind` for `table` as PNG bytes
    pub fn render_png(&self, kind: ChartKind, table: &RecallTable) -> Result<Vec<u8>> {
        let svg = self.render_svg(kind, table)?;
        let png = raster::svg_to_png(&svg)?;
        tracing::debug!(chart = %kind, rows = table.len(), bytes = png.len(), "Rendered chart");
        Ok(png)
    }
}
