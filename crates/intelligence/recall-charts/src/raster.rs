//! SVG to PNG rasterization via resvg.

use crate::{Error, Result};
use resvg::usvg;
use std::sync::{Arc, OnceLock};

static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

/// System fonts, loaded once per process
fn fonts() -> Arc<usvg::fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "Loaded system fonts for chart rendering");
            Arc::new(db)
        })
        .clone()
}

/// Rasterize an SVG document to PNG bytes at its intrinsic size
pub fn svg_to_png(svg: &str) -> Result<Vec<u8>> {
    let options = usvg::Options {
        fontdb: fonts(),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| Error::Render(format!("Failed to parse SVG: {e}")))?;

    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| Error::Render("Failed to create pixmap".into()))?;

    resvg::render(&tree, usvg::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| Error::Render(format!("Failed to encode PNG: {e}")))
}
