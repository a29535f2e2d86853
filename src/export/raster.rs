use super::surface::PreparedSurface;
use crate::error::ExportError;
use crate::theme::parse_hex_color;
use once_cell::sync::Lazy;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use std::sync::Arc;

static SYSTEM_FONTS: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

const FALLBACK_BACKGROUND: [u8; 4] = [255, 255, 255, 255];

/// A rasterized export, background already composited.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixmap: Pixmap,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight (non-premultiplied) RGBA at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Straight RGBA bytes, row-major.
    pub fn rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ExportError> {
        self.pixmap
            .encode_png()
            .map_err(|err| ExportError::Encode(err.to_string()))
    }
}

/// Decode the prepared document and draw it over a background-filled bitmap.
///
/// Decoding runs on the blocking pool; this is the pipeline's only await.
pub async fn rasterize(prepared: PreparedSurface) -> Result<RasterImage, ExportError> {
    tokio::task::spawn_blocking(move || rasterize_blocking(&prepared))
        .await
        .map_err(|err| ExportError::Task(err.to_string()))?
}

fn rasterize_blocking(prepared: &PreparedSurface) -> Result<RasterImage, ExportError> {
    let options = usvg::Options {
        fontdb: SYSTEM_FONTS.clone(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&prepared.document, &options)
        .map_err(|err| ExportError::Decode(err.to_string()))?;

    let (width, height) = prepared.pixel_size();
    let mut pixmap =
        Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;
    let [r, g, b, a] = parse_hex_color(&prepared.background).unwrap_or_else(|| {
        tracing::warn!(background = %prepared.background, "unparseable export background, using white");
        FALLBACK_BACKGROUND
    });
    pixmap.fill(Color::from_rgba8(r, g, b, a));

    let size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(RasterImage { pixmap })
}
