//! Vector to raster export: resolve size, clone and scale, serialize,
//! rasterize, then hand the bitmap to the clipboard or a PNG file.

mod clipboard;
mod raster;
mod surface;

pub use clipboard::{ClipboardSink, MemoryClipboard};
#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use raster::{rasterize, RasterImage};
pub use surface::{
    prepare_for_export, resolve_intrinsic_size, verify_serialized, IntrinsicSize,
    PreparedSurface, SizeSource, SvgSurface,
};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::ir::DiagramKind;
use crate::theme::Theme;
use base64::Engine as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    SizeResolved,
    ClonedAndScaled,
    Serialized,
    Rasterizing,
    Complete,
    Failed,
}

/// Scale and backdrop for one export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub scale: f32,
    pub background: String,
}

impl ExportOptions {
    pub fn new(scale: f32, background: impl Into<String>) -> Self {
        Self {
            scale,
            background: background.into(),
        }
    }

    pub fn clipboard(dark: bool, config: &ExportConfig) -> Self {
        Self::new(config.clipboard_scale, export_background(dark))
    }

    pub fn download(dark: bool, config: &ExportConfig) -> Self {
        Self::new(config.download_scale, export_background(dark))
    }
}

/// The backdrop exports are flattened onto: the card surface the diagram sits on.
pub fn export_background(dark: bool) -> String {
    Theme::resolve(dark).surface_fill
}

struct StageTracker {
    stage: ExportStage,
}

impl StageTracker {
    fn new(surface: &SvgSurface) -> Self {
        let kind = surface.kind().map(DiagramKind::tag).unwrap_or("unknown");
        tracing::debug!(kind, stage = ?ExportStage::Idle, "export started");
        Self {
            stage: ExportStage::Idle,
        }
    }

    fn advance(&mut self, next: ExportStage) {
        tracing::debug!(from = ?self.stage, to = ?next, "export stage");
        self.stage = next;
    }

    fn check<T>(&mut self, result: Result<T, ExportError>) -> Result<T, ExportError> {
        if let Err(err) = &result {
            tracing::warn!(stage = ?self.stage, error = %err, "export failed");
            self.stage = ExportStage::Failed;
        }
        result
    }
}

/// Resolve, clone and scale, serialize, rasterize. Leaves the tracker at
/// `Rasterizing` on success so the caller can finish its own delivery step.
async fn rasterize_surface(
    tracker: &mut StageTracker,
    surface: &SvgSurface,
    options: &ExportOptions,
) -> Result<RasterImage, ExportError> {
    let size = tracker.check(resolve_intrinsic_size(surface))?;
    tracker.advance(ExportStage::SizeResolved);
    tracing::debug!(width = size.width, height = size.height, source = ?size.source, "intrinsic size");

    let prepared = tracker.check(prepare_for_export(surface, options.scale, &options.background))?;
    tracker.advance(ExportStage::ClonedAndScaled);

    tracker.check(verify_serialized(&prepared))?;
    tracker.advance(ExportStage::Serialized);

    tracker.advance(ExportStage::Rasterizing);
    tracker.check(rasterize(prepared).await)
}

/// Run the shared pipeline up to a finished bitmap.
pub async fn export_image(
    surface: &SvgSurface,
    options: &ExportOptions,
) -> Result<RasterImage, ExportError> {
    let mut tracker = StageTracker::new(surface);
    let image = rasterize_surface(&mut tracker, surface, options).await?;
    tracker.advance(ExportStage::Complete);
    Ok(image)
}

async fn deliver_to_sink<S: ClipboardSink + ?Sized>(
    tracker: &mut StageTracker,
    surface: &SvgSurface,
    options: &ExportOptions,
    sink: &mut S,
) -> Result<(), ExportError> {
    let image = rasterize_surface(tracker, surface, options).await?;
    tracker.check(sink.write_image(&image))?;
    tracker.advance(ExportStage::Complete);
    tracing::info!(
        width = image.width(),
        height = image.height(),
        "copied diagram to clipboard"
    );
    Ok(())
}

/// Rasterize the surface and place one image payload on `sink`.
pub async fn export_to_clipboard<S: ClipboardSink + ?Sized>(
    surface: &SvgSurface,
    options: &ExportOptions,
    sink: &mut S,
) -> Result<(), ExportError> {
    let mut tracker = StageTracker::new(surface);
    deliver_to_sink(&mut tracker, surface, options, sink).await
}

/// A finished download: PNG bytes plus the file name they should be saved as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadImage {
    pub file_name: String,
    pub png: Vec<u8>,
}

impl DownloadImage {
    pub fn data_uri(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }

    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png)?;
        Ok(path)
    }
}

/// `{type}_{unix-millis}.png`, e.g. `action_plan_1718000000000.png`.
pub fn export_file_name(label: &str, unix_millis: i64) -> String {
    format!("{label}_{unix_millis}.png")
}

pub async fn export_download(
    surface: &SvgSurface,
    kind: DiagramKind,
    options: &ExportOptions,
) -> Result<DownloadImage, ExportError> {
    export_download_named(surface, kind.file_stem(), options).await
}

pub async fn export_download_named(
    surface: &SvgSurface,
    label: String,
    options: &ExportOptions,
) -> Result<DownloadImage, ExportError> {
    let image = export_image(surface, options).await?;
    let png = image.encode_png()?;
    let file_name = export_file_name(&label, chrono::Utc::now().timestamp_millis());
    Ok(DownloadImage { file_name, png })
}

/// Export and write the PNG into `dir`, returning the saved path.
pub async fn export_to_file(
    surface: &SvgSurface,
    kind: DiagramKind,
    options: &ExportOptions,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let download = export_download(surface, kind, options).await?;
    let path = download.save_to(dir)?;
    tracing::info!(path = %path.display(), bytes = download.png.len(), "saved export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_lowercase_type() {
        assert_eq!(
            export_file_name(&DiagramKind::ActionPlan.file_stem(), 1_718_000_000_000),
            "action_plan_1718000000000.png"
        );
    }

    #[test]
    fn presets_follow_config_and_mode() {
        let config = ExportConfig::default();
        assert_eq!(ExportOptions::clipboard(false, &config).scale, 2.0);
        let download = ExportOptions::download(true, &config);
        assert_eq!(download.scale, 3.0);
        assert_eq!(download.background, "#1e293b");
        assert_eq!(export_background(false), "#ffffff");
    }

    struct RejectingSink;

    impl ClipboardSink for RejectingSink {
        fn write_image(&mut self, _image: &RasterImage) -> Result<(), ExportError> {
            Err(ExportError::ClipboardWrite("permission denied".into()))
        }
    }

    fn square() -> SvgSurface {
        SvgSurface::new(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 10"><rect width="20" height="10" fill="#ff0000"/></svg>"##,
        )
        .with_kind(DiagramKind::Swot)
    }

    #[tokio::test]
    async fn clipboard_rejection_marks_export_failed() {
        let surface = square();
        let mut tracker = StageTracker::new(&surface);
        let result = deliver_to_sink(
            &mut tracker,
            &surface,
            &ExportOptions::new(1.0, "#ffffff"),
            &mut RejectingSink,
        )
        .await;
        assert!(matches!(result, Err(ExportError::ClipboardWrite(_))));
        assert_eq!(tracker.stage, ExportStage::Failed);
    }

    #[tokio::test]
    async fn clipboard_delivery_completes() {
        let surface = square();
        let mut tracker = StageTracker::new(&surface);
        let mut sink = MemoryClipboard::default();
        deliver_to_sink(&mut tracker, &surface, &ExportOptions::new(2.0, "#ffffff"), &mut sink)
            .await
            .unwrap();
        assert_eq!(tracker.stage, ExportStage::Complete);
        assert_eq!(sink.writes, 1);
        assert_eq!(sink.last.map(|image| (image.width(), image.height())), Some((40, 20)));
    }

    #[tokio::test]
    async fn unresolved_size_fails_before_scaling() {
        let surface = SvgSurface::new(r#"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0"/>"#);
        let mut tracker = StageTracker::new(&surface);
        let result = rasterize_surface(&mut tracker, &surface, &ExportOptions::new(1.0, "#fff")).await;
        assert!(matches!(result, Err(ExportError::UnresolvedSize)));
        assert_eq!(tracker.stage, ExportStage::Failed);
    }

    #[test]
    fn data_uri_is_base64_png() {
        let image = DownloadImage {
            file_name: "swot_1.png".into(),
            png: vec![0x89, b'P', b'N', b'G'],
        };
        assert_eq!(image.data_uri(), "data:image/png;base64,iVBORw==");
    }
}
