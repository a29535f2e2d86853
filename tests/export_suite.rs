#![cfg(feature = "png")]

use diagram_rs_renderer::export::{
    ClipboardSink, ExportOptions, MemoryClipboard, RasterImage, SvgSurface, export_download,
    export_image, export_to_clipboard, export_to_file,
};
use diagram_rs_renderer::theme::parse_hex_color;
use diagram_rs_renderer::{Config, DiagramKind, ExportError, parse_record, render};

const PLAIN: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300"><circle cx="200" cy="150" r="40" fill="#2563eb"/></svg>"##;

struct RejectingClipboard;

impl ClipboardSink for RejectingClipboard {
    fn write_image(&mut self, _image: &RasterImage) -> Result<(), ExportError> {
        Err(ExportError::ClipboardWrite("permission denied".to_string()))
    }
}

#[tokio::test]
async fn scaled_export_fills_background() {
    let surface = SvgSurface::new(PLAIN);
    let options = ExportOptions::new(2.0, "#1e293b");
    let image = export_image(&surface, &options).await.unwrap();
    assert_eq!((image.width(), image.height()), (800, 600));
    assert_eq!(image.pixel(0, 0), parse_hex_color("#1e293b"));
    // circle centre scales with the surface
    assert_eq!(image.pixel(400, 300), parse_hex_color("#2563eb"));
    assert_eq!(surface.markup(), PLAIN);
}

#[tokio::test]
async fn clipboard_receives_one_payload() {
    let surface = SvgSurface::new(PLAIN);
    let mut sink = MemoryClipboard::default();
    let options = ExportOptions::clipboard(false, &Config::default().export);
    export_to_clipboard(&surface, &options, &mut sink).await.unwrap();
    assert_eq!(sink.writes, 1);
    let image = sink.last.unwrap();
    assert_eq!((image.width(), image.height()), (800, 600));
    assert_eq!(image.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[tokio::test]
async fn clipboard_rejection_is_reported() {
    let surface = SvgSurface::new(PLAIN);
    let options = ExportOptions::new(1.0, "#ffffff");
    let result = export_to_clipboard(&surface, &options, &mut RejectingClipboard).await;
    assert!(matches!(result, Err(ExportError::ClipboardWrite(_))));
}

#[tokio::test]
async fn unresolvable_surface_fails_before_raster() {
    let surface = SvgSurface::new(r#"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0"/>"#);
    let result = export_image(&surface, &ExportOptions::new(2.0, "#ffffff")).await;
    assert!(matches!(result, Err(ExportError::UnresolvedSize)));

    let broken = SvgSurface::new("<svg><g></svg>");
    let result = export_image(&broken, &ExportOptions::new(2.0, "#ffffff")).await;
    assert!(matches!(result, Err(ExportError::Markup(_))));
}

#[tokio::test]
async fn rendered_diagram_downloads_with_type_file_name() {
    let record = parse_record(
        r#"{"type":"ACTION_PLAN","centralTopic":"Ship v2","nodes":[{"title":"QA","items":["Regression suite"]},{"title":"Docs","items":[]},{"title":"Launch","items":["Blog post"]}]}"#,
    )
    .unwrap();
    let mut config = Config::default();
    config.layout.fast_text_metrics = true;
    let rendered = render(&record, true, &config);

    let options = ExportOptions::download(true, &config.export);
    let download = export_download(&rendered.surface(), rendered.kind, &options)
        .await
        .unwrap();
    assert!(download.file_name.starts_with("action_plan_"));
    assert!(download.file_name.ends_with(".png"));
    assert_eq!(&download.png[..4], b"\x89PNG");
    assert!(download.data_uri().starts_with("data:image/png;base64,iVBORw0KGgo"));
}

#[tokio::test]
async fn export_to_file_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let surface = SvgSurface::new(PLAIN);
    let options = ExportOptions::new(1.0, "#ffffff");
    let path = export_to_file(&surface, DiagramKind::Radar, &options, dir.path())
        .await
        .unwrap();
    assert!(path.starts_with(dir.path()));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("radar_"));
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[tokio::test]
async fn concurrent_exports_are_independent() {
    let surface = SvgSurface::new(PLAIN);
    let small = ExportOptions::new(1.0, "#ffffff");
    let large = ExportOptions::new(3.0, "#000000");
    let (a, b) = tokio::join!(export_image(&surface, &small), export_image(&surface, &large));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!((a.width(), b.width()), (400, 1200));
    assert_eq!(a.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(b.pixel(0, 0), Some([0, 0, 0, 255]));
}
