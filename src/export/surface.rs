use crate::error::ExportError;
use crate::ir::DiagramKind;
use crate::render::escape_xml;
use once_cell::sync::Lazy;
use regex::Regex;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

static SIZE_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s(?:width|height|style)\s*=\s*(?:"[^"]*"|'[^']*')"#).unwrap());
static LEADING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

/// A rendered vector surface. Export never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgSurface {
    markup: String,
    kind: Option<DiagramKind>,
}

impl SvgSurface {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: DiagramKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn kind(&self) -> Option<DiagramKind> {
        self.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSource {
    ViewBox,
    Attributes,
    BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicSize {
    pub width: f32,
    pub height: f32,
    pub source: SizeSource,
}

/// The scaled, self-contained document handed to the raster stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSurface {
    pub document: String,
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl PreparedSurface {
    /// Integer bitmap dimensions for the scaled size.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.round().max(0.0) as u32,
            self.height.round().max(0.0) as u32,
        )
    }
}

fn parse_view_box(value: &str) -> Option<[f32; 4]> {
    let parts: Vec<f32> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<f32>)
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x, y, w, h] => Some([*x, *y, *w, *h]),
        _ => None,
    }
}

fn parse_length(value: Option<&str>) -> f32 {
    value
        .and_then(|v| LEADING_NUMBER_RE.find(v))
        .and_then(|m| m.as_str().trim().parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Logical size of a surface: a positive viewBox wins, then non-percentage
/// `width`/`height` attributes, then the drawn content's bounding box.
pub fn resolve_intrinsic_size(surface: &SvgSurface) -> Result<IntrinsicSize, ExportError> {
    let doc = roxmltree::Document::parse(surface.markup())
        .map_err(|err| ExportError::Markup(err.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ExportError::Markup(format!(
            "root element is <{}>, expected <svg>",
            root.tag_name().name()
        )));
    }

    let size = if let Some([_, _, w, h]) = root.attribute("viewBox").and_then(parse_view_box)
        && w > 0.0
    {
        IntrinsicSize {
            width: w,
            height: h,
            source: SizeSource::ViewBox,
        }
    } else if let Some(width) = root.attribute("width")
        && !width.contains('%')
    {
        IntrinsicSize {
            width: parse_length(Some(width)),
            height: parse_length(root.attribute("height")),
            source: SizeSource::Attributes,
        }
    } else {
        let (width, height) = content_extent(surface.markup())?;
        IntrinsicSize {
            width,
            height,
            source: SizeSource::BoundingBox,
        }
    };

    if !(size.width.is_finite() && size.height.is_finite())
        || size.width <= 0.0
        || size.height <= 0.0
    {
        return Err(ExportError::UnresolvedSize);
    }
    Ok(size)
}

fn content_extent(markup: &str) -> Result<(f32, f32), ExportError> {
    let document = with_svg_namespace(markup);
    let tree = usvg::Tree::from_str(&document, &usvg::Options::default())
        .map_err(|err| ExportError::Decode(err.to_string()))?;
    let bbox = tree.root().abs_bounding_box();
    Ok((bbox.right().max(0.0), bbox.bottom().max(0.0)))
}

fn with_svg_namespace(markup: &str) -> String {
    let Some((start, end)) = root_start_tag(markup) else {
        return markup.to_string();
    };
    let tag = &markup[start..end];
    if tag.contains("xmlns=") {
        return markup.to_string();
    }
    let mut out = String::with_capacity(markup.len() + SVG_NS.len() + 10);
    out.push_str(&markup[..start + 4]);
    out.push_str(&format!(" xmlns=\"{SVG_NS}\""));
    out.push_str(&markup[start + 4..]);
    out
}

/// Byte range of the `<svg ...>` start tag, including its closing `>`.
fn root_start_tag(markup: &str) -> Option<(usize, usize)> {
    let start = markup.find("<svg")?;
    let mut quote: Option<char> = None;
    for (offset, ch) in markup[start..].char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some((start, start + offset + 1)),
            _ => {}
        }
    }
    None
}

/// Clone the surface at `scale` times its intrinsic size with an opaque
/// background. The viewBox is kept (or added) so content scales with it.
pub fn prepare_for_export(
    surface: &SvgSurface,
    scale: f32,
    background: &str,
) -> Result<PreparedSurface, ExportError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ExportError::InvalidScale(scale));
    }
    let size = resolve_intrinsic_size(surface)?;
    let width = size.width * scale;
    let height = size.height * scale;

    let markup = with_svg_namespace(surface.markup());
    let (start, end) = root_start_tag(&markup)
        .ok_or_else(|| ExportError::Markup("missing <svg> start tag".to_string()))?;
    let tag = &markup[start..end];
    let self_closing = tag.ends_with("/>");
    let body = tag
        .trim_end_matches('>')
        .trim_end_matches('/')
        .trim_end();
    let mut rewritten = SIZE_ATTR_RE.replace_all(body, "").into_owned();
    if !rewritten.contains("viewBox") {
        rewritten.push_str(&format!(
            " viewBox=\"0 0 {} {}\"",
            size.width, size.height
        ));
    }
    let background = escape_xml(background);
    rewritten.push_str(&format!(
        " width=\"{width}\" height=\"{height}\" style=\"width: {width}px; height: {height}px; background-color: {background};\">"
    ));
    let backdrop = format!(
        "<rect class=\"export-background\" x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"{background}\"/>"
    );

    let mut document = String::with_capacity(markup.len() + rewritten.len() + backdrop.len());
    document.push_str(&markup[..start]);
    document.push_str(&rewritten);
    document.push_str(&backdrop);
    if self_closing {
        document.push_str("</svg>");
    }
    document.push_str(&markup[end..]);

    tracing::debug!(
        source = ?size.source,
        base_width = size.width,
        base_height = size.height,
        width,
        height,
        "prepared surface for export"
    );
    Ok(PreparedSurface {
        document,
        width,
        height,
        background,
    })
}

/// The serialized document must parse back as a standalone `<svg>` before it
/// is handed to the rasterizer.
pub fn verify_serialized(prepared: &PreparedSurface) -> Result<(), ExportError> {
    let doc = roxmltree::Document::parse(&prepared.document)
        .map_err(|err| ExportError::Markup(err.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" || root.tag_name().namespace() != Some(SVG_NS) {
        return Err(ExportError::Markup(
            "serialized export is not a namespaced <svg> document".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_box_wins_over_attributes() {
        let surface = SvgSurface::new(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 400 300"/>"#,
        );
        let size = resolve_intrinsic_size(&surface).unwrap();
        assert_eq!((size.width, size.height), (400.0, 300.0));
        assert_eq!(size.source, SizeSource::ViewBox);
    }

    #[test]
    fn percentage_width_falls_through_to_bounding_box() {
        let surface = SvgSurface::new(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%"><rect x="0" y="0" width="120" height="80" fill="red"/></svg>"#,
        );
        let size = resolve_intrinsic_size(&surface).unwrap();
        assert_eq!(size.source, SizeSource::BoundingBox);
        assert!((size.width - 120.0).abs() < 0.5);
        assert!((size.height - 80.0).abs() < 0.5);
    }

    #[test]
    fn pixel_attributes_are_used_without_view_box() {
        let surface = SvgSurface::new(r#"<svg width="250px" height="125"></svg>"#);
        let size = resolve_intrinsic_size(&surface).unwrap();
        assert_eq!(size.source, SizeSource::Attributes);
        assert_eq!((size.width, size.height), (250.0, 125.0));
    }

    #[test]
    fn zero_size_is_unresolved() {
        let surface = SvgSurface::new(r#"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0"/>"#);
        assert!(matches!(
            resolve_intrinsic_size(&surface),
            Err(ExportError::UnresolvedSize)
        ));
    }

    #[test]
    fn prepare_scales_clone_and_keeps_original() {
        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300"><circle cx="10" cy="10" r="4" stroke-width="2"/></svg>"#;
        let surface = SvgSurface::new(markup);
        let prepared = prepare_for_export(&surface, 2.0, "#1e293b").unwrap();
        assert_eq!(prepared.pixel_size(), (800, 600));
        assert!(prepared.document.contains("width=\"800\" height=\"600\""));
        assert!(prepared.document.contains("viewBox=\"0 0 400 300\""));
        assert!(prepared.document.contains("fill=\"#1e293b\""));
        assert!(prepared.document.contains("stroke-width=\"2\""));
        assert_eq!(surface.markup(), markup);
    }

    #[test]
    fn prepare_adds_namespace_and_view_box() {
        let surface = SvgSurface::new(r#"<svg width="100" height="50"/>"#);
        let prepared = prepare_for_export(&surface, 3.0, "#ffffff").unwrap();
        assert!(prepared.document.contains("xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(prepared.document.contains("viewBox=\"0 0 100 50\""));
        assert!(prepared.document.ends_with("</svg>"));
        assert!(verify_serialized(&prepared).is_ok());
    }

    #[test]
    fn serialized_check_rejects_broken_documents() {
        let prepared = PreparedSurface {
            document: "<svg><g></svg>".to_string(),
            width: 10.0,
            height: 10.0,
            background: "#ffffff".to_string(),
        };
        assert!(matches!(
            verify_serialized(&prepared),
            Err(ExportError::Markup(_))
        ));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let surface = SvgSurface::new(r#"<svg width="100" height="50"/>"#);
        assert!(matches!(
            prepare_for_export(&surface, 0.0, "#fff"),
            Err(ExportError::InvalidScale(_))
        ));
    }
}
