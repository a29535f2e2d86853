#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
#[cfg(feature = "png")]
pub mod export;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use error::{ExportError, ParseError};
pub use ir::{Dashboard, DiagramKind, DiagramRecord};
pub use layout::{compute_layout, Layout};
pub use parser::{parse_dashboard, parse_record};
pub use render::render_svg;
pub use theme::Theme;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub dark: bool,
    pub config: Config,
}

impl RenderOptions {
    pub fn light() -> Self {
        Self::default()
    }

    pub fn dark() -> Self {
        Self {
            dark: true,
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}

/// A laid out and rendered diagram, ready to mount or export.
#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    pub kind: DiagramKind,
    pub svg: String,
    pub width: f32,
    pub height: f32,
}

#[cfg(feature = "png")]
impl RenderedDiagram {
    pub fn surface(&self) -> export::SvgSurface {
        export::SvgSurface::new(self.svg.clone()).with_kind(self.kind)
    }
}

pub fn render(record: &DiagramRecord, dark: bool, config: &Config) -> RenderedDiagram {
    let theme = config.theme_for(dark);
    let layout = compute_layout(record, &theme, &config.layout);
    RenderedDiagram {
        kind: layout.kind,
        svg: render_svg(&layout, &theme),
        width: layout.width,
        height: layout.height,
    }
}

/// Parse one JSON record and render it to SVG markup.
pub fn render_with_options(json: &str, options: RenderOptions) -> anyhow::Result<String> {
    let record = parse_record(json)?;
    Ok(render(&record, options.dark, &options.config).svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_record_from_json() {
        let svg = render_with_options(
            r#"{"type":"FISHBONE","problem":"Late deliveries","categories":[{"name":"People","items":["Training"]}]}"#,
            RenderOptions::dark(),
        )
        .unwrap();
        assert!(svg.contains("class=\"diagram fishbone\""));
        assert!(svg.contains("Late deliveries"));
    }

    #[test]
    fn render_reports_canvas_size() {
        let record = DiagramRecord::Swot(ir::SwotRecord {
            topic: "Entry".into(),
            threats: vec!["Incumbents".into()],
            ..Default::default()
        });
        let rendered = render(&record, false, &Config::default());
        assert_eq!(rendered.kind, DiagramKind::Swot);
        assert_eq!((rendered.width, rendered.height), (800.0, 600.0));
    }
}
