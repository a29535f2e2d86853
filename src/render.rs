use crate::layout::{Fill, Layout, Shape, Stroke, TextShape};
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\" class=\"diagram {}\" font-family=\"{}\">",
        layout.kind.file_stem(),
        escape_xml(&theme.font_family)
    );

    if !layout.scene.markers.is_empty() {
        svg.push_str("<defs>");
        for marker in &layout.scene.markers {
            let _ = write!(
                svg,
                "<marker id=\"{}\" viewBox=\"0 0 10 10\" refX=\"9\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
                marker.id,
                escape_xml(&marker.color)
            );
        }
        svg.push_str("</defs>");
    }

    for element in &layout.scene.elements {
        let class = element
            .class
            .map(|c| format!(" class=\"{c}\""))
            .unwrap_or_default();
        match &element.shape {
            Shape::Rect(rect) => {
                let _ = write!(
                    svg,
                    "<rect{class} x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"",
                    rect.x, rect.y, rect.width, rect.height
                );
                if rect.rx > 0.0 {
                    let _ = write!(svg, " rx=\"{:.2}\" ry=\"{:.2}\"", rect.rx, rect.rx);
                }
                svg.push_str(&paint_attrs(rect.fill.as_ref(), rect.stroke.as_ref()));
                svg.push_str("/>");
            }
            Shape::Line(line) => {
                let _ = write!(
                    svg,
                    "<line{class} x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"",
                    line.x1, line.y1, line.x2, line.y2
                );
                svg.push_str(&stroke_attrs(&line.stroke));
                if let Some(marker) = &line.marker_end {
                    let _ = write!(svg, " marker-end=\"url(#{marker})\"");
                }
                svg.push_str("/>");
            }
            Shape::Path(path) => {
                let _ = write!(svg, "<path{class} d=\"{}\"", path.d);
                svg.push_str(&paint_attrs(path.fill.as_ref(), path.stroke.as_ref()));
                svg.push_str("/>");
            }
            Shape::Circle(circle) => {
                let _ = write!(
                    svg,
                    "<circle{class} cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\"",
                    circle.cx, circle.cy, circle.r
                );
                svg.push_str(&paint_attrs(circle.fill.as_ref(), circle.stroke.as_ref()));
                svg.push_str("/>");
            }
            Shape::Ellipse(ellipse) => {
                let _ = write!(
                    svg,
                    "<ellipse{class} cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\"",
                    ellipse.cx, ellipse.cy, ellipse.rx, ellipse.ry
                );
                svg.push_str(&paint_attrs(ellipse.fill.as_ref(), ellipse.stroke.as_ref()));
                svg.push_str("/>");
            }
            Shape::Text(text) => svg.push_str(&text_svg(text, &class)),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn paint_attrs(fill: Option<&Fill>, stroke: Option<&Stroke>) -> String {
    let mut out = String::new();
    match fill {
        Some(fill) => {
            let _ = write!(out, " fill=\"{}\"", escape_xml(&fill.color));
            if let Some(opacity) = fill.opacity {
                let _ = write!(out, " fill-opacity=\"{opacity}\"");
            }
        }
        None => out.push_str(" fill=\"none\""),
    }
    if let Some(stroke) = stroke {
        out.push_str(&stroke_attrs(stroke));
    }
    out
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut out = format!(
        " stroke=\"{}\" stroke-width=\"{}\"",
        escape_xml(&stroke.color),
        stroke.width
    );
    if let Some(dash) = &stroke.dasharray {
        let _ = write!(out, " stroke-dasharray=\"{}\"", escape_xml(dash));
    }
    if let Some(opacity) = stroke.opacity {
        let _ = write!(out, " stroke-opacity=\"{opacity}\"");
    }
    if stroke.round_cap {
        out.push_str(" stroke-linecap=\"round\"");
    }
    out
}

fn text_svg(text: &TextShape, class: &str) -> String {
    let Some(first) = text.lines.first() else {
        return String::new();
    };
    let style = &text.style;
    let mut out = String::new();
    let _ = write!(
        out,
        "<text{class} x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\"",
        text.x,
        first.y,
        style.anchor.as_str(),
        escape_xml(&style.font_family),
        style.font_size,
        style.font_weight,
        escape_xml(&style.color)
    );
    if let Some(spacing) = style.letter_spacing {
        let _ = write!(out, " letter-spacing=\"{spacing}\"");
    }
    if let Some(degrees) = text.rotate {
        let _ = write!(
            out,
            " transform=\"rotate({degrees} {:.2} {:.2})\"",
            text.x, first.y
        );
    }
    out.push('>');
    for line in &text.lines {
        let _ = write!(
            out,
            "<tspan x=\"{:.2}\" y=\"{:.2}\">{}</tspan>",
            text.x,
            line.y,
            escape_xml(&line.content)
        );
    }
    out.push_str("</text>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
