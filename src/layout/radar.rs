use std::f32::consts::PI;

use crate::config::LayoutConfig;
use crate::ir::{DiagramKind, RadarRecord};
use crate::theme::Theme;

use super::text::TextSetter;
use super::types::{
    CircleShape, Fill, Layout, LineShape, PathShape, RectShape, Scene, Stroke, TextShape,
    TextStyle,
};

pub const MIN_AXES: usize = 3;

pub(super) fn compute_radar_layout(
    record: &RadarRecord,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let cfg = &config.radar;
    let width = config.base_width.unwrap_or(cfg.width);
    let height = cfg.height;
    if record.axes.len() < MIN_AXES {
        return Layout::empty(DiagramKind::Radar, width, height);
    }

    let setter = TextSetter::new(config);
    let font = theme.font_family.as_str();
    let radius = (width - 2.0 * cfg.margin).min(height - 2.0 * cfg.margin) / 2.0;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let count = record.axes.len();
    let slice = 2.0 * PI / count as f32;
    let angle = |i: usize| i as f32 * slice - PI / 2.0;
    let scale = |value: f64| (value.clamp(0.0, 100.0) / 100.0) as f32 * radius;

    let mut scene = Scene::default();
    scene.push_classed(
        "background",
        RectShape::new(0.0, 0.0, width, height).fill(Fill::new(&theme.background)),
    );
    let title = if record.title.trim().is_empty() {
        "Radar Chart"
    } else {
        record.title.as_str()
    };
    scene.push_text(
        "title",
        TextShape::single(
            width / 2.0,
            35.0,
            title,
            TextStyle::new(font, 20.0, &theme.title_color)
                .weight(700)
                .centered(),
        ),
    );

    let levels = cfg.levels.max(1);
    for level in 0..levels {
        let r = radius * (level + 1) as f32 / levels as f32;
        scene.push_classed(
            "level",
            CircleShape::new(cx, cy, r)
                .fill(Fill::new(&theme.grid_fill))
                .stroke(Stroke::new(&theme.border_color, 1.0).dashed("4,4")),
        );
    }

    let label_style = TextStyle::new(font, 12.0, &theme.muted_text_color)
        .weight(600)
        .centered();
    for (i, axis) in record.axes.iter().enumerate() {
        let a = angle(i);
        scene.push_classed(
            "axis",
            LineShape::new(
                (cx, cy),
                (cx + radius * a.cos(), cy + radius * a.sin()),
                Stroke::new(&theme.axis_color, 1.0),
            ),
        );
        let label_r = radius * cfg.label_offset;
        scene.push_text(
            "axis-label",
            setter.middle(
                cx + label_r * a.cos(),
                cy + label_r * a.sin(),
                &axis.label,
                label_style.clone(),
            ),
        );
    }

    let points: Vec<(f32, f32)> = record
        .axes
        .iter()
        .enumerate()
        .map(|(i, axis)| {
            let r = scale(axis.value);
            (cx + r * angle(i).cos(), cy + r * angle(i).sin())
        })
        .collect();
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd}{x:.2},{y:.2}"));
    }
    d.push('Z');
    scene.push_classed(
        "area",
        PathShape {
            d,
            fill: Some(Fill::with_opacity(&theme.radar_fill, 0.2)),
            stroke: Some(Stroke::new(&theme.radar_stroke, 2.0)),
        },
    );
    for (x, y) in points {
        scene.push_classed(
            "point",
            CircleShape::new(x, y, cfg.point_radius)
                .fill(Fill::new(&theme.radar_stroke))
                .stroke(Stroke::new(&theme.surface_fill, 2.0)),
        );
    }

    Layout {
        kind: DiagramKind::Radar,
        width,
        height,
        scene,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RadarAxis;
    use crate::layout::types::Shape;

    fn config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    fn record(values: &[f64]) -> RadarRecord {
        RadarRecord {
            title: "Skills".to_string(),
            axes: values
                .iter()
                .enumerate()
                .map(|(i, value)| RadarAxis {
                    label: format!("Axis {i}"),
                    value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn fewer_than_three_axes_render_nothing() {
        for n in 0..3 {
            let layout = compute_radar_layout(&record(&vec![50.0; n]), &Theme::light(), &config());
            assert!(layout.scene.is_empty(), "{n} axes should not render");
        }
    }

    #[test]
    fn three_axes_are_spaced_from_north() {
        let layout = compute_radar_layout(&record(&[80.0, 80.0, 80.0]), &Theme::light(), &config());
        let (cx, cy) = (layout.width / 2.0, layout.height / 2.0);
        let angles: Vec<f32> = layout
            .scene
            .with_class("point")
            .filter_map(|shape| match shape {
                Shape::Circle(c) => Some((c.cy - cy).atan2(c.cx - cx).to_degrees()),
                _ => None,
            })
            .collect();
        assert_eq!(angles.len(), 3);
        for (got, want) in angles.iter().zip([-90.0f32, 30.0, 150.0]) {
            assert!((got - want).abs() < 1e-2, "{got} vs {want}");
        }
    }

    #[test]
    fn values_map_linearly_onto_radius() {
        let layout = compute_radar_layout(&record(&[100.0, 0.0, 150.0]), &Theme::light(), &config());
        let radius = (600.0f32 - 120.0).min(500.0 - 120.0) / 2.0;
        let (cx, cy) = (layout.width / 2.0, layout.height / 2.0);
        let dists: Vec<f32> = layout
            .scene
            .with_class("point")
            .filter_map(|shape| match shape {
                Shape::Circle(c) => Some(((c.cx - cx).powi(2) + (c.cy - cy).powi(2)).sqrt()),
                _ => None,
            })
            .collect();
        assert!((dists[0] - radius).abs() < 1e-3);
        assert!(dists[1].abs() < 1e-3);
        // out-of-range values are clamped to the outer ring
        assert!((dists[2] - radius).abs() < 1e-3);
    }
}
