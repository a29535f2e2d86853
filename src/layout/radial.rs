use std::f32::consts::PI;

use crate::config::{LayoutConfig, RadialConfig};
use crate::ir::{DiagramKind, RadialNode, RadialRecord};
use crate::theme::Theme;

use super::text::{Flow, TextSetter, truncate};
use super::types::{
    CircleShape, EllipseShape, Fill, Layout, LineShape, PathShape, RectShape, Scene, Stroke,
    TextAnchor, TextShape, TextStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    ActionPlan,
    MindMap,
}

/// Angle of node `index` out of `count`: node 0 due north, then clockwise.
pub fn node_angle(index: usize, count: usize) -> f32 {
    index as f32 * (2.0 * PI / count.max(1) as f32) - PI / 2.0
}

fn node_height(node: &RadialNode, cfg: &RadialConfig) -> f32 {
    let content = (node.items.len() as f32 * cfg.line_height + cfg.content_padding)
        .max(cfg.min_content_height);
    cfg.header_height + content
}

pub(super) fn compute_action_plan_layout(
    record: &RadialRecord,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    compute_radial_layout(record, theme, config, &config.action_plan, Variant::ActionPlan)
}

pub(super) fn compute_mind_map_layout(
    record: &RadialRecord,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    compute_radial_layout(record, theme, config, &config.mind_map, Variant::MindMap)
}

fn compute_radial_layout(
    record: &RadialRecord,
    theme: &Theme,
    config: &LayoutConfig,
    cfg: &RadialConfig,
    variant: Variant,
) -> Layout {
    let kind = match variant {
        Variant::ActionPlan => DiagramKind::ActionPlan,
        Variant::MindMap => DiagramKind::MindMap,
    };
    let base_width = config.base_width.unwrap_or(cfg.width);
    let base_height = cfg.height;
    if record.nodes.is_empty() {
        return Layout::empty(kind, base_width, base_height);
    }

    let radius = (base_width.min(base_height) / 2.0 - cfg.radius_inset).max(0.0);
    let count = record.nodes.len();
    let heights: Vec<f32> = record.nodes.iter().map(|node| node_height(node, cfg)).collect();

    // Grow the canvas so no node box is clipped.
    let mut half_w = cfg.center_width / 2.0;
    let mut half_h = cfg.center_height / 2.0;
    for (i, height) in heights.iter().enumerate() {
        let angle = node_angle(i, count);
        half_w = half_w.max((radius * angle.cos()).abs() + cfg.node_width / 2.0);
        half_h = half_h.max((radius * angle.sin()).abs() + height / 2.0);
    }
    let width = base_width.max(2.0 * (half_w + cfg.margin));
    let height = base_height.max(2.0 * (half_h + cfg.margin));
    let (cx, cy) = (width / 2.0, height / 2.0);

    let setter = TextSetter::new(config);
    let font = theme.font_family.as_str();
    let mut scene = Scene::default();
    scene.push_classed(
        "background",
        RectShape::new(0.0, 0.0, width, height).fill(Fill::new(&theme.background)),
    );

    let positions: Vec<(f32, f32, f32)> = (0..count)
        .map(|i| {
            let angle = node_angle(i, count);
            (cx + radius * angle.cos(), cy + radius * angle.sin(), angle)
        })
        .collect();

    for (i, &(x, y, angle)) in positions.iter().enumerate() {
        match variant {
            Variant::ActionPlan => scene.push_classed(
                "connector",
                LineShape::new(
                    (cx, cy),
                    (x, y),
                    Stroke::new(&theme.connector_color, 2.0).dashed("4,4"),
                ),
            ),
            Variant::MindMap => {
                let control = radius * cfg.control_ratio;
                let d = format!(
                    "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
                    cx,
                    cy,
                    cx + control * angle.cos(),
                    cy + control * angle.sin(),
                    x,
                    y
                );
                scene.push_classed(
                    "connector",
                    PathShape {
                        d,
                        fill: None,
                        stroke: Some(Stroke::new(theme.branch(i), 3.0).opacity(0.6).round()),
                    },
                );
            }
        }
    }

    let center_style = TextStyle::new(font, 16.0, &theme.on_accent_text_color)
        .weight(700)
        .centered();
    match variant {
        Variant::ActionPlan => {
            scene.push_classed(
                "center",
                RectShape::new(
                    cx - cfg.center_width / 2.0,
                    cy - cfg.center_height / 2.0,
                    cfg.center_width,
                    cfg.center_height,
                )
                .rounded(12.0)
                .fill(Fill::new(&theme.center_fill))
                .stroke(Stroke::new(&theme.center_stroke, 2.0)),
            );
            scene.push_text(
                "center-label",
                setter.block(
                    cx,
                    cy,
                    &record.central_topic,
                    cfg.center_width - 20.0,
                    center_style,
                    Flow::Centered,
                ),
            );
        }
        Variant::MindMap => {
            scene.push_classed(
                "center",
                EllipseShape {
                    cx,
                    cy,
                    rx: cfg.center_width / 2.0,
                    ry: cfg.center_height / 2.0,
                    fill: Some(Fill::new(&theme.mind_map_center_fill)),
                    stroke: Some(Stroke::new(&theme.mind_map_center_stroke, 3.0)),
                },
            );
            let topic = if record.central_topic.trim().is_empty() {
                "Central Topic"
            } else {
                record.central_topic.as_str()
            };
            scene.push_text(
                "center-label",
                setter.block(
                    cx,
                    cy,
                    topic,
                    cfg.center_width - 40.0,
                    center_style,
                    Flow::Centered,
                ),
            );
        }
    }

    for (i, (node, &(x, y, _))) in record.nodes.iter().zip(&positions).enumerate() {
        let total = heights[i];
        let left = x - cfg.node_width / 2.0;
        let top = y - total / 2.0;
        match variant {
            Variant::ActionPlan => {
                push_action_node(&mut scene, &setter, node, (left, top, total), cfg, theme)
            }
            Variant::MindMap => {
                push_mind_map_node(&mut scene, node, i, (left, top, total), cfg, theme)
            }
        }
    }

    Layout {
        kind,
        width,
        height,
        scene,
    }
}

fn push_action_node(
    scene: &mut Scene,
    setter: &TextSetter,
    node: &RadialNode,
    (left, top, total): (f32, f32, f32),
    cfg: &RadialConfig,
    theme: &Theme,
) {
    let font = theme.font_family.as_str();
    let w = cfg.node_width;
    scene.push_classed(
        "node",
        RectShape::new(left, top, w, total)
            .rounded(8.0)
            .fill(Fill::new(&theme.surface_fill))
            .stroke(Stroke::new(&theme.border_color, 1.0)),
    );
    scene.push_classed(
        "node-header",
        RectShape::new(left, top, w, cfg.header_height)
            .rounded(8.0)
            .fill(Fill::new(&theme.header_fill)),
    );
    // Redraw the outline over the header fill.
    scene.push_classed(
        "node-outline",
        RectShape::new(left, top, w, total)
            .rounded(8.0)
            .stroke(Stroke::new(&theme.border_color, 1.0)),
    );
    scene.push_classed(
        "node-divider",
        LineShape::new(
            (left, top + cfg.header_height),
            (left + w, top + cfg.header_height),
            Stroke::new(&theme.border_color, 1.0),
        ),
    );
    let title = if node.title.trim().is_empty() {
        "Category"
    } else {
        node.title.as_str()
    };
    scene.push_text(
        "node-title",
        setter.middle(
            left + w / 2.0,
            top + cfg.header_height / 2.0,
            title,
            TextStyle::new(font, 13.0, &theme.title_color)
                .weight(700)
                .centered(),
        ),
    );

    let first_y = top + cfg.header_height + 15.0;
    let item_style = TextStyle::new(font, 11.0, &theme.text_color).anchor(TextAnchor::Start);
    for (j, item) in node.items.iter().enumerate() {
        let y = first_y + j as f32 * cfg.line_height;
        scene.push_classed(
            "node-bullet",
            CircleShape::new(left + 15.0, y, 2.0).fill(Fill::new(&theme.text_color)),
        );
        let label = truncate(item, cfg.item_max_chars, cfg.item_max_chars.saturating_sub(2));
        scene.push_text(
            "node-item",
            setter.middle(left + 25.0, y, &label, item_style.clone()),
        );
    }
}

fn push_mind_map_node(
    scene: &mut Scene,
    node: &RadialNode,
    index: usize,
    (left, top, total): (f32, f32, f32),
    cfg: &RadialConfig,
    theme: &Theme,
) {
    let font = theme.font_family.as_str();
    let w = cfg.node_width;
    let color = theme.branch(index);
    scene.push_classed(
        "node",
        RectShape::new(left, top, w, total)
            .rounded(12.0)
            .fill(Fill::new(&theme.surface_fill))
            .stroke(Stroke::new(color, 2.0)),
    );
    scene.push_text(
        "node-title",
        TextShape::single(
            left + w / 2.0,
            top + 20.0,
            &node.title,
            TextStyle::new(font, 13.0, color).weight(700).centered(),
        ),
    );
    scene.push_classed(
        "node-divider",
        LineShape::new(
            (left + 10.0, top + cfg.header_height),
            (left + w - 10.0, top + cfg.header_height),
            Stroke::new(&theme.divider_color, 1.0),
        ),
    );
    let first_y = top + cfg.header_height + 15.0;
    let item_style = TextStyle::new(font, 11.0, &theme.muted_text_color).centered();
    for (j, item) in node.items.iter().enumerate() {
        let label = truncate(item, cfg.item_max_chars, cfg.item_max_chars.saturating_sub(2));
        scene.push_text(
            "node-item",
            TextShape::single(
                left + w / 2.0,
                first_y + j as f32 * cfg.line_height,
                &label,
                item_style.clone(),
            ),
        );
    }
}
