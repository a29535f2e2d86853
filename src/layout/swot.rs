use crate::config::LayoutConfig;
use crate::ir::{DiagramKind, SwotRecord};
use crate::theme::Theme;

use super::types::{
    CircleShape, Fill, Layout, PathShape, RectShape, Scene, Stroke, TextShape, TextStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Circle,
    Square,
    Triangle,
    Diamond,
}

const QUADRANTS: [(&str, Marker); 4] = [
    ("STRENGTHS", Marker::Circle),
    ("WEAKNESSES", Marker::Square),
    ("OPPORTUNITIES", Marker::Triangle),
    ("THREATS", Marker::Diamond),
];

/// How many items fit in a quadrant `box_height` tall.
pub(super) fn visible_items(total: usize, box_height: f32, config: &LayoutConfig) -> usize {
    let cfg = &config.swot;
    let limit = box_height - cfg.bottom_reserve;
    (0..total)
        .take_while(|i| cfg.first_item_y + *i as f32 * cfg.item_spacing <= limit)
        .count()
}

pub(super) fn compute_swot_layout(
    record: &SwotRecord,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let cfg = &config.swot;
    let width = config.base_width.unwrap_or(cfg.width);
    let height = cfg.height;
    if record.is_empty() {
        return Layout::empty(DiagramKind::Swot, width, height);
    }

    let font = theme.font_family.as_str();
    let inner_w = width - 2.0 * cfg.margin_side;
    let inner_h = height - cfg.margin_top - cfg.margin_bottom;
    let box_w = (inner_w - cfg.gap) / 2.0;
    let box_h = (inner_h - cfg.gap) / 2.0;

    let mut scene = Scene::default();
    scene.push_classed(
        "background",
        RectShape::new(0.0, 0.0, width, height).fill(Fill::new(&theme.background)),
    );
    scene.push_text(
        "title",
        TextShape::single(
            width / 2.0,
            35.0,
            &format!("SWOT: {}", record.topic),
            TextStyle::new(font, 22.0, &theme.title_color)
                .weight(800)
                .centered(),
        ),
    );

    let lists = [
        &record.strengths,
        &record.weaknesses,
        &record.opportunities,
        &record.threats,
    ];
    let item_color = if theme.dark {
        &theme.muted_text_color
    } else {
        &theme.text_color
    };
    for (q, ((title, marker), items)) in QUADRANTS.iter().zip(lists).enumerate() {
        let colors = &theme.swot[q];
        let x0 = cfg.margin_side + (q % 2) as f32 * (box_w + cfg.gap);
        let y0 = cfg.margin_top + (q / 2) as f32 * (box_h + cfg.gap);
        let (stroke_w, stroke_opacity) = if theme.dark { (1.0, 0.5) } else { (0.5, 0.3) };

        scene.push_classed(
            "quadrant",
            RectShape::new(x0, y0, box_w, box_h)
                .rounded(12.0)
                .fill(Fill::with_opacity(&colors.fill, colors.fill_opacity))
                .stroke(Stroke::new(&colors.accent, stroke_w).opacity(stroke_opacity)),
        );
        push_marker(&mut scene, *marker, x0 + 24.0, y0 + 32.0, &colors.accent);
        scene.push_text(
            "quadrant-title",
            TextShape::single(
                x0 + 42.0,
                y0 + 36.0,
                title,
                TextStyle::new(font, 14.0, &colors.accent)
                    .weight(900)
                    .letter_spacing(0.7),
            ),
        );

        let bullet = if theme.dark { item_color } else { &colors.accent };
        let shown = visible_items(items.len(), box_h, config);
        for (i, item) in items.iter().take(shown).enumerate() {
            let item_y = y0 + cfg.first_item_y + i as f32 * cfg.item_spacing;
            scene.push_classed(
                "item-bullet",
                CircleShape::new(x0 + 24.0, item_y - 4.0, 2.5).fill(Fill::new(bullet)),
            );
            scene.push_text(
                "item",
                TextShape::single(
                    x0 + 38.0,
                    item_y,
                    item,
                    TextStyle::new(font, 13.0, item_color),
                ),
            );
        }
    }

    Layout {
        kind: DiagramKind::Swot,
        width,
        height,
        scene,
    }
}

fn push_marker(scene: &mut Scene, marker: Marker, cx: f32, cy: f32, color: &str) {
    let fill = Fill::new(color);
    match marker {
        Marker::Circle => scene.push_classed(
            "quadrant-marker",
            CircleShape::new(cx, cy, 6.0).fill(fill),
        ),
        Marker::Square => scene.push_classed(
            "quadrant-marker",
            RectShape::new(cx - 6.0, cy - 6.0, 12.0, 12.0)
                .rounded(2.0)
                .fill(fill),
        ),
        Marker::Triangle | Marker::Diamond => {
            let d = if marker == Marker::Triangle {
                format!(
                    "M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} Z",
                    cx,
                    cy - 6.0,
                    cx + 6.0,
                    cy + 6.0,
                    cx - 6.0,
                    cy + 6.0
                )
            } else {
                format!(
                    "M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} Z",
                    cx,
                    cy - 6.0,
                    cx + 6.0,
                    cy,
                    cx,
                    cy + 6.0,
                    cx - 6.0,
                    cy
                )
            };
            scene.push_classed(
                "quadrant-marker",
                PathShape {
                    d,
                    fill: Some(fill),
                    stroke: None,
                },
            );
        }
    }
}
