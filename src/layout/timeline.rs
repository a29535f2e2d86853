use crate::config::{LayoutConfig, TimelineConfig};
use crate::ir::{DiagramKind, TimelineRecord};
use crate::theme::Theme;

use super::text::truncate;
use super::types::{
    CircleShape, Fill, Layout, LineShape, RectShape, Scene, Stroke, TextShape, TextStyle,
};

/// Canvas width needed so `count` events keep at least the minimum spacing.
pub(super) fn timeline_width(count: usize, base_width: f32, cfg: &TimelineConfig) -> f32 {
    let needed = count as f32 * cfg.min_event_spacing + 2.0 * cfg.range_inset + 2.0 * cfg.margin_side;
    base_width.max(needed)
}

/// Point-scale positions over `[start, end]` with half-step outer padding.
fn point_positions(count: usize, start: f32, end: f32, padding: f32) -> Vec<f32> {
    let span = (end - start).max(0.0);
    let step = span / ((count as f32 - 1.0) + 2.0 * padding).max(1.0);
    let offset = (span - step * (count as f32 - 1.0)) / 2.0;
    (0..count)
        .map(|i| start + offset + i as f32 * step)
        .collect()
}

pub(super) fn compute_timeline_layout(
    record: &TimelineRecord,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let cfg = &config.timeline;
    let base_width = config.base_width.unwrap_or(cfg.width);
    let height = cfg.height;
    if record.events.is_empty() {
        return Layout::empty(DiagramKind::Timeline, base_width, height);
    }

    let font = theme.font_family.as_str();
    let width = timeline_width(record.events.len(), base_width, cfg);
    let left = cfg.margin_side;
    let inner_w = width - 2.0 * cfg.margin_side;
    let line_y = cfg.margin_top + (height - cfg.margin_top - cfg.margin_bottom) / 2.0;

    let mut scene = Scene::default();
    scene.push_classed(
        "background",
        RectShape::new(0.0, 0.0, width, height).fill(Fill::new(&theme.background)),
    );
    let title = if record.title.trim().is_empty() {
        "Timeline"
    } else {
        record.title.as_str()
    };
    scene.push_text(
        "title",
        TextShape::single(
            width / 2.0,
            40.0,
            title,
            TextStyle::new(font, 22.0, &theme.title_color)
                .weight(700)
                .centered(),
        ),
    );
    scene.push_classed(
        "spine",
        LineShape::new(
            (left, line_y),
            (left + inner_w, line_y),
            Stroke::new(&theme.axis_color, 4.0).round(),
        ),
    );

    let xs = point_positions(
        record.events.len(),
        left + cfg.range_inset,
        left + inner_w - cfg.range_inset,
        cfg.point_padding,
    );
    let (bw, bh) = (cfg.box_width, cfg.box_height);
    for (i, (event, x)) in record.events.iter().zip(xs).enumerate() {
        let above = i % 2 == 0;
        let stem_end = if above {
            line_y - cfg.stem_length
        } else {
            line_y + cfg.stem_length
        };
        scene.push_classed(
            "stem",
            LineShape::new(
                (x, line_y),
                (x, stem_end),
                Stroke::new(&theme.connector_color, 2.0).dashed("4,2"),
            ),
        );
        scene.push_classed(
            "event-dot",
            CircleShape::new(x, line_y, 6.0)
                .fill(Fill::new(&theme.accent))
                .stroke(Stroke::new(&theme.surface_fill, 2.0)),
        );

        let box_y = if above { stem_end - bh } else { stem_end };
        scene.push_classed(
            "event-box",
            RectShape::new(x - bw / 2.0, box_y, bw, bh)
                .rounded(6.0)
                .fill(Fill::new(&theme.surface_fill))
                .stroke(Stroke::new(&theme.border_color, 1.0)),
        );
        scene.push_classed(
            "event-header",
            RectShape::new(x - bw / 2.0, box_y, bw, cfg.box_header_height)
                .rounded(6.0)
                .fill(Fill::new(&theme.header_fill)),
        );
        scene.push_text(
            "event-date",
            TextShape::single(
                x,
                box_y + 16.0,
                &event.date,
                TextStyle::new(font, 11.0, &theme.muted_text_color)
                    .weight(600)
                    .centered(),
            ),
        );
        scene.push_text(
            "event-title",
            TextShape::single(
                x,
                box_y + 40.0,
                &truncate(&event.title, cfg.title_max_chars, cfg.title_max_chars),
                TextStyle::new(font, 12.0, &theme.title_color)
                    .weight(700)
                    .centered(),
            ),
        );
        if let Some(description) = event.description.as_deref() {
            scene.push_text(
                "event-description",
                TextShape::single(
                    x,
                    box_y + 56.0,
                    &truncate(
                        description,
                        cfg.description_max_chars,
                        cfg.description_max_chars,
                    ),
                    TextStyle::new(font, 10.0, &theme.faint_text_color).centered(),
                ),
            );
        }
    }

    Layout {
        kind: DiagramKind::Timeline,
        width,
        height,
        scene,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TimelineEvent;
    use crate::layout::types::Shape;

    fn config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    fn record(count: usize) -> TimelineRecord {
        TimelineRecord {
            title: "Roadmap".to_string(),
            events: (0..count)
                .map(|i| TimelineEvent {
                    date: format!("Q{}", i + 1),
                    title: format!("Milestone {i}"),
                    description: (i % 2 == 0).then(|| "Something worth noting happened here".to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn point_scale_matches_half_padding() {
        let xs = point_positions(4, 0.0, 400.0, 0.5);
        assert_eq!(xs, vec![50.0, 150.0, 250.0, 350.0]);
        assert_eq!(point_positions(1, 0.0, 100.0, 0.5), vec![50.0]);
    }

    #[test]
    fn events_alternate_sides() {
        let layout = compute_timeline_layout(&record(4), &Theme::light(), &config());
        let line_y = 70.0 + (500.0 - 110.0) / 2.0;
        let ends: Vec<f32> = layout
            .scene
            .with_class("stem")
            .filter_map(|shape| match shape {
                Shape::Line(line) => Some(line.y2),
                _ => None,
            })
            .collect();
        assert_eq!(ends, vec![line_y - 60.0, line_y + 60.0, line_y - 60.0, line_y + 60.0]);
    }

    #[test]
    fn many_events_widen_the_canvas() {
        let few = compute_timeline_layout(&record(5), &Theme::light(), &config());
        let many = compute_timeline_layout(&record(20), &Theme::light(), &config());
        assert_eq!(few.width, 1000.0);
        assert!(many.width > few.width);
        let xs: Vec<f32> = many
            .scene
            .with_class("event-dot")
            .filter_map(|shape| match shape {
                Shape::Circle(c) => Some(c.cx),
                _ => None,
            })
            .collect();
        assert!(xs.windows(2).all(|w| w[1] - w[0] >= 80.0 - 1e-3));
    }

    #[test]
    fn long_text_is_truncated() {
        let mut input = record(1);
        input.events[0].title = "An unusually long milestone title".to_string();
        let layout = compute_timeline_layout(&input, &Theme::light(), &config());
        let title = layout
            .scene
            .with_class("event-title")
            .find_map(|shape| match shape {
                Shape::Text(text) => Some(text.lines[0].content.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(title, "An unusually long ...");
    }

    #[test]
    fn empty_events_render_nothing() {
        let layout = compute_timeline_layout(&TimelineRecord::default(), &Theme::light(), &config());
        assert!(layout.scene.is_empty());
    }
}
