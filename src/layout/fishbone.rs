use crate::config::LayoutConfig;
use crate::ir::{DiagramKind, FishboneRecord};
use crate::theme::Theme;

use super::text::{Flow, TextSetter};
use super::types::{
    Fill, Layout, LineShape, PathShape, RectShape, Scene, Stroke, TextAnchor, TextStyle,
};

const CATEGORY_SHRINK_CHARS: usize = 25;

/// Canvas size for a fishbone with `category_count` ribs, the longest holding
/// `max_items` items.
pub(super) fn fishbone_extent(
    category_count: usize,
    max_items: usize,
    config: &LayoutConfig,
) -> (f32, f32, f32, f32) {
    let cfg = &config.fishbone;
    let angle = cfg.rib_angle_deg.to_radians();
    let rib_length = cfg
        .min_rib_length
        .max(max_items as f32 * cfg.item_spacing + cfg.rib_padding);
    let pairs = category_count.div_ceil(2);
    let spine_rib_span = pairs.saturating_sub(1) as f32 * cfg.rib_spacing_x + cfg.spine_rib_padding;
    let head_x = cfg.margin_left + cfg.text_buffer_left + rib_length * angle.cos() + spine_rib_span;
    let width = cfg
        .min_width
        .max(head_x + cfg.head_shape_width + cfg.margin_right);
    let height = cfg
        .min_height
        .max(rib_length * angle.sin() * 2.0 + cfg.vertical_padding);
    (width, height, head_x, rib_length)
}

pub(super) fn compute_fishbone_layout(
    record: &FishboneRecord,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let cfg = &config.fishbone;
    if record.categories.is_empty() {
        return Layout::empty(DiagramKind::Fishbone, cfg.min_width, cfg.min_height);
    }

    let setter = TextSetter::new(config);
    let max_items = record
        .categories
        .iter()
        .map(|cat| cat.items.len())
        .max()
        .unwrap_or(0);
    let (width, height, head_x, rib_length) =
        fishbone_extent(record.categories.len(), max_items, config);
    let angle = cfg.rib_angle_deg.to_radians();
    let spine_y = height / 2.0;

    let mut scene = Scene::default();
    scene.push_classed(
        "background",
        RectShape::new(0.0, 0.0, width, height).fill(Fill::new(&theme.background)),
    );

    let marker = scene.arrow_marker(&theme.spine_color);
    let mut spine = LineShape::new(
        (cfg.margin_left, spine_y),
        (head_x, spine_y),
        Stroke::new(&theme.spine_color, 5.0).round(),
    );
    spine.marker_end = Some(marker);
    scene.push_classed("spine", spine);

    // Head: rounded tab pointing right, anchored at the spine's end.
    let hw = cfg.head_width;
    let hh = cfg.head_height;
    let (hx, hy) = (head_x, spine_y);
    let d = format!(
        "M {:.2} {:.2} L {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} L {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} Z",
        hx + 5.0,
        hy - hh / 2.0,
        hx + hw - 30.0,
        hy - hh / 2.0,
        hx + hw,
        hy - hh / 2.0,
        hx + hw,
        hy,
        hx + hw,
        hy + hh / 2.0,
        hx + hw - 30.0,
        hy + hh / 2.0,
        hx + 5.0,
        hy + hh / 2.0,
        hx - 15.0,
        hy + hh / 2.0,
        hx - 15.0,
        hy,
        hx - 15.0,
        hy - hh / 2.0,
        hx + 5.0,
        hy - hh / 2.0,
    );
    scene.push_classed(
        "head",
        PathShape {
            d,
            fill: Some(Fill::new(&theme.head_fill)),
            stroke: Some(Stroke::new(&theme.head_stroke, 2.0)),
        },
    );
    let problem = if record.problem.trim().is_empty() {
        "Effect"
    } else {
        record.problem.as_str()
    };
    let head_style = TextStyle::new(&theme.font_family, 16.0, &theme.head_text_color)
        .weight(800)
        .centered();
    scene.push_text(
        "head-label",
        setter.block(
            hx + hw / 2.0 - 10.0,
            hy,
            problem,
            hw - 40.0,
            head_style,
            Flow::Centered,
        ),
    );

    let dx = -angle.cos() * rib_length;
    let rise = angle.sin() * rib_length;
    for (i, category) in record.categories.iter().enumerate() {
        let pair = (i / 2) as f32;
        let top = i % 2 == 0;
        let attach_x = head_x - cfg.head_attach_offset - pair * cfg.rib_spacing_x;
        let dy = if top { -rise } else { rise };
        let tip = (attach_x + dx, spine_y + dy);

        scene.push_classed(
            "rib",
            LineShape::new(
                (attach_x, spine_y),
                tip,
                Stroke::new(&theme.rib_color, 3.0).round(),
            ),
        );

        let box_y = if top {
            tip.1 - cfg.category_height - 8.0
        } else {
            tip.1 + 8.0
        };
        scene.push_classed(
            "category",
            RectShape::new(
                tip.0 - cfg.category_width / 2.0,
                box_y,
                cfg.category_width,
                cfg.category_height,
            )
            .rounded(6.0)
            .fill(Fill::new(&theme.surface_fill))
            .stroke(Stroke::new(&theme.muted_text_color, 2.0)),
        );
        let name = if category.name.trim().is_empty() {
            "Category"
        } else {
            category.name.as_str()
        };
        let font_size = if name.chars().count() > CATEGORY_SHRINK_CHARS {
            11.0
        } else {
            13.0
        };
        let label_style = TextStyle::new(&theme.font_family, font_size, &theme.title_color)
            .weight(700)
            .centered();
        scene.push_text(
            "category-label",
            setter.middle(tip.0, box_y + cfg.category_height / 2.0, name, label_style),
        );

        let count = category.items.len();
        for (j, item) in category.items.iter().enumerate() {
            let t = if count > 1 {
                cfg.item_start_t + j as f32 / (count - 1) as f32 * (cfg.item_end_t - cfg.item_start_t)
            } else {
                0.5
            };
            let px = attach_x + t * dx;
            let py = spine_y + t * dy;
            let branch_end = px + cfg.branch_length;
            scene.push_classed(
                "item-branch",
                LineShape::new(
                    (px, py),
                    (branch_end, py),
                    Stroke::new(&theme.branch_color, 1.5),
                ),
            );
            let item_style = TextStyle::new(&theme.font_family, 12.0, &theme.text_color)
                .weight(500)
                .anchor(TextAnchor::Start);
            scene.push_text(
                "item-label",
                setter.block(
                    branch_end + 5.0,
                    py - 4.0,
                    item,
                    cfg.item_wrap_width,
                    item_style,
                    Flow::Down,
                ),
            );
        }
    }

    Layout {
        kind: DiagramKind::Fishbone,
        width,
        height,
        scene,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::FishboneCategory;
    use crate::layout::types::Shape;

    fn config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    fn record(items_per_category: &[usize]) -> FishboneRecord {
        FishboneRecord {
            problem: "Late deliveries".to_string(),
            categories: items_per_category
                .iter()
                .enumerate()
                .map(|(i, count)| FishboneCategory {
                    name: format!("Category {i}"),
                    items: (0..*count).map(|j| format!("Cause {j}")).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn empty_categories_render_nothing() {
        let layout = compute_fishbone_layout(&record(&[]), &Theme::light(), &config());
        assert!(layout.scene.is_empty());
        assert_eq!((layout.width, layout.height), (1000.0, 600.0));
    }

    #[test]
    fn rib_length_follows_item_count() {
        let (_, _, _, short) = fishbone_extent(2, 1, &config());
        assert_eq!(short, 240.0);
        let (_, _, _, long) = fishbone_extent(2, 6, &config());
        assert_eq!(long, 6.0 * 35.0 + 120.0);
    }

    #[test]
    fn canvas_grows_with_items_and_categories() {
        let small = compute_fishbone_layout(&record(&[1, 1]), &Theme::light(), &config());
        let tall = compute_fishbone_layout(&record(&[12, 1]), &Theme::light(), &config());
        let wide = compute_fishbone_layout(&record(&[1; 8]), &Theme::light(), &config());
        assert!(tall.height > small.height);
        assert!(tall.width >= small.width);
        assert!(wide.width > small.width);
        assert!(small.width >= 1000.0 && small.height >= 600.0);
    }

    #[test]
    fn ribs_alternate_above_and_below_spine() {
        let layout = compute_fishbone_layout(&record(&[2, 2, 2]), &Theme::light(), &config());
        let spine_y = layout.height / 2.0;
        let tips: Vec<f32> = layout
            .scene
            .with_class("rib")
            .filter_map(|shape| match shape {
                Shape::Line(line) => Some(line.y2),
                _ => None,
            })
            .collect();
        assert_eq!(tips.len(), 3);
        assert!(tips[0] < spine_y);
        assert!(tips[1] > spine_y);
        assert!(tips[2] < spine_y);
    }

    #[test]
    fn items_sit_between_fifteen_and_eighty_five_percent() {
        let layout = compute_fishbone_layout(&record(&[3]), &Theme::light(), &config());
        let spine_y = layout.height / 2.0;
        let rise = 240.0 * 60f32.to_radians().sin();
        let ys: Vec<f32> = layout
            .scene
            .with_class("item-branch")
            .filter_map(|shape| match shape {
                Shape::Line(line) => Some(line.y1),
                _ => None,
            })
            .collect();
        assert_eq!(ys.len(), 3);
        assert!((spine_y - ys[0] - 0.15 * rise).abs() < 1e-3);
        assert!((spine_y - ys[1] - 0.5 * rise).abs() < 1e-3);
        assert!((spine_y - ys[2] - 0.85 * rise).abs() < 1e-3);
    }

    #[test]
    fn layout_is_deterministic() {
        let input = record(&[3, 4, 1]);
        let a = compute_fishbone_layout(&input, &Theme::dark(), &config());
        let b = compute_fishbone_layout(&input, &Theme::dark(), &config());
        assert_eq!(a, b);
    }
}
