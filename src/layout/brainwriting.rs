use crate::config::{BrainwritingConfig, LayoutConfig};
use crate::ir::{BrainwritingRecord, DiagramKind};
use crate::theme::Theme;

use super::text::TextSetter;
use super::types::{Fill, Layout, RectShape, Scene, Stroke, TextLine, TextShape, TextStyle};

/// Estimated height of a cell holding `text` in a column `column_width` wide.
pub(super) fn cell_height(text: &str, column_width: f32, cfg: &BrainwritingConfig) -> f32 {
    let usable = (column_width - 2.0 * cfg.cell_inset).max(1.0);
    let chars = text.chars().count() as f32;
    let estimated = (chars * cfg.avg_char_width / usable).ceil() as usize;
    let lines = estimated.max(cfg.min_lines);
    lines as f32 * cfg.line_height + 2.0 * cfg.row_padding
}

pub(super) fn compute_brainwriting_layout(
    record: &BrainwritingRecord,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let cfg = &config.brainwriting;
    let width = config.base_width.unwrap_or(cfg.width);
    if record.columns.is_empty() || record.rows.is_empty() {
        let height = cfg.margin_top + cfg.header_height + cfg.margin_bottom;
        return Layout::empty(DiagramKind::Brainwriting, width, height);
    }

    let setter = TextSetter::new(config);
    let font = theme.font_family.as_str();
    let inner_w = width - 2.0 * cfg.margin_side;
    let participant_w = inner_w * cfg.participant_share;
    let idea_w = inner_w * (1.0 - cfg.participant_share) / record.columns.len() as f32;
    let column_count = record.columns.len() + 1;
    let col_x = |i: usize| {
        let offset = if i == 0 {
            0.0
        } else {
            participant_w + (i - 1) as f32 * idea_w
        };
        cfg.margin_side + offset
    };
    let col_w = |i: usize| if i == 0 { participant_w } else { idea_w };

    // Row heights first: the canvas height depends on all of them.
    let rows: Vec<(Vec<&str>, f32)> = record
        .rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(column_count);
            cells.push(row.participant.as_str());
            for c in 0..record.columns.len() {
                cells.push(row.ideas.get(c).map(String::as_str).unwrap_or(""));
            }
            let height = cells
                .iter()
                .enumerate()
                .map(|(i, text)| cell_height(text, col_w(i), cfg))
                .fold(0.0, f32::max);
            (cells, height)
        })
        .collect();
    let table_h: f32 = cfg.header_height + rows.iter().map(|(_, h)| h).sum::<f32>();
    let height = cfg.margin_top + table_h + cfg.margin_bottom;

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
            &format!("Brainwriting: {}", record.topic),
            TextStyle::new(font, 20.0, &theme.title_color)
                .weight(700)
                .centered(),
        ),
    );

    let top = cfg.margin_top;
    let header_style = TextStyle::new(font, 14.0, &theme.title_color)
        .weight(600)
        .centered();
    let headers = std::iter::once("Participant").chain(record.columns.iter().map(String::as_str));
    for (i, header) in headers.enumerate() {
        scene.push_classed(
            "header",
            RectShape::new(col_x(i), top, col_w(i), cfg.header_height)
                .fill(Fill::new(&theme.header_fill))
                .stroke(Stroke::new(&theme.axis_color, 1.0)),
        );
        scene.push_text(
            "header-label",
            setter.middle(
                col_x(i) + col_w(i) / 2.0,
                top + cfg.header_height / 2.0,
                header,
                header_style.clone(),
            ),
        );
    }

    let cell_style = TextStyle::new(font, 13.0, &theme.text_color);
    let mut y = top + cfg.header_height;
    for (row_index, (cells, row_h)) in rows.iter().enumerate() {
        let fill = if row_index % 2 == 0 {
            &theme.row_even_fill
        } else {
            &theme.row_odd_fill
        };
        scene.push_classed(
            "row",
            RectShape::new(cfg.margin_side, y, inner_w, *row_h).fill(Fill::new(fill)),
        );
        for (i, text) in cells.iter().enumerate() {
            scene.push_classed(
                "cell",
                RectShape::new(col_x(i), y, col_w(i), *row_h)
                    .stroke(Stroke::new(&theme.axis_color, 1.0)),
            );
            let wrapped = setter.wrap(text, col_w(i) - 2.0 * cfg.cell_inset, &cell_style);
            let first_baseline = y + cfg.row_padding + cell_style.font_size * 0.8;
            let lines = wrapped
                .into_iter()
                .enumerate()
                .map(|(n, content)| TextLine {
                    content,
                    y: first_baseline + n as f32 * cfg.line_height,
                })
                .collect();
            scene.push_text(
                "cell-text",
                TextShape {
                    x: col_x(i) + cfg.cell_inset,
                    lines,
                    style: cell_style.clone(),
                    rotate: None,
                },
            );
        }
        y += row_h;
    }

    Layout {
        kind: DiagramKind::Brainwriting,
        width,
        height,
        scene,
    }
}
