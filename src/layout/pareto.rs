use crate::config::LayoutConfig;
use crate::ir::{DiagramKind, ParetoItem, ParetoRecord};
use crate::theme::Theme;

use super::text::TextSetter;
use super::types::{
    CircleShape, Fill, Layout, LineShape, PathShape, RectShape, Scene, Stroke, TextAnchor,
    TextShape, TextStyle,
};

/// Running share of the total, in percent, for each item in source order.
pub fn cumulative_percentages(items: &[ParetoItem]) -> Vec<f64> {
    // Values are divided by the largest one first so sums near f64::MAX stay finite.
    let peak = items.iter().map(|item| item.value.max(0.0)).fold(0.0, f64::max);
    if !(peak > 0.0) {
        return vec![0.0; items.len()];
    }
    let scaled: Vec<f64> = items.iter().map(|item| item.value.max(0.0) / peak).collect();
    let total: f64 = scaled.iter().sum();
    let mut running = 0.0;
    scaled
        .iter()
        .map(|share| {
            running += share;
            running / total * 100.0
        })
        .collect()
}

pub(super) fn compute_pareto_layout(
    record: &ParetoRecord,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let cfg = &config.pareto;
    let width = config.base_width.unwrap_or(cfg.width);
    let height = cfg.height;
    if record.items.is_empty() {
        return Layout::empty(DiagramKind::Pareto, width, height);
    }

    let setter = TextSetter::new(config);
    let font = theme.font_family.as_str();
    let (left, top) = (cfg.margin_left, cfg.margin_top);
    let inner_w = width - cfg.margin_left - cfg.margin_right;
    let inner_h = height - cfg.margin_top - cfg.margin_bottom;

    let values: Vec<f64> = record.items.iter().map(|item| item.value.max(0.0)).collect();
    let cumulative = cumulative_percentages(&record.items);
    let max_value = values.iter().copied().fold(0.0, f64::max);
    let value_max = nice_max(max_value, 10);
    let y_value = |v: f64| top + inner_h - (v / value_max) as f32 * inner_h;
    let y_percent = |p: f64| top + inner_h - (p / 100.0) as f32 * inner_h;

    // Band scale with equal inner and outer padding.
    let n = record.items.len() as f32;
    let step = inner_w / (n + cfg.band_padding).max(1.0);
    let bandwidth = step * (1.0 - cfg.band_padding);
    let band_x = |i: usize| left + step * cfg.band_padding + i as f32 * step;

    let mut scene = Scene::default();
    scene.push_classed(
        "background",
        RectShape::new(0.0, 0.0, width, height).fill(Fill::new(&theme.background)),
    );

    let title = if record.title.trim().is_empty() {
        "Pareto Chart"
    } else {
        record.title.as_str()
    };
    scene.push_text(
        "title",
        TextShape::single(
            width / 2.0,
            40.0,
            title,
            TextStyle::new(font, 20.0, &theme.title_color)
                .weight(700)
                .centered(),
        ),
    );

    for tick in ticks(value_max, 10) {
        let y = y_value(tick);
        scene.push_classed(
            "grid",
            LineShape::new((left, y), (left + inner_w, y), Stroke::new(&theme.grid_color, 1.0)),
        );
    }
    scene.push_classed(
        "axis",
        LineShape::new(
            (left, top + inner_h),
            (left + inner_w, top + inner_h),
            Stroke::new(&theme.axis_color, 1.0),
        ),
    );

    let tick_style = TextStyle::new(font, 12.0, &theme.muted_text_color);
    for tick in ticks(value_max, cfg.value_ticks) {
        scene.push_text(
            "value-tick",
            setter.middle(
                left - 10.0,
                y_value(tick),
                &format_number(tick),
                tick_style.clone().anchor(TextAnchor::End),
            ),
        );
    }
    let percent_style = TextStyle::new(font, 12.0, &theme.highlight);
    let percent_steps = (100.0 / cfg.percent_tick_step.max(1.0)).floor() as usize;
    for i in 0..=percent_steps {
        let pct = (i as f32 * cfg.percent_tick_step.max(1.0)) as f64;
        scene.push_text(
            "percent-tick",
            setter.middle(
                left + inner_w + 10.0,
                y_percent(pct),
                &format!("{}%", format_number(pct)),
                percent_style.clone(),
            ),
        );
    }

    let axis_title = |label: &str, x: f32, color: &str| {
        TextShape::single(
            x,
            top + inner_h / 2.0,
            label,
            TextStyle::new(font, 13.0, color).weight(600).centered(),
        )
        .rotated(-90.0)
    };
    scene.push_text("axis-title", axis_title("Frequency", left - 45.0, &theme.title_color));
    scene.push_text(
        "axis-title",
        axis_title("Cumulative %", left + inner_w + 50.0, &theme.highlight),
    );

    let category_style = TextStyle::new(font, 12.0, &theme.muted_text_color)
        .weight(500)
        .anchor(TextAnchor::End);
    let mut points = Vec::with_capacity(values.len());
    for (i, (item, value)) in record.items.iter().zip(&values).enumerate() {
        let x = band_x(i);
        let center = x + bandwidth / 2.0;
        let y = y_value(*value);
        scene.push_classed(
            "bar",
            RectShape::new(x, y, bandwidth, top + inner_h - y)
                .rounded(4.0)
                .fill(Fill::with_opacity(&theme.accent, 0.9)),
        );
        scene.push_text(
            "bar-label",
            TextShape::single(
                center,
                y - 8.0,
                &format_number(*value),
                TextStyle::new(font, 11.0, &theme.accent)
                    .weight(600)
                    .centered(),
            ),
        );
        scene.push_text(
            "category-label",
            TextShape::single(
                center - 10.0,
                top + inner_h + 15.0 + 12.0 * 0.71,
                &item.name,
                category_style.clone(),
            )
            .rotated(-30.0),
        );
        points.push((center, y_percent(cumulative[i])));
    }

    scene.push_classed(
        "cumulative-line",
        PathShape {
            d: monotone_x_path(&points),
            fill: None,
            stroke: Some(Stroke::new(&theme.highlight, 3.0)),
        },
    );
    for (cx, cy) in points {
        scene.push_classed(
            "cumulative-point",
            CircleShape::new(cx, cy, cfg.point_radius)
                .fill(Fill::new(&theme.surface_fill))
                .stroke(Stroke::new(&theme.highlight, 2.0)),
        );
    }

    Layout {
        kind: DiagramKind::Pareto,
        width,
        height,
        scene,
    }
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Extend `[0, max]` so the upper bound lands on a round tick.
fn nice_max(max: f64, count: usize) -> f64 {
    if !(max > 0.0) || !max.is_finite() {
        return 1.0;
    }
    let mut stop = max;
    let mut previous = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(0.0, stop, count);
        if step == previous {
            break;
        }
        if step > 0.0 {
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        previous = step;
    }
    stop
}

fn ticks(max: f64, count: usize) -> Vec<f64> {
    let step = tick_increment(0.0, max, count);
    if !step.is_finite() || step == 0.0 {
        return vec![0.0];
    }
    if step > 0.0 {
        let n = (max / step + 1e-9).floor() as usize;
        (0..=n).map(|i| i as f64 * step).collect()
    } else {
        let inv = -step;
        let n = (max * inv + 1e-9).floor() as usize;
        (0..=n).map(|i| i as f64 / inv).collect()
    }
}

fn format_number(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Cubic path through `points` preserving monotonicity in y between samples.
pub(crate) fn monotone_x_path(points: &[(f32, f32)]) -> String {
    let mut path = String::new();
    let Some(&(x0, y0)) = points.first() else {
        return path;
    };
    path.push_str(&format!("M{x0:.2},{y0:.2}"));
    let mut pts: Vec<(f32, f32)> = Vec::with_capacity(points.len());
    for &p in points {
        if pts.last() != Some(&p) {
            pts.push(p);
        }
    }
    match pts.len() {
        0 | 1 => return path,
        2 => {
            path.push_str(&format!("L{:.2},{:.2}", pts[1].0, pts[1].1));
            return path;
        }
        _ => {}
    }

    let mut tangents = vec![0.0f32; pts.len()];
    for i in 1..pts.len() - 1 {
        tangents[i] = interior_slope(pts[i - 1], pts[i], pts[i + 1]);
    }
    tangents[0] = end_slope(pts[0], pts[1], tangents[1]);
    let last = pts.len() - 1;
    tangents[last] = end_slope(pts[last - 1], pts[last], tangents[last - 1]);

    for i in 0..last {
        let (xa, ya) = pts[i];
        let (xb, yb) = pts[i + 1];
        let dx = (xb - xa) / 3.0;
        path.push_str(&format!(
            "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            xa + dx,
            ya + dx * tangents[i],
            xb - dx,
            yb - dx * tangents[i + 1],
            xb,
            yb
        ));
    }
    path
}

fn interior_slope(p0: (f32, f32), p1: (f32, f32), p2: (f32, f32)) -> f32 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    if h0 == 0.0 || h1 == 0.0 {
        return 0.0;
    }
    let s0 = (p1.1 - p0.1) / h0;
    let s1 = (p2.1 - p1.1) / h1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
    let slope = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if slope.is_finite() { slope } else { 0.0 }
}

fn end_slope(p0: (f32, f32), p1: (f32, f32), neighbour: f32) -> f32 {
    let h = p1.0 - p0.0;
    if h == 0.0 {
        neighbour
    } else {
        (3.0 * (p1.1 - p0.1) / h - neighbour) / 2.0
    }
}
