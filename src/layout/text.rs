use crate::config::LayoutConfig;
use crate::text_metrics;

use super::types::{TextLine, TextShape, TextStyle};

/// Baseline shift that puts the visual middle of a line on its anchor.
const MIDDLE_BASELINE_EM: f32 = 0.35;

/// Greedy word wrap: words are accumulated while the measured line fits in
/// `max_width`. A word wider than `max_width` on its own keeps its own line.
pub fn wrap(content: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in content.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Per-line offsets that center `count` lines around the anchor.
pub fn centered_offsets(count: usize, line_height: f32) -> Vec<f32> {
    let shift = count.saturating_sub(1) as f32 / 2.0 * line_height;
    (0..count).map(|i| i as f32 * line_height - shift).collect()
}

/// Truncate to `keep` characters plus an ellipsis when longer than `limit`.
pub fn truncate(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(keep).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// First baseline sits on the anchor, following lines flow downward.
    Down,
    /// The block is vertically centered on the anchor.
    Centered,
}

/// Measures and wraps labels with the font settings of one render.
#[derive(Debug, Clone, Copy)]
pub struct TextSetter {
    fast_metrics: bool,
    line_height: f32,
}

impl TextSetter {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            fast_metrics: config.fast_text_metrics,
            line_height: config.label_line_height,
        }
    }

    pub fn width(&self, text: &str, style: &TextStyle) -> f32 {
        text_width(
            text,
            style.font_size,
            &style.font_family,
            style.font_weight,
            self.fast_metrics,
        )
    }

    pub fn wrap(&self, content: &str, max_width: f32, style: &TextStyle) -> Vec<String> {
        wrap(content, max_width, |line| self.width(line, style))
    }

    pub fn line_height(&self, style: &TextStyle) -> f32 {
        style.font_size * self.line_height
    }

    /// Wrap `content` at `max_width` and position its lines around `(x, y)`.
    pub fn block(
        &self,
        x: f32,
        y: f32,
        content: &str,
        max_width: f32,
        style: TextStyle,
        flow: Flow,
    ) -> TextShape {
        let wrapped = self.wrap(content, max_width, &style);
        let line_height = self.line_height(&style);
        let offsets = match flow {
            Flow::Down => (0..wrapped.len()).map(|i| i as f32 * line_height).collect(),
            Flow::Centered => centered_offsets(wrapped.len(), line_height),
        };
        let baseline = match flow {
            Flow::Down => 0.0,
            Flow::Centered => style.font_size * MIDDLE_BASELINE_EM,
        };
        let lines = wrapped
            .into_iter()
            .zip(offsets)
            .map(|(content, offset)| TextLine {
                content,
                y: y + offset + baseline,
            })
            .collect();
        TextShape {
            x,
            lines,
            style,
            rotate: None,
        }
    }

    /// Single unwrapped line whose visual middle sits on `y`.
    pub fn middle(&self, x: f32, y: f32, content: &str, style: TextStyle) -> TextShape {
        let baseline = y + style.font_size * MIDDLE_BASELINE_EM;
        TextShape::single(x, baseline, content, style)
    }
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    // Advance widths relative to the font size for a typical sans-serif face.
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        '\'' | '"' => 0.3,
        '-' => 0.4,
        'A' => 0.652,
        'B' => 0.648,
        'C' => 0.734,
        'D' => 0.723,
        'E' => 0.594,
        'F' => 0.575,
        'G' | 'H' => 0.742,
        'I' => 0.272,
        'J' => 0.557,
        'K' => 0.648,
        'L' => 0.559,
        'M' => 0.903,
        'N' => 0.763,
        'O' => 0.754,
        'P' => 0.623,
        'Q' => 0.755,
        'R' => 0.637,
        'S' => 0.633,
        'T' => 0.599,
        'U' => 0.746,
        'V' => 0.661,
        'W' => 0.958,
        'X' => 0.655,
        'Y' => 0.646,
        'Z' => 0.621,
        'a' => 0.550,
        'b' => 0.603,
        'c' => 0.547,
        'd' => 0.609,
        'e' => 0.570,
        'f' => 0.340,
        'g' | 'h' => 0.600,
        'i' => 0.235,
        'j' => 0.227,
        'k' => 0.522,
        'l' => 0.239,
        'm' => 0.867,
        'n' => 0.585,
        'o' => 0.574,
        'p' => 0.595,
        'q' => 0.585,
        'r' => 0.364,
        's' => 0.523,
        't' => 0.305,
        'u' => 0.585,
        'v' => 0.545,
        'w' => 0.811,
        'x' => 0.538,
        'y' => 0.556,
        'z' => 0.550,
        '0'..='9' => 0.6,
        '@' | '#' | '%' | '&' => 0.946,
        _ => 0.568,
    }
}

pub(crate) fn text_width(
    text: &str,
    font_size: f32,
    font_family: &str,
    font_weight: u16,
    fast_metrics: bool,
) -> f32 {
    if fast_metrics {
        return fallback_text_width(text, font_size, font_weight);
    }
    text_metrics::measure_text_width(text, font_size, font_family, font_weight)
        .unwrap_or_else(|| fallback_text_width(text, font_size, font_weight))
}

fn fallback_text_width(text: &str, font_size: f32, font_weight: u16) -> f32 {
    let bold = if font_weight >= 600 { 1.06 } else { 1.0 };
    text.chars().map(char_width_factor).sum::<f32>() * font_size * bold
}
