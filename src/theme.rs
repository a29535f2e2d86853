use serde::{Deserialize, Serialize};

/// Branch colors cycled by node index in mind maps.
const BRANCH_PALETTE: [&str; 6] = [
    "#3b82f6", // blue
    "#10b981", // emerald
    "#f59e0b", // amber
    "#8b5cf6", // violet
    "#ef4444", // red
    "#06b6d4", // cyan
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantColors {
    pub fill: String,
    pub fill_opacity: f32,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub dark: bool,
    pub font_family: String,
    pub background: String,

    // strokes
    pub spine_color: String,
    pub rib_color: String,
    pub branch_color: String,
    pub border_color: String,
    pub grid_color: String,
    pub axis_color: String,
    pub connector_color: String,
    pub divider_color: String,

    // surfaces
    pub surface_fill: String,
    pub surface_alt_fill: String,
    pub header_fill: String,
    pub row_even_fill: String,
    pub row_odd_fill: String,
    pub grid_fill: String,
    pub head_fill: String,
    pub head_stroke: String,
    pub center_fill: String,
    pub center_stroke: String,

    // text
    pub title_color: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub faint_text_color: String,
    pub head_text_color: String,
    pub on_accent_text_color: String,

    // accents
    pub accent: String,
    pub highlight: String,
    pub radar_fill: String,
    pub radar_stroke: String,
    pub mind_map_center_fill: String,
    pub mind_map_center_stroke: String,
    pub branch_palette: Vec<String>,
    pub swot: [QuadrantColors; 4],
}

impl Theme {
    /// Resolve the full color set for a light or dark canvas.
    pub fn resolve(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    pub fn light() -> Self {
        Self {
            dark: false,
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#ffffff".to_string(),
            spine_color: "#334155".to_string(),
            rib_color: "#475569".to_string(),
            branch_color: "#94a3b8".to_string(),
            border_color: "#e2e8f0".to_string(),
            grid_color: "#e2e8f0".to_string(),
            axis_color: "#cbd5e1".to_string(),
            connector_color: "#94a3b8".to_string(),
            divider_color: "#f1f5f9".to_string(),
            surface_fill: "#ffffff".to_string(),
            surface_alt_fill: "#f8fafc".to_string(),
            header_fill: "#f1f5f9".to_string(),
            row_even_fill: "#ffffff".to_string(),
            row_odd_fill: "#f8fafc".to_string(),
            grid_fill: "#f8fafc".to_string(),
            head_fill: "#eff6ff".to_string(),
            head_stroke: "#2563eb".to_string(),
            center_fill: "#1e40af".to_string(),
            center_stroke: "#172554".to_string(),
            title_color: "#1e293b".to_string(),
            text_color: "#334155".to_string(),
            muted_text_color: "#64748b".to_string(),
            faint_text_color: "#94a3b8".to_string(),
            head_text_color: "#1e3a8a".to_string(),
            on_accent_text_color: "#ffffff".to_string(),
            accent: "#3b82f6".to_string(),
            highlight: "#ef4444".to_string(),
            radar_fill: "#8b5cf6".to_string(),
            radar_stroke: "#7c3aed".to_string(),
            mind_map_center_fill: "#ec4899".to_string(),
            mind_map_center_stroke: "#831843".to_string(),
            branch_palette: BRANCH_PALETTE.iter().map(|c| c.to_string()).collect(),
            swot: [
                QuadrantColors {
                    fill: "#ecfdf5".to_string(),
                    fill_opacity: 1.0,
                    accent: "#059669".to_string(),
                },
                QuadrantColors {
                    fill: "#fef2f2".to_string(),
                    fill_opacity: 1.0,
                    accent: "#dc2626".to_string(),
                },
                QuadrantColors {
                    fill: "#eff6ff".to_string(),
                    fill_opacity: 1.0,
                    accent: "#2563eb".to_string(),
                },
                QuadrantColors {
                    fill: "#fffbeb".to_string(),
                    fill_opacity: 1.0,
                    accent: "#d97706".to_string(),
                },
            ],
        }
    }

    pub fn dark() -> Self {
        Self {
            dark: true,
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#0f172a".to_string(),
            spine_color: "#94a3b8".to_string(),
            rib_color: "#64748b".to_string(),
            branch_color: "#475569".to_string(),
            border_color: "#475569".to_string(),
            grid_color: "#334155".to_string(),
            axis_color: "#475569".to_string(),
            connector_color: "#64748b".to_string(),
            divider_color: "#475569".to_string(),
            surface_fill: "#1e293b".to_string(),
            surface_alt_fill: "#0f172a".to_string(),
            header_fill: "#334155".to_string(),
            row_even_fill: "#1e293b".to_string(),
            row_odd_fill: "#0f172a".to_string(),
            grid_fill: "none".to_string(),
            head_fill: "#1e40af".to_string(),
            head_stroke: "#3b82f6".to_string(),
            center_fill: "#1e40af".to_string(),
            center_stroke: "#60a5fa".to_string(),
            title_color: "#e2e8f0".to_string(),
            text_color: "#cbd5e1".to_string(),
            muted_text_color: "#94a3b8".to_string(),
            faint_text_color: "#94a3b8".to_string(),
            head_text_color: "#ffffff".to_string(),
            on_accent_text_color: "#ffffff".to_string(),
            accent: "#3b82f6".to_string(),
            highlight: "#ef4444".to_string(),
            radar_fill: "#8b5cf6".to_string(),
            radar_stroke: "#7c3aed".to_string(),
            mind_map_center_fill: "#ec4899".to_string(),
            mind_map_center_stroke: "#831843".to_string(),
            branch_palette: BRANCH_PALETTE.iter().map(|c| c.to_string()).collect(),
            swot: [
                QuadrantColors {
                    fill: "#064e3b".to_string(),
                    fill_opacity: 0.3,
                    accent: "#059669".to_string(),
                },
                QuadrantColors {
                    fill: "#7f1d1d".to_string(),
                    fill_opacity: 0.3,
                    accent: "#dc2626".to_string(),
                },
                QuadrantColors {
                    fill: "#1e3a8a".to_string(),
                    fill_opacity: 0.3,
                    accent: "#2563eb".to_string(),
                },
                QuadrantColors {
                    fill: "#78350f".to_string(),
                    fill_opacity: 0.3,
                    accent: "#d97706".to_string(),
                },
            ],
        }
    }

    /// Branch color for the node at `index`, cycling through the palette.
    pub fn branch(&self, index: usize) -> &str {
        if self.branch_palette.is_empty() {
            return self.accent.as_str();
        }
        self.branch_palette[index % self.branch_palette.len()].as_str()
    }
}

/// Parse `#rgb` / `#rrggbb` / `#rrggbbaa` into RGBA components.
pub fn parse_hex_color(value: &str) -> Option<[u8; 4]> {
    let hex = value.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (idx, ch) in hex.chars().enumerate() {
                let v = ch.to_digit(16)? as u8;
                out[idx] = v * 17;
            }
            Some(out)
        }
        6 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ]),
        8 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ]),
        _ => None,
    }
}
