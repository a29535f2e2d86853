use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FishboneConfig {
    pub item_spacing: f32,
    pub min_rib_length: f32,
    pub rib_padding: f32,
    pub rib_angle_deg: f32,
    pub rib_spacing_x: f32,
    pub text_buffer_left: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub head_shape_width: f32,
    pub head_width: f32,
    pub head_height: f32,
    pub head_attach_offset: f32,
    pub spine_rib_padding: f32,
    pub vertical_padding: f32,
    pub min_width: f32,
    pub min_height: f32,
    pub category_width: f32,
    pub category_height: f32,
    pub branch_length: f32,
    pub item_wrap_width: f32,
    pub item_start_t: f32,
    pub item_end_t: f32,
}

impl Default for FishboneConfig {
    fn default() -> Self {
        Self {
            item_spacing: 35.0,
            min_rib_length: 240.0,
            rib_padding: 120.0,
            rib_angle_deg: 60.0,
            rib_spacing_x: 400.0,
            text_buffer_left: 220.0,
            margin_left: 50.0,
            margin_right: 50.0,
            head_shape_width: 260.0,
            head_width: 240.0,
            head_height: 120.0,
            head_attach_offset: 120.0,
            spine_rib_padding: 120.0,
            vertical_padding: 140.0,
            min_width: 1000.0,
            min_height: 600.0,
            category_width: 180.0,
            category_height: 44.0,
            branch_length: 45.0,
            item_wrap_width: 220.0,
            item_start_t: 0.15,
            item_end_t: 0.85,
        }
    }
}

/// Geometry of the polar layout shared by action plans and mind maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialConfig {
    pub width: f32,
    pub height: f32,
    pub radius_inset: f32,
    pub margin: f32,
    pub node_width: f32,
    pub header_height: f32,
    pub line_height: f32,
    pub content_padding: f32,
    pub min_content_height: f32,
    pub center_width: f32,
    pub center_height: f32,
    pub control_ratio: f32,
    pub item_max_chars: usize,
}

impl RadialConfig {
    pub fn action_plan() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
            radius_inset: 140.0,
            margin: 40.0,
            node_width: 200.0,
            header_height: 36.0,
            line_height: 20.0,
            content_padding: 20.0,
            min_content_height: 60.0,
            center_width: 220.0,
            center_height: 80.0,
            control_ratio: 0.0,
            item_max_chars: 30,
        }
    }

    pub fn mind_map() -> Self {
        Self {
            width: 1200.0,
            height: 900.0,
            radius_inset: 160.0,
            margin: 40.0,
            node_width: 180.0,
            header_height: 30.0,
            line_height: 18.0,
            content_padding: 15.0,
            min_content_height: 40.0,
            center_width: 200.0,
            center_height: 120.0,
            control_ratio: 0.4,
            item_max_chars: 30,
        }
    }
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self::action_plan()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParetoConfig {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub band_padding: f32,
    pub value_ticks: usize,
    pub percent_tick_step: f32,
    pub point_radius: f32,
}

impl Default for ParetoConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            margin_top: 70.0,
            margin_right: 60.0,
            margin_bottom: 80.0,
            margin_left: 60.0,
            band_padding: 0.3,
            value_ticks: 5,
            percent_tick_step: 10.0,
            point_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadarConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub levels: usize,
    pub label_offset: f32,
    pub point_radius: f32,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 500.0,
            margin: 60.0,
            levels: 5,
            label_offset: 1.15,
            point_radius: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_side: f32,
    pub margin_bottom: f32,
    pub range_inset: f32,
    pub point_padding: f32,
    pub min_event_spacing: f32,
    pub stem_length: f32,
    pub box_width: f32,
    pub box_height: f32,
    pub box_header_height: f32,
    pub title_max_chars: usize,
    pub description_max_chars: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 500.0,
            margin_top: 70.0,
            margin_side: 40.0,
            margin_bottom: 40.0,
            range_inset: 50.0,
            point_padding: 0.5,
            min_event_spacing: 80.0,
            stem_length: 60.0,
            box_width: 140.0,
            box_height: 70.0,
            box_header_height: 24.0,
            title_max_chars: 18,
            description_max_chars: 22,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrainwritingConfig {
    pub width: f32,
    pub margin_top: f32,
    pub margin_side: f32,
    pub margin_bottom: f32,
    pub participant_share: f32,
    pub header_height: f32,
    pub row_padding: f32,
    pub line_height: f32,
    pub cell_inset: f32,
    pub avg_char_width: f32,
    pub min_lines: usize,
}

impl Default for BrainwritingConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            margin_top: 60.0,
            margin_side: 20.0,
            margin_bottom: 20.0,
            participant_share: 0.2,
            header_height: 50.0,
            row_padding: 15.0,
            line_height: 20.0,
            cell_inset: 10.0,
            avg_char_width: 7.0,
            min_lines: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwotConfig {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_side: f32,
    pub margin_bottom: f32,
    pub gap: f32,
    pub first_item_y: f32,
    pub item_spacing: f32,
    pub bottom_reserve: f32,
}

impl Default for SwotConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin_top: 60.0,
            margin_side: 20.0,
            margin_bottom: 20.0,
            gap: 12.0,
            first_item_y: 70.0,
            item_spacing: 26.0,
            bottom_reserve: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Skip font lookup and measure with the built-in width table.
    pub fast_text_metrics: bool,
    /// Line height as a multiple of the font size for wrapped labels.
    pub label_line_height: f32,
    /// Overrides the default canvas width of fixed-size variants.
    pub base_width: Option<f32>,
    pub fishbone: FishboneConfig,
    pub pareto: ParetoConfig,
    pub action_plan: RadialConfig,
    #[serde(deserialize_with = "mind_map_config")]
    pub mind_map: RadialConfig,
    pub brainwriting: BrainwritingConfig,
    pub swot: SwotConfig,
    pub radar: RadarConfig,
    pub timeline: TimelineConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fast_text_metrics: false,
            label_line_height: 1.2,
            base_width: None,
            fishbone: FishboneConfig::default(),
            pareto: ParetoConfig::default(),
            action_plan: RadialConfig::action_plan(),
            mind_map: RadialConfig::mind_map(),
            brainwriting: BrainwritingConfig::default(),
            swot: SwotConfig::default(),
            radar: RadarConfig::default(),
            timeline: TimelineConfig::default(),
        }
    }
}

// Partial `mindMap` objects must fill gaps from the mind map preset, not from
// `RadialConfig::default()` (the action plan preset).
fn mind_map_config<'de, D>(deserializer: D) -> Result<RadialConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let overrides = serde_json::Value::deserialize(deserializer)?;
    let mut merged = serde_json::to_value(RadialConfig::mind_map()).map_err(D::Error::custom)?;
    if let (Some(base), serde_json::Value::Object(patch)) = (merged.as_object_mut(), overrides) {
        for (key, value) in patch {
            base.insert(key, value);
        }
    }
    serde_json::from_value(merged).map_err(D::Error::custom)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    pub clipboard_scale: f32,
    pub download_scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            clipboard_scale: 2.0,
            download_scale: 3.0,
        }
    }
}

/// Per-color overrides applied on top of the resolved light/dark theme.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeVariables {
    pub font_family: Option<String>,
    pub background: Option<String>,
    pub title_color: Option<String>,
    pub text_color: Option<String>,
    pub accent: Option<String>,
    pub highlight: Option<String>,
    pub border_color: Option<String>,
    pub branch_palette: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub dark_mode: bool,
    pub theme_variables: ThemeVariables,
    pub layout: LayoutConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Theme for the configured mode with `themeVariables` applied.
    pub fn theme(&self) -> Theme {
        self.theme_for(self.dark_mode)
    }

    pub fn theme_for(&self, dark: bool) -> Theme {
        let mut theme = Theme::resolve(dark);
        let vars = &self.theme_variables;
        if let Some(v) = &vars.font_family {
            theme.font_family = v.clone();
        }
        if let Some(v) = &vars.background {
            theme.background = v.clone();
        }
        if let Some(v) = &vars.title_color {
            theme.title_color = v.clone();
        }
        if let Some(v) = &vars.text_color {
            theme.text_color = v.clone();
        }
        if let Some(v) = &vars.accent {
            theme.accent = v.clone();
        }
        if let Some(v) = &vars.highlight {
            theme.highlight = v.clone();
        }
        if let Some(v) = &vars.border_color {
            theme.border_color = v.clone();
        }
        if let Some(v) = &vars.branch_palette
            && !v.is_empty()
        {
            theme.branch_palette = v.clone();
        }
        theme
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config: Config = match serde_json::from_str(&contents) {
        Ok(config) => config,
        Err(strict_err) => json5::from_str(&contents).map_err(|_| strict_err)?,
    };
    Ok(config)
}
