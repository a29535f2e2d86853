use diagram_rs_renderer::{Config, RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagramRenderOptions {
    dark: Option<bool>,
    font_family: Option<String>,
    fast_text: Option<bool>,
    base_width: Option<f32>,
}

fn build_render_options(options: DiagramRenderOptions) -> RenderOptions {
    let mut config = Config::default();
    if let Some(font_family) = options.font_family {
        config.theme_variables.font_family = Some(font_family);
    }
    // No system fonts inside a browser sandbox; the width table is the only option there.
    config.layout.fast_text_metrics = options.fast_text.unwrap_or(true);
    config.layout.base_width = options.base_width;

    RenderOptions {
        dark: options.dark.unwrap_or(false),
        config,
    }
}

#[wasm_bindgen]
pub fn render_diagram_svg(json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<DiagramRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        DiagramRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(json, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}
