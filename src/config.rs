use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutAlgorithm {
    /// Recursive angular-sector subdivision with fan-out radius inflation.
    #[default]
    RadialSector,
    /// Plain full-circle split at every node, constant radius. Weaker
    /// spacing, kept as a style option.
    Circular,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub algorithm: LayoutAlgorithm,
    pub base_radius: f32,
    /// Child counts at or above this switch to the inflated radius.
    pub fanout_threshold: usize,
    pub fanout_radius_base: f32,
    pub fanout_radius_per_child: f32,
    pub child_sweep_deg: f32,
    pub root_sweep_deg: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::RadialSector,
            base_radius: 250.0,
            fanout_threshold: 5,
            fanout_radius_base: 300.0,
            fanout_radius_per_child: 10.0,
            child_sweep_deg: 90.0,
            root_sweep_deg: 360.0,
        }
    }
}

/// Box metrics for a rendered node. These mirror the stylesheet the
/// renderer emits; layout geometry is computed from the same numbers the
/// browser will honor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetricsConfig {
    pub padding_x: f32,
    pub padding_y: f32,
    pub icon_size: f32,
    pub icon_gap: f32,
    pub border_width: f32,
    pub line_height: f32,
    pub corner_radius: f32,
    /// Use the calibrated character table instead of querying system fonts.
    /// Deterministic across machines, which matters more here than matching
    /// any one machine's font files.
    pub fast_text_metrics: bool,
}

impl Default for NodeMetricsConfig {
    fn default() -> Self {
        Self {
            padding_x: 20.0,
            padding_y: 12.0,
            icon_size: 20.0,
            icon_gap: 12.0,
            border_width: 1.0,
            line_height: 24.0,
            corner_radius: 12.0,
            fast_text_metrics: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Button zoom multiplies or divides by this step.
    pub zoom_step: f32,
    pub wheel_in: f32,
    pub wheel_out: f32,
    /// Fraction of the viewport the fitted map may occupy.
    pub fit_margin: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
            zoom_step: 1.2,
            wheel_in: 1.1,
            wheel_out: 0.9,
            fit_margin: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Canvas size the initial fit is computed against; the document refits
    /// to the real window once loaded.
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#f8fafc".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub node: NodeMetricsConfig,
    pub viewport: ViewportConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::clean();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            node: NodeMetricsConfig::default(),
            viewport: ViewportConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    node_border: Option<String>,
    level_fills: Option<Vec<String>>,
    connector_stroke: Option<String>,
    connector_width: Option<f32>,
    control_background: Option<String>,
    control_border: Option<String>,
    control_text: Option<String>,
    control_hover: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    algorithm: Option<LayoutAlgorithm>,
    base_radius: Option<f32>,
    fanout_threshold: Option<usize>,
    fanout_radius_base: Option<f32>,
    fanout_radius_per_child: Option<f32>,
    child_sweep_deg: Option<f32>,
    root_sweep_deg: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct NodeMetricsConfigFile {
    padding_x: Option<f32>,
    padding_y: Option<f32>,
    icon_size: Option<f32>,
    icon_gap: Option<f32>,
    border_width: Option<f32>,
    line_height: Option<f32>,
    corner_radius: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ViewportConfigFile {
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    zoom_step: Option<f32>,
    wheel_in: Option<f32>,
    wheel_out: Option<f32>,
    fit_margin: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    node: Option<NodeMetricsConfigFile>,
    viewport: Option<ViewportConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    apply_config_file(&mut config, &contents)?;
    Ok(config)
}

fn apply_config_file(config: &mut Config, contents: &str) -> anyhow::Result<()> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "slate" || theme_name == "dark" {
            config.theme = Theme::slate();
        } else if theme_name == "clean" || theme_name == "default" {
            config.theme = Theme::clean();
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.level_fills
            && !v.is_empty()
        {
            config.theme.level_fills = v;
        }
        if let Some(v) = vars.connector_stroke {
            config.theme.connector_stroke = v;
        }
        if let Some(v) = vars.connector_width {
            config.theme.connector_width = v;
        }
        if let Some(v) = vars.control_background {
            config.theme.control_background = v;
        }
        if let Some(v) = vars.control_border {
            config.theme.control_border = v;
        }
        if let Some(v) = vars.control_text {
            config.theme.control_text = v;
        }
        if let Some(v) = vars.control_hover {
            config.theme.control_hover = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.algorithm {
            config.layout.algorithm = v;
        }
        if let Some(v) = layout.base_radius {
            config.layout.base_radius = v;
        }
        if let Some(v) = layout.fanout_threshold {
            config.layout.fanout_threshold = v;
        }
        if let Some(v) = layout.fanout_radius_base {
            config.layout.fanout_radius_base = v;
        }
        if let Some(v) = layout.fanout_radius_per_child {
            config.layout.fanout_radius_per_child = v;
        }
        if let Some(v) = layout.child_sweep_deg {
            config.layout.child_sweep_deg = v;
        }
        if let Some(v) = layout.root_sweep_deg {
            config.layout.root_sweep_deg = v;
        }
    }

    if let Some(node) = parsed.node {
        if let Some(v) = node.padding_x {
            config.node.padding_x = v;
        }
        if let Some(v) = node.padding_y {
            config.node.padding_y = v;
        }
        if let Some(v) = node.icon_size {
            config.node.icon_size = v;
        }
        if let Some(v) = node.icon_gap {
            config.node.icon_gap = v;
        }
        if let Some(v) = node.border_width {
            config.node.border_width = v;
        }
        if let Some(v) = node.line_height {
            config.node.line_height = v;
        }
        if let Some(v) = node.corner_radius {
            config.node.corner_radius = v;
        }
        if let Some(v) = node.fast_text_metrics {
            config.node.fast_text_metrics = v;
        }
    }

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.min_scale {
            config.viewport.min_scale = v;
        }
        if let Some(v) = viewport.max_scale {
            config.viewport.max_scale = v;
        }
        if let Some(v) = viewport.zoom_step {
            config.viewport.zoom_step = v;
        }
        if let Some(v) = viewport.wheel_in {
            config.viewport.wheel_in = v;
        }
        if let Some(v) = viewport.wheel_out {
            config.viewport.wheel_out = v;
        }
        if let Some(v) = viewport.fit_margin {
            config.viewport.fit_margin = v;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_merges_only_given_fields() {
        let mut config = Config::default();
        apply_config_file(
            &mut config,
            r##"{
                "theme": "slate",
                "themeVariables": {"connectorStroke": "#123456"},
                "layout": {"baseRadius": 200, "algorithm": "circular"},
                "viewport": {"maxScale": 5}
            }"##,
        )
        .unwrap();

        assert_eq!(config.theme.background, "#0f172a");
        assert_eq!(config.theme.connector_stroke, "#123456");
        assert_eq!(config.layout.base_radius, 200.0);
        assert_eq!(config.layout.algorithm, LayoutAlgorithm::Circular);
        assert_eq!(config.viewport.max_scale, 5.0);
        // untouched fields keep their defaults
        assert_eq!(config.layout.child_sweep_deg, 90.0);
        assert_eq!(config.viewport.min_scale, 0.1);
        assert_eq!(config.node.padding_x, 20.0);
    }

    #[test]
    fn background_override_follows_into_render() {
        let mut config = Config::default();
        apply_config_file(
            &mut config,
            r##"{"themeVariables": {"background": "#fafafa"}}"##,
        )
        .unwrap();
        assert_eq!(config.render.background, "#fafafa");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut config = Config::default();
        assert!(apply_config_file(&mut config, "{nope").is_err());
    }
}
