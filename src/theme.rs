use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub node_border: String,
    /// Fill per depth; depths past the end reuse the last entry.
    pub level_fills: Vec<String>,
    pub connector_stroke: String,
    pub connector_width: f32,
    pub control_background: String,
    pub control_border: String,
    pub control_text: String,
    pub control_hover: String,
}

impl Theme {
    /// Default light look: Inter on slate, sky/green/yellow fills per level.
    pub fn clean() -> Self {
        Self {
            font_family: "'Inter', sans-serif".to_string(),
            font_size: 16.0,
            background: "#f8fafc".to_string(),
            text_color: "#0f172a".to_string(),
            node_border: "#e2e8f0".to_string(),
            level_fills: vec![
                "#ffffff".to_string(),
                "#e0f2fe".to_string(),
                "#dcfce7".to_string(),
                "#fef9c3".to_string(),
            ],
            connector_stroke: "#cbd5e1".to_string(),
            connector_width: 2.0,
            control_background: "#ffffff".to_string(),
            control_border: "#e2e8f0".to_string(),
            control_text: "#475569".to_string(),
            control_hover: "#f1f5f9".to_string(),
        }
    }

    pub fn slate() -> Self {
        Self {
            font_family: "'Inter', sans-serif".to_string(),
            font_size: 16.0,
            background: "#0f172a".to_string(),
            text_color: "#e2e8f0".to_string(),
            node_border: "#334155".to_string(),
            level_fills: vec![
                "#1e293b".to_string(),
                "#164e63".to_string(),
                "#14532d".to_string(),
                "#713f12".to_string(),
            ],
            connector_stroke: "#475569".to_string(),
            connector_width: 2.0,
            control_background: "#1e293b".to_string(),
            control_border: "#334155".to_string(),
            control_text: "#94a3b8".to_string(),
            control_hover: "#334155".to_string(),
        }
    }

    pub fn level_fill(&self, level: usize) -> &str {
        self.level_fills
            .get(level)
            .or_else(|| self.level_fills.last())
            .map(String::as_str)
            .unwrap_or("#ffffff")
    }
}
