use serde::Serialize;

use crate::config::NodeMetricsConfig;
use crate::text_metrics;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };
}

/// Visual box for one node: icon, gap, and a single-line label inside the
/// padding and border. Labels never wrap (the stylesheet pins
/// `white-space: nowrap`), so height is constant per theme. The renderer
/// writes these exact dimensions onto the element, which keeps browser
/// geometry identical to engine geometry.
pub fn node_size(label: &str, theme: &Theme, metrics: &NodeMetricsConfig) -> Size {
    let text = label_width(label, theme, metrics.fast_text_metrics);
    let content = metrics.icon_size + metrics.icon_gap + text;
    let frame = 2.0 * metrics.border_width;
    Size {
        width: (2.0 * metrics.padding_x + content + frame).ceil(),
        height: (2.0 * metrics.padding_y + metrics.line_height.max(metrics.icon_size) + frame)
            .ceil(),
    }
}

pub fn label_width(text: &str, theme: &Theme, fast_metrics: bool) -> f32 {
    if fast_metrics && text.is_ascii() {
        return fallback_width(text, theme.font_size);
    }
    text_metrics::measure_text_width(text, theme.font_size, &theme.font_family)
        .unwrap_or_else(|| fallback_width(text, theme.font_size))
}

fn fallback_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Calibrated per-character widths for the Inter stack at the 16px
/// measurement baseline.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.25,
        '!' | ',' | '.' | ':' | ';' => 0.253,
        '\'' => 0.214,
        '"' => 0.356,
        '(' | ')' | '[' | ']' | '{' | '}' => 0.37,
        '|' => 0.26,
        '/' | '\\' => 0.343,
        '-' => 0.451,
        '_' => 0.5,
        '*' => 0.483,
        '?' => 0.531,
        '+' | '<' | '=' | '>' | '~' | '$' => 0.625,
        '#' => 0.662,
        '%' => 0.829,
        '&' => 0.695,
        '@' => 0.996,
        '0'..='9' => 0.606,
        'A' => 0.7,
        'B' => 0.682,
        'C' => 0.731,
        'D' => 0.742,
        'E' => 0.64,
        'F' => 0.621,
        'G' => 0.758,
        'H' => 0.77,
        'I' => 0.279,
        'J' => 0.559,
        'K' => 0.695,
        'L' => 0.591,
        'M' => 0.936,
        'N' => 0.776,
        'O' | 'Q' => 0.762,
        'P' => 0.662,
        'R' => 0.674,
        'S' => 0.67,
        'T' => 0.654,
        'U' => 0.748,
        'V' => 0.7,
        'W' => 1.02,
        'X' => 0.682,
        'Y' => 0.67,
        'Z' => 0.652,
        'a' => 0.584,
        'b' | 'd' | 'g' | 'p' | 'q' => 0.629,
        'c' => 0.576,
        'e' => 0.595,
        'f' => 0.352,
        'h' | 'n' | 'u' => 0.62,
        'i' | 'j' | 'l' => 0.256,
        'k' => 0.58,
        'm' => 0.924,
        'o' => 0.612,
        'r' => 0.386,
        's' | 'z' => 0.552,
        't' => 0.362,
        'v' | 'x' | 'y' => 0.564,
        'w' => 0.848,
        _ => 0.585,
    }
}
