use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::layout::Position;
use crate::measure::Size;
use crate::scene::Scene;

/// State handed to the embedded script: geometry plus the zoom constants,
/// so the in-browser controller replays the same math as the engine.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SceneState<'a> {
    root_id: &'a str,
    positions: &'a BTreeMap<String, Position>,
    sizes: &'a BTreeMap<String, Size>,
    parents: &'a BTreeMap<String, String>,
    children: &'a BTreeMap<String, Vec<String>>,
    min_scale: f32,
    max_scale: f32,
    zoom_step: f32,
    wheel_in: f32,
    wheel_out: f32,
    fit_margin: f32,
}

/// Renders the scene into one self-contained HTML document. Pure: no IO,
/// same scene and config always produce the same string. The document is
/// geometrically complete before any script runs; the script only re-fits
/// to the real window and drives interaction.
pub fn render_document(scene: &Scene, config: &Config) -> Result<String> {
    let state = SceneState {
        root_id: &scene.root_id,
        positions: &scene.positions,
        sizes: &scene.sizes,
        parents: &scene.adjacency.parent,
        children: &scene.adjacency.children,
        min_scale: config.viewport.min_scale,
        max_scale: config.viewport.max_scale,
        zoom_step: config.viewport.zoom_step,
        wheel_in: config.viewport.wheel_in,
        wheel_out: config.viewport.wheel_out,
        fit_margin: config.viewport.fit_margin,
    };
    // < keeps the JSON from ever closing the script element early.
    let state_json = serde_json::to_string(&state)?.replace('<', "\\u003c");

    let max_depth = scene.nodes.iter().map(|n| n.depth).max().unwrap_or(0);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!(
        "<title>Interactive Mind Map: {}</title>\n",
        escape_html(&scene.title)
    ));
    html.push_str("<link rel=\"preconnect\" href=\"https://fonts.googleapis.com\">\n");
    html.push_str("<link href=\"https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap\" rel=\"stylesheet\">\n");
    html.push_str("<script src=\"https://unpkg.com/lucide@latest\"></script>\n");
    html.push_str("<style>\n");
    html.push_str(&stylesheet(config, max_depth));
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<div id=\"mind-map-container\">\n");
    html.push_str(&format!(
        "<div id=\"mind-map-canvas\" style=\"transform: {}\">\n",
        scene.viewport.transform()
    ));

    html.push_str("<svg id=\"svg-canvas\">\n");
    for (connector_id, path) in &scene.connectors {
        html.push_str(&format!(
            "<path id=\"{}\" class=\"connector\" d=\"{path}\"/>\n",
            escape_html(connector_id)
        ));
    }
    html.push_str("</svg>\n");

    html.push_str("<div id=\"nodes-container\">\n");
    for node in &scene.nodes {
        let Some(pos) = scene.positions.get(&node.id) else {
            continue;
        };
        let Some(size) = scene.sizes.get(&node.id) else {
            continue;
        };
        let parent_attr = match scene.adjacency.parent_of(&node.id) {
            Some(parent_id) => format!(" data-parent-id=\"{}\"", escape_html(parent_id)),
            None => String::new(),
        };
        let icon = sanitize_icon(node.icon.as_deref().unwrap_or("circle"));
        html.push_str(&format!(
            "<div id=\"{}\" class=\"node node-level-{}\"{} style=\"left: {:.2}px; top: {:.2}px; width: {:.2}px; height: {:.2}px;\">",
            escape_html(&node.id),
            node.depth,
            parent_attr,
            pos.x,
            pos.y,
            size.width,
            size.height
        ));
        html.push_str(&format!("<i data-lucide=\"{icon}\" class=\"node-icon\"></i>"));
        html.push_str(&format!(
            "<span class=\"node-label\">{}</span>",
            escape_html(&node.label)
        ));
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</div>\n");

    html.push_str("<div id=\"controls\">\n");
    html.push_str("<button id=\"zoom-in\" title=\"Zoom in\"><i data-lucide=\"zoom-in\"></i></button>\n");
    html.push_str("<button id=\"zoom-out\" title=\"Zoom out\"><i data-lucide=\"zoom-out\"></i></button>\n");
    html.push_str("<button id=\"fit-view\" title=\"Fit to screen\"><i data-lucide=\"maximize\"></i></button>\n");
    html.push_str("<button id=\"download\" title=\"Download\"><i data-lucide=\"download\"></i></button>\n");
    html.push_str("</div>\n</div>\n");

    html.push_str(&format!("<script>\nconst SCENE = {state_json};\n"));
    html.push_str(INTERACTION_SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

pub fn write_output_html(html: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, html)?;
        }
        None => {
            print!("{}", html);
        }
    }
    Ok(())
}

fn stylesheet(config: &Config, max_depth: usize) -> String {
    let theme = &config.theme;
    let node = &config.node;
    let mut css = String::new();
    css.push_str("* { margin: 0; padding: 0; box-sizing: border-box; }\n");
    css.push_str(&format!(
        "body {{ font-family: {}; overflow: hidden; }}\n",
        theme.font_family
    ));
    css.push_str(&format!(
        "#mind-map-container {{ width: 100vw; height: 100vh; position: relative; overflow: hidden; background-color: {}; cursor: grab; }}\n",
        theme.background
    ));
    css.push_str("#mind-map-container.grabbing { cursor: grabbing; }\n");
    css.push_str("#mind-map-canvas { position: absolute; width: 100%; height: 100%; transform-origin: 0 0; transition: transform 0.3s ease-out; }\n");
    css.push_str("#svg-canvas { position: absolute; width: 100%; height: 100%; overflow: visible; pointer-events: none; }\n");
    css.push_str(&format!(
        ".connector {{ stroke: {}; stroke-width: {}; fill: none; }}\n",
        theme.connector_stroke, theme.connector_width
    ));
    css.push_str("#nodes-container { position: absolute; width: 100%; height: 100%; }\n");
    css.push_str(&format!(
        ".node {{ position: absolute; display: flex; align-items: center; padding: {}px {}px; border-radius: {}px; border: {}px solid {}; background-color: {}; color: {}; font-size: {}px; line-height: {}px; white-space: nowrap; cursor: pointer; box-shadow: 0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1); transition: transform 0.2s; }}\n",
        node.padding_y,
        node.padding_x,
        node.corner_radius,
        node.border_width,
        theme.node_border,
        theme.level_fill(0),
        theme.text_color,
        theme.font_size,
        node.line_height
    ));
    css.push_str(".node:hover { transform: scale(1.05); z-index: 10; }\n");
    css.push_str(&format!(
        ".node-icon {{ width: {}px; height: {}px; margin-right: {}px; flex-shrink: 0; }}\n",
        node.icon_size, node.icon_size, node.icon_gap
    ));
    for depth in 0..=max_depth {
        css.push_str(&format!(
            ".node-level-{depth} {{ background-color: {}; }}\n",
            theme.level_fill(depth)
        ));
    }
    css.push_str("#controls { position: fixed; top: 1rem; right: 1rem; display: flex; gap: 0.5rem; z-index: 20; }\n");
    css.push_str(&format!(
        "#controls button {{ width: 2.5rem; height: 2.5rem; display: flex; align-items: center; justify-content: center; background-color: {}; border: 1px solid {}; color: {}; border-radius: 0.5rem; cursor: pointer; box-shadow: 0 1px 3px 0 rgb(0 0 0 / 0.1); }}\n",
        theme.control_background, theme.control_border, theme.control_text
    ));
    css.push_str(&format!(
        "#controls button:hover {{ background-color: {}; }}\n",
        theme.control_hover
    ));
    css.push_str("#controls button svg { width: 1.25rem; height: 1.25rem; }\n");
    css
}

/// Lucide icon names are lowercase words and digits joined by dashes;
/// anything else falls back to the plain marker.
fn sanitize_icon(name: &str) -> &str {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid { name } else { "circle" }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const INTERACTION_SCRIPT: &str = r#"const container = document.getElementById('mind-map-container');
const canvas = document.getElementById('mind-map-canvas');
const svg = document.getElementById('svg-canvas');

const positions = new Map(Object.entries(SCENE.positions));
const sizes = new Map(Object.entries(SCENE.sizes));
const parents = new Map(Object.entries(SCENE.parents));
const children = new Map(Object.entries(SCENE.children));

let scale = 1;
let panX = 0;
let panY = 0;
let gesture = null;

function clampScale(value) {
  return Math.min(SCENE.maxScale, Math.max(SCENE.minScale, value));
}

function applyTransform() {
  canvas.style.transform = `translate(${panX}px, ${panY}px) scale(${scale})`;
}

function applyPositions() {
  for (const [id, pos] of positions) {
    const el = document.getElementById(id);
    if (!el) continue;
    el.style.left = pos.x + 'px';
    el.style.top = pos.y + 'px';
  }
}

function connectorPath(id) {
  const parentId = parents.get(id);
  if (!parentId) return null;
  const parentPos = positions.get(parentId);
  const childPos = positions.get(id);
  const parentSize = sizes.get(parentId);
  const childSize = sizes.get(id);
  if (!parentPos || !childPos || !parentSize || !childSize) return null;
  const sx = parentPos.x + parentSize.width / 2;
  const sy = parentPos.y + parentSize.height / 2;
  const ex = childPos.x + childSize.width / 2;
  const ey = childPos.y + childSize.height / 2;
  return `M ${sx} ${sy} Q ${sx} ${ey}, ${ex} ${ey}`;
}

function refreshConnector(id) {
  const d = connectorPath(id);
  if (!d) return;
  let path = document.getElementById('conn-' + id);
  if (!path) {
    path = document.createElementNS('http://www.w3.org/2000/svg', 'path');
    path.id = 'conn-' + id;
    path.setAttribute('class', 'connector');
    svg.appendChild(path);
  }
  path.setAttribute('d', d);
}

function refreshAllConnectors() {
  for (const id of parents.keys()) refreshConnector(id);
}

function sceneBounds() {
  let minX = Infinity, minY = Infinity, maxX = -Infinity, maxY = -Infinity;
  for (const [id, pos] of positions) {
    const size = sizes.get(id);
    if (!size) continue;
    minX = Math.min(minX, pos.x);
    minY = Math.min(minY, pos.y);
    maxX = Math.max(maxX, pos.x + size.width);
    maxY = Math.max(maxY, pos.y + size.height);
  }
  return minX === Infinity ? null : { minX, minY, maxX, maxY };
}

function fitToScreen() {
  const box = sceneBounds();
  if (!box) return;
  const viewWidth = container.clientWidth;
  const viewHeight = container.clientHeight;
  const boxWidth = box.maxX - box.minX;
  const boxHeight = box.maxY - box.minY;
  scale = clampScale(Math.min(viewWidth / boxWidth, viewHeight / boxHeight) * SCENE.fitMargin);
  panX = (viewWidth - boxWidth * scale) / 2 - box.minX * scale;
  panY = (viewHeight - boxHeight * scale) / 2 - box.minY * scale;
  applyTransform();
}

function zoom(factor) {
  scale = clampScale(scale * factor);
  applyTransform();
}

container.addEventListener('mousedown', event => {
  event.preventDefault();
  const nodeEl = event.target.closest('.node');
  if (nodeEl) {
    if (nodeEl.id === SCENE.rootId) return;
    const pos = positions.get(nodeEl.id);
    if (!pos) return;
    gesture = {
      kind: 'drag',
      id: nodeEl.id,
      grabX: event.clientX - (pos.x * scale + panX),
      grabY: event.clientY - (pos.y * scale + panY),
    };
  } else {
    gesture = { kind: 'pan', startX: event.clientX - panX, startY: event.clientY - panY };
    container.classList.add('grabbing');
  }
});

window.addEventListener('mousemove', event => {
  if (!gesture) return;
  if (gesture.kind === 'pan') {
    panX = event.clientX - gesture.startX;
    panY = event.clientY - gesture.startY;
    applyTransform();
    return;
  }
  const x = (event.clientX - gesture.grabX - panX) / scale;
  const y = (event.clientY - gesture.grabY - panY) / scale;
  positions.set(gesture.id, { x, y });
  const el = document.getElementById(gesture.id);
  if (el) {
    el.style.left = x + 'px';
    el.style.top = y + 'px';
  }
  refreshConnector(gesture.id);
  for (const childId of children.get(gesture.id) || []) refreshConnector(childId);
});

window.addEventListener('mouseup', () => {
  gesture = null;
  container.classList.remove('grabbing');
});

container.addEventListener('wheel', event => {
  event.preventDefault();
  if (event.deltaY === 0) return;
  zoom(event.deltaY > 0 ? SCENE.wheelOut : SCENE.wheelIn);
}, { passive: false });

document.getElementById('zoom-in').addEventListener('click', () => zoom(SCENE.zoomStep));
document.getElementById('zoom-out').addEventListener('click', () => zoom(1 / SCENE.zoomStep));
document.getElementById('fit-view').addEventListener('click', fitToScreen);
document.getElementById('download').addEventListener('click', () => {
  const blob = new Blob(['<!DOCTYPE html>\n' + document.documentElement.outerHTML], { type: 'text/html' });
  const link = document.createElement('a');
  link.href = URL.createObjectURL(blob);
  link.download = 'interactive-mind-map.html';
  link.click();
  URL.revokeObjectURL(link.href);
});

window.addEventListener('resize', fitToScreen);

applyPositions();
refreshAllConnectors();
fitToScreen();
if (window.lucide) lucide.createIcons();
"#;
