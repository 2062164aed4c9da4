use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{LayoutAlgorithm, LayoutConfig};
use crate::measure::Size;
use crate::tree::MapNode;

/// Top-left corner of a node box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Computes a position for every node in the tree. Pure: the same tree,
/// sizes, anchor, and config always yield the same map.
///
/// Children fan out radially around their parent. The root owns a closed
/// circle and subdivides it by child count; deeper nodes inherit the angle
/// that placed them and spread an open arc across it, so first and last
/// child sit on the arc endpoints.
pub fn assign_positions(
    root: &MapNode,
    sizes: &BTreeMap<String, Size>,
    anchor: (f32, f32),
    config: &LayoutConfig,
) -> BTreeMap<String, Position> {
    let mut positions = BTreeMap::new();
    place_subtree(
        root,
        anchor.0,
        anchor.1,
        0.0,
        config.root_sweep_deg,
        true,
        sizes,
        config,
        &mut positions,
    );
    positions
}

#[allow(clippy::too_many_arguments)]
fn place_subtree(
    node: &MapNode,
    center_x: f32,
    center_y: f32,
    start_deg: f32,
    sweep_deg: f32,
    closed_circle: bool,
    sizes: &BTreeMap<String, Size>,
    config: &LayoutConfig,
    out: &mut BTreeMap<String, Position>,
) {
    let size = sizes.get(&node.id).copied().unwrap_or(Size::ZERO);
    out.insert(
        node.id.clone(),
        Position {
            x: center_x - size.width / 2.0,
            y: center_y - size.height / 2.0,
        },
    );
    let count = node.children.len();
    if count == 0 {
        return;
    }
    let radius = fan_radius(count, config);
    // A closed circle wraps, so the last slot must not coincide with the
    // first. Open arcs put children on both endpoints.
    let step = if closed_circle {
        sweep_deg / count as f32
    } else if count > 1 {
        sweep_deg / (count as f32 - 1.0)
    } else {
        0.0
    };
    for (idx, child) in node.children.iter().enumerate() {
        let angle_deg = start_deg + idx as f32 * step - sweep_deg / 2.0;
        let angle = angle_deg.to_radians();
        let child_x = center_x + radius * angle.cos();
        let child_y = center_y + radius * angle.sin();
        let (child_sweep, child_closed) = match config.algorithm {
            LayoutAlgorithm::RadialSector => (config.child_sweep_deg, false),
            LayoutAlgorithm::Circular => (config.root_sweep_deg, true),
        };
        place_subtree(
            child,
            child_x,
            child_y,
            angle_deg,
            child_sweep,
            child_closed,
            sizes,
            config,
            out,
        );
    }
}

/// Crowded fans get pushed further out so sibling boxes stay apart.
fn fan_radius(child_count: usize, config: &LayoutConfig) -> f32 {
    if child_count < config.fanout_threshold {
        config.base_radius
    } else {
        config.fanout_radius_base + config.fanout_radius_per_child * child_count as f32
    }
}
