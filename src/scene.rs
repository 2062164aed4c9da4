use std::collections::BTreeMap;

use crate::config::Config;
use crate::connector;
use crate::layout::{self, Position};
use crate::measure::{self, Size};
use crate::tree::{Adjacency, MapNode, MapTree};
use crate::viewport::{Bounds, Viewport};

/// Flat per-node record in document order.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub depth: usize,
}

/// Everything the interaction layer reads or writes, built once per
/// document. `nodes` is DFS pre-order, which doubles as stacking order:
/// later nodes paint on top and win hit-tests.
#[derive(Debug, Clone)]
pub struct Scene {
    pub title: String,
    pub root_id: String,
    pub nodes: Vec<SceneNode>,
    pub adjacency: Adjacency,
    pub sizes: BTreeMap<String, Size>,
    pub positions: BTreeMap<String, Position>,
    pub connectors: BTreeMap<String, String>,
    pub viewport: Viewport,
}

impl Scene {
    /// Measures, lays out, and draws every connector for the tree. The
    /// layout anchor is the center of the configured canvas.
    pub fn build(tree: &MapTree, config: &Config) -> Scene {
        let mut nodes = Vec::with_capacity(tree.node_count());
        let mut sizes = BTreeMap::new();
        flatten(&tree.root, 0, config, &mut nodes, &mut sizes);

        let adjacency = Adjacency::from_tree(&tree.root);
        let anchor = (config.render.width / 2.0, config.render.height / 2.0);
        let positions = layout::assign_positions(&tree.root, &sizes, anchor, &config.layout);

        let mut connectors = BTreeMap::new();
        connector::refresh_all(&adjacency, &positions, &sizes, &mut connectors);

        Scene {
            title: tree.title.clone(),
            root_id: tree.root.id.clone(),
            nodes,
            adjacency,
            sizes,
            positions,
            connectors,
            viewport: Viewport::default(),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_boxes(&self.positions, &self.sizes)
    }

    /// Topmost node whose box contains the canvas point, if any.
    pub fn hit_test(&self, canvas_x: f32, canvas_y: f32) -> Option<&str> {
        for node in self.nodes.iter().rev() {
            let Some(pos) = self.positions.get(&node.id) else {
                continue;
            };
            let Some(size) = self.sizes.get(&node.id) else {
                continue;
            };
            if canvas_x >= pos.x
                && canvas_x <= pos.x + size.width
                && canvas_y >= pos.y
                && canvas_y <= pos.y + size.height
            {
                return Some(node.id.as_str());
            }
        }
        None
    }
}

fn flatten(
    node: &MapNode,
    depth: usize,
    config: &Config,
    nodes: &mut Vec<SceneNode>,
    sizes: &mut BTreeMap<String, Size>,
) {
    nodes.push(SceneNode {
        id: node.id.clone(),
        label: node.label.clone(),
        icon: node.icon.clone(),
        depth,
    });
    sizes.insert(
        node.id.clone(),
        measure::node_size(&node.label, &config.theme, &config.node),
    );
    for child in &node.children {
        flatten(child, depth + 1, config, nodes, sizes);
    }
}
