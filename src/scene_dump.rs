use crate::scene::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct SceneDump {
    pub title: String,
    pub root_id: String,
    pub scale: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub nodes: Vec<NodeDump>,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub depth: usize,
    pub parent: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub id: String,
    pub path: String,
}

impl SceneDump {
    pub fn from_scene(scene: &Scene) -> Self {
        let nodes = scene
            .nodes
            .iter()
            .map(|node| {
                let (x, y) = scene
                    .positions
                    .get(&node.id)
                    .map(|pos| (pos.x, pos.y))
                    .unwrap_or((0.0, 0.0));
                let (width, height) = scene
                    .sizes
                    .get(&node.id)
                    .map(|size| (size.width, size.height))
                    .unwrap_or((0.0, 0.0));
                NodeDump {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    icon: node.icon.clone(),
                    depth: node.depth,
                    parent: scene.adjacency.parent_of(&node.id).map(str::to_string),
                    x,
                    y,
                    width,
                    height,
                }
            })
            .collect();

        let connectors = scene
            .connectors
            .iter()
            .map(|(id, path)| ConnectorDump {
                id: id.clone(),
                path: path.clone(),
            })
            .collect();

        SceneDump {
            title: scene.title.clone(),
            root_id: scene.root_id.clone(),
            scale: scene.viewport.scale,
            pan_x: scene.viewport.pan_x,
            pan_y: scene.viewport.pan_y,
            nodes,
            connectors,
        }
    }
}

pub fn write_scene_dump(path: &Path, scene: &Scene) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = SceneDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
