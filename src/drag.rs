use std::collections::BTreeMap;

use crate::connector;
use crate::layout::Position;
use crate::measure::Size;
use crate::tree::Adjacency;
use crate::viewport::Viewport;

/// Active node drag. The grab offset, captured in screen units at begin,
/// keeps the node glued to the pointer through every move.
#[derive(Debug, Clone)]
pub struct DragGesture {
    node_id: String,
    grab_x: f32,
    grab_y: f32,
}

impl DragGesture {
    /// Starts dragging `node_id`. The root and unplaced ids are not
    /// draggable; those return None and the pointer-down does nothing.
    pub fn begin(
        node_id: &str,
        root_id: &str,
        positions: &BTreeMap<String, Position>,
        viewport: &Viewport,
        pointer_x: f32,
        pointer_y: f32,
    ) -> Option<Self> {
        if node_id == root_id {
            return None;
        }
        let pos = positions.get(node_id)?;
        let (screen_x, screen_y) = viewport.to_screen(pos.x, pos.y);
        Some(Self {
            node_id: node_id.to_string(),
            grab_x: pointer_x - screen_x,
            grab_y: pointer_y - screen_y,
        })
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Moves the dragged node under the pointer and refreshes exactly the
    /// connectors whose endpoints moved: the node's own and those of its
    /// direct children. No other Position is touched.
    pub fn update(
        &self,
        pointer_x: f32,
        pointer_y: f32,
        viewport: &Viewport,
        adjacency: &Adjacency,
        positions: &mut BTreeMap<String, Position>,
        sizes: &BTreeMap<String, Size>,
        paths: &mut BTreeMap<String, String>,
    ) {
        let (x, y) = viewport.to_canvas(pointer_x - self.grab_x, pointer_y - self.grab_y);
        positions.insert(self.node_id.clone(), Position { x, y });
        connector::refresh(&self.node_id, adjacency, positions, sizes, paths);
        for child_id in adjacency.children_of(&self.node_id) {
            connector::refresh(child_id, adjacency, positions, sizes, paths);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MapNode;

    struct Fixture {
        adjacency: Adjacency,
        positions: BTreeMap<String, Position>,
        sizes: BTreeMap<String, Size>,
        paths: BTreeMap<String, String>,
    }

    /// root -> a -> a1 -> a1x, plus a sibling b of a.
    fn fixture() -> Fixture {
        let mut a1 = MapNode::new("a1", "A1");
        a1.children.push(MapNode::new("a1x", "A1X"));
        let mut a = MapNode::new("a", "A");
        a.children.push(a1);
        let mut root = MapNode::new("root", "Root");
        root.children.push(a);
        root.children.push(MapNode::new("b", "B"));

        let adjacency = Adjacency::from_tree(&root);
        let mut positions = BTreeMap::new();
        let mut sizes = BTreeMap::new();
        for (id, x, y) in [
            ("root", 550.0, 375.0),
            ("a", 300.0, 375.0),
            ("a1", 100.0, 175.0),
            ("a1x", -50.0, 50.0),
            ("b", 800.0, 375.0),
        ] {
            positions.insert(id.to_string(), Position { x, y });
            sizes.insert(
                id.to_string(),
                Size {
                    width: 100.0,
                    height: 50.0,
                },
            );
        }
        let mut paths = BTreeMap::new();
        connector::refresh_all(&adjacency, &positions, &sizes, &mut paths);
        Fixture {
            adjacency,
            positions,
            sizes,
            paths,
        }
    }

    #[test]
    fn root_and_unknown_ids_are_not_draggable() {
        let fx = fixture();
        let viewport = Viewport::default();
        assert!(
            DragGesture::begin("root", "root", &fx.positions, &viewport, 600.0, 400.0).is_none()
        );
        assert!(
            DragGesture::begin("nope", "root", &fx.positions, &viewport, 600.0, 400.0).is_none()
        );
    }

    #[test]
    fn node_lands_exactly_under_the_pointer_offset() {
        let mut fx = fixture();
        let viewport = Viewport {
            scale: 2.0,
            pan_x: 50.0,
            pan_y: -30.0,
        };
        // Grab 7,5 inside the box: node top-left is at screen (650, 720).
        let gesture =
            DragGesture::begin("a", "root", &fx.positions, &viewport, 657.0, 725.0).unwrap();
        gesture.update(
            900.0,
            500.0,
            &viewport,
            &fx.adjacency,
            &mut fx.positions,
            &fx.sizes,
            &mut fx.paths,
        );
        let moved = fx.positions["a"];
        let (sx, sy) = viewport.to_screen(moved.x, moved.y);
        assert!((sx - (900.0 - 7.0)).abs() < 1e-3);
        assert!((sy - (500.0 - 5.0)).abs() < 1e-3);
    }

    #[test]
    fn only_the_dragged_position_changes() {
        let mut fx = fixture();
        let viewport = Viewport::default();
        let before = fx.positions.clone();
        let gesture =
            DragGesture::begin("a", "root", &fx.positions, &viewport, 350.0, 400.0).unwrap();
        gesture.update(
            500.0,
            600.0,
            &viewport,
            &fx.adjacency,
            &mut fx.positions,
            &fx.sizes,
            &mut fx.paths,
        );
        for (id, pos) in &before {
            if id == "a" {
                assert_ne!(fx.positions[id], *pos);
            } else {
                assert_eq!(fx.positions[id], *pos, "{id} moved");
            }
        }
    }

    #[test]
    fn refreshes_own_and_child_connectors_only() {
        let mut fx = fixture();
        let viewport = Viewport::default();
        let own_before = fx.paths["conn-a"].clone();
        let child_before = fx.paths["conn-a1"].clone();
        let grandchild_before = fx.paths["conn-a1x"].clone();
        let sibling_before = fx.paths["conn-b"].clone();

        let gesture =
            DragGesture::begin("a", "root", &fx.positions, &viewport, 350.0, 400.0).unwrap();
        gesture.update(
            700.0,
            100.0,
            &viewport,
            &fx.adjacency,
            &mut fx.positions,
            &fx.sizes,
            &mut fx.paths,
        );

        assert_ne!(fx.paths["conn-a"], own_before);
        assert_ne!(fx.paths["conn-a1"], child_before);
        assert_eq!(fx.paths["conn-a1x"], grandchild_before);
        assert_eq!(fx.paths["conn-b"], sibling_before);
    }
}
