use std::collections::BTreeMap;

use crate::layout::Position;
use crate::measure::Size;
use crate::tree::Adjacency;

/// Element id for the connector arriving at a child node.
pub fn connector_id(child_id: &str) -> String {
    format!("conn-{child_id}")
}

/// Rebuilds the path for the connector arriving at `child_id`, writing it
/// into `paths` keyed by [`connector_id`]. Leaves `paths` untouched and
/// returns false when the node has no parent (the root) or either endpoint
/// is not placed yet.
pub fn refresh(
    child_id: &str,
    adjacency: &Adjacency,
    positions: &BTreeMap<String, Position>,
    sizes: &BTreeMap<String, Size>,
    paths: &mut BTreeMap<String, String>,
) -> bool {
    let Some(parent_id) = adjacency.parent_of(child_id) else {
        return false;
    };
    let Some(start) = box_center(parent_id, positions, sizes) else {
        return false;
    };
    let Some(end) = box_center(child_id, positions, sizes) else {
        return false;
    };
    paths.insert(connector_id(child_id), curve(start, end));
    true
}

/// Rebuilds every connector in the map. One path per parented node.
pub fn refresh_all(
    adjacency: &Adjacency,
    positions: &BTreeMap<String, Position>,
    sizes: &BTreeMap<String, Size>,
    paths: &mut BTreeMap<String, String>,
) {
    for child_id in adjacency.parented_ids() {
        refresh(child_id, adjacency, positions, sizes, paths);
    }
}

fn box_center(
    id: &str,
    positions: &BTreeMap<String, Position>,
    sizes: &BTreeMap<String, Size>,
) -> Option<(f32, f32)> {
    let pos = positions.get(id)?;
    let size = sizes.get(id)?;
    Some((pos.x + size.width / 2.0, pos.y + size.height / 2.0))
}

/// Quadratic with the control point at (parent x, child y): curves leave
/// the parent vertically and flatten out into the child.
fn curve(start: (f32, f32), end: (f32, f32)) -> String {
    format!(
        "M {:.2} {:.2} Q {:.2} {:.2}, {:.2} {:.2}",
        start.0, start.1, start.0, end.1, end.0, end.1
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MapNode;

    fn two_level_tree() -> MapNode {
        let mut root = MapNode::new("root", "Root");
        let mut a = MapNode::new("a", "A");
        a.children.push(MapNode::new("a1", "A1"));
        root.children.push(a);
        root.children.push(MapNode::new("b", "B"));
        root
    }

    fn square(ids: &[(&str, f32, f32)]) -> (BTreeMap<String, Position>, BTreeMap<String, Size>) {
        let mut positions = BTreeMap::new();
        let mut sizes = BTreeMap::new();
        for (id, x, y) in ids {
            positions.insert(id.to_string(), Position { x: *x, y: *y });
            sizes.insert(
                id.to_string(),
                Size {
                    width: 100.0,
                    height: 50.0,
                },
            );
        }
        (positions, sizes)
    }

    #[test]
    fn root_never_gets_a_connector() {
        let tree = two_level_tree();
        let adjacency = Adjacency::from_tree(&tree);
        let (positions, sizes) = square(&[("root", 550.0, 375.0), ("a", 300.0, 375.0)]);
        let mut paths = BTreeMap::new();
        assert!(!refresh("root", &adjacency, &positions, &sizes, &mut paths));
        assert!(paths.is_empty());
    }

    #[test]
    fn path_runs_center_to_center_with_parent_x_control() {
        let tree = two_level_tree();
        let adjacency = Adjacency::from_tree(&tree);
        let (positions, sizes) = square(&[("root", 550.0, 375.0), ("a", 300.0, 175.0)]);
        let mut paths = BTreeMap::new();
        assert!(refresh("a", &adjacency, &positions, &sizes, &mut paths));
        assert_eq!(
            paths["conn-a"],
            "M 600.00 400.00 Q 600.00 200.00, 350.00 200.00"
        );
    }

    #[test]
    fn refresh_is_an_upsert() {
        let tree = two_level_tree();
        let adjacency = Adjacency::from_tree(&tree);
        let (mut positions, sizes) = square(&[("root", 550.0, 375.0), ("a", 300.0, 175.0)]);
        let mut paths = BTreeMap::new();
        refresh("a", &adjacency, &positions, &sizes, &mut paths);
        let before = paths["conn-a"].clone();

        refresh("a", &adjacency, &positions, &sizes, &mut paths);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths["conn-a"], before);

        positions.insert("a".to_string(), Position { x: 100.0, y: 175.0 });
        refresh("a", &adjacency, &positions, &sizes, &mut paths);
        assert_eq!(paths.len(), 1);
        assert_ne!(paths["conn-a"], before);
    }

    #[test]
    fn unplaced_endpoint_leaves_paths_untouched() {
        let tree = two_level_tree();
        let adjacency = Adjacency::from_tree(&tree);
        let (positions, sizes) = square(&[("a", 300.0, 175.0)]);
        let mut paths = BTreeMap::new();
        assert!(!refresh("a", &adjacency, &positions, &sizes, &mut paths));
        assert!(paths.is_empty());
    }

    #[test]
    fn refresh_all_covers_every_parented_node() {
        let tree = two_level_tree();
        let adjacency = Adjacency::from_tree(&tree);
        let (positions, sizes) = square(&[
            ("root", 550.0, 375.0),
            ("a", 300.0, 375.0),
            ("a1", 100.0, 175.0),
            ("b", 800.0, 375.0),
        ]);
        let mut paths = BTreeMap::new();
        refresh_all(&adjacency, &positions, &sizes, &mut paths);
        assert_eq!(paths.len(), 3);
        for id in ["conn-a", "conn-a1", "conn-b"] {
            assert!(paths.contains_key(id), "missing {id}");
        }
    }
}
