use std::collections::BTreeMap;

/// One labeled entry in the mind map hierarchy.
#[derive(Debug, Clone)]
pub struct MapNode {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub children: Vec<MapNode>,
}

impl MapNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            children: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Node count of the subtree rooted here, self included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(MapNode::count).sum::<usize>()
    }
}

#[derive(Debug, Clone)]
pub struct MapTree {
    pub title: String,
    pub root: MapNode,
}

impl MapTree {
    pub fn node_count(&self) -> usize {
        self.root.count()
    }
}

/// Parent/child lookup maps, built once from the tree so interaction code
/// never re-walks it. `parent` has no entry for the root.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    pub parent: BTreeMap<String, String>,
    pub children: BTreeMap<String, Vec<String>>,
}

impl Adjacency {
    pub fn from_tree(root: &MapNode) -> Self {
        let mut adjacency = Self::default();
        adjacency.collect(root);
        adjacency
    }

    fn collect(&mut self, node: &MapNode) {
        let child_ids: Vec<String> = node
            .children
            .iter()
            .map(|child| child.id.clone())
            .collect();
        self.children.insert(node.id.clone(), child_ids);
        for child in &node.children {
            self.parent.insert(child.id.clone(), node.id.clone());
            self.collect(child);
        }
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parent.get(id).map(String::as_str)
    }

    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every id that has a parent, in stable order. Excludes the root.
    pub fn parented_ids(&self) -> impl Iterator<Item = &str> {
        self.parent.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MapNode {
        let mut root = MapNode::new("root", "Plan").with_icon("brain");
        let mut left = MapNode::new("a", "First");
        left.children.push(MapNode::new("a-1", "Detail"));
        root.children.push(left);
        root.children.push(MapNode::new("b", "Second"));
        root
    }

    #[test]
    fn adjacency_tracks_parents_and_ordered_children() {
        let adjacency = Adjacency::from_tree(&sample());
        assert_eq!(adjacency.parent_of("root"), None);
        assert_eq!(adjacency.parent_of("a"), Some("root"));
        assert_eq!(adjacency.parent_of("a-1"), Some("a"));
        assert_eq!(adjacency.children_of("root"), ["a", "b"]);
        assert_eq!(adjacency.children_of("b"), Vec::<String>::new().as_slice());
        assert_eq!(adjacency.children_of("missing"), &[] as &[String]);
    }

    #[test]
    fn count_includes_every_descendant() {
        assert_eq!(sample().count(), 4);
    }
}
