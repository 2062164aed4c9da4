use crate::tree::{MapNode, MapTree};
use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;

static ITEM_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\n]").unwrap());

const TITLE_MAX_CHARS: usize = 50;
const BLOB_MAX_CHARS: usize = 100;
const GROUPING_THRESHOLD: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapKind {
    Process,
    List,
    Simple,
}

/// Builds the mind map tree from a raw payload using the input-shape
/// heuristics: step/process text becomes a process map, delimited text a
/// (possibly grouped) list map, anything else a single-branch map.
pub fn build_tree(payload: &str) -> Result<MapTree> {
    if payload.is_empty() {
        bail!("input payload is empty");
    }
    let title = extract_title(payload);
    let tree = match classify(payload) {
        MapKind::Process => process_map(payload, title),
        MapKind::List => list_map(payload, title),
        MapKind::Simple => simple_map(payload, title),
    };
    Ok(tree)
}

fn classify(payload: &str) -> MapKind {
    let lower = payload.to_lowercase();
    if lower.contains("steps") || lower.contains("process") {
        MapKind::Process
    } else if payload.contains('\n') || payload.contains(',') {
        MapKind::List
    } else {
        MapKind::Simple
    }
}

/// First nonblank line, clipped to 50 characters with a `...` marker when
/// longer. The line is kept unmodified otherwise.
fn extract_title(payload: &str) -> String {
    let Some(first) = payload.lines().find(|line| !line.trim().is_empty()) else {
        return "Mind Map".to_string();
    };
    if first.chars().count() > TITLE_MAX_CHARS {
        format!("{}...", clip(first, TITLE_MAX_CHARS))
    } else {
        first.to_string()
    }
}

/// One leaf child per nonblank line after the first.
fn process_map(payload: &str, title: String) -> MapTree {
    let mut root = MapNode::new("root", title.clone()).with_icon("target");
    root.children = payload
        .lines()
        .filter(|line| !line.trim().is_empty())
        .skip(1)
        .enumerate()
        .map(|(index, line)| {
            MapNode::new(format!("step-{index}"), line.trim()).with_icon("arrow-right")
        })
        .collect();
    MapTree { title, root }
}

/// Comma/newline separated items; more than six get split into two category
/// branches at the midpoint so wide lists stay readable.
fn list_map(payload: &str, title: String) -> MapTree {
    let items: Vec<&str> = ITEM_SPLIT_RE
        .split(payload)
        .filter(|item| !item.trim().is_empty())
        .collect();

    let mut root = MapNode::new("root", title.clone()).with_icon("brain");
    if items.len() > GROUPING_THRESHOLD {
        let midpoint = items.len().div_ceil(2);
        root.children.push(category(1, "Group 1", &items[..midpoint]));
        root.children.push(category(2, "Group 2", &items[midpoint..]));
    } else {
        root.children = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                MapNode::new(format!("item-{index}"), item.trim()).with_icon("circle")
            })
            .collect();
    }
    MapTree { title, root }
}

fn category(group: usize, label: &str, items: &[&str]) -> MapNode {
    let mut node = MapNode::new(format!("category-{group}"), label).with_icon("folder");
    node.children = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            MapNode::new(format!("item-{group}-{index}"), item.trim()).with_icon("circle")
        })
        .collect();
    node
}

/// A single undelimited blob becomes the root plus one idea node.
fn simple_map(payload: &str, title: String) -> MapTree {
    let mut root = MapNode::new("root", title.clone()).with_icon("lightbulb");
    root.children
        .push(MapNode::new("main-idea", clip(payload, BLOB_MAX_CHARS)).with_icon("star"));
    MapTree { title, root }
}

fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((boundary, _)) => &text[..boundary],
        None => text,
    }
}
