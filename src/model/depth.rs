//! Dependency depth: how many links separate a task from the start of the
//! workflow. Used as the x-axis hint of the 3D layout, not for scheduling.

use std::collections::{HashMap, HashSet};

use super::edge::Edge;
use super::node::Node;
use crate::error::{Error, Result};

/// Predecessor lists keyed by target id.
fn incoming_index(edges: &[Edge]) -> HashMap<&str, Vec<&str>> {
    let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        incoming
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }
    incoming
}

/// State for one top-level depth query.
struct DepthWalk<'a> {
    incoming: &'a HashMap<&'a str, Vec<&'a str>>,
    on_path: HashSet<String>,
    memo: HashMap<String, usize>,
}

impl<'a> DepthWalk<'a> {
    fn new(incoming: &'a HashMap<&'a str, Vec<&'a str>>) -> Self {
        Self {
            incoming,
            on_path: HashSet::new(),
            memo: HashMap::new(),
        }
    }

    fn depth(&mut self, id: &str) -> usize {
        if let Some(&d) = self.memo.get(id) {
            return d;
        }
        // Back on our own trail: a cycle. Cut it here.
        if self.on_path.contains(id) {
            return 0;
        }
        let incoming = self.incoming;
        let preds = match incoming.get(id) {
            Some(preds) if !preds.is_empty() => preds,
            _ => {
                self.memo.insert(id.to_string(), 0);
                return 0;
            }
        };

        self.on_path.insert(id.to_string());
        let deepest = preds.iter().map(|p| self.depth(p)).max().unwrap_or(0);
        self.on_path.remove(id);

        let depth = deepest + 1;
        self.memo.insert(id.to_string(), depth);
        depth
    }
}

/// Longest path from any root (a node with no incoming edge) to `node_id`.
///
/// A node reached again while still on the current walk counts as depth 0,
/// so cycles under-count instead of recursing forever. Use
/// [`checked_dependency_depths`] when cycles must be reported.
pub fn dependency_depth(edges: &[Edge], node_id: &str) -> usize {
    let incoming = incoming_index(edges);
    DepthWalk::new(&incoming).depth(node_id)
}

/// Depth of every node, each computed as its own query.
pub fn dependency_depths(nodes: &[Node], edges: &[Edge]) -> HashMap<String, usize> {
    let incoming = incoming_index(edges);
    nodes
        .iter()
        .map(|n| (n.id.clone(), DepthWalk::new(&incoming).depth(&n.id)))
        .collect()
}

/// Like [`dependency_depths`] but fails on the first cycle found.
pub fn checked_dependency_depths(nodes: &[Node], edges: &[Edge]) -> Result<HashMap<String, usize>> {
    if let Some(cycle) = find_cycle(edges) {
        return Err(Error::CycleDetected(cycle));
    }
    Ok(dependency_depths(nodes, edges))
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Find one dependency cycle, returned as `[a, b, ..., a]`.
pub fn find_cycle(edges: &[Edge]) -> Option<Vec<String>> {
    let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        outgoing
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    fn visit<'a>(
        id: &'a str,
        outgoing: &HashMap<&'a str, Vec<&'a str>>,
        marks: &mut HashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        match marks.get(id) {
            Some(Mark::Done) => return None,
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|s| *s == id).unwrap_or(0);
                let mut cycle: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
                cycle.push(id.to_string());
                return Some(cycle);
            }
            None => {}
        }
        marks.insert(id, Mark::Visiting);
        stack.push(id);
        if let Some(next) = outgoing.get(id) {
            for n in next {
                if let Some(cycle) = visit(*n, outgoing, marks, stack) {
                    return Some(cycle);
                }
            }
        }
        stack.pop();
        marks.insert(id, Mark::Done);
        None
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut stack = Vec::new();
    for edge in edges {
        if let Some(cycle) = visit(edge.source.as_str(), &outgoing, &mut marks, &mut stack) {
            return Some(cycle);
        }
    }
    None
}
