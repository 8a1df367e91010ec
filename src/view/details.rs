use crate::model::{Edge, Node};

/// Which side of the selected task a related task sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Predecessor,
    Successor,
}

/// A task linked to the one being inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedTask {
    pub node_id: String,
    /// `None` when the edge points at a node that no longer exists.
    pub label: Option<String>,
    pub relation: Relation,
}

/// Every task linked to `node_id`, in edge order.
pub fn related_tasks(node_id: &str, nodes: &[Node], edges: &[Edge]) -> Vec<RelatedTask> {
    edges
        .iter()
        .filter(|e| e.touches(node_id))
        .map(|e| {
            let (other, relation) = if e.source == node_id {
                (&e.target, Relation::Successor)
            } else {
                (&e.source, Relation::Predecessor)
            };
            RelatedTask {
                node_id: other.clone(),
                label: nodes.iter().find(|n| &n.id == other).map(|n| n.data.label.clone()),
                relation,
            }
        })
        .collect()
}
