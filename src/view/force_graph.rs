//! Input for the 3D force-directed view. Nodes are pulled along x by their
//! dependency depth and along y by their template lane.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::depth::dependency_depths;
use crate::model::{Edge, Node, TaskData, TaskStatus};

pub const DEPTH_SPACING: f64 = 300.0;
pub const LANE_SPACING: f64 = 150.0;
const MILESTONE_VAL: f64 = 20.0;
const TASK_VAL: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub color: String,
    /// Relative sphere size.
    pub val: f64,
    pub depth: usize,
    pub target_x: f64,
    pub target_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ForceGraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

pub fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Completed => "#22c55e",
        TaskStatus::InProgress => "#3b82f6",
        TaskStatus::Delayed => "#ef4444",
        TaskStatus::Pending => "#f59e0b",
    }
}

/// Trade colour if the task has one, else its status colour.
pub fn node_color(data: &TaskData) -> String {
    data.trade_color
        .clone()
        .unwrap_or_else(|| status_color(data.status).to_string())
}

/// Build the view's nodes and links. Links with a missing end are dropped.
pub fn force_graph_data(nodes: &[Node], edges: &[Edge]) -> ForceGraphData {
    let depths = dependency_depths(nodes, edges);
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let graph_nodes = nodes
        .iter()
        .map(|n| {
            let depth = depths.get(&n.id).copied().unwrap_or(0);
            GraphNode {
                id: n.id.clone(),
                label: n.data.label.clone(),
                color: node_color(&n.data),
                val: if n.data.is_milestone { MILESTONE_VAL } else { TASK_VAL },
                depth,
                target_x: depth as f64 * DEPTH_SPACING,
                target_y: n.data.parallel.unwrap_or(0) as f64 * LANE_SPACING,
            }
        })
        .collect();

    let links = edges
        .iter()
        .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
        .map(|e| GraphLink {
            source: e.source.clone(),
            target: e.target.clone(),
            value: 1.0,
        })
        .collect();

    ForceGraphData {
        nodes: graph_nodes,
        links,
    }
}
