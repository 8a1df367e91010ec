use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::history::GraphSnapshot;
use super::node::Node;
use super::zone::Zone;

/// Version tag written alongside the persisted state.
pub const STATE_VERSION: u32 = 0;

/// The project document kept in local storage.
///
/// Only the live graph is persisted; `history` always holds a single entry
/// and `current_history_index` is always 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default)]
    pub history: Vec<GraphSnapshot>,
    #[serde(default)]
    pub current_history_index: usize,
}

fn default_project_name() -> String {
    "Untitled Project".to_string()
}

impl ProjectState {
    pub fn new(project_name: impl Into<String>, snapshot: GraphSnapshot) -> Self {
        Self {
            nodes: snapshot.nodes.clone(),
            edges: snapshot.edges.clone(),
            zones: snapshot.zones.clone(),
            project_name: project_name.into(),
            history: vec![snapshot],
            current_history_index: 0,
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            zones: self.zones.clone(),
        }
    }
}

/// Storage wrapper: `{ "state": ..., "version": 0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEnvelope {
    pub state: ProjectState,
    #[serde(default)]
    pub version: u32,
}

impl PersistedEnvelope {
    pub fn new(state: ProjectState) -> Self {
        Self {
            state,
            version: STATE_VERSION,
        }
    }
}
