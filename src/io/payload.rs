//! Drag-and-drop payloads dropped onto the canvas.

use serde::{Deserialize, Serialize};

use crate::app::WorkflowApp;
use crate::error::Result;
use crate::io::storage::KeyValueStore;
use crate::model::node::{new_node_id, Position, TaskData};
use crate::model::{Edge, Node, WorkflowTemplate};

/// Column width applied per template phase.
pub const PHASE_SPACING: f64 = 300.0;
/// Row height applied per template lane.
pub const LANE_SPACING: f64 = 150.0;

/// JSON placed on a drag event, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DragPayload {
    /// A single task card.
    #[serde(rename = "taskNode")]
    TaskNode { data: TaskData },
    /// A whole template, expanded into a chain.
    #[serde(rename = "template")]
    Template { template: WorkflowTemplate },
}

impl DragPayload {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// What a drop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing usable was on the event.
    Ignored,
    /// Node ids created in order, and the number of links added.
    Created { nodes: Vec<String>, edges: usize },
}

/// Apply a drop at `position`. Absent, empty or malformed payloads are
/// logged and ignored; this never fails.
pub fn handle_drop<S: KeyValueStore>(
    app: &mut WorkflowApp<S>,
    raw: Option<&str>,
    position: Position,
) -> DropOutcome {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return DropOutcome::Ignored,
    };
    let payload = match DragPayload::decode(raw) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("ignoring malformed drop payload: {}", e);
            return DropOutcome::Ignored;
        }
    };

    match payload {
        DragPayload::TaskNode { data } => {
            let node = Node::with_data(new_node_id(), position, data);
            let id = node.id.clone();
            app.add_node(node);
            DropOutcome::Created {
                nodes: vec![id],
                edges: 0,
            }
        }
        DragPayload::Template { template } => expand_template(app, &template, position),
    }
}

/// Create one pending node per template task, placed by phase and lane,
/// each linked from the one before it in template order.
pub fn expand_template<S: KeyValueStore>(
    app: &mut WorkflowApp<S>,
    template: &WorkflowTemplate,
    origin: Position,
) -> DropOutcome {
    let mut nodes = Vec::with_capacity(template.tasks.len());
    let mut edges = 0;
    let mut last: Option<String> = None;

    for task in &template.tasks {
        let position = origin.offset(
            task.phase as f64 * PHASE_SPACING,
            task.parallel as f64 * LANE_SPACING,
        );
        let node = Node::with_data(new_node_id(), position, task.to_task_data());
        let id = node.id.clone();
        app.add_node(node);

        if let Some(prev) = &last {
            app.add_edge(Edge::link(prev, &id));
            edges += 1;
        }
        last = Some(id.clone());
        nodes.push(id);
    }

    tracing::debug!("expanded template '{}' into {} nodes", template.name, nodes.len());
    DropOutcome::Created { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskStatus, TaskTemplate};
    use serde_json::json;

    fn template() -> WorkflowTemplate {
        serde_json::from_value(json!({
            "id": "slab",
            "name": "Slab on grade",
            "description": "",
            "category": "Residential",
            "tasks": [
                { "id": "t1", "label": "Excavate", "phase": 0, "parallel": 0 },
                { "id": "t2", "label": "Forms", "phase": 1, "parallel": 0 },
                { "id": "t3", "label": "Plumbing", "phase": 1, "parallel": 1 },
                { "id": "t4", "label": "Pour", "phase": 2, "parallel": 0 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_template_drop_creates_chain() {
        let mut app = WorkflowApp::in_memory();
        let raw = DragPayload::Template { template: template() }.encode().unwrap();
        let outcome = handle_drop(&mut app, Some(&raw), Position::new(10.0, 20.0));

        let DropOutcome::Created { nodes, edges } = outcome else {
            panic!("template drop ignored");
        };
        assert_eq!(nodes.len(), 4);
        assert_eq!(edges, 3);
        assert_eq!(app.nodes().len(), 4);
        assert_eq!(app.edges().len(), 3);
        for (i, edge) in app.edges().iter().enumerate() {
            assert_eq!(edge.source, nodes[i]);
            assert_eq!(edge.target, nodes[i + 1]);
        }
        let plumbing = app.node(&nodes[2]).unwrap();
        assert_eq!(plumbing.position, Position::new(310.0, 170.0));
        assert_eq!(plumbing.data.status, TaskStatus::Pending);
    }

    #[test]
    fn test_task_drop() {
        let mut app = WorkflowApp::in_memory();
        let raw = r#"{"type":"taskNode","data":{"label":"Inspect","status":"pending","trade":"Framing"}}"#;
        let outcome = handle_drop(&mut app, Some(raw), Position::new(5.0, 5.0));
        assert!(matches!(outcome, DropOutcome::Created { ref nodes, edges: 0 } if nodes.len() == 1));
        assert_eq!(app.nodes()[0].data.trade.as_deref(), Some("Framing"));
        assert_eq!(app.nodes()[0].position, Position::new(5.0, 5.0));
    }

    #[test]
    fn test_bad_payloads_ignored() {
        let mut app = WorkflowApp::in_memory();
        for raw in [None, Some(""), Some("   "), Some("{not json"), Some(r#"{"type":"mystery"}"#)] {
            assert_eq!(handle_drop(&mut app, raw, Position::default()), DropOutcome::Ignored);
        }
        assert!(app.nodes().is_empty());
        assert!(!app.can_undo());
    }

    #[test]
    fn test_single_task_template_has_no_links() {
        let mut app = WorkflowApp::in_memory();
        let template = WorkflowTemplate {
            tasks: vec![TaskTemplate {
                label: "Only".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let outcome = expand_template(&mut app, &template, Position::default());
        assert!(matches!(outcome, DropOutcome::Created { edges: 0, .. }));
        assert!(app.edges().is_empty());
    }
}
