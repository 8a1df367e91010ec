//! Build a linear chain of tasks from a free-text prompt such as
//! `"excavation then framing then roofing"`.

use crate::app::WorkflowApp;
use crate::io::storage::KeyValueStore;
use crate::model::node::{new_node_id, Position, TaskData};
use crate::model::trade::match_trade;
use crate::model::{Edge, Node};

const STEP_SEPARATOR: &str = " then ";
const STEP_SPACING: f64 = 300.0;

/// Split a prompt into trimmed, non-empty steps.
pub fn split_steps(prompt: &str) -> Vec<String> {
    prompt
        .split(STEP_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Add one pending node per step, left to right from `origin`, linked in
/// order. Steps mentioning a trade from the settings are tagged with it.
/// Returns the created node ids.
pub fn build_sequence<S: KeyValueStore>(
    app: &mut WorkflowApp<S>,
    prompt: &str,
    origin: Position,
) -> Vec<String> {
    let steps = split_steps(prompt);
    let mut created: Vec<String> = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let mut data = TaskData::new(step.clone());
        if let Some(trade) = match_trade(&app.settings().trades, step) {
            data.trade = Some(trade.name.clone());
            data.trade_color = Some(trade.color.clone());
        }
        let position = origin.offset(index as f64 * STEP_SPACING, 0.0);
        let node = Node::with_data(new_node_id(), position, data);
        let id = node.id.clone();
        app.add_node(node);

        if let Some(prev) = created.last() {
            let mut edge = Edge::link(prev.as_str(), &id);
            edge.source_handle = Some("right".to_string());
            edge.target_handle = Some("left".to_string());
            app.add_edge(edge);
        }
        created.push(id);
    }

    created
}
