use std::collections::HashSet;

use crate::model::Node;

/// Opacity of nodes outside the active trade filter.
pub const DIMMED_OPACITY: f32 = 0.2;

/// Full opacity when no trade is selected or the node's trade is; dimmed
/// otherwise.
pub fn node_opacity(node: &Node, selected_trades: &HashSet<String>) -> f32 {
    if selected_trades.is_empty() {
        return 1.0;
    }
    match &node.data.trade {
        Some(trade) if selected_trades.contains(trade) => 1.0,
        _ => DIMMED_OPACITY,
    }
}
