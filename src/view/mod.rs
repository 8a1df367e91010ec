//! Read-only projections of the workflow graph for the different views.
//! Renderers consume these instead of touching the store's collections.

pub mod details;
pub mod filter;
pub mod force_graph;
pub mod table;

pub use details::{related_tasks, Relation, RelatedTask};
pub use filter::{node_opacity, DIMMED_OPACITY};
pub use force_graph::{force_graph_data, ForceGraphData};
pub use table::{table_rows, TableRow};
