pub mod depth;
pub mod edge;
pub mod history;
pub mod node;
pub mod project;
pub mod template;
pub mod trade;
pub mod zone;

pub use depth::{checked_dependency_depths, dependency_depth, dependency_depths, find_cycle};
pub use edge::Edge;
pub use history::{GraphSnapshot, UndoHistory, MAX_HISTORY_LENGTH};
pub use node::{Node, NodeUpdate, Position, TaskData, TaskDataPatch, TaskStatus};
pub use project::{PersistedEnvelope, ProjectState};
pub use template::{TaskTemplate, WorkflowTemplate};
pub use trade::Trade;
pub use zone::{Zone, ZoneRect, ZoneUpdate};
