//! Construction workflow task graph: tasks, dependency links and zones with
//! snapshot undo/redo, local persistence, Primavera XER import and the data
//! behind the canvas, table and 3D views.

pub mod app;
pub mod cli;
pub mod error;
pub mod io;
pub mod model;
pub mod settings;
pub mod view;

pub use app::{ImportSummary, SubscriptionId, WorkflowApp};
pub use error::{Error, Result};
pub use settings::AppSettings;
