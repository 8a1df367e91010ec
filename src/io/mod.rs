pub mod payload;
pub mod sequence;
pub mod storage;
pub mod xer;

pub use payload::{handle_drop, DragPayload, DropOutcome};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use xer::{parse_xer, parse_xer_file, Activity, LinkMode, XerError};
