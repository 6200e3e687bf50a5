//! Best-effort JSONL logging of panel operations.

pub mod events;

pub use events::{EventLog, PanelEvent};
