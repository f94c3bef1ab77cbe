//! Commit history for an additive-model curve editor.
//!
//! An [`EditorSession`] owns one shared, append-only commit log in which the
//! histories of all features interleave. Undo pops the tail into a redo
//! buffer, redo puts it back, and checkout previews any commit without
//! truncating the log. Every navigation rematerializes the working curve and
//! its "last edit" reference layers, then resyncs the metrics store.

pub mod collab;
pub mod config;
pub mod cursor;
pub mod log;
pub mod metrics;
mod navigate;
pub mod session;
pub mod state;
#[cfg(test)]
mod test_support;

pub use collab::{BinningEngine, Canvas, Collaborators, Selection};
pub use config::SessionConfig;
pub use cursor::HistoryCursor;
pub use log::{CommitLog, RedoBuffer};
pub use metrics::MetricsStore;
pub use session::EditorSession;
pub use state::WorkingState;
