pub mod commit;
pub mod error;
pub mod hash;
pub mod types;

pub use commit::{Commit, CommitParams};
pub use error::HistoryError;
pub use types::*;
