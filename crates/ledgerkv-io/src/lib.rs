//! File-handle collaborator abstraction for `ledgerkv`'s log engine.
//!
//! The engine depends on a narrow [`LogBackend`] contract rather than on
//! `std::fs` directly, so it can be handed either a single log file
//! ([`MonolithicBackend`]) or a set of rotated segment files
//! ([`SegmentedBackend`]) without caring which.

mod backend;
mod error;
mod monolithic;
mod segmented;

pub use backend::{LogBackend, LogHandle, OpenFlags};
pub use error::IoError;
pub use monolithic::MonolithicBackend;
pub use segmented::SegmentedBackend;
