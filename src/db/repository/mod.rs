//! Repository layer: entity-scoped database operations.
//!
//! Every function borrows a connection and leaves connection lifetime to
//! the caller; see [`crate::lab`] for the one-session-per-call wrappers.

mod order;
mod patient;
mod report;
mod result;
mod rows;
mod technician;
mod test_type;

pub use order::*;
pub use patient::*;
pub use report::*;
pub use result::*;
pub use technician::*;
pub use test_type::*;
