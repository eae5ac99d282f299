//! Pending structural changes, applied in batch at reconciliation.
//!
//! Mutations never touch the master sequence directly. Adds land in the
//! [`AddJournal`] tagged with an insertion counter; removals of merged items
//! land in the [`RemoveJournal`] as master indices.

mod add;
mod remove;

pub use add::{AddJournal, PendingAdd};
pub use remove::RemoveJournal;
