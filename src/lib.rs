//! # Ordered View
//!
//! A canonically ordered, predicate-filtered view over a changing set of
//! items, tolerant of mutation during its own traversal.
//!
//! ## Core Concepts
//!
//! - **Master sequence**: every registered item, always sorted
//! - **Journals**: pending adds and removals, applied in batch
//! - **Reconciliation**: drains the journals with a merge-insert and rebuilds
//!   the filtered cache, lazily, right before it is read
//! - **Change hooks**: items report their own sort-key and eligibility
//!   changes, so nothing is polled
//!
//! ## Example
//!
//! ```ignore
//! use ordered_view::{ComponentRef, ComponentScheduler};
//!
//! let scheduler = ComponentScheduler::new()?;
//! scheduler.register(ComponentRef::new("world").with_draw_order(0))?;
//! scheduler.register(ComponentRef::new("hud").with_draw_order(10))?;
//!
//! // Once per frame
//! scheduler.update(&mut frame, |component, frame| { /* ... */ });
//! scheduler.draw(&mut frame, |component, frame| { /* ... */ });
//! ```

pub mod components;
pub mod error;
pub mod journal;
pub mod subscriptions;
pub mod types;
pub mod view;

// Re-exports
pub use components::{ComponentRef, ComponentScheduler, GameComponent};
pub use error::{Result, ViewError};
pub use journal::{AddJournal, PendingAdd, RemoveJournal};
pub use subscriptions::{
    ChangeHandler, Channel, ChannelHooks, Listeners, SubscribeFn, SubscriptionHooks,
    SubscriptionId, Subscriptions, UnsubscribeFn,
};
pub use types::*;
pub use view::{Snapshot, SortedView, ViewBuilder, ViewConfig};
