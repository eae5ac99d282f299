//! Frame-stepped component scheduling on top of [`SortedView`](crate::SortedView).
//!
//! A [`ComponentScheduler`] keeps two views over the same registered
//! components:
//!
//! - **drawables**: ordered by draw order, filtered to visible components
//! - **updateables**: ordered by update order, filtered to enabled components
//!
//! Each [`GameComponent`] reports its own changes through listener
//! registries, so a component that becomes hidden or changes its draw order
//! is picked up at the next frame without the scheduler polling it.

mod component;
mod scheduler;

pub use component::{ComponentRef, GameComponent};
pub use scheduler::ComponentScheduler;
