//! Change-notification plumbing between items and a view.
//!
//! Items own their listener registries; a view never polls them. Instead the
//! view is built with a subscribe/unsubscribe pair for each [`Channel`]:
//!
//! - **Filter**: the item's eligibility flag changed. The view only marks its
//!   filtered cache stale.
//! - **Sort**: the item's sort key changed. The view detaches the item and
//!   journals a remove plus a fresh add, so the next reconciliation moves it.
//!
//! Subscribing hands the item a [`ChangeHandler`] and gets back a
//! [`SubscriptionId`]. The view holds that id for as long as the item is
//! attached and passes it back when unsubscribing, so every registration is
//! released explicitly.
//!
//! # Example
//!
//! ```ignore
//! let hooks = ChannelHooks::new(
//!     |item: &Widget, handler| item.visible_changed.subscribe(handler),
//!     |item: &Widget, id| { item.visible_changed.unsubscribe(id); },
//! );
//! ```

mod hooks;
mod types;

pub use hooks::{ChannelHooks, SubscribeFn, SubscriptionHooks, UnsubscribeFn};
pub(crate) use hooks::Handlers;
pub use types::{Channel, ChangeHandler, Listeners, SubscriptionId, Subscriptions};
