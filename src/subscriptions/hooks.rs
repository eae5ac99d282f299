//! Subscribe/unsubscribe hooks injected into a view at construction.

use super::types::{ChangeHandler, SubscriptionId, Subscriptions};

/// Registers a view's handler on an item, returning the id to release it with.
pub type SubscribeFn<T> = Box<dyn Fn(&T, ChangeHandler<T>) -> SubscriptionId>;

/// Releases a registration previously returned by a [`SubscribeFn`].
pub type UnsubscribeFn<T> = Box<dyn Fn(&T, SubscriptionId)>;

/// The subscribe/unsubscribe pair for one channel.
pub struct ChannelHooks<T> {
    subscribe: SubscribeFn<T>,
    unsubscribe: UnsubscribeFn<T>,
}

impl<T> ChannelHooks<T> {
    pub fn new(
        subscribe: impl Fn(&T, ChangeHandler<T>) -> SubscriptionId + 'static,
        unsubscribe: impl Fn(&T, SubscriptionId) + 'static,
    ) -> Self {
        Self {
            subscribe: Box::new(subscribe),
            unsubscribe: Box::new(unsubscribe),
        }
    }
}

/// Both channel hook pairs of a view.
pub struct SubscriptionHooks<T> {
    filter: ChannelHooks<T>,
    sort: ChannelHooks<T>,
}

impl<T> SubscriptionHooks<T> {
    pub fn new(filter: ChannelHooks<T>, sort: ChannelHooks<T>) -> Self {
        Self { filter, sort }
    }

    /// Subscribe the view's handlers on both channels of `item`.
    pub(crate) fn attach(&self, item: &T, handlers: &Handlers<T>) -> Subscriptions {
        Subscriptions {
            filter: (self.filter.subscribe)(item, handlers.filter.clone()),
            sort: (self.sort.subscribe)(item, handlers.sort.clone()),
        }
    }

    /// Release both registrations made by [`attach`](Self::attach).
    pub(crate) fn detach(&self, item: &T, subscriptions: Subscriptions) {
        (self.filter.unsubscribe)(item, subscriptions.filter);
        (self.sort.unsubscribe)(item, subscriptions.sort);
    }
}

/// The two fixed handlers a view hands out to every attached item.
pub(crate) struct Handlers<T> {
    pub(crate) filter: ChangeHandler<T>,
    pub(crate) sort: ChangeHandler<T>,
}
