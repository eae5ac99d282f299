//! Subscription types shared by views and items.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Which kind of item change a subscription reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Membership predicate input changed (visible, enabled, ...).
    Filter,
    /// Sort key changed (draw order, update order, ...).
    Sort,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Filter => write!(f, "filter"),
            Channel::Sort => write!(f, "sort"),
        }
    }
}

/// Unique identifier for a subscription, issued by the item side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback an item invokes when it changes. Receives the changed item.
pub struct ChangeHandler<T> {
    callback: Rc<dyn Fn(&T)>,
}

impl<T> Clone for ChangeHandler<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<T> ChangeHandler<T> {
    pub fn new(callback: impl Fn(&T) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Report a change of `item`.
    pub fn notify(&self, item: &T) {
        (self.callback)(item);
    }
}

impl<T> fmt::Debug for ChangeHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeHandler").finish_non_exhaustive()
    }
}

/// The ids a view holds for one attached item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscriptions {
    pub filter: SubscriptionId,
    pub sort: SubscriptionId,
}

/// Listener registry an item can embed for one change event.
///
/// Notification works on a copy of the registered handlers, so a handler may
/// unsubscribe itself (or others) while being notified.
pub struct Listeners<T> {
    handlers: RefCell<Vec<(SubscriptionId, ChangeHandler<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Register a handler and return the id needed to release it.
    pub fn subscribe(&self, handler: ChangeHandler<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Release a handler. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        match handlers.iter().position(|(sub, _)| *sub == id) {
            Some(pos) => {
                handlers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Invoke every registered handler with `item`.
    pub fn notify(&self, item: &T) {
        let snapshot: Vec<ChangeHandler<T>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in snapshot {
            handler.notify(item);
        }
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}
