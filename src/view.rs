//! The sorted, filtered view and its reconciliation step.

use crate::error::{Result, ViewError};
use crate::journal::{AddJournal, RemoveJournal};
use crate::subscriptions::{
    ChangeHandler, Channel, ChannelHooks, Handlers, SubscriptionHooks, Subscriptions,
};
use crate::types::ViewStats;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// View configuration.
#[derive(Clone, Debug)]
pub struct ViewConfig {
    /// Label used in log events.
    pub name: String,

    /// Initial capacity of the master sequence, cache and add journal.
    pub capacity: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            name: "view".to_string(),
            capacity: 0,
        }
    }
}

type OrderingFn<T> = Box<dyn Fn(&T, &T) -> Ordering>;
type PredicateFn<T> = Box<dyn Fn(&T) -> bool>;

/// Shared, immutable snapshot of the filtered cache.
///
/// A traversal iterates a snapshot, so mutations made while it runs only
/// affect the journals and never the slice being iterated.
pub struct Snapshot<T>(Rc<Vec<T>>);

impl<T> Snapshot<T> {
    fn empty() -> Self {
        Snapshot(Rc::new(Vec::new()))
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Snapshot(Rc::clone(&self.0))
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// An entry of the master sequence.
struct Member<T> {
    item: T,
    /// `None` once the member is scheduled for removal.
    subscriptions: Option<Subscriptions>,
}

impl<T> Member<T> {
    fn is_attached(&self) -> bool {
        self.subscriptions.is_some()
    }
}

/// Mutable state, borrowed only for the duration of a single operation.
struct State<T> {
    /// Always sorted by the ordering function.
    master: Vec<Member<T>>,
    adds: AddJournal<T>,
    removals: RemoveJournal,
    cache: Snapshot<T>,
    cache_valid: bool,
    reconciliations: u64,
    merged: u64,
    removed: u64,
}

impl<T> State<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            master: Vec::with_capacity(capacity),
            adds: AddJournal::with_capacity(capacity),
            removals: RemoveJournal::new(),
            cache: Snapshot(Rc::new(Vec::with_capacity(capacity))),
            // An empty cache is exactly the filtered empty master.
            cache_valid: true,
            reconciliations: 0,
            merged: 0,
            removed: 0,
        }
    }

    /// Drop cached item references. Keeps the allocation unless a traversal
    /// still holds the snapshot.
    fn clear_cache(&mut self) {
        match Rc::get_mut(&mut self.cache.0) {
            Some(cache) => cache.clear(),
            None => self.cache = Snapshot::empty(),
        }
    }
}

impl<T: Clone> State<T> {
    fn rebuild_cache(&mut self, predicate: &dyn Fn(&T) -> bool) {
        if let Some(cache) = Rc::get_mut(&mut self.cache.0) {
            cache.clear();
            cache.extend(
                self.master
                    .iter()
                    .filter(|member| predicate(&member.item))
                    .map(|member| member.item.clone()),
            );
            return;
        }

        let cache = self
            .master
            .iter()
            .filter(|member| predicate(&member.item))
            .map(|member| member.item.clone())
            .collect();
        self.cache = Snapshot(Rc::new(cache));
    }
}

impl<T: PartialEq> State<T> {
    /// Index of the first master entry for `item` that is not already
    /// scheduled for removal.
    fn position_attached(&self, item: &T) -> Option<usize> {
        self.master
            .iter()
            .position(|member| member.is_attached() && member.item == *item)
    }
}

struct Inner<T> {
    config: ViewConfig,
    ordering: OrderingFn<T>,
    predicate: PredicateFn<T>,
    hooks: SubscriptionHooks<T>,
    /// Handed to every attached item; they only hold a weak reference back.
    handlers: Handlers<T>,
    state: RefCell<State<T>>,
}

impl<T: Clone + PartialEq> Inner<T> {
    fn add(&self, item: T) -> bool {
        let mut state = self.state.borrow_mut();
        state.adds.push(item);
        state.cache_valid = false;
        true
    }

    fn remove(&self, item: &T) -> bool {
        let mut state = self.state.borrow_mut();

        // Never merged, so never subscribed: just forget it.
        if state.adds.cancel(item) {
            trace!(view = %self.config.name, "pending add cancelled");
            return true;
        }

        match state.position_attached(item) {
            Some(index) => {
                self.detach_at(&mut state, index, item);
                true
            }
            None => false,
        }
    }

    /// Unsubscribe the member at `index` and journal its removal.
    fn detach_at(&self, state: &mut State<T>, index: usize, item: &T) {
        if let Some(subscriptions) = state.master[index].subscriptions.take() {
            self.hooks.detach(item, subscriptions);
        }
        state.removals.schedule(index);
        state.cache_valid = false;
    }

    fn attach(&self, item: T) -> Member<T> {
        let subscriptions = self.hooks.attach(&item, &self.handlers);
        Member {
            item,
            subscriptions: Some(subscriptions),
        }
    }

    fn filter_changed(&self) {
        self.state.borrow_mut().cache_valid = false;
    }

    fn sort_changed(&self, item: &T) {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.position_attached(item) else {
            return;
        };

        self.detach_at(&mut state, index, item);
        state.adds.push(item.clone());
        trace!(view = %self.config.name, index, "sort key changed, re-merging");
    }

    fn reconcile(&self) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.cache_valid {
            return;
        }

        let mut removed = 0;
        let mut merged = 0;

        // A filter change alone leaves the master sequence as it is.
        if !state.removals.is_empty() || !state.adds.is_empty() {
            // Highest index first, so the lower ones keep their meaning.
            let removals = state.removals.drain_descending();
            removed = removals.len();
            for index in removals {
                let member = state.master.remove(index);
                debug_assert!(!member.is_attached(), "removed member still subscribed");
            }

            let pending = state.adds.drain_sorted(|a, b| (self.ordering)(a, b));
            merged = pending.len();
            if !pending.is_empty() {
                let existing = std::mem::take(&mut state.master);
                let mut master = Vec::with_capacity(existing.len() + pending.len());
                let mut pending = pending.into_iter().peekable();

                for member in existing {
                    // Strictly less: existing members win ties, keeping FIFO order.
                    while let Some(entry) = pending.next_if(|entry| {
                        (self.ordering)(&entry.item, &member.item) == Ordering::Less
                    }) {
                        master.push(self.attach(entry.item));
                    }
                    master.push(member);
                }
                master.extend(pending.map(|entry| self.attach(entry.item)));

                state.master = master;
            }

            debug_assert!(
                state
                    .master
                    .windows(2)
                    .all(|pair| (self.ordering)(&pair[0].item, &pair[1].item) != Ordering::Greater),
                "master sequence out of order"
            );
        }

        state.rebuild_cache(&*self.predicate);
        state.cache_valid = true;
        state.reconciliations += 1;
        state.merged += merged as u64;
        state.removed += removed as u64;

        trace!(
            view = %self.config.name,
            removed,
            merged,
            filtered = state.cache.len(),
            "reconciled"
        );
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for member in state.master.drain(..) {
            if let Some(subscriptions) = member.subscriptions {
                self.hooks.detach(&member.item, subscriptions);
            }
        }
    }
}

/// A canonically ordered, predicate-filtered view over a changing item set.
///
/// Mutations (`add`, `remove`, and change notifications from items) are
/// journaled and applied lazily by a reconciliation step that runs right
/// before the filtered cache is read. Traversals iterate a snapshot of the
/// cache, so a traversal action may freely mutate the view it is iterating.
///
/// The handle is cheap to clone; clones share the same view. The view is
/// single-threaded: it is neither `Send` nor `Sync`.
///
/// Subscription hooks run while the view is borrowed internally and must not
/// call back into the same view.
pub struct SortedView<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for SortedView<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> SortedView<T> {
    /// Start building a view.
    pub fn builder() -> ViewBuilder<T> {
        ViewBuilder::new()
    }

    // --- Mutation ---

    /// Journal `item` for insertion. It becomes visible at the next
    /// reconciliation, which is also when it gets subscribed to.
    ///
    /// Adding the same item twice is allowed; the view keeps both.
    pub fn add(&self, item: T) -> bool {
        self.inner.add(item)
    }

    /// Remove `item`.
    ///
    /// A pending add is cancelled outright. A merged item is unsubscribed
    /// immediately and its removal journaled. Returns false if the item is
    /// neither pending nor merged.
    pub fn remove(&self, item: &T) -> bool {
        self.inner.remove(item)
    }

    /// Unsubscribe every merged item and empty the view.
    pub fn clear(&self) {
        let mut state = self.inner.state.borrow_mut();
        let master = std::mem::take(&mut state.master);
        let detached = master.len();
        for member in master {
            if let Some(subscriptions) = member.subscriptions {
                self.inner.hooks.detach(&member.item, subscriptions);
            }
        }

        state.adds.clear();
        state.removals.clear();
        state.clear_cache();
        state.cache_valid = true;

        debug!(view = %self.inner.config.name, detached, "view cleared");
    }

    // --- Queries ---

    /// Whether `item` is in the master sequence. Pending adds are not visible
    /// until reconciled; a journaled removal stays visible until reconciled.
    pub fn contains(&self, item: &T) -> bool {
        self.inner
            .state
            .borrow()
            .master
            .iter()
            .any(|member| member.item == *item)
    }

    /// Number of items in the master sequence.
    pub fn len(&self) -> usize {
        self.inner.state.borrow().master.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_adds(&self) -> usize {
        self.inner.state.borrow().adds.len()
    }

    pub fn pending_removals(&self) -> usize {
        self.inner.state.borrow().removals.len()
    }

    pub fn is_cache_valid(&self) -> bool {
        self.inner.state.borrow().cache_valid
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn stats(&self) -> ViewStats {
        let state = self.inner.state.borrow();
        ViewStats {
            len: state.master.len(),
            filtered: state.cache.len(),
            pending_adds: state.adds.len(),
            pending_removals: state.removals.len(),
            cache_valid: state.cache_valid,
            reconciliations: state.reconciliations,
            merged: state.merged,
            removed: state.removed,
        }
    }

    // --- Reconciliation & Traversal ---

    /// Apply all journaled changes and rebuild the filtered cache, if stale.
    pub fn reconcile(&self) {
        self.inner.reconcile();
    }

    /// Reconcile, then return the filtered cache.
    pub fn filtered(&self) -> Snapshot<T> {
        self.inner.reconcile();
        self.inner.state.borrow().cache.clone()
    }

    /// Reconcile, then return every item of the master sequence in order.
    pub fn items(&self) -> Vec<T> {
        self.inner.reconcile();
        self.inner
            .state
            .borrow()
            .master
            .iter()
            .map(|member| member.item.clone())
            .collect()
    }

    /// Reconcile, then call `action` for each filtered item in order.
    ///
    /// `action` may add, remove, or change items of this view. The current
    /// traversal still visits the full pre-mutation snapshot; the changes show
    /// up in the next one. If the cache was invalidated along the way it is
    /// cleared afterwards, so it does not keep removed items alive.
    pub fn for_each_filtered<C, F>(&self, context: &mut C, mut action: F)
    where
        F: FnMut(&T, &mut C),
    {
        let snapshot = self.filtered();
        for item in snapshot.iter() {
            action(item, context);
        }
        drop(snapshot);

        let mut state = self.inner.state.borrow_mut();
        if !state.cache_valid {
            state.clear_cache();
        }
    }
}

impl<T> fmt::Debug for SortedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("SortedView")
            .field("name", &self.inner.config.name)
            .field("len", &state.master.len())
            .field("pending_adds", &state.adds.len())
            .field("pending_removals", &state.removals.len())
            .field("cache_valid", &state.cache_valid)
            .finish()
    }
}

/// Builder for [`SortedView`].
///
/// The ordering function, the membership predicate, and the hooks for both
/// channels are required; [`build`](Self::build) fails without them.
pub struct ViewBuilder<T> {
    config: ViewConfig,
    ordering: Option<OrderingFn<T>>,
    predicate: Option<PredicateFn<T>>,
    filter_hooks: Option<ChannelHooks<T>>,
    sort_hooks: Option<ChannelHooks<T>>,
}

impl<T: Clone + PartialEq + 'static> ViewBuilder<T> {
    pub fn new() -> Self {
        Self {
            config: ViewConfig::default(),
            ordering: None,
            predicate: None,
            filter_hooks: None,
            sort_hooks: None,
        }
    }

    pub fn config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Total order of the master sequence.
    pub fn ordering(mut self, ordering: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.ordering = Some(Box::new(ordering));
        self
    }

    /// Order by a key extracted from each item.
    pub fn order_by_key<K: Ord>(self, key: impl Fn(&T) -> K + 'static) -> Self {
        self.ordering(move |a, b| key(a).cmp(&key(b)))
    }

    /// Membership test for the filtered cache.
    pub fn predicate(mut self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Hooks for changes that affect the predicate.
    pub fn filter_hooks(mut self, hooks: ChannelHooks<T>) -> Self {
        self.filter_hooks = Some(hooks);
        self
    }

    /// Hooks for changes that affect the ordering.
    pub fn sort_hooks(mut self, hooks: ChannelHooks<T>) -> Self {
        self.sort_hooks = Some(hooks);
        self
    }

    pub fn build(self) -> Result<SortedView<T>> {
        let ordering = self.ordering.ok_or(ViewError::MissingOrdering)?;
        let predicate = self.predicate.ok_or(ViewError::MissingPredicate)?;
        let filter_hooks = self
            .filter_hooks
            .ok_or(ViewError::MissingHooks(Channel::Filter))?;
        let sort_hooks = self
            .sort_hooks
            .ok_or(ViewError::MissingHooks(Channel::Sort))?;
        let config = self.config;

        let inner = Rc::new_cyclic(|weak: &Weak<Inner<T>>| {
            let on_filter = weak.clone();
            let on_sort = weak.clone();
            let handlers = Handlers {
                filter: ChangeHandler::new(move |_: &T| {
                    if let Some(inner) = on_filter.upgrade() {
                        inner.filter_changed();
                    }
                }),
                sort: ChangeHandler::new(move |item: &T| {
                    if let Some(inner) = on_sort.upgrade() {
                        inner.sort_changed(item);
                    }
                }),
            };
            let state = RefCell::new(State::with_capacity(config.capacity));

            Inner {
                config,
                ordering,
                predicate,
                hooks: SubscriptionHooks::new(filter_hooks, sort_hooks),
                handlers,
                state,
            }
        });

        debug!(view = %inner.config.name, "view created");
        Ok(SortedView { inner })
    }
}

impl<T: Clone + PartialEq + 'static> Default for ViewBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
