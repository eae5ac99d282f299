//! Shared helpers for integration tests.

#![allow(dead_code)]

use ordered_view::{ChannelHooks, ComponentRef, SortedView};
use std::cell::Cell;
use std::rc::Rc;

/// Hook call counters of a view built by [`draw_view`].
#[derive(Clone, Default)]
pub struct HookCalls {
    pub subscribed: Rc<Cell<usize>>,
    pub unsubscribed: Rc<Cell<usize>>,
}

impl HookCalls {
    pub fn subscribed(&self) -> usize {
        self.subscribed.get()
    }

    pub fn unsubscribed(&self) -> usize {
        self.unsubscribed.get()
    }
}

/// Route view log events to the test output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// A view ordered by draw order and filtered by visibility, counting every
/// subscribe/unsubscribe hook call.
pub fn draw_view() -> (SortedView<ComponentRef>, HookCalls) {
    init_tracing();
    let calls = HookCalls::default();

    let (sub, unsub) = (calls.subscribed.clone(), calls.unsubscribed.clone());
    let filter = ChannelHooks::new(
        move |c: &ComponentRef, handler| {
            sub.set(sub.get() + 1);
            c.visible_changed().subscribe(handler)
        },
        move |c: &ComponentRef, id| {
            unsub.set(unsub.get() + 1);
            c.visible_changed().unsubscribe(id);
        },
    );

    let (sub, unsub) = (calls.subscribed.clone(), calls.unsubscribed.clone());
    let sort = ChannelHooks::new(
        move |c: &ComponentRef, handler| {
            sub.set(sub.get() + 1);
            c.draw_order_changed().subscribe(handler)
        },
        move |c: &ComponentRef, id| {
            unsub.set(unsub.get() + 1);
            c.draw_order_changed().unsubscribe(id);
        },
    );

    let view = SortedView::<ComponentRef>::builder()
        .name("test-drawables")
        .order_by_key(ComponentRef::draw_order)
        .predicate(ComponentRef::visible)
        .filter_hooks(filter)
        .sort_hooks(sort)
        .build()
        .unwrap();

    (view, calls)
}

pub fn component(name: &str, draw_order: i32, visible: bool) -> ComponentRef {
    ComponentRef::new(name)
        .with_draw_order(draw_order)
        .with_visible(visible)
}

/// Names of the filtered items, via a full traversal.
pub fn traverse(view: &SortedView<ComponentRef>) -> Vec<String> {
    let mut out = Vec::new();
    view.for_each_filtered(&mut out, |c, out| out.push(c.name().to_string()));
    out
}

/// Names of the master sequence, after reconciliation.
pub fn master(view: &SortedView<ComponentRef>) -> Vec<String> {
    view.items().iter().map(|c| c.name().to_string()).collect()
}
