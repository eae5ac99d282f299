//! Integration tests for the ordered view.

mod common;

use common::{component, draw_view, master, traverse};
use ordered_view::{ComponentRef, ComponentScheduler};

// --- Ordering & Filtering ---

#[test]
fn test_draw_order_scenario() {
    let (view, _) = draw_view();

    view.add(component("D", 10, true));
    view.add(component("B", 5, true));
    view.add(component("C", 5, false));
    view.add(component("A", 20, true));

    assert_eq!(traverse(&view), vec!["B", "D", "A"]);
    assert_eq!(master(&view), vec!["B", "C", "D", "A"]);
}

#[test]
fn test_equal_keys_keep_insertion_order() {
    let (view, _) = draw_view();

    for name in ["i1", "i2", "i3", "i4", "i5"] {
        view.add(component(name, 7, true));
    }
    assert_eq!(traverse(&view), vec!["i1", "i2", "i3", "i4", "i5"]);

    // A later batch with the same key lands after the merged ones
    view.add(component("i6", 7, true));
    view.add(component("first", 1, true));
    assert_eq!(
        traverse(&view),
        vec!["first", "i1", "i2", "i3", "i4", "i5", "i6"]
    );
}

#[test]
fn test_filter_tracks_visibility() {
    let (view, _) = draw_view();
    let a = component("a", 1, true);
    let b = component("b", 2, true);
    let c = component("c", 3, true);
    for item in [&a, &b, &c] {
        view.add(item.clone());
    }
    assert_eq!(traverse(&view), vec!["a", "b", "c"]);

    b.set_visible(false);
    assert!(!view.is_cache_valid());
    assert_eq!(traverse(&view), vec!["a", "c"]);

    b.set_visible(true);
    a.set_visible(false);
    assert_eq!(traverse(&view), vec!["b", "c"]);

    // Master sequence is untouched by filter changes
    assert_eq!(master(&view), vec!["a", "b", "c"]);
}

#[test]
fn test_filtered_matches_master() {
    let (view, _) = draw_view();
    for i in 0..20 {
        view.add(component(&format!("c{i}"), (i * 7) % 5, i % 3 != 0));
    }

    let items = view.items();
    let expected: Vec<ComponentRef> = items.iter().filter(|c| c.visible()).cloned().collect();
    assert_eq!(view.filtered().to_vec(), expected);
    assert!(items
        .windows(2)
        .all(|pair| pair[0].draw_order() <= pair[1].draw_order()));
}

// --- Reactive Re-sort ---

#[test]
fn test_sort_key_change_moves_item() {
    let (view, _) = draw_view();
    let a = component("A", 1, true);
    let b = component("B", 2, true);
    let c = component("C", 3, true);
    for item in [&a, &b, &c] {
        view.add(item.clone());
    }
    assert_eq!(traverse(&view), vec!["A", "B", "C"]);

    b.set_draw_order(0);
    assert_eq!(view.pending_removals(), 1);
    assert_eq!(view.pending_adds(), 1);

    assert_eq!(traverse(&view), vec!["B", "A", "C"]);
}

#[test]
fn test_sort_change_to_equal_key_goes_last() {
    let (view, _) = draw_view();
    let a = component("A", 1, true);
    let b = component("B", 1, true);
    let c = component("C", 2, true);
    for item in [&a, &b, &c] {
        view.add(item.clone());
    }
    view.reconcile();

    c.set_draw_order(1);
    assert_eq!(master(&view), vec!["A", "B", "C"]);

    a.set_draw_order(2);
    a.set_draw_order(1);
    assert_eq!(master(&view), vec!["B", "C", "A"]);
}

#[test]
fn test_sort_change_of_pending_item_needs_no_notification() {
    let (view, calls) = draw_view();
    let a = component("A", 5, true);
    let b = component("B", 3, true);
    view.add(a.clone());
    view.add(b.clone());

    // Not merged yet, so nothing is subscribed and the change is not observed
    a.set_draw_order(1);
    assert_eq!(calls.subscribed(), 0);
    assert_eq!(view.pending_removals(), 0);

    assert_eq!(traverse(&view), vec!["A", "B"]);
}

#[test]
fn test_builder_on_registered_handle_resorts() {
    let scheduler = ComponentScheduler::new().unwrap();
    let a = ComponentRef::new("a").with_draw_order(1);
    let b = ComponentRef::new("b").with_draw_order(2);
    scheduler.register(a.clone()).unwrap();
    scheduler.register(b.clone()).unwrap();

    let frame = |scheduler: &ComponentScheduler| {
        let mut drawn = Vec::new();
        scheduler.draw(&mut drawn, |c, drawn| drawn.push(c.name().to_string()));
        drawn
    };
    assert_eq!(frame(&scheduler), vec!["a", "b"]);

    // Same component, reached through a fresh clone of the handle
    let _ = a.clone().with_draw_order(10);
    scheduler
        .register(ComponentRef::new("c").with_draw_order(5))
        .unwrap();

    assert_eq!(frame(&scheduler), vec!["b", "c", "a"]);
}

#[test]
fn test_builder_on_registered_handle_refilters() {
    let scheduler = ComponentScheduler::new().unwrap();
    let a = ComponentRef::new("a").with_draw_order(1);
    let b = ComponentRef::new("b").with_draw_order(2);
    scheduler.register(a.clone()).unwrap();
    scheduler.register(b.clone()).unwrap();
    scheduler.draw(&mut (), |_, _| {});
    scheduler.update(&mut (), |_, _| {});

    let _ = b.clone().with_visible(false).with_enabled(false);

    let mut drawn = Vec::new();
    scheduler.draw(&mut drawn, |c, drawn| drawn.push(c.name().to_string()));
    let mut updated = Vec::new();
    scheduler.update(&mut updated, |c, updated| updated.push(c.name().to_string()));

    assert_eq!(drawn, vec!["a"]);
    assert_eq!(updated, vec!["a"]);
}

// --- Membership ---

#[test]
fn test_add_then_remove_cancels() {
    let (view, calls) = draw_view();
    let keep = component("keep", 1, true);
    view.add(keep.clone());
    view.reconcile();
    let subscribed = calls.subscribed();

    let x = component("x", 0, true);
    view.add(x.clone());
    assert!(view.remove(&x));

    assert_eq!(view.pending_adds(), 0);
    assert_eq!(view.pending_removals(), 0);
    assert_eq!(master(&view), vec!["keep"]);
    assert_eq!(calls.subscribed(), subscribed);
    assert_eq!(x.listener_count(), 0);
}

#[test]
fn test_contains_ignores_pending_adds() {
    let (view, _) = draw_view();
    let a = component("a", 1, true);

    view.add(a.clone());
    assert!(!view.contains(&a));

    view.reconcile();
    assert!(view.contains(&a));
}

#[test]
fn test_duplicate_add_is_kept() {
    let (view, _) = draw_view();
    let a = component("a", 1, true);

    view.add(a.clone());
    view.add(a.clone());
    assert_eq!(traverse(&view), vec!["a", "a"]);
    assert_eq!(a.listener_count(), 4);

    assert!(view.remove(&a));
    assert_eq!(traverse(&view), vec!["a"]);
    assert_eq!(a.listener_count(), 2);
}

#[test]
fn test_clear_unsubscribes_everything() {
    let (view, calls) = draw_view();
    let merged: Vec<_> = (0..5).map(|i| component(&format!("m{i}"), i, true)).collect();
    for item in &merged {
        view.add(item.clone());
    }
    view.reconcile();
    let pending = component("pending", 9, true);
    view.add(pending.clone());

    view.clear();

    assert!(view.is_empty());
    assert_eq!(view.pending_adds(), 0);
    assert_eq!(calls.subscribed(), calls.unsubscribed());
    assert!(merged.iter().all(|c| c.listener_count() == 0));
    assert!(traverse(&view).is_empty());
}

// --- Reconciliation ---

#[test]
fn test_reconciliation_is_idempotent() {
    let (view, calls) = draw_view();
    for i in 0..4 {
        view.add(component(&format!("c{i}"), 4 - i, i != 2));
    }

    let first = traverse(&view);
    let stats = view.stats();
    let (subscribed, unsubscribed) = (calls.subscribed(), calls.unsubscribed());

    let second = traverse(&view);

    assert_eq!(first, second);
    assert_eq!(view.stats().reconciliations, stats.reconciliations);
    assert_eq!(calls.subscribed(), subscribed);
    assert_eq!(calls.unsubscribed(), unsubscribed);
}

#[test]
fn test_subscription_happens_at_merge() {
    let (view, calls) = draw_view();
    let a = component("a", 1, true);

    view.add(a.clone());
    assert_eq!(calls.subscribed(), 0);

    view.reconcile();
    assert_eq!(calls.subscribed(), 2);
    assert_eq!(a.listener_count(), 2);
}

#[test]
fn test_stats_track_lifetime_counters() {
    let (view, _) = draw_view();
    let a = component("a", 1, true);
    let b = component("b", 2, false);
    view.add(a.clone());
    view.add(b.clone());
    view.reconcile();

    view.remove(&a);
    b.set_draw_order(0);
    view.reconcile();

    let stats = view.stats();
    assert_eq!(stats.len, 1);
    assert_eq!(stats.filtered, 0);
    assert_eq!(stats.merged, 3);
    assert_eq!(stats.removed, 2);
    assert_eq!(stats.reconciliations, 2);
    assert!(stats.cache_valid);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["merged"], 3);
}
