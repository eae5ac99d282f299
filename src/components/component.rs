//! Components with observable ordering and eligibility.

use crate::subscriptions::Listeners;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A schedulable component.
///
/// Orders and flags live in cells so they can change through a shared
/// [`ComponentRef`], including from inside a frame traversal.
pub struct GameComponent {
    name: String,
    draw_order: Cell<i32>,
    update_order: Cell<i32>,
    visible: Cell<bool>,
    enabled: Cell<bool>,
    visible_changed: Listeners<ComponentRef>,
    enabled_changed: Listeners<ComponentRef>,
    draw_order_changed: Listeners<ComponentRef>,
    update_order_changed: Listeners<ComponentRef>,
}

/// Shared handle to a [`GameComponent`]. Equality is identity.
#[derive(Clone)]
pub struct ComponentRef(Rc<GameComponent>);

impl ComponentRef {
    /// A visible, enabled component with both orders at 0.
    pub fn new(name: impl Into<String>) -> Self {
        ComponentRef(Rc::new(GameComponent {
            name: name.into(),
            draw_order: Cell::new(0),
            update_order: Cell::new(0),
            visible: Cell::new(true),
            enabled: Cell::new(true),
            visible_changed: Listeners::new(),
            enabled_changed: Listeners::new(),
            draw_order_changed: Listeners::new(),
            update_order_changed: Listeners::new(),
        }))
    }

    /// Builder form of [`set_draw_order`](Self::set_draw_order). The handle is
    /// shared, so listeners already attached through a clone are notified.
    pub fn with_draw_order(self, order: i32) -> Self {
        self.set_draw_order(order);
        self
    }

    pub fn with_update_order(self, order: i32) -> Self {
        self.set_update_order(order);
        self
    }

    pub fn with_visible(self, visible: bool) -> Self {
        self.set_visible(visible);
        self
    }

    pub fn with_enabled(self, enabled: bool) -> Self {
        self.set_enabled(enabled);
        self
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn draw_order(&self) -> i32 {
        self.0.draw_order.get()
    }

    pub fn update_order(&self) -> i32 {
        self.0.update_order.get()
    }

    pub fn visible(&self) -> bool {
        self.0.visible.get()
    }

    pub fn enabled(&self) -> bool {
        self.0.enabled.get()
    }

    // --- Setters (notify only on change) ---

    pub fn set_draw_order(&self, order: i32) {
        if self.0.draw_order.replace(order) != order {
            self.0.draw_order_changed.notify(self);
        }
    }

    pub fn set_update_order(&self, order: i32) {
        if self.0.update_order.replace(order) != order {
            self.0.update_order_changed.notify(self);
        }
    }

    pub fn set_visible(&self, visible: bool) {
        if self.0.visible.replace(visible) != visible {
            self.0.visible_changed.notify(self);
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        if self.0.enabled.replace(enabled) != enabled {
            self.0.enabled_changed.notify(self);
        }
    }

    // --- Change events ---

    pub fn visible_changed(&self) -> &Listeners<ComponentRef> {
        &self.0.visible_changed
    }

    pub fn enabled_changed(&self) -> &Listeners<ComponentRef> {
        &self.0.enabled_changed
    }

    pub fn draw_order_changed(&self) -> &Listeners<ComponentRef> {
        &self.0.draw_order_changed
    }

    pub fn update_order_changed(&self) -> &Listeners<ComponentRef> {
        &self.0.update_order_changed
    }

    /// Total number of listeners across all four events.
    pub fn listener_count(&self) -> usize {
        self.0.visible_changed.len()
            + self.0.enabled_changed.len()
            + self.0.draw_order_changed.len()
            + self.0.update_order_changed.len()
    }
}

impl PartialEq for ComponentRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ComponentRef {}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.0.name)
            .field("draw_order", &self.0.draw_order.get())
            .field("update_order", &self.0.update_order.get())
            .field("visible", &self.0.visible.get())
            .field("enabled", &self.0.enabled.get())
            .finish()
    }
}
