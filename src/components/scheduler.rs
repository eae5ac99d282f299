//! Per-frame draw and update scheduling.

use super::component::ComponentRef;
use crate::error::{Result, ViewError};
use crate::subscriptions::ChannelHooks;
use crate::view::{SortedView, ViewConfig};
use std::cell::RefCell;
use std::fmt;
use tracing::debug;

/// Owns the drawable and updateable views over a set of components.
///
/// All methods take `&self`, so a frame action may register or unregister
/// components on the scheduler that is currently driving it.
pub struct ComponentScheduler {
    /// Registration order; the source of truth for uniqueness.
    components: RefCell<Vec<ComponentRef>>,
    drawables: SortedView<ComponentRef>,
    updateables: SortedView<ComponentRef>,
}

impl ComponentScheduler {
    pub fn new() -> Result<Self> {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let drawables = SortedView::<ComponentRef>::builder()
            .config(ViewConfig {
                name: "drawables".to_string(),
                capacity,
            })
            .order_by_key(ComponentRef::draw_order)
            .predicate(ComponentRef::visible)
            .filter_hooks(ChannelHooks::new(
                |c: &ComponentRef, handler| c.visible_changed().subscribe(handler),
                |c: &ComponentRef, id| {
                    c.visible_changed().unsubscribe(id);
                },
            ))
            .sort_hooks(ChannelHooks::new(
                |c: &ComponentRef, handler| c.draw_order_changed().subscribe(handler),
                |c: &ComponentRef, id| {
                    c.draw_order_changed().unsubscribe(id);
                },
            ))
            .build()?;

        let updateables = SortedView::<ComponentRef>::builder()
            .config(ViewConfig {
                name: "updateables".to_string(),
                capacity,
            })
            .order_by_key(ComponentRef::update_order)
            .predicate(ComponentRef::enabled)
            .filter_hooks(ChannelHooks::new(
                |c: &ComponentRef, handler| c.enabled_changed().subscribe(handler),
                |c: &ComponentRef, id| {
                    c.enabled_changed().unsubscribe(id);
                },
            ))
            .sort_hooks(ChannelHooks::new(
                |c: &ComponentRef, handler| c.update_order_changed().subscribe(handler),
                |c: &ComponentRef, id| {
                    c.update_order_changed().unsubscribe(id);
                },
            ))
            .build()?;

        Ok(Self {
            components: RefCell::new(Vec::with_capacity(capacity)),
            drawables,
            updateables,
        })
    }

    // --- Registration ---

    /// Register a component with both views.
    pub fn register(&self, component: ComponentRef) -> Result<()> {
        let mut components = self.components.borrow_mut();
        if components.contains(&component) {
            return Err(ViewError::AlreadyRegistered);
        }

        debug!(component = component.name(), "component registered");
        self.drawables.add(component.clone());
        self.updateables.add(component.clone());
        components.push(component);
        Ok(())
    }

    /// Unregister a component from both views.
    pub fn unregister(&self, component: &ComponentRef) -> Result<()> {
        let mut components = self.components.borrow_mut();
        let pos = components
            .iter()
            .position(|c| c == component)
            .ok_or(ViewError::NotRegistered)?;
        components.remove(pos);

        debug!(component = component.name(), "component unregistered");
        self.drawables.remove(component);
        self.updateables.remove(component);
        Ok(())
    }

    pub fn is_registered(&self, component: &ComponentRef) -> bool {
        self.components.borrow().contains(component)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.borrow().is_empty()
    }

    /// Unregister everything.
    pub fn clear(&self) {
        self.components.borrow_mut().clear();
        self.drawables.clear();
        self.updateables.clear();
    }

    // --- Frame ---

    /// Run `action` on every enabled component in update order.
    pub fn update<C, F>(&self, context: &mut C, action: F)
    where
        F: FnMut(&ComponentRef, &mut C),
    {
        self.updateables.for_each_filtered(context, action);
    }

    /// Run `action` on every visible component in draw order.
    pub fn draw<C, F>(&self, context: &mut C, action: F)
    where
        F: FnMut(&ComponentRef, &mut C),
    {
        self.drawables.for_each_filtered(context, action);
    }

    pub fn drawables(&self) -> &SortedView<ComponentRef> {
        &self.drawables
    }

    pub fn updateables(&self) -> &SortedView<ComponentRef> {
        &self.updateables
    }
}

impl fmt::Debug for ComponentScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentScheduler")
            .field("components", &self.components.borrow().len())
            .field("drawables", &self.drawables)
            .field("updateables", &self.updateables)
            .finish()
    }
}
