//! A synchronous, in-memory host for exercising `prefab-core` components.
//!
//! The real host schedules re-renders; this one performs them immediately:
//! every invalidation renders, records the output, and fires the update
//! notification before returning. That keeps lifecycle tests linear — after
//! any call on [`TestHost`], all due renders and notifications have already
//! happened.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use prefab_core::{ComponentDef, ComponentHandle, PropBag};

pub struct TestHost<V: 'static> {
    handle: Rc<ComponentHandle<V>>,
    outputs: Rc<RefCell<Vec<V>>>,
    alive: Cell<bool>,
}

impl<V: Clone + 'static> TestHost<V> {
    /// Instantiates the definition, records the first output, and fires the
    /// attach notification.
    pub fn mount(def: &ComponentDef<V>, props: PropBag) -> Self {
        let outputs: Rc<RefCell<Vec<V>>> = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<RefCell<Option<Rc<ComponentHandle<V>>>>> = Rc::new(RefCell::new(None));

        let (handle, first) = def.instantiate(props, {
            let slot = slot.clone();
            let outputs = outputs.clone();
            move || {
                // A write during the factory lands here before the handle
                // exists; the first render (which instantiate runs after the
                // factory) already covers it.
                let handle = slot.borrow().clone();
                if let Some(handle) = handle {
                    let out = handle.render();
                    outputs.borrow_mut().push(out);
                    handle.updated();
                }
            }
        });

        log::trace!("mounted {handle}");
        let handle = Rc::new(handle);
        *slot.borrow_mut() = Some(handle.clone());
        outputs.borrow_mut().push(first);
        handle.mounted();

        Self {
            handle,
            outputs,
            alive: Cell::new(true),
        }
    }

    /// Sends props-will-change; renders and fires the update notification
    /// when the gate lets the change through.
    pub fn set_props(&self, next: PropBag) {
        if self.handle.will_receive(next) {
            let out = self.handle.render();
            self.outputs.borrow_mut().push(out);
            self.handle.updated();
        }
    }

    /// Fires the detach notification (once).
    pub fn unmount(&self) {
        if self.alive.replace(false) {
            log::trace!("unmounting {}", self.handle);
            self.handle.unmounted();
        }
    }

    pub fn handle(&self) -> &ComponentHandle<V> {
        &self.handle
    }

    /// Every output produced so far, first render included, in order.
    pub fn outputs(&self) -> Vec<V> {
        self.outputs.borrow().clone()
    }

    pub fn render_count(&self) -> usize {
        self.outputs.borrow().len()
    }

    /// The most recent output.
    pub fn last(&self) -> V {
        self.outputs
            .borrow()
            .last()
            .cloned()
            .expect("a mounted component has rendered at least once")
    }
}
