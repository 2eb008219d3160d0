use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::effect::Effect;
use crate::registry;
use crate::value::Value;

/// Key of one slot in a multi-slot [`NodeRef`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RefKey {
    Index(usize),
    Name(String),
}

impl From<usize> for RefKey {
    fn from(index: usize) -> Self {
        RefKey::Index(index)
    }
}

impl From<&str> for RefKey {
    fn from(name: &str) -> Self {
        RefKey::Name(name.to_string())
    }
}

impl From<String> for RefKey {
    fn from(name: String) -> Self {
        RefKey::Name(name)
    }
}

enum Slots {
    /// No differentiating call yet; the first one fixes the mode for good.
    Unset,
    Single(Option<Value>),
    Multi(HashMap<RefKey, Value>),
    /// The instance unmounted; every further host callback is a no-op.
    Dead,
}

/// Collector for host-managed node handles produced during render.
///
/// Single-slot or multi-slot; the mode is decided by the first
/// differentiating call ([`NodeRef::set`] vs [`NodeRef::binder`]) and never
/// revisited. Mixing call shapes after that is caller error: the losing
/// shape is ignored, not guarded.
#[derive(Clone)]
pub struct NodeRef {
    slots: Rc<RefCell<Slots>>,
}

/// Declares a reference collector on the instance currently in its factory
/// phase. Unmount replaces the slots with a dead marker, so binders the host
/// fires during teardown races are silently absorbed.
pub fn use_node_ref() -> NodeRef {
    let owner = registry::require("use_node_ref");
    let slots = Rc::new(RefCell::new(Slots::Unset));
    let on_unmount = slots.clone();
    owner.add_effect(Effect::new().on_unmount(move || *on_unmount.borrow_mut() = Slots::Dead));
    NodeRef { slots }
}

impl NodeRef {
    /// Switches to multi-slot mode and returns the binder the host calls for
    /// `key`: `Some(handle)` attaches, `None` detaches.
    pub fn binder(&self, key: impl Into<RefKey>) -> impl Fn(Option<Value>) {
        let key = key.into();
        {
            let mut slots = self.slots.borrow_mut();
            match &*slots {
                Slots::Unset | Slots::Single(None) => *slots = Slots::Multi(HashMap::new()),
                _ => {}
            }
        }
        let slots = self.slots.clone();
        move |handle| {
            let mut slots = slots.borrow_mut();
            if let Slots::Multi(map) = &mut *slots {
                match &handle {
                    Some(value) => {
                        map.insert(key.clone(), value.clone());
                    }
                    None => {
                        map.remove(&key);
                    }
                }
            }
        }
    }

    /// The host supplying the sole handle directly (single-slot mode).
    pub fn set(&self, handle: Value) {
        let mut slots = self.slots.borrow_mut();
        match &mut *slots {
            Slots::Unset => *slots = Slots::Single(Some(handle)),
            Slots::Single(slot) => *slot = Some(handle),
            _ => {}
        }
    }

    /// The host detaching the sole handle.
    pub fn clear(&self) {
        if let Slots::Single(slot) = &mut *self.slots.borrow_mut() {
            *slot = None;
        }
    }

    /// The lone stored handle, in single-slot mode.
    pub fn get(&self) -> Option<Value> {
        match &*self.slots.borrow() {
            Slots::Single(slot) => slot.clone(),
            _ => None,
        }
    }

    /// Snapshot of the keyed collection, in multi-slot mode.
    pub fn all(&self) -> Vec<(RefKey, Value)> {
        match &*self.slots.borrow() {
            Slots::Multi(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(&*self.slots.borrow(), Slots::Multi(_))
    }

    /// Count of live handles.
    pub fn len(&self) -> usize {
        match &*self.slots.borrow() {
            Slots::Single(Some(_)) => 1,
            Slots::Multi(map) => map.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
