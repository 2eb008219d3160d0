use std::cell::RefCell;
use std::rc::Rc;

use crate::effect::Watcher;
use crate::error::HookError;
use crate::registry;
use crate::value::{PropBag, Value};

/// Live view of an instance's current props, merged with declared defaults.
///
/// The handle reads through the bag the adapter swaps on every props update,
/// so values and watchers obtained here always see the latest bag without
/// touching any factory-phase closure.
#[derive(Clone)]
pub struct Props {
    live: Rc<RefCell<PropBag>>,
}

impl Props {
    pub(crate) fn bound(live: Rc<RefCell<PropBag>>) -> Self {
        Self { live }
    }

    /// The whole merged bag as of now.
    pub fn value(&self) -> PropBag {
        self.live.borrow().clone()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.live.borrow().get(key).cloned()
    }

    /// A per-key watcher: re-reads the key's current value on every call.
    /// Missing keys sample as [`Value::absent`].
    pub fn watch(&self, key: impl Into<String>) -> Watcher {
        let key = key.into();
        let live = self.live.clone();
        Watcher::new(move || match live.borrow().get(&key) {
            Some(value) => value.clone(),
            None => Value::absent(),
        })
    }
}

/// Declares the props accessor for the instance currently in its factory
/// phase. `defaults` fill in keys absent from the actual bag, and are
/// re-applied on every props update, not only at construction.
///
/// One accessor per instance: a second call logs (debug builds) and wins.
pub fn use_props(defaults: PropBag) -> Props {
    let owner = registry::require("use_props");
    let duplicate = owner.attach_accessor(defaults);
    if cfg!(debug_assertions) && duplicate {
        log::error!(
            "{}",
            HookError::DuplicatePropsAccessor {
                component: owner.name().to_string(),
            }
        );
    }
    Props::bound(owner.props().clone())
}

/// Non-panicking form of [`use_props`]; also refuses a duplicate accessor
/// instead of letting it win.
pub fn try_use_props(defaults: PropBag) -> Result<Props, HookError> {
    let owner = registry::try_require("use_props")?;
    if owner.accessor_taken() {
        return Err(HookError::DuplicatePropsAccessor {
            component: owner.name().to_string(),
        });
    }
    owner.attach_accessor(defaults);
    Ok(Props::bound(owner.props().clone()))
}
