//! The active-construction slot.
//!
//! While a factory runs, this thread-local holds the instance being built so
//! hook constructors can find their owner. It is a sequencing device, not a
//! lock: exactly one factory may be in flight at a time, and the slot must be
//! empty before and after every factory call. [`FactoryGuard`] enforces the
//! empty-after part even on unwind.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::HookError;
use crate::instance::InstanceInner;

thread_local! {
    static ACTIVE: RefCell<Option<Rc<InstanceInner>>> = const { RefCell::new(None) };
}

/// Captures an instance into the slot for the synchronous extent of a factory
/// call; releases it on drop.
pub(crate) struct FactoryGuard;

impl FactoryGuard {
    pub(crate) fn capture(instance: Rc<InstanceInner>) -> Self {
        ACTIVE.with(|slot| {
            let mut slot = slot.borrow_mut();
            if cfg!(debug_assertions) && slot.is_some() {
                log::error!(
                    "factory for `{}` started while another factory is still running; \
                     nested construction is unsupported",
                    instance.name()
                );
            }
            *slot = Some(instance);
        });
        FactoryGuard
    }
}

impl Drop for FactoryGuard {
    fn drop(&mut self) {
        ACTIVE.with(|slot| slot.borrow_mut().take());
    }
}

/// The instance currently in its factory phase, if any. An empty read is the
/// misuse every hook constructor guards against, so it is reported (debug
/// builds only).
pub(crate) fn current() -> Option<Rc<InstanceInner>> {
    let found = ACTIVE.with(|slot| slot.borrow().clone());
    if cfg!(debug_assertions) && found.is_none() {
        log::error!("a hook is being used outside of a component's factory phase");
    }
    found
}

pub(crate) fn require(hook: &'static str) -> Rc<InstanceInner> {
    match current() {
        Some(instance) => instance,
        None => panic!("{}", HookError::OutsideFactory { hook }),
    }
}

pub(crate) fn try_require(hook: &'static str) -> Result<Rc<InstanceInner>, HookError> {
    ACTIVE
        .with(|slot| slot.borrow().clone())
        .ok_or(HookError::OutsideFactory { hook })
}

/// True inside the synchronous extent of a factory call.
pub fn in_factory() -> bool {
    ACTIVE.with(|slot| slot.borrow().is_some())
}
