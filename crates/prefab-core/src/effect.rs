//! Effect records and the four registration policies.
//!
//! Each policy is its own constructor instead of one entry point sniffing its
//! argument's shape, so a malformed registration is unrepresentable:
//!
//! - [`use_lifecycle`] — raw record, handlers fire on every notification.
//! - [`use_effect`] — remount on every render.
//! - [`use_subscription`] — mount once, dispose once, never updates.
//! - [`use_effect_with`] — remount only when a watched value changes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::registry;
use crate::value::Value;

/// Run-at-most-once cleanup handle. Safe to call [`Dispose::run`] repeatedly.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// For mount handlers with nothing to clean up.
    pub fn none() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }
}

/// Zero-argument sampler returning the current value of something at call time.
///
/// The identity of the watcher is stable; its sample is not. Produced by
/// [`crate::Props::watch`] and [`crate::State::watch`], consumed by
/// [`use_effect_with`], which diffs consecutive samples with [`Value::same`].
#[derive(Clone)]
pub struct Watcher(Rc<dyn Fn() -> Value>);

impl Watcher {
    pub fn new(f: impl Fn() -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn sample(&self) -> Value {
        (self.0)()
    }
}

// Handlers are shared `Fn`s rather than cells holding `FnMut`s: a handler
// must stay callable while an earlier invocation of it (or of a sibling) is
// still on the stack, because a mount handler may write state and a
// synchronously re-rendering host turns that into a nested update
// notification before the mount returns.
pub(crate) type Handler = Rc<dyn Fn()>;

fn handler(f: impl Fn() + 'static) -> Handler {
    Rc::new(f)
}

/// One mount/update/unmount record on an instance's effect list.
///
/// Records fire in declaration order for every phase, unmount included, and
/// are never removed before the instance is destroyed.
#[derive(Default)]
pub struct Effect {
    pub(crate) mount: Option<Handler>,
    pub(crate) update: Option<Handler>,
    pub(crate) unmount: Option<Handler>,
}

impl Effect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mount(mut self, f: impl Fn() + 'static) -> Self {
        self.mount = Some(handler(f));
        self
    }

    pub fn on_update(mut self, f: impl Fn() + 'static) -> Self {
        self.update = Some(handler(f));
        self
    }

    pub fn on_unmount(mut self, f: impl Fn() + 'static) -> Self {
        self.unmount = Some(handler(f));
        self
    }
}

/// Registers a raw lifecycle record with no dependency tracking.
pub fn use_lifecycle(effect: Effect) {
    registry::require("use_lifecycle").add_effect(effect);
}

// Shared plumbing for the managed policies: the mount handler plus the
// cleanup it last returned. Unmount always closes out the previous mount
// before a replacement mount runs. No borrow is held across the handler
// call, so a mount that triggers a synchronous re-render recurses through
// the update path instead of aliasing a cell; like the recursion itself,
// that terminates only if the handler stops changing what it watches.
#[derive(Clone)]
struct Managed {
    handler: Rc<dyn Fn() -> Dispose>,
    cleanup: Rc<RefCell<Option<Dispose>>>,
}

impl Managed {
    fn new(handler: impl Fn() -> Dispose + 'static) -> Self {
        Self {
            handler: Rc::new(handler),
            cleanup: Rc::new(RefCell::new(None)),
        }
    }

    fn mount(&self) {
        let cleanup = (self.handler)();
        *self.cleanup.borrow_mut() = Some(cleanup);
    }

    fn unmount(&self) {
        let cleanup = self.cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup.run();
        }
    }
}

fn subscription_record(mount: impl Fn() -> Dispose + 'static) -> Effect {
    let managed = Managed::new(mount);
    let on_mount = managed.clone();
    Effect::new()
        .on_mount(move || on_mount.mount())
        .on_unmount(move || managed.unmount())
}

/// Fires on every render: mount on attach, dispose-then-remount on each
/// update, dispose on detach.
pub fn use_effect(mount: impl Fn() -> Dispose + 'static) {
    let owner = registry::require("use_effect");
    let managed = Managed::new(mount);
    let on_mount = managed.clone();
    let on_update = managed.clone();
    owner.add_effect(
        Effect::new()
            .on_mount(move || on_mount.mount())
            .on_update(move || {
                on_update.unmount();
                on_update.mount();
            })
            .on_unmount(move || managed.unmount()),
    );
}

/// Keyed to instance lifetime, not to any value: mount fires once on attach,
/// the returned [`Dispose`] once on detach, and updates never fire. The
/// policy for event subscriptions that must survive every re-render.
pub fn use_subscription(mount: impl Fn() -> Dispose + 'static) {
    registry::require("use_subscription").add_effect(subscription_record(mount));
}

/// Fires when a watched value changes.
///
/// Every watcher is sampled at declaration. On each update notification all
/// watchers are re-sampled and compared pairwise against the previous samples
/// with [`Value::same`]; if none changed the effect is skipped, otherwise the
/// previous cleanup runs and the mount handler fires again.
///
/// An empty watcher list can never report a change and degrades to the
/// [`use_subscription`] policy.
pub fn use_effect_with(watchers: Vec<Watcher>, mount: impl Fn() -> Dispose + 'static) {
    let owner = registry::require("use_effect_with");
    if watchers.is_empty() {
        owner.add_effect(subscription_record(mount));
        return;
    }

    let managed = Managed::new(mount);
    let seen: RefCell<Vec<Value>> = RefCell::new(watchers.iter().map(Watcher::sample).collect());
    let on_mount = managed.clone();
    let on_update = managed.clone();
    owner.add_effect(
        Effect::new()
            .on_mount(move || on_mount.mount())
            .on_update(move || {
                let next: Vec<Value> = watchers.iter().map(Watcher::sample).collect();
                let changed = {
                    let prev = seen.borrow();
                    next.iter().zip(prev.iter()).any(|(n, p)| !n.same(p))
                };
                *seen.borrow_mut() = next;
                if changed {
                    on_update.unmount();
                    on_update.mount();
                }
            })
            .on_unmount(move || managed.unmount()),
    );
}
