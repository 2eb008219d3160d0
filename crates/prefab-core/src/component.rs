//! The component adapter: wraps a factory into a host-instantiable
//! definition.
//!
//! The factory runs exactly once per instance, inside the active-construction
//! window, and returns the render closure the host re-invokes on every
//! update. The first render happens inline during instantiation; the host
//! must not call [`ComponentHandle::render`] separately for first mount.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::instance::InstanceInner;
use crate::props::Props;
use crate::registry::FactoryGuard;
use crate::value::PropBag;

/// Host-instantiable component definition produced by [`component`].
pub struct ComponentDef<V> {
    name: String,
    factory: Rc<dyn Fn(Props) -> Box<dyn FnMut() -> V>>,
}

impl<V> Clone for ComponentDef<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            factory: self.factory.clone(),
        }
    }
}

/// Wraps a factory into a [`ComponentDef`].
///
/// The factory receives the props accessor and returns the render closure.
/// The display name is inferred from the factory's type name; builds that
/// strip it can override with [`ComponentDef::named`].
pub fn component<V, R, F>(factory: F) -> ComponentDef<V>
where
    V: 'static,
    F: Fn(Props) -> R + 'static,
    R: FnMut() -> V + 'static,
{
    ComponentDef {
        name: infer_name::<F>(),
        factory: Rc::new(move |props| Box::new(factory(props))),
    }
}

// "app::views::counter::{{closure}}" -> "counter"
fn infer_name<F>() -> String {
    let full = std::any::type_name::<F>();
    let trimmed = full.trim_end_matches("::{{closure}}");
    trimmed.rsplit("::").next().unwrap_or(trimmed).to_string()
}

impl<V: 'static> ComponentDef<V> {
    /// Explicit source identifier, for when name inference is useless
    /// (closures, stripped builds).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds one instance: runs the factory once under the construction
    /// guard, then runs the render closure once and returns its output as the
    /// first visible result. `invalidate` is the re-render request line back
    /// to the host; after calling it, the runtime expects the host to drive
    /// [`ComponentHandle::render`] and then [`ComponentHandle::updated`].
    pub fn instantiate(
        &self,
        props: PropBag,
        invalidate: impl Fn() + 'static,
    ) -> (ComponentHandle<V>, V) {
        let inner = Rc::new(InstanceInner::new(self.name.clone(), props));
        inner.set_invalidate(Rc::new(invalidate));
        let render = {
            let _guard = FactoryGuard::capture(inner.clone());
            (self.factory)(Props::bound(inner.props().clone()))
        };
        let handle = ComponentHandle {
            inner,
            render: RefCell::new(render),
        };
        let first = handle.render();
        (handle, first)
    }
}

/// One live instance, driven by the host.
pub struct ComponentHandle<V> {
    inner: Rc<InstanceInner>,
    render: RefCell<Box<dyn FnMut() -> V>>,
}

impl<V> ComponentHandle<V> {
    /// Runs the render closure and resolves every acknowledgement waiting on
    /// this render phase.
    pub fn render(&self) -> V {
        let out = {
            let mut render = self.render.borrow_mut();
            (*render)()
        };
        self.inner.resolve_pending();
        out
    }

    /// Host attach notification: fires every effect's mount, in declaration
    /// order.
    pub fn mounted(&self) {
        self.inner.fire_mount();
    }

    /// Host update notification, after a re-render is visible.
    pub fn updated(&self) {
        self.inner.fire_update();
    }

    /// Host detach notification: fires every effect's unmount, in declaration
    /// order, then the instance is done.
    pub fn unmounted(&self) {
        self.inner.fire_unmount();
    }

    /// Props-will-change: merges accessor defaults into `next`, makes it
    /// current, and answers the update gate — `true` when the bags shallowly
    /// differ and the host should re-render.
    pub fn will_receive(&self, next: PropBag) -> bool {
        self.inner.receive_props(next)
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<V> fmt::Display for ComponentHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} ... />", self.inner.name())
    }
}
