use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

use crate::effect::{Effect, Handler};
use crate::state::AckShared;
use crate::value::{merge_defaults, shallow_differs, PropBag};

/// Per-instance bookkeeping shared by every hook declared in its factory.
///
/// Deliberately non-generic: the registry slot and the hooks only need this,
/// while the render output type stays on [`crate::ComponentHandle`].
pub(crate) struct InstanceInner {
    name: String,
    /// The live prop bag, shared with the props accessor so watchers created
    /// during the factory observe every later bag without recreation.
    props: Rc<RefCell<PropBag>>,
    defaults: RefCell<PropBag>,
    accessor_taken: Cell<bool>,
    effects: RefCell<SmallVec<[Effect; 4]>>,
    /// Render acknowledgements waiting on the next render phase.
    pending: RefCell<Vec<Rc<AckShared>>>,
    /// Re-render request to the host.
    invalidate: RefCell<Option<Rc<dyn Fn()>>>,
}

impl InstanceInner {
    pub(crate) fn new(name: String, props: PropBag) -> Self {
        Self {
            name,
            props: Rc::new(RefCell::new(props)),
            defaults: RefCell::new(PropBag::new()),
            accessor_taken: Cell::new(false),
            effects: RefCell::new(SmallVec::new()),
            pending: RefCell::new(Vec::new()),
            invalidate: RefCell::new(None),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn props(&self) -> &Rc<RefCell<PropBag>> {
        &self.props
    }

    pub(crate) fn set_invalidate(&self, f: Rc<dyn Fn()>) {
        *self.invalidate.borrow_mut() = Some(f);
    }

    pub(crate) fn add_effect(&self, effect: Effect) {
        self.effects.borrow_mut().push(effect);
    }

    pub(crate) fn accessor_taken(&self) -> bool {
        self.accessor_taken.get()
    }

    /// Installs a props accessor: merges its defaults into the current bag and
    /// keeps them for every later [`receive_props`](Self::receive_props).
    /// Returns true when an accessor was already installed (last one wins).
    pub(crate) fn attach_accessor(&self, defaults: PropBag) -> bool {
        merge_defaults(&defaults, &mut self.props.borrow_mut());
        *self.defaults.borrow_mut() = defaults;
        self.accessor_taken.replace(true)
    }

    /// Props-will-change: re-merge defaults, gate on the shallow diff, swap
    /// the live bag either way. Returns whether the host should re-render.
    pub(crate) fn receive_props(&self, mut next: PropBag) -> bool {
        merge_defaults(&self.defaults.borrow(), &mut next);
        let differs = shallow_differs(&self.props.borrow(), &next);
        *self.props.borrow_mut() = next;
        differs
    }

    pub(crate) fn fire_mount(&self) {
        self.fire(|e| e.mount.clone());
    }

    pub(crate) fn fire_update(&self) {
        self.fire(|e| e.update.clone());
    }

    pub(crate) fn fire_unmount(&self) {
        // Declaration order here too; no reversal.
        self.fire(|e| e.unmount.clone());
    }

    // Snapshot the handlers first so one of them scheduling a state write
    // cannot alias the effect-list borrow while a sibling still has to fire.
    fn fire(&self, pick: impl Fn(&Effect) -> Option<Handler>) {
        let handlers: Vec<Handler> = self.effects.borrow().iter().filter_map(pick).collect();
        for handler in handlers {
            handler();
        }
    }

    pub(crate) fn request_render(&self, ack: Rc<AckShared>) {
        self.pending.borrow_mut().push(ack);
        let invalidate = self.invalidate.borrow().clone();
        if let Some(invalidate) = invalidate {
            invalidate();
        }
    }

    /// The render phase has run; complete every acknowledgement it covers.
    pub(crate) fn resolve_pending(&self) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for ack in pending {
            ack.complete();
        }
    }
}
