use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll, Waker};

use crate::effect::Watcher;
use crate::error::HookError;
use crate::instance::InstanceInner;
use crate::registry;
use crate::value::Value;

pub(crate) struct AckShared {
    done: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

impl AckShared {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            done: Cell::new(false),
            waker: RefCell::new(None),
        })
    }

    pub(crate) fn complete(&self) {
        self.done.set(true);
        if let Some(waker) = self.waker.borrow_mut().take() {
            waker.wake();
        }
    }
}

/// Resolves after the re-render triggered by a state write has run its render
/// phase, so callers can sequence logic after the update is visible.
///
/// If the owning instance is destroyed while the re-render is still pending,
/// the acknowledgement never resolves; don't block on a write racing a
/// teardown.
pub struct RenderAck {
    shared: Rc<AckShared>,
}

impl RenderAck {
    pub fn is_complete(&self) -> bool {
        self.shared.done.get()
    }
}

impl Future for RenderAck {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.shared.done.get() {
            Poll::Ready(())
        } else {
            *self.shared.waker.borrow_mut() = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// One piece of persistent state, owned by the instance in whose factory it
/// was declared.
///
/// Reads are synchronous; only the re-render (and the acknowledgement of it)
/// is deferred. `.value`-style access is [`State::get`] / [`State::with`];
/// writes go through [`State::set`] / [`State::update`], so setting a state
/// to `None` is an ordinary write, not a read.
pub struct State<T: 'static> {
    value: Rc<RefCell<T>>,
    owner: Weak<InstanceInner>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            owner: self.owner.clone(),
        }
    }
}

/// Declares a state cell on the instance currently in its factory phase.
pub fn use_state<T: 'static>(initial: T) -> State<T> {
    let owner = registry::require("use_state");
    State {
        value: Rc::new(RefCell::new(initial)),
        owner: Rc::downgrade(&owner),
    }
}

/// Non-panicking form of [`use_state`].
pub fn try_use_state<T: 'static>(initial: T) -> Result<State<T>, HookError> {
    let owner = registry::try_require("use_state")?;
    Ok(State {
        value: Rc::new(RefCell::new(initial)),
        owner: Rc::downgrade(&owner),
    })
}

impl<T: 'static> State<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Read without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Stores `value` synchronously and requests a host re-render.
    pub fn set(&self, value: T) -> RenderAck {
        *self.value.borrow_mut() = value;
        self.rerender()
    }

    /// Computes the next value from the current one, then stores it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> RenderAck {
        let next = f(&self.value.borrow());
        *self.value.borrow_mut() = next;
        self.rerender()
    }

    fn rerender(&self) -> RenderAck {
        let shared = AckShared::new();
        if let Some(owner) = self.owner.upgrade() {
            owner.request_render(shared.clone());
        }
        // No owner: the instance was destroyed, the write stays inert and the
        // ack stays pending forever.
        RenderAck { shared }
    }

    /// Watcher over this cell for [`crate::use_effect_with`].
    pub fn watch(&self) -> Watcher
    where
        T: Clone + PartialEq,
    {
        let value = self.value.clone();
        Watcher::new(move || Value::of(value.borrow().clone()))
    }
}
