//! # Factory-phase hooks for host-driven components
//!
//! Prefab inverts the usual component contract: a component's **factory**
//! runs exactly once per instance, while the **render** closure it returns is
//! re-invoked on every update. Hooks declared inside the factory — state
//! cells, effects, props accessors, reference collectors — attach themselves
//! to the instance currently under construction and keep working for its
//! whole lifetime, long after the factory is gone.
//!
//! The runtime does not render anything itself. A host drives it: it
//! instantiates a [`ComponentDef`], shows the returned output, and forwards
//! attach/update/detach notifications into the instance's effect list.
//!
//! ## State
//!
//! ```rust
//! use prefab_core::*;
//!
//! let counter = component(|_props| {
//!     let count = use_state(0i64);
//!     let shown = count.clone();
//!     move || format!("count = {}", shown.get())
//! });
//!
//! let (handle, first) = counter.instantiate(PropBag::new(), || {});
//! assert_eq!(first, "count = 0");
//! handle.mounted();
//! ```
//!
//! Writes are synchronous; only the re-render is deferred. [`State::set`]
//! returns a [`RenderAck`] that resolves once the write's re-render has run
//! its render phase.
//!
//! ## Props
//!
//! ```rust
//! use prefab_core::*;
//!
//! let banner = component(|_props| {
//!     let props = use_props(PropBag::new().with("color", Value::of("black")));
//!     move || props.get("color").and_then(|v| v.get::<&str>()).unwrap_or("?")
//! });
//!
//! let (handle, first) = banner.instantiate(
//!     PropBag::new().with("color", Value::of("red")),
//!     || {},
//! );
//! assert_eq!(first, "red");
//! handle.mounted();
//!
//! // Defaults re-apply on every props update, not only at construction.
//! assert!(handle.will_receive(PropBag::new()));
//! assert_eq!(handle.render(), "black");
//! ```
//!
//! ## Effects
//!
//! One constructor per policy, no shape sniffing:
//!
//! ```rust
//! use prefab_core::*;
//!
//! let widget = component(|props| {
//!     let title = props.watch("title");
//!
//!     // Remounts only when `title` changes between updates.
//!     use_effect_with(vec![title], || {
//!         Dispose::new(|| { /* tear down whatever was set up */ })
//!     });
//!
//!     // Keyed to instance lifetime: never sees updates.
//!     use_subscription(|| Dispose::none());
//!
//!     move || ()
//! }).named("Widget");
//! # let _ = widget;
//! ```
//!
//! ## Rules
//!
//! - Hooks may only be called during a factory. Outside one, the plain
//!   constructors panic (with a logged diagnostic in debug builds); the
//!   `try_*` forms return [`HookError`] instead.
//! - One factory at a time. Nested construction is unsupported.
//! - Everything is single-threaded and host-driven; the types are `!Send` by
//!   construction.

pub mod component;
pub mod effect;
pub mod error;
pub mod prelude;
pub mod props;
pub mod refs;
pub mod registry;
pub mod state;
pub mod tests;
pub mod value;

mod instance;

pub use component::*;
pub use effect::*;
pub use error::*;
pub use props::*;
pub use refs::*;
pub use registry::in_factory;
pub use state::*;
pub use value::*;
