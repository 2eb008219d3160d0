pub use crate::component::{component, ComponentDef, ComponentHandle};
pub use crate::effect::{
    use_effect, use_effect_with, use_lifecycle, use_subscription, Dispose, Effect, Watcher,
};
pub use crate::error::HookError;
pub use crate::props::{try_use_props, use_props, Props};
pub use crate::refs::{use_node_ref, NodeRef, RefKey};
pub use crate::registry::in_factory;
pub use crate::state::{try_use_state, use_state, RenderAck, State};
pub use crate::value::{merge_defaults, shallow_differs, PropBag, Value};
