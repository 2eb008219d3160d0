use thiserror::Error;

/// Hook misuse, as seen by the `try_*` constructors.
///
/// The plain constructors log these in debug builds and then panic; release
/// builds skip the log and crash at the use site. Callers that prefer an
/// explicit failure path use [`crate::try_use_state`] / [`crate::try_use_props`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// A hook constructor ran while no factory was active.
    #[error("{hook} used outside of a component's factory phase")]
    OutsideFactory { hook: &'static str },

    /// A second props accessor was declared for one instance. The plain
    /// constructor lets the second accessor win; `try_use_props` refuses.
    #[error("use_props called more than once for component `{component}`")]
    DuplicatePropsAccessor { component: String },
}
