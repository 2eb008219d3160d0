use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Dynamic value carried through prop bags and watcher samples.
///
/// A `Value` remembers how it wants to be compared:
///
/// - [`Value::of`] wraps any `PartialEq` payload and compares by value, the
///   way primitives compare in the host's scripting layer.
/// - [`Value::handle`] wraps an opaque host object and compares by reference
///   identity (`Rc::ptr_eq`).
///
/// There is deliberately no structural recursion: replacing a nested value
/// with an equal-but-distinct handle counts as a change.
#[derive(Clone)]
pub struct Value {
    inner: Rc<dyn Any>,
    eq: fn(&Rc<dyn Any>, &Rc<dyn Any>) -> bool,
}

/// Marker payload for reads of a key that is not present in the bag.
#[derive(PartialEq)]
struct Absent;

impl Value {
    /// A value compared with `PartialEq`. Two `Value::of`s of different
    /// payload types never compare equal.
    pub fn of<T: PartialEq + 'static>(value: T) -> Self {
        Self {
            inner: Rc::new(value),
            eq: |a, b| match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// An opaque host handle, compared by reference identity.
    pub fn handle(handle: Rc<dyn Any>) -> Self {
        Self {
            inner: handle,
            eq: |a, b| Rc::ptr_eq(a, b),
        }
    }

    /// What a watcher yields for a missing key. All absences compare equal.
    pub fn absent() -> Self {
        Self::of(Absent)
    }

    pub fn is_absent(&self) -> bool {
        self.inner.downcast_ref::<Absent>().is_some()
    }

    /// Equality under this value's own strategy.
    pub fn same(&self, other: &Value) -> bool {
        (self.eq)(&self.inner, &other.inner)
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clones the payload out, if it is a `T`.
    pub fn get<T: Clone + 'static>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absent() {
            write!(f, "Value(absent)")
        } else {
            write!(f, "Value(..)")
        }
    }
}

/// Flat, string-keyed bag of [`Value`]s: the props of one component instance.
#[derive(Clone, Default)]
pub struct PropBag {
    entries: HashMap<String, Value>,
}

impl PropBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaining insert, for building bags inline.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PropBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// True when the bags differ shallowly: a key of `a` is missing from `b`, or
/// a key of `b` maps to a value not [`Value::same`] as `a`'s.
///
/// O(keys), no recursion. Nested state must be replaced, not mutated, for a
/// change to be observable here.
pub fn shallow_differs(a: &PropBag, b: &PropBag) -> bool {
    for key in a.entries.keys() {
        if !b.entries.contains_key(key) {
            return true;
        }
    }
    for (key, value) in &b.entries {
        match a.entries.get(key) {
            Some(prev) if prev.same(value) => {}
            _ => return true,
        }
    }
    false
}

/// Inserts each default into `bag` only when its key is absent.
pub fn merge_defaults(defaults: &PropBag, bag: &mut PropBag) {
    for (key, value) in &defaults.entries {
        if !bag.entries.contains_key(key) {
            bag.entries.insert(key.clone(), value.clone());
        }
    }
}
