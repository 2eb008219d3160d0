#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::component::component;
    use crate::effect::{use_lifecycle, Dispose, Effect};
    use crate::error::HookError;
    use crate::props::{try_use_props, use_props};
    use crate::refs::use_node_ref;
    use crate::registry::in_factory;
    use crate::state::{try_use_state, use_state};
    use crate::value::{merge_defaults, shallow_differs, PropBag, Value};

    #[test]
    fn test_shallow_differs_equal_bags() {
        let obj: Rc<dyn std::any::Any> = Rc::new(5u8);
        let a = PropBag::new()
            .with("color", Value::of("red"))
            .with("size", Value::of(3i64))
            .with("node", Value::handle(obj.clone()));
        let b = PropBag::new()
            .with("node", Value::handle(obj))
            .with("size", Value::of(3i64))
            .with("color", Value::of("red"));

        assert!(!shallow_differs(&a, &b));
        assert!(!shallow_differs(&b, &a));
    }

    #[test]
    fn test_shallow_differs_on_value_change() {
        let a = PropBag::new().with("color", Value::of("red"));
        let b = PropBag::new().with("color", Value::of("blue"));
        assert!(shallow_differs(&a, &b));
    }

    #[test]
    fn test_shallow_differs_on_missing_key_either_side() {
        let a = PropBag::new().with("color", Value::of("red"));
        let b = PropBag::new();
        assert!(shallow_differs(&a, &b));
        assert!(shallow_differs(&b, &a));
    }

    #[test]
    fn test_handle_values_compare_by_identity() {
        let first: Rc<dyn std::any::Any> = Rc::new(vec![1, 2, 3]);
        let second: Rc<dyn std::any::Any> = Rc::new(vec![1, 2, 3]);
        assert!(Value::handle(first.clone()).same(&Value::handle(first)));
        let a = PropBag::new().with("node", Value::handle(Rc::new(vec![1, 2, 3])));
        let b = PropBag::new().with("node", Value::handle(second));
        assert!(shallow_differs(&a, &b));
    }

    #[test]
    fn test_of_values_never_equal_across_types() {
        assert!(!Value::of(1i64).same(&Value::of("1")));
        assert!(Value::of(1i64).same(&Value::of(1i64)));
    }

    #[test]
    fn test_merge_defaults_only_fills_missing_keys() {
        let defaults = PropBag::new()
            .with("color", Value::of("black"))
            .with("size", Value::of(10i64));
        let mut bag = PropBag::new().with("color", Value::of("red"));
        merge_defaults(&defaults, &mut bag);

        assert!(bag.get("color").unwrap().same(&Value::of("red")));
        assert!(bag.get("size").unwrap().same(&Value::of(10i64)));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_dispose_runs_at_most_once() {
        let runs = Rc::new(RefCell::new(0));
        let runs_clone = runs.clone();
        let dispose = Dispose::new(move || *runs_clone.borrow_mut() += 1);

        dispose.run();
        dispose.run();
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn test_factory_window_opens_and_closes() {
        assert!(!in_factory());

        let seen = Rc::new(RefCell::new(None));
        let seen_clone = seen.clone();
        let def = component(move |_props| {
            *seen_clone.borrow_mut() = Some(in_factory());
            move || ()
        });
        let (_handle, _first) = def.instantiate(PropBag::new(), || {});

        assert_eq!(*seen.borrow(), Some(true));
        assert!(!in_factory());
    }

    #[test]
    fn test_hooks_refuse_to_run_outside_factory() {
        assert_eq!(
            try_use_state(0).err(),
            Some(HookError::OutsideFactory { hook: "use_state" })
        );
        assert!(matches!(
            try_use_props(PropBag::new()),
            Err(HookError::OutsideFactory { .. })
        ));
    }

    #[test]
    fn test_duplicate_props_accessor_refused_by_try_form() {
        let result = Rc::new(RefCell::new(None));
        let result_clone = result.clone();
        let def = component(move |_props| {
            let _first = try_use_props(PropBag::new());
            *result_clone.borrow_mut() = Some(try_use_props(PropBag::new()).err());
            move || ()
        });
        let _ = def.instantiate(PropBag::new(), || {});

        assert!(matches!(
            result.borrow().clone().flatten(),
            Some(HookError::DuplicatePropsAccessor { .. })
        ));
    }

    #[test]
    fn test_duplicate_props_accessor_last_defaults_win() {
        let def = component(|_props| {
            let _first = use_props(PropBag::new().with("color", Value::of("red")));
            let second = use_props(PropBag::new().with("color", Value::of("blue")));
            move || second.get("color").and_then(|v| v.get::<&str>()).unwrap()
        });
        let (handle, first) = def.instantiate(PropBag::new(), || {});
        // The first accessor's defaults were already merged into the live bag
        // when the second one was declared.
        assert_eq!(first, "red");

        assert!(handle.will_receive(PropBag::new()));
        // Later updates re-merge only the last accessor's defaults.
        assert_eq!(handle.render(), "blue");
    }

    #[test]
    fn test_display_name_inference_and_override() {
        fn greeter(_props: crate::props::Props) -> impl FnMut() -> &'static str {
            || "hi"
        }

        let inferred = component(greeter);
        assert_eq!(inferred.name(), "greeter");

        let named = component(greeter).named("Greeter");
        assert_eq!(named.name(), "Greeter");
        let (handle, _) = named.instantiate(PropBag::new(), || {});
        assert_eq!(format!("{handle}"), "<Greeter ... />");
    }

    #[test]
    fn test_effects_fire_in_declaration_order() {
        let order: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
        let trace = order.clone();
        let def = component(move |_props| {
            for tag in [1u32, 2, 3] {
                let mount_trace = trace.clone();
                let unmount_trace = trace.clone();
                use_lifecycle(
                    Effect::new()
                        .on_mount(move || mount_trace.borrow_mut().push(tag))
                        .on_unmount(move || unmount_trace.borrow_mut().push(tag + 10)),
                );
            }
            move || ()
        });
        let (handle, _) = def.instantiate(PropBag::new(), || {});

        handle.mounted();
        handle.unmounted();
        // Declaration order on unmount as well; no reversal.
        assert_eq!(*order.borrow(), vec![1, 2, 3, 11, 12, 13]);
    }

    #[test]
    fn test_state_write_is_synchronous_ack_is_not() {
        let cell = Rc::new(RefCell::new(None));
        let cell_clone = cell.clone();
        let def = component(move |_props| {
            let count = use_state(0i64);
            *cell_clone.borrow_mut() = Some(count.clone());
            move || count.get()
        });
        let (handle, first) = def.instantiate(PropBag::new(), || {});
        assert_eq!(first, 0);

        let count = cell.borrow().clone().unwrap();
        let ack = count.set(7);
        assert_eq!(count.get(), 7);
        assert!(!ack.is_complete());

        assert_eq!(handle.render(), 7);
        assert!(ack.is_complete());
    }

    #[test]
    fn test_state_write_after_destruction_stays_pending() {
        let cell = Rc::new(RefCell::new(None));
        let cell_clone = cell.clone();
        let def = component(move |_props| {
            let count = use_state(0i64);
            *cell_clone.borrow_mut() = Some(count.clone());
            move || count.get()
        });
        let (handle, _) = def.instantiate(PropBag::new(), || {});
        handle.unmounted();
        drop(handle);

        let count = cell.borrow().clone().unwrap();
        let ack = count.set(1);
        assert_eq!(count.get(), 1);
        assert!(!ack.is_complete());
    }

    #[test]
    fn test_node_ref_single_slot() {
        let cell = Rc::new(RefCell::new(None));
        let cell_clone = cell.clone();
        let def = component(move |_props| {
            *cell_clone.borrow_mut() = Some(use_node_ref());
            move || ()
        });
        let (_handle, _) = def.instantiate(PropBag::new(), || {});

        let node_ref = cell.borrow().clone().unwrap();
        assert!(node_ref.get().is_none());
        node_ref.set(Value::of(41i64));
        node_ref.set(Value::of(42i64));
        assert!(!node_ref.is_multi());
        assert_eq!(node_ref.len(), 1);
        assert_eq!(node_ref.get().and_then(|v| v.get::<i64>()), Some(42));
        node_ref.clear();
        assert!(node_ref.get().is_none());
    }

    #[test]
    fn test_node_ref_goes_dead_on_unmount() {
        let cell = Rc::new(RefCell::new(None));
        let cell_clone = cell.clone();
        let def = component(move |_props| {
            *cell_clone.borrow_mut() = Some(use_node_ref());
            move || ()
        });
        let (handle, _) = def.instantiate(PropBag::new(), || {});

        let node_ref = cell.borrow().clone().unwrap();
        let binder = node_ref.binder("a");
        binder(Some(Value::of(1i64)));
        assert_eq!(node_ref.len(), 1);

        handle.unmounted();
        // Late host callbacks are silently absorbed.
        binder(Some(Value::of(2i64)));
        assert_eq!(node_ref.len(), 0);
        assert!(node_ref.all().is_empty());
    }
}
