use interplay::{
    error::RuntimeError,
    interpreter::{
        registry::core::CallRegistry,
        types::catalog::TypeCatalog,
        value::{core::Value, object::ObjectRef},
    },
};
use pretty_assertions::assert_eq;

const ANIMAL: &str = "zoo.Animal";
const DOG: &str = "zoo.Dog";
const CAT: &str = "zoo.Cat";

fn zoo() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.declare_type(ANIMAL, &[]);
    catalog.declare_type(DOG, &[ANIMAL]);
    catalog.declare_type(CAT, &[ANIMAL]);

    catalog.define_constructor(DOG, "()", |_| {
                                   Ok(Value::from(ObjectRef::new(DOG, "Rex".to_string())))
                               })
           .unwrap();
    catalog.define_constructor(CAT, "()", |_| {
                                   Ok(Value::from(ObjectRef::new(CAT, "Tom".to_string())))
                               })
           .unwrap();
    catalog.define_instance(ANIMAL, "speak", "()", |_| Ok(Value::from("...")))
           .unwrap();
    catalog.define_instance(DOG, "speak", "()", |_| Ok(Value::from("woof")))
           .unwrap();
    catalog.define_instance(ANIMAL, "greet", "(String)", |args| {
                                Ok(Value::from(format!("{} greets {}", args[0], args[1])))
                            })
           .unwrap();
    catalog.define_static(ANIMAL, "count", "()", |_| Ok(Value::Int(2)))
           .unwrap();
    catalog.define_static(ANIMAL, "count", "(int)", |args| Ok(args[0].clone()))
           .unwrap();

    catalog
}

fn registry() -> CallRegistry {
    CallRegistry::new(zoo(), &["java.lang".to_string()])
}

#[test]
fn virtual_handles_reach_subclasses_discovered_before() {
    let mut registry = registry();
    registry.import_type(DOG).unwrap();

    assert!(registry.register_virtual(ANIMAL, "speak", "()", None).unwrap());

    assert_eq!(registry.candidates(DOG, Some("speak"), 1).len(), 1);
    assert_eq!(registry.candidates(CAT, Some("speak"), 1).len(), 0);
}

#[test]
fn virtual_handles_reach_subclasses_discovered_after() {
    let mut registry = registry();
    registry.register_virtual(ANIMAL, "speak", "()", None).unwrap();

    registry.import_type(CAT).unwrap();

    assert_eq!(registry.candidates(CAT, Some("speak"), 1).len(), 1);
    assert!(registry.index().contains(CAT));
}

#[test]
fn virtual_calls_dispatch_on_the_receiver() {
    let mut registry = registry();
    registry.register_constructor(DOG, "()", None).unwrap();
    registry.register_constructor(CAT, "()", None).unwrap();
    registry.register_virtual(ANIMAL, "speak", "()", None).unwrap();

    let dog = registry.invoke(DOG, None, &[]).unwrap();
    let cat = registry.invoke(CAT, None, &[]).unwrap();

    assert_eq!(registry.invoke(DOG, Some("speak"), &[dog]).unwrap(), Value::from("woof"));
    assert_eq!(registry.invoke(CAT, Some("speak"), &[cat]).unwrap(), Value::from("..."));
}

#[test]
fn virtual_calls_pass_the_receiver_first() {
    let mut registry = registry();
    registry.register_constructor(DOG, "()", None).unwrap();
    registry.register_virtual(ANIMAL, "greet", "(String)", None).unwrap();

    let dog = registry.invoke(DOG, None, &[]).unwrap();
    let greeting = registry.invoke(DOG, Some("greet"), &[dog, Value::from("Tom")]).unwrap();

    assert_eq!(greeting, Value::from("Rex greets Tom"));
}

#[test]
fn receiver_of_the_wrong_type_is_rejected() {
    let mut registry = registry();
    registry.register_virtual(ANIMAL, "speak", "()", None).unwrap();

    let error = registry.invoke(DOG, Some("speak"), &[Value::from("Rex")]).unwrap_err();

    assert!(matches!(error, RuntimeError::NoMatchingOverload { .. }));
}

#[test]
fn duplicate_registrations_are_ignored() {
    let mut registry = registry();

    assert!(registry.register_constructor(DOG, "()", None).unwrap());
    assert!(!registry.register_constructor(DOG, "()", None).unwrap());

    assert_eq!(registry.candidates(DOG, None, 0).len(), 1);
}

#[test]
fn candidates_are_ordered_by_descending_arity() {
    let mut registry = registry();
    registry.register_static(ANIMAL, "count", "()", None).unwrap();
    registry.register_static(ANIMAL, "count", "(int)", None).unwrap();

    let arities: Vec<usize> = registry.candidates(ANIMAL, Some("count"), 1)
                                      .iter()
                                      .map(|handle| handle.arity())
                                      .collect();

    assert_eq!(arities, vec![1, 0]);
    assert_eq!(registry.candidates(ANIMAL, Some("count"), 0).len(), 1);
}

#[test]
fn invocation_tries_the_highest_arity_first() {
    let mut registry = registry();
    registry.register_static(ANIMAL, "count", "()", None).unwrap();
    registry.register_static(ANIMAL, "count", "(int)", None).unwrap();

    assert_eq!(registry.invoke(ANIMAL, Some("count"), &[Value::Int(5)]).unwrap(),
               Value::Int(5));
    assert_eq!(registry.invoke(ANIMAL, Some("count"), &[]).unwrap(), Value::Int(2));
    assert!(matches!(registry.invoke(ANIMAL, Some("count"), &[Value::from("x")]),
                     Err(RuntimeError::NoMatchingOverload { .. })));
}

#[test]
fn filtered_invocation_skips_other_kinds() {
    let mut registry = registry();
    registry.register_static(ANIMAL, "count", "()", None).unwrap();

    let error = registry.invoke_virtual(ANIMAL, "count", &[]).unwrap_err();

    assert!(matches!(error, RuntimeError::NoMatchingOverload { .. }));
    assert_eq!(registry.invoke_static(ANIMAL, "count", &[]).unwrap(), Value::Int(2));
}

#[test]
fn unknown_types_and_members_are_reported() {
    let mut registry = registry();

    assert!(matches!(registry.invoke("zoo.Fish", None, &[]),
                     Err(RuntimeError::UnresolvableType { .. })));
    assert!(matches!(registry.invoke(DOG, Some("speak"), &[]),
                     Err(RuntimeError::NoHandle { .. })));
    assert!(matches!(registry.register_virtual(DOG, "fly", "()", None),
                     Err(RuntimeError::NoSuchMember { .. })));
}

#[test]
fn imports_bind_short_names() {
    let mut catalog = zoo();
    catalog.declare_type("circus.Dog", &[]);
    let mut registry = CallRegistry::new(catalog, &[]);

    assert_eq!(registry.import_type(DOG).unwrap(), DOG);
    assert_eq!(registry.import_type(DOG).unwrap(), DOG);
    assert!(matches!(registry.import_type("circus.Dog"),
                     Err(RuntimeError::AmbiguousImport { .. })));

    assert_eq!(registry.lookup_type("Dog"), Some(DOG.to_string()));
    assert_eq!(registry.lookup_type("Cat"), None);
}

#[test]
fn implicit_packages_resolve_short_names() {
    let registry = CallRegistry::new(zoo(), &["zoo".to_string()]);

    assert_eq!(registry.lookup_type("Cat"), Some(CAT.to_string()));
    assert_eq!(registry.lookup_type("String"), None);
}
