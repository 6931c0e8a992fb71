use fibre_wire::{
  args, Container, ContainerConfig, ContainerError, Injectable, Parameter, ReflectionError, Resolver,
  TypeDescriptor,
};
use pretty_assertions::assert_eq;
use std::error::Error as _;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

// Foo(Bar, Baz), Bar(FooBar), with FooBar and Baz default constructible.
struct FooBar;
struct Baz;

struct Bar {
  inner: Arc<FooBar>,
}

struct Foo {
  bar: Arc<Bar>,
  baz: Arc<Baz>,
}

// Qux depends on Norf, which is never registered.
struct Qux;

#[derive(Debug, Clone, PartialEq, Eq)]
struct MailDummy {
  url: String,
  key: Option<String>,
}

impl Injectable for MailDummy {
  const NAME: &'static str = "MailDummy";

  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::with_constructor(
      Self::NAME,
      vec![
        Parameter::builtin::<String>("url"),
        Parameter::builtin::<Option<String>>("key").default_value(None::<String>),
      ],
      |args| {
        Ok(MailDummy {
          url: args.value("url")?,
          key: args.value("key")?,
        })
      },
    )
  }
}

fn container() -> Container {
  let container = Container::new();
  container.register_type(TypeDescriptor::plain("FooBar", || FooBar));
  container.register_type(TypeDescriptor::plain("Baz", || Baz));
  container.register_type(TypeDescriptor::with_constructor(
    "Bar",
    vec![Parameter::typed("bar", "FooBar")],
    |args| Ok(Bar { inner: args.arc("bar")? }),
  ));
  container.register_type(TypeDescriptor::with_constructor(
    "Foo",
    vec![Parameter::typed("bar", "Bar"), Parameter::typed("baz", "Baz")],
    |args| {
      Ok(Foo {
        bar: args.arc("bar")?,
        baz: args.arc("baz")?,
      })
    },
  ));
  container.register_type(TypeDescriptor::with_constructor(
    "Qux",
    vec![Parameter::typed("norf", "Norf")],
    |_| Ok(Qux),
  ));
  container.register::<MailDummy>();
  container
}

// --- Auto-wiring Tests ---

#[test]
fn test_build_without_constructor_returns_fresh_instances() {
  let container = container();

  let first = container.build_as::<Baz>("Baz").unwrap();
  let second = container.build_as::<Baz>("Baz").unwrap();

  assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_bind_with_automatic_resolution() {
  let container = container();
  container.bind("foo", "Foo");

  let foo = container.make_as::<Foo>("foo").unwrap();

  // The nested graph is built fresh for each resolution.
  let other = container.make_as::<Foo>("foo").unwrap();
  assert!(!Arc::ptr_eq(&foo.bar, &other.bar));
  assert!(!Arc::ptr_eq(&foo.bar.inner, &other.bar.inner));
  assert!(!Arc::ptr_eq(&foo.baz, &other.baz));
}

#[test]
fn test_missing_dependency_type_is_reported() {
  let container = container();
  container.bind("qux", "Qux");

  let err = container.make("qux").unwrap_err();

  match &err {
    ContainerError::UnresolvableParameter {
      parameter,
      type_name,
      source,
    } => {
      assert_eq!(parameter, "norf");
      assert_eq!(type_name, "Qux");
      assert_eq!(source, &Some(ReflectionError::UnknownType("Norf".to_owned())));
    }
    other => panic!("expected UnresolvableParameter, got {:?}", other),
  }
  assert_eq!(
    err.to_string(),
    "Unable to build [Qux]: please provide the value of the parameter [norf]"
  );
  assert!(err.source().is_some());
}

#[test]
fn test_missing_dependency_type_is_reported_by_direct_build() {
  let container = container();

  assert!(matches!(
    container.build("Qux"),
    Err(ContainerError::UnresolvableParameter { ref parameter, ref type_name, .. })
      if parameter == "norf" && type_name == "Qux"
  ));
}

#[test]
fn test_type_not_found_wraps_lookup_failure() {
  let container = container();
  container.bind("norf", "Norf");

  let err = container.make("Norf").unwrap_err();

  assert!(matches!(err, ContainerError::TypeNotFound { .. }));
  assert!(err.source().is_some());
  assert_eq!(
    err.to_string(),
    "Type [Norf] does not exist: no descriptor is registered for type 'Norf'"
  );
}

#[test]
fn test_abstract_type_is_not_instantiable() {
  let container = container();
  container.register_type(TypeDescriptor::abstract_type("Transport"));

  match container.build("Transport") {
    Err(ContainerError::NotInstantiable { type_name }) => assert_eq!(type_name, "Transport"),
    other => panic!("expected NotInstantiable, got {:?}", other.err()),
  }
}

#[test]
fn test_make_with_arguments() {
  let container = container();

  let mail = container
    .make_with(
      "MailDummy",
      &args! { "url" => String::from("http://localhost"), "key" => Some(String::from("secret")) },
    )
    .unwrap()
    .downcast::<MailDummy>()
    .unwrap();

  assert_eq!(
    *mail,
    MailDummy {
      url: "http://localhost".to_owned(),
      key: Some("secret".to_owned()),
    }
  );
}

#[test]
fn test_make_with_default_arguments() {
  let container = container();

  let mail = container
    .make_with("MailDummy", &args! { "url" => String::from("http://localhost") })
    .unwrap()
    .downcast::<MailDummy>()
    .unwrap();

  assert_eq!(mail.key, None);
}

#[test]
fn test_primitive_parameter_without_default_is_unresolvable() {
  let container = container();
  container.register_type(TypeDescriptor::with_constructor(
    "A",
    vec![Parameter::builtin::<i32>("x")],
    |args| args.value::<i32>("x"),
  ));

  let err = container.build("A").unwrap_err();
  match &err {
    ContainerError::UnresolvableParameter {
      parameter,
      type_name,
      source,
    } => {
      assert_eq!(parameter, "x");
      assert_eq!(type_name, "A");
      assert!(source.is_none());
    }
    other => panic!("expected UnresolvableParameter, got {:?}", other),
  }
  assert_eq!(
    err.to_string(),
    "Unable to build [A]: please provide the value of the parameter [x]"
  );

  let value = container
    .build_with("A", &args! { "x" => 5_i32 })
    .unwrap()
    .downcast::<i32>()
    .unwrap();
  assert_eq!(*value, 5);
}

#[test]
fn test_explicit_argument_beats_default_and_recursive_build() {
  let container = container();
  container.register_type(TypeDescriptor::with_constructor(
    "Holder",
    vec![
      Parameter::typed("baz", "Baz"),
      Parameter::builtin::<u8>("level").default_value(1_u8),
    ],
    |args| Ok((args.arc::<Baz>("baz")?, args.value::<u8>("level")?)),
  ));

  let supplied = Arc::new(Baz);
  let mut arguments = args! { "level" => 9_u8 };
  arguments.insert_object("baz", supplied.clone());

  let holder = container
    .build_with("Holder", &arguments)
    .unwrap()
    .downcast::<(Arc<Baz>, u8)>()
    .unwrap();

  assert!(Arc::ptr_eq(&holder.0, &supplied));
  assert_eq!(holder.1, 9);
}

#[test]
fn test_arguments_are_not_propagated_into_sub_builds() {
  let container = container();
  container.register_type(TypeDescriptor::with_constructor(
    "Outer",
    vec![Parameter::of::<MailDummy>("mail")],
    |args| args.arc::<MailDummy>("mail"),
  ));

  // `url` would satisfy MailDummy, but only Outer's parameters see it.
  let err = container
    .build_with("Outer", &args! { "url" => String::from("http://localhost") })
    .unwrap_err();

  assert!(matches!(
    err,
    ContainerError::UnresolvableParameter { ref parameter, ref type_name, .. }
      if parameter == "url" && type_name == "MailDummy"
  ));
}

#[test]
fn test_build_ignores_bindings_for_parameter_types() {
  let container = container();
  container.instance("Baz", String::from("not a Baz"));

  // Recursive resolution goes through `build`, not the binding registry.
  let foo = container.build_as::<Foo>("Foo").unwrap();
  let _baz: &Baz = &foo.baz;
}

#[test]
fn test_wrong_argument_type_is_reported() {
  let container = container();

  let err = container
    .make_with("MailDummy", &args! { "url" => 42_u32 })
    .unwrap_err();

  assert!(matches!(
    err,
    ContainerError::ArgumentType { ref parameter, ref type_name, .. }
      if parameter == "url" && type_name == "MailDummy"
  ));
}

#[test]
fn test_circular_dependency_is_an_error() {
  let container = Container::new();
  container.register_type(TypeDescriptor::with_constructor(
    "A",
    vec![Parameter::typed("b", "B")],
    |_| Ok(()),
  ));
  container.register_type(TypeDescriptor::with_constructor(
    "B",
    vec![Parameter::typed("a", "A")],
    |_| Ok(()),
  ));

  match container.build("A") {
    Err(ContainerError::CircularDependency { chain }) => assert_eq!(chain, ["A", "B", "A"]),
    other => panic!("expected CircularDependency, got {:?}", other.err()),
  }

  // The guard unwound cleanly; unrelated builds still work.
  container.register_type(TypeDescriptor::plain("C", || ()));
  assert!(container.build("C").is_ok());
}

#[test]
fn test_circular_factories_are_an_error() {
  let container = Container::new();
  container.singleton("a", Resolver::object_factory(|c| c.make("b")));
  container.singleton("b", Resolver::object_factory(|c| c.make("a")));

  let err = container.make("a").unwrap_err();

  assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
  assert!(!container.resolved("a"));
  assert!(!container.resolved("b"));
}

#[test]
fn test_depth_limit_stops_deep_graphs() {
  let container = Container::with_config(ContainerConfig::new().with_max_depth(3));
  container.register_type(TypeDescriptor::plain("L3", || ()));
  container.register_type(TypeDescriptor::with_constructor("L2", vec![Parameter::typed("next", "L3")], |_| Ok(())));
  container.register_type(TypeDescriptor::with_constructor("L1", vec![Parameter::typed("next", "L2")], |_| Ok(())));
  container.register_type(TypeDescriptor::with_constructor("L0", vec![Parameter::typed("next", "L1")], |_| Ok(())));

  assert!(container.build("L1").is_ok());
  assert!(matches!(
    container.build("L0"),
    Err(ContainerError::DepthExceeded { limit: 3, ref type_name }) if type_name == "L3"
  ));
}

#[test]
fn test_failed_build_leaves_no_shared_entry() {
  static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

  let container = container();
  container.register_type(TypeDescriptor::with_constructor(
    "Flaky",
    vec![Parameter::builtin::<u8>("attempt")],
    |args| {
      ATTEMPTS.fetch_add(1, Ordering::SeqCst);
      args.value::<u8>("attempt")
    },
  ));
  container.singleton("flaky", "Flaky");

  assert!(container.make("flaky").is_err());
  assert!(!container.resolved("flaky"));
  assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 0);

  let value = container.make_with("flaky", &args! { "attempt" => 2_u8 }).unwrap();
  assert!(container.resolved("flaky"));
  assert_eq!(*value.downcast::<u8>().unwrap(), 2);
}

#[test]
fn test_positional_constructor_values() {
  let container = container();
  container.register_type(TypeDescriptor::with_constructor(
    "Pair",
    vec![
      Parameter::builtin::<u8>("left").default_value(1_u8),
      Parameter::builtin::<u8>("right").default_value(2_u8),
    ],
    |args| {
      let values = args.into_values();
      let left = values[0].downcast_ref::<u8>().copied().unwrap_or_default();
      let right = values[1].downcast_ref::<u8>().copied().unwrap_or_default();
      Ok((left, right))
    },
  ));

  assert_eq!(*container.build_as::<(u8, u8)>("Pair").unwrap(), (1, 2));
}

#[test]
fn test_registry_introspection() {
  let container = container();

  assert!(container.has_type("Foo"));
  assert!(!container.has_type("Norf"));
}
