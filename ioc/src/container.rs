//! The main `Container` struct and its associated methods.

use crate::config::ContainerConfig;
use crate::core::{Arguments, Binding, Lifetime, Object, ResolutionGuard, ResolutionKey, Resolver};
use crate::error::{ContainerError, ReflectionError, Result};
use crate::reflect::{ConstructorArgs, Injectable, Instantiation, Parameter, ParameterKind, TypeDescriptor, TypeRegistry};
use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_CONTAINER_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Default)]
struct State {
  bindings: HashMap<String, Binding>,
  shared: HashMap<String, Object>,
}

/// The Inversion of Control (IoC) container.
///
/// Maps names to bindings (a factory or a type identifier, plus a lifetime)
/// and keeps a cache of shared objects. Anything not bound is resolved by
/// treating its name as a type identifier and auto-wiring it from the
/// registered [`TypeDescriptor`]s.
///
/// Bindings and the shared cache sit behind one lock, which is released
/// before any factory or constructor runs, so factories may resolve other
/// names from the same container. Each shared binding runs its resolver at
/// most once, even when resolved from several threads at the same time.
pub struct Container {
  id: usize,
  config: ContainerConfig,
  state: Mutex<State>,
  types: TypeRegistry,
}

impl Default for Container {
  fn default() -> Self {
    Self::with_config(ContainerConfig::default())
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: ContainerConfig) -> Self {
    Self {
      id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
      config,
      state: Mutex::new(State::default()),
      types: TypeRegistry::default(),
    }
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  // --- Binding Registration ---

  /// Binds `name` to `resolver` with a transient lifetime, replacing any
  /// earlier binding for the same name.
  pub fn bind(&self, name: impl Into<String>, resolver: impl Into<Resolver>) {
    self.bind_with(name, resolver, Lifetime::Transient);
  }

  /// Binds `name` to `resolver` and caches the first object it produces.
  pub fn singleton(&self, name: impl Into<String>, resolver: impl Into<Resolver>) {
    self.bind_with(name, resolver, Lifetime::Shared);
  }

  pub fn bind_with(&self, name: impl Into<String>, resolver: impl Into<Resolver>, lifetime: Lifetime) {
    let name = name.into();
    let resolver = resolver.into();
    tracing::debug!(binding = %name, resolver = ?resolver, lifetime = ?lifetime, "binding registered");
    self.state.lock().bindings.insert(name, Binding::new(resolver, lifetime));
  }

  // --- Instance Registration ---

  /// Puts `value` straight into the shared cache. It wins over every binding
  /// for `name`, whether registered before or after.
  pub fn instance<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
    self.instance_object(name, Arc::new(value));
  }

  pub fn instance_object(&self, name: impl Into<String>, object: Object) {
    let name = name.into();
    tracing::debug!(binding = %name, "instance registered");
    self.state.lock().shared.insert(name, object);
  }

  // --- Type Registration ---

  pub fn register_type(&self, descriptor: TypeDescriptor) {
    tracing::debug!(type_name = %descriptor.name(), "type descriptor registered");
    self.types.insert(descriptor);
  }

  pub fn register<T: Injectable>(&self) {
    self.register_type(T::descriptor());
  }

  // --- Introspection ---

  pub fn bound(&self, name: &str) -> bool {
    self.state.lock().bindings.contains_key(name)
  }

  /// Whether `name` is currently served from the shared cache.
  pub fn resolved(&self, name: &str) -> bool {
    self.state.lock().shared.contains_key(name)
  }

  pub fn has_type(&self, type_name: &str) -> bool {
    self.types.contains(type_name)
  }

  // --- Resolution ---

  pub fn make(&self, name: &str) -> Result<Object> {
    self.make_with(name, &Arguments::new())
  }

  /// Resolves `name`.
  ///
  /// A cached shared object is returned as-is. Otherwise the binding for
  /// `name` is used, or, when there is none, `name` is built as a transient
  /// type identifier. `arguments` only reach `build`; factories never see
  /// them.
  pub fn make_with(&self, name: &str, arguments: &Arguments) -> Result<Object> {
    let binding = {
      let state = self.state.lock();
      if let Some(object) = state.shared.get(name) {
        tracing::trace!(binding = name, "resolved from shared cache");
        return Ok(Arc::clone(object));
      }
      state.bindings.get(name).cloned()
    };

    let Binding { resolver, lifetime, cell } =
      binding.unwrap_or_else(|| Binding::new(Resolver::Type(name.to_owned()), Lifetime::Transient));

    let _guard = ResolutionGuard::enter(ResolutionKey::make(self.id, name), self.config.max_depth)?;

    if !lifetime.is_shared() {
      return self.produce(name, &resolver, arguments);
    }

    // Racing callers block on the cell, so the resolver runs once. A failed
    // attempt leaves the cell empty for the next caller.
    let object = Arc::clone(cell.get_or_try_init(|| self.produce(name, &resolver, arguments))?);

    let mut state = self.state.lock();
    let cached = state.shared.entry(name.to_owned()).or_insert_with(|| {
      tracing::debug!(binding = name, "shared object cached");
      object
    });
    Ok(Arc::clone(cached))
  }

  fn produce(&self, name: &str, resolver: &Resolver, arguments: &Arguments) -> Result<Object> {
    match resolver {
      Resolver::Factory(factory) => {
        tracing::trace!(binding = name, "invoking factory");
        factory(self)
      }
      Resolver::Type(type_name) => self.build_with(type_name, arguments),
    }
  }

  /// Resolves `name` and downcasts it to `T`.
  pub fn make_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    downcast(name, self.make(name)?)
  }

  pub fn build(&self, type_name: &str) -> Result<Object> {
    self.build_with(type_name, &Arguments::new())
  }

  /// Constructs a fresh instance of `type_name` from its descriptor.
  ///
  /// Each constructor parameter takes, in order of preference: the entry in
  /// `arguments` with its name, its declared default, or a recursive build
  /// of its declared type (with no arguments). Nothing is cached.
  pub fn build_with(&self, type_name: &str, arguments: &Arguments) -> Result<Object> {
    let _guard = ResolutionGuard::enter(ResolutionKey::build(self.id, type_name), self.config.max_depth)?;

    let descriptor = self
      .types
      .lookup(type_name)
      .map_err(|source| ContainerError::TypeNotFound {
        type_name: type_name.to_owned(),
        source,
      })?;

    match descriptor.instantiation {
      Instantiation::Abstract => Err(ContainerError::NotInstantiable {
        type_name: type_name.to_owned(),
      }),
      Instantiation::Plain(create) => {
        tracing::trace!(type_name, "building without constructor");
        create(ConstructorArgs::new(type_name, Vec::new()))
      }
      Instantiation::Constructor { parameters, construct } => {
        tracing::trace!(type_name, parameters = parameters.len(), "building with constructor");
        let mut values = Vec::with_capacity(parameters.len());
        for parameter in parameters.iter() {
          let value = self.resolve_parameter(type_name, parameter, arguments)?;
          values.push((parameter.name().to_owned(), value));
        }
        construct(ConstructorArgs::new(type_name, values))
      }
    }
  }

  /// Builds `type_name` and downcasts it to `T`.
  pub fn build_as<T: Any + Send + Sync>(&self, type_name: &str) -> Result<Arc<T>> {
    downcast(type_name, self.build(type_name)?)
  }

  fn resolve_parameter(&self, type_name: &str, parameter: &Parameter, arguments: &Arguments) -> Result<Object> {
    if let Some(value) = arguments.get(parameter.name()) {
      return Ok(Arc::clone(value));
    }
    if let Some(default) = parameter.default() {
      return Ok(Arc::clone(default));
    }
    match parameter.kind() {
      ParameterKind::Type(dependency) if self.types.contains(dependency) => self.build(dependency),
      ParameterKind::Type(dependency) => Err(ContainerError::UnresolvableParameter {
        parameter: parameter.name().to_owned(),
        type_name: type_name.to_owned(),
        source: Some(ReflectionError::UnknownType(dependency.clone())),
      }),
      ParameterKind::Builtin(_) => Err(ContainerError::UnresolvableParameter {
        parameter: parameter.name().to_owned(),
        type_name: type_name.to_owned(),
        source: None,
      }),
    }
  }
}

fn downcast<T: Any + Send + Sync>(name: &str, object: Object) -> Result<Arc<T>> {
  object.downcast::<T>().map_err(|_| ContainerError::TypeMismatch {
    name: name.to_owned(),
    expected: type_name::<T>(),
  })
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.lock();
    let mut bindings: Vec<&String> = state.bindings.keys().collect();
    bindings.sort();
    let mut shared: Vec<&String> = state.shared.keys().collect();
    shared.sort();
    f.debug_struct("Container")
      .field("id", &self.id)
      .field("config", &self.config)
      .field("bindings", &bindings)
      .field("shared", &shared)
      .finish()
  }
}
