//! Core data structures shared by the container and the reflection layer.

use crate::container::Container;
use crate::error::{ContainerError, Result};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A type-erased, shareable object produced by the container.
pub type Object = Arc<dyn Any + Send + Sync>;

pub(crate) type FactoryFn = dyn Fn(&Container) -> Result<Object> + Send + Sync;

thread_local! {
  // Every `make` and `build` currently in flight on this thread, outermost first.
  static RESOLVING_STACK: RefCell<Vec<ResolutionKey>> = const { RefCell::new(Vec::new()) };
}

/// Whether a binding's resolved object is cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Lifetime {
  /// A fresh object on every resolution.
  #[default]
  Transient,
  /// Resolved once, then served from the shared cache.
  Shared,
}

impl Lifetime {
  pub fn is_shared(self) -> bool {
    matches!(self, Lifetime::Shared)
  }
}

/// How a bound name is turned into an object.
#[derive(Clone)]
pub enum Resolver {
  /// Invoked with the container; its return value is the object.
  Factory(Arc<FactoryFn>),
  /// A type identifier handed to `build`.
  Type(String),
}

impl Resolver {
  /// Wraps an infallible factory.
  pub fn factory<T, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> T + Send + Sync + 'static,
  {
    Resolver::Factory(Arc::new(move |container: &Container| -> Result<Object> {
      Ok(Arc::new(factory(container)))
    }))
  }

  /// Wraps a factory that may fail with a container error, typically because
  /// it resolves other names itself.
  pub fn try_factory<T, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    Resolver::Factory(Arc::new(move |container: &Container| -> Result<Object> {
      let value = factory(container)?;
      Ok(Arc::new(value))
    }))
  }

  /// Wraps a factory that already yields a type-erased object, so the
  /// returned `Arc` is handed out as-is.
  pub fn object_factory<F>(factory: F) -> Self
  where
    F: Fn(&Container) -> Result<Object> + Send + Sync + 'static,
  {
    Resolver::Factory(Arc::new(factory))
  }

  /// Names a type to auto-wire.
  pub fn type_name(name: impl Into<String>) -> Self {
    Resolver::Type(name.into())
  }
}

impl fmt::Debug for Resolver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Resolver::Factory(_) => f.write_str("Factory(..)"),
      Resolver::Type(name) => write!(f, "Type({})", name),
    }
  }
}

impl From<&str> for Resolver {
  fn from(name: &str) -> Self {
    Resolver::Type(name.to_owned())
  }
}

impl From<String> for Resolver {
  fn from(name: String) -> Self {
    Resolver::Type(name)
  }
}

#[derive(Debug, Clone)]
pub(crate) struct Binding {
  pub(crate) resolver: Resolver,
  pub(crate) lifetime: Lifetime,
  // Initialized at most once per shared binding; replaced with the binding.
  pub(crate) cell: Arc<OnceCell<Object>>,
}

impl Binding {
  pub(crate) fn new(resolver: Resolver, lifetime: Lifetime) -> Self {
    Self {
      resolver,
      lifetime,
      cell: Arc::new(OnceCell::new()),
    }
  }
}

/// Explicit constructor arguments, keyed by parameter name.
#[derive(Clone, Default)]
pub struct Arguments {
  values: HashMap<String, Object>,
}

impl Arguments {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style [`insert`](Self::insert).
  pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
    self.values.insert(name.into(), Arc::new(value));
  }

  /// Stores an already type-erased object without wrapping it again.
  pub fn insert_object(&mut self, name: impl Into<String>, object: Object) {
    self.values.insert(name.into(), object);
  }

  pub fn get(&self, name: &str) -> Option<&Object> {
    self.values.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl fmt::Debug for Arguments {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.values.keys()).finish()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
  Make,
  Build,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolutionKey {
  pub(crate) container: usize,
  pub(crate) frame: Frame,
  pub(crate) name: String,
}

impl ResolutionKey {
  pub(crate) fn make(container: usize, name: &str) -> Self {
    Self {
      container,
      frame: Frame::Make,
      name: name.to_owned(),
    }
  }

  pub(crate) fn build(container: usize, name: &str) -> Self {
    Self {
      container,
      frame: Frame::Build,
      name: name.to_owned(),
    }
  }
}

/// An RAII guard over the thread-local resolution stack.
///
/// Entering a key that is already on the stack means the object graph loops
/// back on itself; entering past `max_depth` frames means it is too deep to
/// be sane. Both are reported as errors before any construction happens.
/// Dropping the guard pops its frame.
pub(crate) struct ResolutionGuard {
  _private: (),
}

impl ResolutionGuard {
  pub(crate) fn enter(key: ResolutionKey, max_depth: usize) -> Result<Self> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();

      if let Some(start) = stack.iter().position(|frame| *frame == key) {
        let mut chain: Vec<String> = stack[start..]
          .iter()
          .filter(|frame| frame.container == key.container && frame.frame == key.frame)
          .map(|frame| frame.name.clone())
          .collect();
        chain.push(key.name);
        return Err(ContainerError::CircularDependency { chain });
      }

      if stack.len() >= max_depth {
        return Err(ContainerError::DepthExceeded {
          limit: max_depth,
          type_name: key.name,
        });
      }

      stack.push(key);
      Ok(Self { _private: () })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().pop();
    });
  }
}

#[cfg(test)]
pub(crate) fn resolving_depth() -> usize {
  RESOLVING_STACK.with(|stack| stack.borrow().len())
}
