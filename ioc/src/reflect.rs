//! Constructor metadata standing in for runtime reflection.
//!
//! A type becomes constructible by name once a [`TypeDescriptor`] for it is
//! registered. The descriptor lists the constructor's parameters in
//! declaration order (name, kind, optional default) and carries the closure
//! that assembles the value from the resolved arguments.

use crate::core::Object;
use crate::error::{ContainerError, ReflectionError, Result};
use dashmap::DashMap;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

pub(crate) type ConstructFn = dyn Fn(ConstructorArgs) -> Result<Object> + Send + Sync;

/// A type that can describe its own constructor.
///
/// # Examples
///
/// ```
/// use fibre_wire::{Container, Injectable, Parameter, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// impl Injectable for Clock {
///   const NAME: &'static str = "Clock";
///
///   fn descriptor() -> TypeDescriptor {
///     TypeDescriptor::plain(Self::NAME, || Clock)
///   }
/// }
///
/// struct Scheduler {
///   clock: Arc<Clock>,
///   workers: usize,
/// }
///
/// impl Injectable for Scheduler {
///   const NAME: &'static str = "Scheduler";
///
///   fn descriptor() -> TypeDescriptor {
///     TypeDescriptor::with_constructor(
///       Self::NAME,
///       vec![
///         Parameter::of::<Clock>("clock"),
///         Parameter::builtin::<usize>("workers").default_value(4_usize),
///       ],
///       |args| {
///         Ok(Scheduler {
///           clock: args.arc("clock")?,
///           workers: args.value("workers")?,
///         })
///       },
///     )
///   }
/// }
///
/// let container = Container::new();
/// container.register::<Clock>();
/// container.register::<Scheduler>();
///
/// let scheduler = container.build_as::<Scheduler>("Scheduler").unwrap();
/// assert_eq!(scheduler.workers, 4);
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
  /// The type identifier this type is registered under.
  const NAME: &'static str;

  fn descriptor() -> TypeDescriptor;
}

/// What a constructor parameter expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
  /// A primitive value that can only come from an argument or a default.
  Builtin(&'static str),
  /// A constructible type that can be auto-wired by identifier.
  Type(String),
}

/// One constructor parameter.
#[derive(Clone)]
pub struct Parameter {
  name: String,
  kind: ParameterKind,
  default: Option<Object>,
}

impl Parameter {
  /// A parameter of primitive type `T`.
  pub fn builtin<T: Any>(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: ParameterKind::Builtin(type_name::<T>()),
      default: None,
    }
  }

  /// A parameter whose type is the constructible type `type_name`.
  pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: ParameterKind::Type(type_name.into()),
      default: None,
    }
  }

  /// A parameter whose type is the injectable `T`.
  pub fn of<T: Injectable>(name: impl Into<String>) -> Self {
    Self::typed(name, T::NAME)
  }

  /// Declares a default used when no explicit argument is supplied.
  pub fn default_value<T: Any + Send + Sync>(mut self, value: T) -> Self {
    self.default = Some(Arc::new(value));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> &ParameterKind {
    &self.kind
  }

  pub fn default(&self) -> Option<&Object> {
    self.default.as_ref()
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("has_default", &self.default.is_some())
      .finish()
  }
}

#[derive(Clone)]
pub(crate) enum Instantiation {
  Abstract,
  Plain(Arc<ConstructFn>),
  Constructor {
    parameters: Arc<[Parameter]>,
    construct: Arc<ConstructFn>,
  },
}

/// Constructor metadata for one type identifier.
#[derive(Clone)]
pub struct TypeDescriptor {
  name: String,
  pub(crate) instantiation: Instantiation,
}

impl TypeDescriptor {
  /// A type that is known but cannot be constructed directly.
  pub fn abstract_type(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      instantiation: Instantiation::Abstract,
    }
  }

  /// A type without an explicit constructor.
  pub fn plain<T, F>(name: impl Into<String>, create: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn() -> T + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      instantiation: Instantiation::Plain(Arc::new(move |_: ConstructorArgs| -> Result<Object> {
        Ok(Arc::new(create()))
      })),
    }
  }

  /// A type whose constructor takes `parameters`, in declaration order.
  pub fn with_constructor<T, F>(name: impl Into<String>, parameters: Vec<Parameter>, construct: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(ConstructorArgs) -> Result<T> + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      instantiation: Instantiation::Constructor {
        parameters: parameters.into(),
        construct: Arc::new(move |args: ConstructorArgs| -> Result<Object> {
          let value = construct(args)?;
          Ok(Arc::new(value))
        }),
      },
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_instantiable(&self) -> bool {
    !matches!(self.instantiation, Instantiation::Abstract)
  }

  /// Constructor parameters; empty when there is no explicit constructor.
  pub fn parameters(&self) -> &[Parameter] {
    match &self.instantiation {
      Instantiation::Constructor { parameters, .. } => &parameters[..],
      _ => &[],
    }
  }
}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDescriptor")
      .field("name", &self.name)
      .field("instantiable", &self.is_instantiable())
      .field("parameters", &self.parameters())
      .finish()
  }
}

/// Resolved constructor arguments, in declaration order.
pub struct ConstructorArgs {
  type_name: String,
  values: Vec<(String, Object)>,
}

impl ConstructorArgs {
  pub(crate) fn new(type_name: &str, values: Vec<(String, Object)>) -> Self {
    Self {
      type_name: type_name.to_owned(),
      values,
    }
  }

  /// The type identifier being constructed.
  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, parameter: &str) -> Option<&Object> {
    self
      .values
      .iter()
      .find(|(name, _)| name == parameter)
      .map(|(_, value)| value)
  }

  /// The argument for `parameter` as a shared `T`.
  pub fn arc<T: Any + Send + Sync>(&self, parameter: &str) -> Result<Arc<T>> {
    let value = self.get(parameter).cloned().ok_or_else(|| self.mismatch::<T>(parameter))?;
    value.downcast::<T>().map_err(|_| self.mismatch::<T>(parameter))
  }

  /// The argument for `parameter`, cloned out as a `T`.
  pub fn value<T: Any + Send + Sync + Clone>(&self, parameter: &str) -> Result<T> {
    self
      .get(parameter)
      .and_then(|value| value.downcast_ref::<T>())
      .cloned()
      .ok_or_else(|| self.mismatch::<T>(parameter))
  }

  /// The positional values, for constructors that prefer to index.
  pub fn into_values(self) -> Vec<Object> {
    self.values.into_iter().map(|(_, value)| value).collect()
  }

  fn mismatch<T>(&self, parameter: &str) -> ContainerError {
    ContainerError::ArgumentType {
      parameter: parameter.to_owned(),
      type_name: self.type_name.clone(),
      expected: type_name::<T>(),
    }
  }
}

impl fmt::Debug for ConstructorArgs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConstructorArgs")
      .field("type_name", &self.type_name)
      .field("parameters", &self.values.iter().map(|(name, _)| name).collect::<Vec<_>>())
      .finish()
  }
}

/// The per-container table of known type descriptors.
#[derive(Default)]
pub(crate) struct TypeRegistry {
  descriptors: DashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
  pub(crate) fn insert(&self, descriptor: TypeDescriptor) {
    self.descriptors.insert(descriptor.name.clone(), descriptor);
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.descriptors.contains_key(name)
  }

  /// Clones the descriptor out so no shard lock is held across recursion.
  pub(crate) fn lookup(&self, name: &str) -> std::result::Result<TypeDescriptor, ReflectionError> {
    self
      .descriptors
      .get(name)
      .map(|entry| entry.value().clone())
      .ok_or_else(|| ReflectionError::UnknownType(name.to_owned()))
  }
}
