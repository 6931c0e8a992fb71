use thiserror::Error;

/// Failures raised while looking up constructor metadata.
///
/// These never escape `build` directly; they are wrapped as the source of
/// a [`ContainerError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectionError {
  #[error("no descriptor is registered for type '{0}'")]
  UnknownType(String),
}

/// The single error type returned by container resolution.
#[derive(Debug, Error)]
pub enum ContainerError {
  #[error("Type [{type_name}] does not exist: {source}")]
  TypeNotFound {
    type_name: String,
    #[source]
    source: ReflectionError,
  },

  #[error("Type [{type_name}] is not instantiable")]
  NotInstantiable { type_name: String },

  #[error("Unable to build [{type_name}]: please provide the value of the parameter [{parameter}]")]
  UnresolvableParameter {
    parameter: String,
    type_name: String,
    #[source]
    source: Option<ReflectionError>,
  },

  #[error("Circular dependency detected: {}", chain.join(" -> "))]
  CircularDependency { chain: Vec<String> },

  #[error("Resolution depth limit of {limit} exceeded while resolving [{type_name}]")]
  DepthExceeded { limit: usize, type_name: String },

  #[error("Argument [{parameter}] of [{type_name}] is not a value of type {expected}")]
  ArgumentType {
    parameter: String,
    type_name: String,
    expected: &'static str,
  },

  #[error("Resolved object for [{name}] is not a value of type {expected}")]
  TypeMismatch { name: String, expected: &'static str },

  #[error("Misconfiguration: {0}")]
  Misconfiguration(String),
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
