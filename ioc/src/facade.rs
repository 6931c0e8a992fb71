//! Static accessors that forward to a container-resolved object.

use crate::container::Container;
use crate::error::{ContainerError, Result};
use crate::global::global;
use std::any::{type_name, Any};
use std::sync::Arc;

/// A named entry point to one object held by a container.
///
/// Implementors name the key to resolve via [`accessor`](Facade::accessor).
/// Every call through the facade resolves that key afresh, so shared
/// bindings give a stable target while transient ones give a new object per
/// call.
///
/// # Examples
///
/// ```
/// use fibre_wire::{global, Facade, Resolver, Result};
///
/// struct Counter;
/// impl Counter {
///   fn start(&self) -> u32 { 10 }
/// }
///
/// struct Counters;
///
/// impl Facade for Counters {
///   type Target = Counter;
///
///   fn accessor() -> Result<&'static str> {
///     Ok("counter")
///   }
/// }
///
/// global().singleton("counter", Resolver::factory(|_| Counter));
/// assert_eq!(Counters::with(|counter| counter.start()).unwrap(), 10);
/// ```
pub trait Facade {
  type Target: Any + Send + Sync;

  /// The key resolved from the container.
  ///
  /// Facades that do not override this fail on first use.
  fn accessor() -> Result<&'static str> {
    Err(ContainerError::Misconfiguration(format!(
      "facade [{}] does not define an accessor",
      type_name::<Self>()
    )))
  }

  /// The container the accessor is resolved from.
  fn container() -> Arc<Container> {
    global()
  }

  fn resolve() -> Result<Arc<Self::Target>> {
    let accessor = Self::accessor()?;
    Self::container().make_as::<Self::Target>(accessor)
  }

  /// Resolves the target and forwards `call` to it.
  fn with<R>(call: impl FnOnce(&Self::Target) -> R) -> Result<R> {
    let target = Self::resolve()?;
    Ok(call(&target))
  }
}
