//! The process-wide default container and its access functions.

use crate::container::Container;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

// Empty until first accessed; `set_global` may swap it wholesale.
static GLOBAL_CONTAINER: Lazy<RwLock<Option<Arc<Container>>>> = Lazy::new(|| RwLock::new(None));

/// Returns the process-wide container, creating it on first access.
///
/// # Examples
///
/// ```
/// use fibre_wire::{global, Resolver};
///
/// global().bind("greeting", Resolver::factory(|_| String::from("Hello from global!")));
///
/// let greeting = global().make_as::<String>("greeting").unwrap();
/// assert_eq!(*greeting, "Hello from global!");
/// ```
pub fn global() -> Arc<Container> {
  if let Some(container) = GLOBAL_CONTAINER.read().as_ref() {
    return Arc::clone(container);
  }

  // Re-checked under the write lock so racing callers share one default.
  let mut slot = GLOBAL_CONTAINER.write();
  let container = slot.get_or_insert_with(|| {
    tracing::debug!("creating process-wide container");
    Arc::new(Container::new())
  });
  Arc::clone(container)
}

/// Replaces the process-wide container, returning the previous one if it had
/// been created.
pub fn set_global(container: Arc<Container>) -> Option<Arc<Container>> {
  tracing::debug!("replacing process-wide container");
  GLOBAL_CONTAINER.write().replace(container)
}
