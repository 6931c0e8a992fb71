//! Container configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default bound on nested resolutions on a single thread.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for a [`Container`](crate::Container).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContainerConfig {
  /// Maximum number of nested `make`/`build` frames on one thread before
  /// resolution fails with `DepthExceeded`.
  pub max_depth: usize,
}

impl ContainerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}
