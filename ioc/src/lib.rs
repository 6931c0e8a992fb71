//! # Fibre Wire
//!
//! A minimal, thread-safe Inversion of Control container that maps names to
//! construction strategies and auto-wires object graphs.
//!
//! ## Core Concepts
//!
//! - **Bindings**: a name is bound to a [`Resolver`], either a factory that
//!   receives the container or a type identifier to build. Bindings are
//!   transient by default; `singleton` caches the first object produced.
//! - **Instances**: `instance` stores an object directly. It always wins over
//!   bindings for the same name.
//! - **Auto-wiring**: Rust has no runtime constructor reflection, so each
//!   constructible type registers a [`TypeDescriptor`] listing its
//!   constructor parameters. `build` fills every parameter from explicit
//!   arguments, declared defaults, or a recursive build of the parameter's
//!   type, and reports loops as [`ContainerError::CircularDependency`].
//! - **Global Container**: a lazily created process-wide container accessed
//!   via [`global()`] and replaceable via [`set_global()`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_wire::{args, Container, ContainerError, Parameter, Resolver, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Transport;
//!
//! struct Mailer {
//!   url: String,
//!   transport: Arc<Transport>,
//! }
//!
//! let container = Container::new();
//! container.register_type(TypeDescriptor::plain("Transport", || Transport));
//! container.register_type(TypeDescriptor::with_constructor(
//!   "Mailer",
//!   vec![
//!     Parameter::builtin::<String>("url"),
//!     Parameter::typed("transport", "Transport"),
//!   ],
//!   |args| {
//!     Ok(Mailer {
//!       url: args.value("url")?,
//!       transport: args.arc("transport")?,
//!     })
//!   },
//! ));
//!
//! // `url` has no default and is not a constructible type.
//! assert!(matches!(
//!   container.build("Mailer"),
//!   Err(ContainerError::UnresolvableParameter { .. })
//! ));
//!
//! container.singleton(
//!   "mailer",
//!   Resolver::object_factory(|c| c.build_with("Mailer", &args! { "url" => String::from("smtp://localhost") })),
//! );
//!
//! let first = container.make_as::<Mailer>("mailer").unwrap();
//! let second = container.make_as::<Mailer>("mailer").unwrap();
//! assert_eq!(first.url, "smtp://localhost");
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

mod config;
mod container;
mod core;
mod error;
mod facade;
mod global;
mod macros;
mod reflect;

pub use config::{ContainerConfig, DEFAULT_MAX_DEPTH};
pub use container::Container;
pub use crate::core::{Arguments, Lifetime, Object, Resolver};
pub use error::{ContainerError, ReflectionError, Result};
pub use facade::Facade;
pub use global::{global, set_global};
pub use reflect::{ConstructorArgs, Injectable, Parameter, ParameterKind, TypeDescriptor};
