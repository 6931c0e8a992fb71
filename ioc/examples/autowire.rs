use fibre_wire::{args, Container, ContainerError, Injectable, Parameter, TypeDescriptor};
use std::sync::Arc;

struct Transport;

impl Injectable for Transport {
  const NAME: &'static str = "Transport";

  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::plain(Self::NAME, || Transport)
  }
}

struct Mailer {
  url: String,
  retries: u8,
  _transport: Arc<Transport>,
}

impl Injectable for Mailer {
  const NAME: &'static str = "Mailer";

  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::with_constructor(
      Self::NAME,
      vec![
        Parameter::builtin::<String>("url"),
        Parameter::builtin::<u8>("retries").default_value(3_u8),
        Parameter::of::<Transport>("transport"),
      ],
      |args| {
        Ok(Mailer {
          url: args.value("url")?,
          retries: args.value("retries")?,
          _transport: args.arc("transport")?,
        })
      },
    )
  }
}

fn main() -> Result<(), ContainerError> {
  let container = Container::new();
  container.register::<Transport>();
  container.register::<Mailer>();

  // Without a url the primitive parameter cannot be resolved.
  if let Err(err) = container.build("Mailer") {
    println!("Expected failure: {}", err);
  }

  let mailer = container
    .make_with("Mailer", &args! { "url" => String::from("smtp://localhost") })?
    .downcast::<Mailer>()
    .map_err(|_| ContainerError::Misconfiguration("Mailer descriptor built another type".into()))?;

  println!("Mailer for {} with {} retries", mailer.url, mailer.retries);
  Ok(())
}
