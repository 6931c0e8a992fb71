//! Public macros for ergonomic resolution and registration.

/// Resolves a name from the global container.
///
/// `resolve!(name)` yields the type-erased [`Object`](crate::Object);
/// `resolve!(name => Type)` downcasts it to `Arc<Type>`.
///
/// # Panics
///
/// Panics with the container error if the name cannot be resolved. For a
/// non-panicking version, use `global().make(...)` directly.
///
/// # Examples
///
/// ```
/// use fibre_wire::{global, resolve, Resolver};
///
/// global().bind("answer", Resolver::factory(|_| 42_u32));
///
/// let answer = resolve!("answer" => u32);
/// assert_eq!(*answer, 42);
/// ```
#[macro_export]
macro_rules! resolve {
  ($name:expr => $type:ty) => {
    $crate::global()
      .make_as::<$type>($name)
      .unwrap_or_else(|err| panic!("Failed to resolve required service '{}': {}", $name, err))
  };

  ($name:expr) => {
    $crate::global()
      .make($name)
      .unwrap_or_else(|err| panic!("Failed to resolve required service '{}': {}", $name, err))
  };
}

/// Builds [`Arguments`](crate::Arguments) from `name => value` pairs.
///
/// ```
/// use fibre_wire::args;
///
/// let arguments = args! { "url" => String::from("smtp://localhost"), "port" => 25_u16 };
/// assert_eq!(arguments.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
  () => {
    $crate::Arguments::new()
  };

  ($($name:expr => $value:expr),+ $(,)?) => {{
    let mut arguments = $crate::Arguments::new();
    $(arguments.insert($name, $value);)+
    arguments
  }};
}

/// Declares a unit struct implementing [`Facade`](crate::Facade).
///
/// ```
/// use fibre_wire::{facade, global, Facade, Resolver};
///
/// pub struct Mailer;
/// impl Mailer {
///   fn transport(&self) -> &'static str { "smtp" }
/// }
///
/// facade!(pub Mail: Mailer => "mailer");
///
/// global().singleton("mailer", Resolver::factory(|_| Mailer));
/// assert_eq!(Mail::with(Mailer::transport).unwrap(), "smtp");
/// ```
#[macro_export]
macro_rules! facade {
  ($vis:vis $facade:ident : $target:ty => $accessor:expr) => {
    $vis struct $facade;

    impl $crate::Facade for $facade {
      type Target = $target;

      fn accessor() -> $crate::Result<&'static str> {
        Ok($accessor)
      }
    }
  };
}
