use fibre_wire::{global, resolve, ContainerError};
use std::panic;

fn main() {
  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a name that was never registered...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _service = resolve!("UnregisteredService");
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `make()` method ---
  println!("\nNow, attempting to resolve using `make()`...");

  match global().make("UnregisteredService") {
    Ok(_) => panic!("Should not have found the service!"),
    Err(err @ ContainerError::TypeNotFound { .. }) => println!("Correctly received an error: {}", err),
    Err(other) => panic!("Unexpected error: {}", other),
  }
}
