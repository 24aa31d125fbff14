//! Code generation for analyzed schemas: the Contract ABI JSON document and Rust bindings built on
//! `rollabi-abi`.

pub mod generators;

mod error;

pub use error::GenerateError;
pub use generators::{build_registry, generate_abi_json, Generator, GeneratorOptions};

#[cfg(feature = "generator-rust")]
pub use generators::generate_bindings;
