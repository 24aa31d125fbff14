mod abi_json;
mod common;

#[cfg(feature = "generator-rust")]
mod rust;

use clap::ValueEnum;
use rollabi_abi::Registry;
use rollabi_schema::Schema;

use crate::GenerateError;

pub use abi_json::generate_abi_json;
#[cfg(feature = "generator-rust")]
pub use rust::generate_bindings;

/// The selector registry of every report, advance and inspect of an analyzed schema.
pub fn build_registry(schema: &Schema) -> Result<Registry, GenerateError> {
    Ok(common::GeneratorContext::new(schema)?.registry)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Generator {
    AbiJson,
    #[cfg(feature = "generator-rust")]
    Rust,
}

#[derive(Clone, Debug, Default)]
pub struct GeneratorOptions {
    /// Wraps Rust output in `pub mod <module>` instead of emitting a standalone file.
    pub module: Option<String>,
}

impl Generator {
    pub fn generate(
        &self,
        schema: &Schema,
        options: &GeneratorOptions,
    ) -> Result<String, GenerateError> {
        match *self {
            Self::AbiJson => abi_json::generate(schema),
            #[cfg(feature = "generator-rust")]
            Self::Rust => rust::generate(schema, options.module.as_deref()),
        }
    }
}
