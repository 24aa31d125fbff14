//! Bindings generated from `schema.yaml` at build time.

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

pub use bindings::*;
