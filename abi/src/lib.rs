//! Runtime support for bindings generated by `rollabi`.
//!
//! Generated code depends on this crate only: it implements [`Message`] and [`AbiValue`] for the
//! schema's types and builds a [`Registry`] on request.

pub mod codec;
pub mod json;
pub mod registry;

mod error;
mod message;
mod selector;
mod types;
mod value;

pub use codec::{decode, decode_call, encode, encode_call};
pub use error::Error;
pub use ethereum_types::{Address, U256};
pub use message::{Message, MessageSpec};
pub use registry::Registry;
pub use selector::{split_payload, Selector};
pub use types::{signature, AbiType, Param, WORD};
pub use value::{fields, AbiValue, Value, I256};
