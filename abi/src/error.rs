use thiserror::Error;

use crate::Selector;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("selector {0} not found")]
    SelectorNotFound(Selector),
    #[error("unsupported {category} message with selector {selector}")]
    UnsupportedMessage {
        category: &'static str,
        selector: Selector,
    },
    #[error("payload selector {found} does not match {expected}")]
    SelectorMismatch { expected: Selector, found: Selector },
    #[error("unknown message {0:?}")]
    UnknownMessage(String),
    #[error("expected a value of type {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },
    #[error("value {value} does not fit in {ty}")]
    OutOfRange { ty: String, value: String },
    #[error("expected {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("message {0:?} is already registered")]
    DuplicateMessage(String),
    #[error("selector {selector} of {second} collides with {first}")]
    DuplicateSelector {
        selector: Selector,
        first: String,
        second: String,
    },
    #[error("invalid JSON value at {path}: {reason}")]
    InvalidJson { path: String, reason: String },
}

pub(crate) fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedPayload(reason.into())
}
