use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Registry(#[from] rollabi_abi::Error),
    #[error("{first} and {second} both map to the identifier {ident}")]
    IdentifierClash {
        ident: String,
        first: String,
        second: String,
    },
    #[error("invalid module name {0:?}")]
    InvalidModuleName(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
