use thiserror::Error;

use crate::ast::Category;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidIdentifier {
    #[error("empty identifier")]
    Empty,
    #[error("invalid first rune {rune:?} in {ident:?}")]
    InvalidStart { rune: char, ident: String },
    #[error("invalid rune {rune:?} in {ident:?}")]
    InvalidRune { rune: char, ident: String },
    #[error("{0:?} is a reserved word")]
    Reserved(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid type {raw:?}: {source}")]
pub struct InvalidTypeSyntax {
    pub raw: String,
    pub source: InvalidIdentifier,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed document: {0}")]
    Document(#[from] serde_yaml::Error),
    #[error("{category} name: {source}")]
    MessageName {
        category: Category,
        source: InvalidIdentifier,
    },
    #[error("{category} {message}: a field is either {{name, type}} or a single {{name: type}} entry")]
    FieldShape { category: Category, message: String },
    #[error("{category} {message}: field name: {source}")]
    FieldName {
        category: Category,
        message: String,
        source: InvalidIdentifier,
    },
    #[error("{category} {message}: field {field}: {source}")]
    FieldType {
        category: Category,
        message: String,
        field: String,
        source: InvalidTypeSyntax,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("duplicate struct {0}")]
    DuplicateStruct(String),
    #[error("{category} {name}: name collides with struct {name}")]
    NameCollision { category: Category, name: String },
    #[error("{category} {name}: name already taken by another message")]
    DuplicateMessage { category: Category, name: String },
    #[error("{category} {message}: duplicate field {field}")]
    DuplicateField {
        category: Category,
        message: String,
        field: String,
    },
    #[error("struct {0}: a struct must have at least one field")]
    EmptyStruct(String),
    #[error("{category} {message}: field {field}: type not found: {type_name}")]
    UnknownType {
        category: Category,
        message: String,
        field: String,
        type_name: String,
    },
    #[error("schema declares no reports, advances or inspects")]
    NoMessages,
}

/// Any failure of [`read_schema`](crate::read_schema).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}
