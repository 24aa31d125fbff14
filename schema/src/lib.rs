//! Schema model and front end of the ABI schema compiler: identifier and type-expression
//! validation, document parsing and semantic analysis.

pub mod ast;
pub mod error;
pub mod lexer;

mod analyzer;
mod builtins;
mod parser;

pub use analyzer::{analyze, EmptySchemaAction};
pub use ast::{Category, Field, Message, ResolvedType, Schema};
pub use error::{Error, InvalidIdentifier, InvalidTypeSyntax, ParseError, SemanticError};
pub use lexer::{tokenize_type_expression, validate_identifier, TypeExpr};
pub use parser::parse;

/// Parses and analyzes a schema document.
pub fn read_schema(document: &[u8], empty_schema: EmptySchemaAction) -> Result<Schema, Error> {
    let schema = parse(document)?;
    Ok(analyze(schema, empty_schema)?)
}
