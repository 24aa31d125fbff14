use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::ast::{Category, Message, ResolvedType, Schema};
use crate::builtins;
use crate::error::SemanticError;
use crate::lexer::TypeExpr;

/// What to do with a schema that declares no reports, advances or inspects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EmptySchemaAction {
    #[default]
    Deny,
    Warn,
    Allow,
}

/// Struct name to its index in [`Schema::structs`].
type StructTable = HashMap<String, usize>;

/// Resolves every field type of `schema` in place.
///
/// Structs are resolved first, in declaration order, against the structs declared before them
/// only. A struct therefore cannot refer to itself or to a later struct. The struct table is then
/// frozen and the reports, advances and inspects are resolved against all of it.
pub fn analyze(
    mut schema: Schema,
    empty_schema: EmptySchemaAction,
) -> Result<Schema, SemanticError> {
    let mut structs = StructTable::new();
    for (index, message) in schema.structs.iter_mut().enumerate() {
        if structs.contains_key(&message.name) {
            return Err(SemanticError::DuplicateStruct(message.name.clone()));
        }
        if message.fields.is_empty() {
            return Err(SemanticError::EmptyStruct(message.name.clone()));
        }
        resolve_fields(Category::Struct, message, &structs)?;
        structs.insert(message.name.clone(), index);
    }
    debug!(structs = structs.len(), "resolved structs");

    let mut taken: HashSet<String> = structs.keys().cloned().collect();
    for category in Category::MESSAGES {
        for message in schema.category_mut(category).iter_mut() {
            if structs.contains_key(&message.name) {
                return Err(SemanticError::NameCollision {
                    category,
                    name: message.name.clone(),
                });
            }
            if !taken.insert(message.name.clone()) {
                return Err(SemanticError::DuplicateMessage {
                    category,
                    name: message.name.clone(),
                });
            }
            resolve_fields(category, message, &structs)?;
        }
        debug!(%category, count = schema.category(category).len(), "resolved messages");
    }

    if schema.message_count() == 0 {
        match empty_schema {
            EmptySchemaAction::Deny => return Err(SemanticError::NoMessages),
            EmptySchemaAction::Warn => {
                warn!("schema declares no reports, advances or inspects");
            }
            EmptySchemaAction::Allow => {}
        }
    }
    Ok(schema)
}

fn resolve_fields(
    category: Category,
    message: &mut Message,
    structs: &StructTable,
) -> Result<(), SemanticError> {
    let Message { name, fields } = message;
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields.iter_mut() {
        if !seen.insert(field.name.clone()) {
            return Err(SemanticError::DuplicateField {
                category,
                message: name.clone(),
                field: field.name.clone(),
            });
        }
        let resolved = resolve_type(&field.raw_type, structs).ok_or_else(|| {
            SemanticError::UnknownType {
                category,
                message: name.clone(),
                field: field.name.clone(),
                type_name: field.raw_type.base.clone(),
            }
        })?;
        trace!(%category, message = %name, field = %field.name, ?resolved, "resolved field");
        field.resolved = Some(resolved);
    }
    Ok(())
}

/// Basic type names win over struct names.
fn resolve_type(raw: &TypeExpr, structs: &StructTable) -> Option<ResolvedType> {
    let element = match builtins::lookup(&raw.base) {
        Some(basic) => basic.clone(),
        None => ResolvedType::StructRef {
            index: *structs.get(&raw.base)?,
        },
    };
    Some(if raw.is_array {
        ResolvedType::Array(Box::new(element))
    } else {
        element
    })
}
