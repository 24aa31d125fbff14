use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::ast::{Category, Field, Message, Schema};
use crate::error::ParseError;
use crate::lexer::{tokenize_type_expression, validate_identifier};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(default)]
    structs: Vec<MessageDocument>,
    #[serde(default)]
    reports: Vec<MessageDocument>,
    #[serde(default)]
    advances: Vec<MessageDocument>,
    #[serde(default)]
    inspects: Vec<MessageDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MessageDocument {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDocument>,
}

/// Either `{name: title, type: string}` or the shorthand `{title: string}`.
#[derive(Debug, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
enum FieldDocument {
    Full {
        name: String,
        #[serde(rename = "type")]
        type_: String,
    },
    Short(BTreeMap<String, String>),
}

/// Whitespace and comments only; YAML has no value to offer for such a document.
fn is_blank(document: &[u8]) -> bool {
    String::from_utf8_lossy(document).lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

/// Reads a schema document. Names are validated and type expressions tokenized, but types stay
/// unresolved until [`analyze`](crate::analyze).
pub fn parse(document: &[u8]) -> Result<Schema, ParseError> {
    let document: Option<Document> = if is_blank(document) {
        None
    } else {
        serde_yaml::from_slice(document)?
    };
    let Some(document) = document else {
        debug!("empty schema document");
        return Ok(Schema::default());
    };

    let mut schema = Schema::default();
    for (category, messages) in [
        (Category::Struct, document.structs),
        (Category::Report, document.reports),
        (Category::Advance, document.advances),
        (Category::Inspect, document.inspects),
    ] {
        let parsed = messages
            .into_iter()
            .map(|m| parse_message(category, m))
            .collect::<Result<Vec<_>, _>>()?;
        *schema.category_mut(category) = parsed;
    }
    debug!(
        structs = schema.structs.len(),
        messages = schema.message_count(),
        "parsed schema document"
    );
    Ok(schema)
}

fn parse_message(category: Category, message: MessageDocument) -> Result<Message, ParseError> {
    let name = message.name;
    validate_identifier(&name).map_err(|source| ParseError::MessageName { category, source })?;

    let mut fields = Vec::with_capacity(message.fields.len());
    for field in message.fields {
        let (field_name, raw_type) = match field {
            FieldDocument::Full { name, type_ } => (name, type_),
            FieldDocument::Short(entry) => {
                let mut entries = entry.into_iter();
                match (entries.next(), entries.next()) {
                    (Some(entry), None) => entry,
                    _ => {
                        return Err(ParseError::FieldShape {
                            category,
                            message: name,
                        })
                    }
                }
            }
        };
        validate_identifier(&field_name).map_err(|source| ParseError::FieldName {
            category,
            message: name.clone(),
            source,
        })?;
        let raw_type =
            tokenize_type_expression(&raw_type).map_err(|source| ParseError::FieldType {
                category,
                message: name.clone(),
                field: field_name.clone(),
                source,
            })?;
        fields.push(Field::new(field_name, raw_type));
    }
    Ok(Message { name, fields })
}
