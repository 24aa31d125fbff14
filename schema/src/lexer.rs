use check_keyword::CheckKeyword;

use crate::error::{InvalidIdentifier, InvalidTypeSyntax};

/// A type expression split into its base name and whether it has a trailing `[]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeExpr {
    pub base: String,
    pub is_array: bool,
}

impl TypeExpr {
    pub fn new(base: impl Into<String>, is_array: bool) -> Self {
        Self {
            base: base.into(),
            is_array,
        }
    }
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = if self.is_array { "[]" } else { "" };
        write!(f, "{}{suffix}", self.base)
    }
}

/// Checks `s` against `[A-Za-z][A-Za-z0-9]*` and rejects keywords of the binding language.
pub fn validate_identifier(s: &str) -> Result<(), InvalidIdentifier> {
    let mut runes = s.chars();
    let first = runes.next().ok_or(InvalidIdentifier::Empty)?;
    if !first.is_ascii_alphabetic() {
        return Err(InvalidIdentifier::InvalidStart {
            rune: first,
            ident: s.to_string(),
        });
    }
    if let Some(rune) = runes.find(|c| !c.is_ascii_alphanumeric()) {
        return Err(InvalidIdentifier::InvalidRune {
            rune,
            ident: s.to_string(),
        });
    }
    if s.is_keyword() {
        return Err(InvalidIdentifier::Reserved(s.to_string()));
    }
    Ok(())
}

/// Splits `name` or `name[]`. Only a single array suffix is recognised; `T[][]` leaves `T[]` as
/// the base, which is not an identifier.
pub fn tokenize_type_expression(raw: &str) -> Result<TypeExpr, InvalidTypeSyntax> {
    let (base, is_array) = match raw.strip_suffix("[]") {
        Some(base) => (base, true),
        None => (raw, false),
    };
    validate_identifier(base).map_err(|source| InvalidTypeSyntax {
        raw: raw.to_string(),
        source,
    })?;
    Ok(TypeExpr::new(base, is_array))
}
