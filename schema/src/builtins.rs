use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::ResolvedType;

lazy_static! {
    /// The fixed table of basic type names.
    static ref BASIC_TYPES: HashMap<String, ResolvedType> = {
        let mut types = HashMap::new();
        types.insert("bool".to_string(), ResolvedType::Bool);
        types.insert("address".to_string(), ResolvedType::Address);
        types.insert("bytes".to_string(), ResolvedType::Bytes);
        types.insert("string".to_string(), ResolvedType::String);
        types.insert("int".to_string(), ResolvedType::Int { signed: true, bits: 256 });
        types.insert("uint".to_string(), ResolvedType::Int { signed: false, bits: 256 });
        for bits in (8..=256).step_by(8) {
            types.insert(format!("int{bits}"), ResolvedType::Int { signed: true, bits });
            types.insert(format!("uint{bits}"), ResolvedType::Int { signed: false, bits });
        }
        types
    };
}

pub fn lookup(name: &str) -> Option<&'static ResolvedType> {
    BASIC_TYPES.get(name)
}
