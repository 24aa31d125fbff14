use std::fmt;

/// Size of one encoding slot.
pub const WORD: usize = 32;

/// A Contract ABI type as used on the wire.
///
/// Only the subset reachable from a schema is modelled: there are no fixed-size arrays and no
/// `bytesN`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AbiType {
    Bool,
    Uint(u16),
    Int(u16),
    Address,
    Bytes,
    String,
    Array(Box<AbiType>),
    Tuple {
        /// Name of the schema struct this tuple was declared as.
        name: String,
        components: Vec<Param>,
    },
}

/// A named slot in a tuple or in a message's argument list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub ty: AbiType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl AbiType {
    pub fn array(element: AbiType) -> Self {
        Self::Array(Box::new(element))
    }

    /// Whether the encoded length of a value of this type depends on the value (§ "dynamic type").
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bool | Self::Uint(_) | Self::Int(_) | Self::Address => false,
            Self::Bytes | Self::String | Self::Array(_) => true,
            Self::Tuple { components, .. } => components.iter().any(|p| p.ty.is_dynamic()),
        }
    }

    /// Number of bytes this type occupies in the head of an enclosing tuple.
    pub fn head_size(&self) -> usize {
        match self {
            _ if self.is_dynamic() => WORD,
            Self::Tuple { components, .. } => components.iter().map(|p| p.ty.head_size()).sum(),
            _ => WORD,
        }
    }

    /// The `internalType` string of the JSON ABI: like the canonical type, except that tuples
    /// name their struct.
    pub fn internal_type(&self) -> String {
        match self {
            Self::Tuple { name, .. } => format!("struct {name}"),
            Self::Array(element) => format!("{}[]", element.internal_type()),
            _ => self.to_string(),
        }
    }

    /// The `type` string of the JSON ABI, where every tuple is spelled `tuple`.
    pub fn json_type(&self) -> String {
        match self {
            Self::Tuple { .. } => "tuple".to_string(),
            Self::Array(element) => format!("{}[]", element.json_type()),
            _ => self.to_string(),
        }
    }

    pub fn components(&self) -> Option<&[Param]> {
        match self {
            Self::Tuple { components, .. } => Some(components),
            Self::Array(element) => element.components(),
            _ => None,
        }
    }
}

/// Renders the canonical type used in function signatures, e.g. `(string,uint8)[]`.
impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::Address => f.write_str("address"),
            Self::Bytes => f.write_str("bytes"),
            Self::String => f.write_str("string"),
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Tuple { components, .. } => {
                f.write_str("(")?;
                for (i, param) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", param.ty)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Builds the canonical function signature `name(type1,type2,...)`.
pub fn signature(name: &str, params: &[Param]) -> String {
    let types = params
        .iter()
        .map(|p| p.ty.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{name}({types})")
}
