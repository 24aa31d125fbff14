use std::fmt;

use ethereum_types::{Address, U256};

use crate::error::Error;
use crate::types::WORD;

/// A signed 256-bit integer stored in two's complement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct I256(U256);

fn negate(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

pub(crate) fn word_of(value: &U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn u256_from_u128(value: u128) -> U256 {
    U256::from_big_endian(&value.to_be_bytes())
}

/// Truncates to the low 128 bits; callers check `bits()` first.
fn low_u128(value: &U256) -> u128 {
    let word = word_of(value);
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    u128::from_be_bytes(low)
}

impl I256 {
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// The two's complement bit pattern.
    pub fn into_raw(self) -> U256 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.bit(255)
    }

    pub fn from_i128(value: i128) -> Self {
        let magnitude = u256_from_u128(value.unsigned_abs());
        if value < 0 {
            Self(negate(magnitude))
        } else {
            Self(magnitude)
        }
    }

    pub fn to_i128(self) -> Option<i128> {
        if !self.fits(128) {
            return None;
        }
        if self.is_negative() {
            // -2^127 wraps onto itself, which is exactly i128::MIN
            Some((low_u128(&negate(self.0)) as i128).wrapping_neg())
        } else {
            Some(low_u128(&self.0) as i128)
        }
    }

    /// Whether the value lies in `[-2^(bits-1), 2^(bits-1))`.
    pub fn fits(&self, bits: u16) -> bool {
        let magnitude = if self.is_negative() { !self.0 } else { self.0 };
        magnitude.bits() < usize::from(bits)
    }

    pub fn from_dec_str(s: &str) -> Option<Self> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, s),
        };
        let magnitude = U256::from_dec_str(digits).ok()?;
        let value = if negative {
            Self(negate(magnitude))
        } else {
            Self(magnitude)
        };
        // the sign must survive the conversion, except for zero
        if !magnitude.is_zero() && value.is_negative() != negative {
            return None;
        }
        Some(value)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", negate(self.0))
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A dynamically typed ABI value, shaped like an [`AbiType`](crate::AbiType).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Uint(U256),
    Int(I256),
    Address(Address),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
}

macro_rules! into_variant {
    ($($fn_name:ident => $variant:ident: $ty:ty, $expected:literal;)*) => {
        $(
            pub fn $fn_name(self) -> Result<$ty, Error> {
                match self {
                    Self::$variant(inner) => Ok(inner),
                    other => Err(Error::TypeMismatch {
                        expected: $expected.into(),
                        found: other.kind(),
                    }),
                }
            }
        )*
    };
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Int(_) => "int",
            Self::Address(_) => "address",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Tuple(_) => "tuple",
        }
    }

    into_variant! {
        into_bool => Bool: bool, "bool";
        into_uint => Uint: U256, "uint";
        into_int => Int: I256, "int";
        into_address => Address: Address, "address";
        into_bytes => Bytes: Vec<u8>, "bytes";
        into_string => String: String, "string";
        into_array => Array: Vec<Value>, "array";
        into_tuple => Tuple: Vec<Value>, "tuple";
    }

    /// Unwraps a tuple of exactly `N` members.
    pub fn into_fields<const N: usize>(self) -> Result<[Value; N], Error> {
        fields(self.into_tuple()?)
    }
}

/// Converts an argument or member list into a fixed-size array, checking its length.
pub fn fields<const N: usize>(values: Vec<Value>) -> Result<[Value; N], Error> {
    let found = values.len();
    values
        .try_into()
        .map_err(|_| Error::ArityMismatch { expected: N, found })
}

/// Conversion between a Rust value and the dynamic [`Value`] model.
///
/// Generated bindings implement this for every struct; the implementations below cover the field
/// types the generator maps basic ABI types to.
pub trait AbiValue: Sized {
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Result<Self, Error>;
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl AbiValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Uint(u256_from_u128(u128::from(*self)))
                }

                fn from_value(value: Value) -> Result<Self, Error> {
                    let value = value.into_uint()?;
                    if value.bits() > <$ty>::BITS as usize {
                        return Err(Error::OutOfRange {
                            ty: stringify!($ty).into(),
                            value: value.to_string(),
                        });
                    }
                    Ok(low_u128(&value) as $ty)
                }
            }
        )*
    };
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(
            impl AbiValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Int(I256::from_i128(i128::from(*self)))
                }

                fn from_value(value: Value) -> Result<Self, Error> {
                    let value = value.into_int()?;
                    value
                        .to_i128()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| Error::OutOfRange {
                            ty: stringify!($ty).into(),
                            value: value.to_string(),
                        })
                }
            }
        )*
    };
}

impl_unsigned!(u8, u16, u32, u64, u128);
impl_signed!(i8, i16, i32, i64, i128);

macro_rules! impl_direct {
    ($($ty:ty => $variant:ident, $into:ident;)*) => {
        $(
            impl AbiValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self, Error> {
                    value.$into()
                }
            }
        )*
    };
}

impl_direct! {
    bool => Bool, into_bool;
    U256 => Uint, into_uint;
    I256 => Int, into_int;
    Address => Address, into_address;
    String => String, into_string;
    Vec<u8> => Bytes, into_bytes;
}
