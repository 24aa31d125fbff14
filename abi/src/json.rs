//! Mapping between [`Value`]s and JSON, for tools that take message arguments as text.
//!
//! Integers up to 64 bits are JSON numbers, wider ones decimal strings; `0x` hex strings are read
//! as well. Addresses and byte strings are `0x`-prefixed hex. Tuples are objects keyed by component name; on input a positional array
//! is accepted as well.

use ethereum_types::{Address, U256};
use serde_json::{Map, Value as Json};

use crate::error::Error;
use crate::types::{AbiType, Param};
use crate::value::{I256, Value};

fn invalid(path: &str, reason: impl Into<String>) -> Error {
    Error::InvalidJson {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn decode_hex(path: &str, s: &str) -> Result<Vec<u8>, Error> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| invalid(path, "expected a 0x-prefixed hex string"))?;
    hex::decode(digits).map_err(|e| invalid(path, e.to_string()))
}

fn parse_hex(path: &str, digits: &str) -> Result<U256, Error> {
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let bytes = hex::decode(padded).map_err(|e| invalid(path, e.to_string()))?;
    if bytes.len() > 32 {
        return Err(invalid(path, "more than 256 bits"));
    }
    Ok(U256::from_big_endian(&bytes))
}

fn parse_uint(path: &str, json: &Json) -> Result<U256, Error> {
    match json {
        Json::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| invalid(path, "expected a non-negative integer")),
        Json::String(s) => match s.strip_prefix("0x") {
            Some(digits) => parse_hex(path, digits),
            None => U256::from_dec_str(s).map_err(|_| invalid(path, "expected a decimal integer")),
        },
        _ => Err(invalid(path, "expected an integer")),
    }
}

fn parse_int(path: &str, json: &Json) -> Result<I256, Error> {
    match json {
        Json::Number(n) => n
            .as_i64()
            .map(|v| I256::from_i128(i128::from(v)))
            .ok_or_else(|| invalid(path, "expected an integer")),
        Json::String(s) => match s.strip_prefix("0x") {
            // hex is a magnitude, so it must stay below the sign bit
            Some(digits) => {
                let magnitude = parse_hex(path, digits)?;
                if magnitude.bit(255) {
                    return Err(invalid(path, "more than 255 bits"));
                }
                Ok(I256::from_raw(magnitude))
            }
            None => {
                I256::from_dec_str(s).ok_or_else(|| invalid(path, "expected a decimal integer"))
            }
        },
        _ => Err(invalid(path, "expected an integer")),
    }
}

/// Reads a value of type `ty` from JSON.
pub fn value_from_json(ty: &AbiType, json: &Json) -> Result<Value, Error> {
    from_json_at(ty, json, "$")
}

fn from_json_at(ty: &AbiType, json: &Json, path: &str) -> Result<Value, Error> {
    let value = match ty {
        AbiType::Bool => Value::Bool(
            json.as_bool()
                .ok_or_else(|| invalid(path, "expected a boolean"))?,
        ),
        AbiType::Uint(bits) => {
            let v = parse_uint(path, json)?;
            if v.bits() > usize::from(*bits) {
                return Err(Error::OutOfRange {
                    ty: ty.to_string(),
                    value: v.to_string(),
                });
            }
            Value::Uint(v)
        }
        AbiType::Int(bits) => {
            let v = parse_int(path, json)?;
            if !v.fits(*bits) {
                return Err(Error::OutOfRange {
                    ty: ty.to_string(),
                    value: v.to_string(),
                });
            }
            Value::Int(v)
        }
        AbiType::Address => {
            let s = json
                .as_str()
                .ok_or_else(|| invalid(path, "expected an address string"))?;
            let bytes = decode_hex(path, s)?;
            if bytes.len() != 20 {
                return Err(invalid(path, "an address is 20 bytes"));
            }
            Value::Address(Address::from_slice(&bytes))
        }
        AbiType::Bytes => {
            let s = json
                .as_str()
                .ok_or_else(|| invalid(path, "expected a hex string"))?;
            Value::Bytes(decode_hex(path, s)?)
        }
        AbiType::String => Value::String(
            json.as_str()
                .ok_or_else(|| invalid(path, "expected a string"))?
                .to_string(),
        ),
        AbiType::Array(element) => {
            let items = json
                .as_array()
                .ok_or_else(|| invalid(path, "expected an array"))?;
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| from_json_at(element, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            Value::Array(values)
        }
        AbiType::Tuple { components, .. } => Value::Tuple(tuple_from_json(components, json, path)?),
    };
    Ok(value)
}

fn tuple_from_json(components: &[Param], json: &Json, path: &str) -> Result<Vec<Value>, Error> {
    match json {
        Json::Object(members) => {
            if let Some(unknown) = members
                .keys()
                .find(|k| !components.iter().any(|p| &p.name == *k))
            {
                return Err(invalid(path, format!("unknown member {unknown:?}")));
            }
            components
                .iter()
                .map(|p| {
                    let member_path = format!("{path}.{}", p.name);
                    let member = members
                        .get(&p.name)
                        .ok_or_else(|| invalid(&member_path, "missing"))?;
                    from_json_at(&p.ty, member, &member_path)
                })
                .collect()
        }
        Json::Array(items) => {
            if items.len() != components.len() {
                return Err(Error::ArityMismatch {
                    expected: components.len(),
                    found: items.len(),
                });
            }
            components
                .iter()
                .zip(items)
                .map(|(p, item)| from_json_at(&p.ty, item, &format!("{path}.{}", p.name)))
                .collect()
        }
        _ => Err(invalid(path, "expected an object or an array")),
    }
}

/// Reads message arguments, given either as an object keyed by parameter name or as an array.
pub fn args_from_json(params: &[Param], json: &Json) -> Result<Vec<Value>, Error> {
    tuple_from_json(params, json, "$")
}

/// Writes a value of type `ty` as JSON.
pub fn value_to_json(ty: &AbiType, value: &Value) -> Result<Json, Error> {
    let json = match (ty, value) {
        (AbiType::Bool, Value::Bool(b)) => Json::Bool(*b),
        (AbiType::Uint(bits), Value::Uint(v)) if *bits <= 64 && v.bits() <= 64 => {
            Json::from(v.low_u64())
        }
        (AbiType::Uint(_), Value::Uint(v)) => Json::String(v.to_string()),
        (AbiType::Int(bits), Value::Int(v)) if *bits <= 64 => match v.to_i128() {
            Some(small) => i64::try_from(small)
                .map(Json::from)
                .unwrap_or_else(|_| Json::String(v.to_string())),
            None => Json::String(v.to_string()),
        },
        (AbiType::Int(_), Value::Int(v)) => Json::String(v.to_string()),
        (AbiType::Address, Value::Address(a)) => {
            Json::String(format!("0x{}", hex::encode(a.as_bytes())))
        }
        (AbiType::Bytes, Value::Bytes(b)) => Json::String(format!("0x{}", hex::encode(b))),
        (AbiType::String, Value::String(s)) => Json::String(s.clone()),
        (AbiType::Array(element), Value::Array(items)) => Json::Array(
            items
                .iter()
                .map(|item| value_to_json(element, item))
                .collect::<Result<_, _>>()?,
        ),
        (AbiType::Tuple { components, .. }, Value::Tuple(members)) => {
            args_to_json(components, members)?
        }
        (ty, value) => {
            return Err(Error::TypeMismatch {
                expected: ty.to_string(),
                found: value.kind(),
            })
        }
    };
    Ok(json)
}

/// Writes message arguments as an object keyed by parameter name, in declaration order.
pub fn args_to_json(params: &[Param], values: &[Value]) -> Result<Json, Error> {
    if params.len() != values.len() {
        return Err(Error::ArityMismatch {
            expected: params.len(),
            found: values.len(),
        });
    }
    let mut object = Map::new();
    for (param, value) in params.iter().zip(values) {
        object.insert(param.name.clone(), value_to_json(&param.ty, value)?);
    }
    Ok(Json::Object(object))
}
