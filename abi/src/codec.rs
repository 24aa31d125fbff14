//! The Contract ABI head/tail encoding.
//!
//! Every value occupies one or more 32-byte words. Static types are laid out inline in the head of
//! their enclosing tuple; dynamic types put an offset (relative to the start of the enclosing
//! tuple) into the head and their encoding into the tail.

use std::iter;

use ethereum_types::{Address, U256};

use crate::error::{malformed, Error};
use crate::selector::{split_payload, Selector};
use crate::types::{AbiType, Param, WORD};
use crate::value::{word_of, I256, Value};

pub fn encode(types: &[AbiType], values: &[Value]) -> Result<Vec<u8>, Error> {
    if types.len() != values.len() {
        return Err(Error::ArityMismatch {
            expected: types.len(),
            found: values.len(),
        });
    }
    let mut out = Vec::new();
    encode_sequence(types.iter().zip(values).collect(), &mut out)?;
    Ok(out)
}

pub fn decode(types: &[AbiType], data: &[u8]) -> Result<Vec<Value>, Error> {
    Decoder::new(data).sequence(types.iter(), 0)
}

/// Encodes `values` as the arguments of `params` and prefixes them with `selector`.
pub fn encode_call(selector: Selector, params: &[Param], values: &[Value]) -> Result<Vec<u8>, Error> {
    if params.len() != values.len() {
        return Err(Error::ArityMismatch {
            expected: params.len(),
            found: values.len(),
        });
    }
    let mut out = selector.as_bytes().to_vec();
    encode_sequence(params.iter().map(|p| &p.ty).zip(values).collect(), &mut out)?;
    Ok(out)
}

/// Checks the payload shape and selector, then decodes the arguments of `params`.
pub fn decode_call(expected: Selector, params: &[Param], payload: &[u8]) -> Result<Vec<Value>, Error> {
    let (found, data) = split_payload(payload)?;
    if found != expected {
        return Err(Error::SelectorMismatch { expected, found });
    }
    check_arguments_shape(data, !params.is_empty())?;
    Decoder::new(data).sequence(params.iter().map(|p| &p.ty), 0)
}

/// The minimum shape check on argument data: a whole number of words, and at least one word
/// unless the message takes no arguments.
pub fn check_arguments_shape(data: &[u8], has_params: bool) -> Result<(), Error> {
    if data.len() % WORD != 0 {
        return Err(malformed(format!(
            "argument data of {} bytes is not a multiple of {WORD}",
            data.len()
        )));
    }
    match (has_params, data.is_empty()) {
        (true, true) => Err(malformed("missing argument data")),
        (false, false) => Err(malformed("message takes no arguments")),
        _ => Ok(()),
    }
}

fn usize_word(n: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(n as u64).to_be_bytes());
    word
}

fn encode_sequence(items: Vec<(&AbiType, &Value)>, out: &mut Vec<u8>) -> Result<(), Error> {
    let head_size: usize = items.iter().map(|(ty, _)| ty.head_size()).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();
    for (ty, value) in items {
        if ty.is_dynamic() {
            head.extend_from_slice(&usize_word(head_size + tail.len()));
            encode_value(ty, value, &mut tail)?;
        } else {
            encode_value(ty, value, &mut head)?;
        }
    }
    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    Ok(())
}

fn encode_packed(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&usize_word(data.len()));
    out.extend_from_slice(data);
    let padding = (WORD - data.len() % WORD) % WORD;
    out.resize(out.len() + padding, 0);
}

fn encode_value(ty: &AbiType, value: &Value, out: &mut Vec<u8>) -> Result<(), Error> {
    match (ty, value) {
        (AbiType::Bool, Value::Bool(b)) => out.extend_from_slice(&usize_word(usize::from(*b))),
        (AbiType::Uint(bits), Value::Uint(v)) => {
            if v.bits() > usize::from(*bits) {
                return Err(Error::OutOfRange {
                    ty: ty.to_string(),
                    value: v.to_string(),
                });
            }
            out.extend_from_slice(&word_of(v));
        }
        (AbiType::Int(bits), Value::Int(v)) => {
            if !v.fits(*bits) {
                return Err(Error::OutOfRange {
                    ty: ty.to_string(),
                    value: v.to_string(),
                });
            }
            // two's complement in 256 bits is already sign-extended
            out.extend_from_slice(&word_of(&v.into_raw()));
        }
        (AbiType::Address, Value::Address(address)) => {
            out.extend_from_slice(&[0u8; WORD - 20]);
            out.extend_from_slice(address.as_bytes());
        }
        (AbiType::Bytes, Value::Bytes(bytes)) => encode_packed(bytes, out),
        (AbiType::String, Value::String(s)) => encode_packed(s.as_bytes(), out),
        (AbiType::Array(element), Value::Array(items)) => {
            out.extend_from_slice(&usize_word(items.len()));
            encode_sequence(items.iter().map(|v| (element.as_ref(), v)).collect(), out)?;
        }
        (AbiType::Tuple { components, .. }, Value::Tuple(members)) => {
            if components.len() != members.len() {
                return Err(Error::ArityMismatch {
                    expected: components.len(),
                    found: members.len(),
                });
            }
            encode_sequence(components.iter().map(|p| &p.ty).zip(members).collect(), out)?;
        }
        (ty, value) => {
            return Err(Error::TypeMismatch {
                expected: ty.to_string(),
                found: value.kind(),
            })
        }
    }
    Ok(())
}

struct Decoder<'a> {
    data: &'a [u8],
    /// Bytes left to read. A payload whose offsets point several values at the same tail would
    /// otherwise decode into far more memory than it occupies.
    budget: usize,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Decoder {
            data,
            budget: data.len(),
        }
    }

    fn consume(&mut self, len: usize, at: usize) -> Result<(), Error> {
        self.budget = self.budget.checked_sub(len).ok_or_else(|| {
            malformed(format!(
                "value at offset {at} reads data already decoded elsewhere"
            ))
        })?;
        Ok(())
    }

    fn word(&mut self, at: usize) -> Result<&'a [u8], Error> {
        let word = at
            .checked_add(WORD)
            .and_then(|end| self.data.get(at..end))
            .ok_or_else(|| {
                malformed(format!(
                    "word at offset {at} is out of bounds of {} bytes",
                    self.data.len()
                ))
            })?;
        self.consume(WORD, at)?;
        Ok(word)
    }

    /// Reads an offset or a length.
    fn usize_at(&mut self, at: usize) -> Result<usize, Error> {
        let word = self.word(at)?;
        if word[..WORD - 8].iter().any(|b| *b != 0) {
            return Err(malformed(format!("offset or length at {at} is too large")));
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&word[WORD - 8..]);
        usize::try_from(u64::from_be_bytes(low))
            .map_err(|_| malformed(format!("offset or length at {at} is too large")))
    }

    fn sequence<'t>(
        &mut self,
        types: impl Iterator<Item = &'t AbiType>,
        base: usize,
    ) -> Result<Vec<Value>, Error> {
        let mut head = base;
        let mut values = Vec::new();
        for ty in types {
            let value = if ty.is_dynamic() {
                let offset = self.usize_at(head)?;
                let at = base
                    .checked_add(offset)
                    .ok_or_else(|| malformed(format!("offset {offset} overflows")))?;
                self.value(ty, at)?
            } else {
                self.value(ty, head)?
            };
            values.push(value);
            head += ty.head_size();
        }
        Ok(values)
    }

    fn packed(&mut self, at: usize) -> Result<&'a [u8], Error> {
        let len = self.usize_at(at)?;
        let start = at + WORD;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| malformed(format!("{len} bytes at offset {start} are out of bounds")))?;
        self.consume(len, start)?;
        Ok(bytes)
    }

    fn value(&mut self, ty: &AbiType, at: usize) -> Result<Value, Error> {
        let value = match ty {
            AbiType::Bool => {
                let word = self.word(at)?;
                if word[..WORD - 1].iter().any(|b| *b != 0) || word[WORD - 1] > 1 {
                    return Err(malformed(format!("invalid bool at offset {at}")));
                }
                Value::Bool(word[WORD - 1] == 1)
            }
            AbiType::Uint(bits) => {
                let v = U256::from_big_endian(self.word(at)?);
                if v.bits() > usize::from(*bits) {
                    return Err(malformed(format!("{ty} at offset {at} is out of range")));
                }
                Value::Uint(v)
            }
            AbiType::Int(bits) => {
                let v = I256::from_raw(U256::from_big_endian(self.word(at)?));
                if !v.fits(*bits) {
                    return Err(malformed(format!("{ty} at offset {at} is out of range")));
                }
                Value::Int(v)
            }
            AbiType::Address => {
                let word = self.word(at)?;
                if word[..WORD - 20].iter().any(|b| *b != 0) {
                    return Err(malformed(format!("dirty address padding at offset {at}")));
                }
                Value::Address(Address::from_slice(&word[WORD - 20..]))
            }
            AbiType::Bytes => Value::Bytes(self.packed(at)?.to_vec()),
            AbiType::String => {
                let bytes = self.packed(at)?.to_vec();
                let s = String::from_utf8(bytes)
                    .map_err(|_| malformed(format!("string at offset {at} is not UTF-8")))?;
                Value::String(s)
            }
            AbiType::Array(element) => {
                let len = self.usize_at(at)?;
                let start = at + WORD;
                // every element takes at least its head size, so bound the length before
                // allocating anything
                let available = self.data.len().saturating_sub(start);
                if len > available / element.head_size().max(1) {
                    return Err(malformed(format!(
                        "array of {len} elements at offset {at} exceeds the payload"
                    )));
                }
                Value::Array(self.sequence(iter::repeat(element.as_ref()).take(len), start)?)
            }
            AbiType::Tuple { components, .. } => {
                Value::Tuple(self.sequence(components.iter().map(|p| &p.ty), at)?)
            }
        };
        Ok(value)
    }
}
