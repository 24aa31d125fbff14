use std::fmt;

use sha3::{Digest, Keccak256};

use crate::error::{malformed, Error};

/// The four-byte message tag: the head of the Keccak-256 hash of a canonical signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    pub const LEN: usize = 4;

    pub fn from_signature(signature: &str) -> Self {
        let hash = Keccak256::digest(signature.as_bytes());
        Self([hash[0], hash[1], hash[2], hash[3]])
    }

    /// Reads the selector at the start of `payload`.
    pub fn from_payload(payload: &[u8]) -> Result<Self, Error> {
        match payload {
            [a, b, c, d, ..] => Ok(Self([*a, *b, *c, *d])),
            _ => Err(malformed(format!(
                "{} bytes is shorter than a selector",
                payload.len()
            ))),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Splits a call payload into its selector and the encoded arguments.
pub fn split_payload(payload: &[u8]) -> Result<(Selector, &[u8]), Error> {
    let selector = Selector::from_payload(payload)?;
    Ok((selector, &payload[Selector::LEN..]))
}
