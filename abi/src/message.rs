use crate::codec::{decode_call, encode_call};
use crate::error::Error;
use crate::selector::Selector;
use crate::types::{signature, Param};
use crate::value::Value;

/// A message type with a fixed selector, implemented by generated bindings.
pub trait Message: Sized {
    const NAME: &'static str;
    const SIGNATURE: &'static str;
    const SELECTOR: Selector;

    fn params() -> Vec<Param>;
    fn to_values(&self) -> Vec<Value>;
    fn from_values(values: Vec<Value>) -> Result<Self, Error>;

    /// Packs the message as `selector || abi-encoded fields`.
    fn encode(&self) -> Result<Vec<u8>, Error> {
        encode_call(Self::SELECTOR, &Self::params(), &self.to_values())
    }

    fn decode(payload: &[u8]) -> Result<Self, Error> {
        Self::from_values(decode_call(Self::SELECTOR, &Self::params(), payload)?)
    }

    fn spec() -> MessageSpec {
        MessageSpec::new(Self::NAME, Self::params())
    }
}

/// The runtime description of a message: its name, arguments and derived selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageSpec {
    name: String,
    params: Vec<Param>,
    signature: String,
    selector: Selector,
}

impl MessageSpec {
    pub fn new(name: impl Into<String>, params: Vec<Param>) -> Self {
        let name = name.into();
        let signature = signature(&name, &params);
        let selector = Selector::from_signature(&signature);
        Self {
            name,
            params,
            signature,
            selector,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    pub fn pack(&self, values: &[Value]) -> Result<Vec<u8>, Error> {
        encode_call(self.selector, &self.params, values)
    }

    pub fn unpack(&self, payload: &[u8]) -> Result<Vec<Value>, Error> {
        decode_call(self.selector, &self.params, payload)
    }
}
