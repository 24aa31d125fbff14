use std::collections::{BTreeMap, HashMap};

use crate::error::Error;
use crate::message::{Message, MessageSpec};
use crate::selector::{split_payload, Selector};
use crate::value::Value;

/// Selector lookup table for a set of messages.
///
/// A registry is built once (by generated `registry()` functions or from an analyzed schema) and
/// handed to whatever needs to route payloads; nothing registers itself implicitly.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    messages: BTreeMap<Selector, MessageSpec>,
    names: HashMap<String, Selector>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message, rejecting a repeated name or a selector already taken by another message.
    pub fn register(&mut self, spec: MessageSpec) -> Result<Selector, Error> {
        if self.names.contains_key(spec.name()) {
            return Err(Error::DuplicateMessage(spec.name().to_string()));
        }
        let selector = spec.selector();
        if let Some(existing) = self.messages.get(&selector) {
            return Err(Error::DuplicateSelector {
                selector,
                first: existing.signature().to_string(),
                second: spec.signature().to_string(),
            });
        }
        self.names.insert(spec.name().to_string(), selector);
        self.messages.insert(selector, spec);
        Ok(selector)
    }

    pub fn register_message<M: Message>(&mut self) -> Result<Selector, Error> {
        self.register(M::spec())
    }

    pub fn get(&self, selector: &Selector) -> Option<&MessageSpec> {
        self.messages.get(selector)
    }

    pub fn by_name(&self, name: &str) -> Option<&MessageSpec> {
        self.names.get(name).and_then(|s| self.messages.get(s))
    }

    /// Iterates in selector order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageSpec> {
        self.messages.values()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn pack(&self, name: &str, values: &[Value]) -> Result<Vec<u8>, Error> {
        self.by_name(name)
            .ok_or_else(|| Error::UnknownMessage(name.to_string()))?
            .pack(values)
    }

    pub fn unpack(&self, payload: &[u8]) -> Result<(&MessageSpec, Vec<Value>), Error> {
        let (selector, _) = split_payload(payload)?;
        let spec = self
            .get(&selector)
            .ok_or(Error::SelectorNotFound(selector))?;
        Ok((spec, spec.unpack(payload)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AbiType, Param};

    fn transfer() -> MessageSpec {
        MessageSpec::new(
            "transfer",
            vec![
                Param::new("to", AbiType::Address),
                Param::new("amount", AbiType::Uint(256)),
            ],
        )
    }

    #[test]
    fn registers_and_looks_up() {
        let mut registry = Registry::new();
        let selector = registry.register(transfer()).unwrap();
        assert_eq!(selector, Selector([0xa9, 0x05, 0x9c, 0xbb]));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&selector).map(MessageSpec::name), Some("transfer"));
        assert_eq!(registry.by_name("transfer").map(MessageSpec::selector), Some(selector));
        assert!(registry.by_name("other").is_none());
    }

    #[test]
    fn rejects_duplicates() {
        let mut registry = Registry::new();
        registry.register(transfer()).unwrap();
        assert_eq!(
            registry.register(transfer()),
            Err(Error::DuplicateMessage("transfer".into()))
        );
    }

    #[test]
    fn pack_and_unpack() {
        let mut registry = Registry::new();
        registry.register(transfer()).unwrap();
        registry
            .register(MessageSpec::new("Ping", vec![]))
            .unwrap();

        let values = vec![
            Value::Address([7u8; 20].into()),
            Value::Uint(1_000_000u64.into()),
        ];
        let payload = registry.pack("transfer", &values).unwrap();
        assert_eq!(payload.len(), 4 + 64);
        let (spec, decoded) = registry.unpack(&payload).unwrap();
        assert_eq!(spec.name(), "transfer");
        assert_eq!(decoded, values);

        let ping = registry.pack("Ping", &[]).unwrap();
        let (spec, decoded) = registry.unpack(&ping).unwrap();
        assert_eq!(spec.name(), "Ping");
        assert!(decoded.is_empty());

        assert_eq!(
            registry.pack("Pong", &[]),
            Err(Error::UnknownMessage("Pong".into()))
        );
    }

    #[test]
    fn unpack_rejects_bad_payloads() {
        let mut registry = Registry::new();
        registry.register(transfer()).unwrap();
        assert!(matches!(
            registry.unpack(&[0xa9, 0x05, 0x9c]),
            Err(Error::MalformedPayload(_))
        ));
        assert_eq!(
            registry.unpack(&[1, 2, 3, 4]).map(|(s, _)| s.name().to_string()),
            Err(Error::SelectorNotFound(Selector([1, 2, 3, 4])))
        );
        let mut payload = vec![0xa9, 0x05, 0x9c, 0xbb];
        payload.extend_from_slice(&[0u8; 40]);
        assert!(matches!(
            registry.unpack(&payload),
            Err(Error::MalformedPayload(_))
        ));
        assert!(matches!(
            registry.unpack(&[0xa9, 0x05, 0x9c, 0xbb]),
            Err(Error::MalformedPayload(_))
        ));
    }
}
