use rollabi_abi::{AbiType, MessageSpec, Param, Registry};
use rollabi_schema::{Category, Message, ResolvedType, Schema};
use tracing::debug;

use crate::GenerateError;

pub(super) trait SchemaVisitor {
    fn visit_struct(
        &mut self,
        context: &GeneratorContext,
        index: usize,
        definition: &Message,
    ) -> Result<(), GenerateError>;

    fn visit_message(
        &mut self,
        context: &GeneratorContext,
        category: Category,
        message: &Message,
    ) -> Result<(), GenerateError>;
}

/// Everything the generators derive from an analyzed schema before emitting output: the selector
/// registry of every message.
pub(super) struct GeneratorContext<'a> {
    pub(super) schema: &'a Schema,
    pub(super) registry: Registry,
}

impl<'a> GeneratorContext<'a> {
    /// Fails if two message signatures hash to the same selector.
    pub(super) fn new(schema: &'a Schema) -> Result<Self, GenerateError> {
        // structs only refer to earlier structs, so one pass in declaration order suffices
        let mut struct_types = Vec::with_capacity(schema.structs.len());
        for definition in &schema.structs {
            let components = params(&struct_types, definition);
            struct_types.push(AbiType::Tuple {
                name: definition.name.clone(),
                components,
            });
        }

        let mut registry = Registry::new();
        for (category, message) in schema.messages() {
            let spec = MessageSpec::new(&message.name, params(&struct_types, message));
            debug!(
                %category,
                signature = spec.signature(),
                selector = %spec.selector(),
                "registered message"
            );
            registry.register(spec)?;
        }

        Ok(Self { schema, registry })
    }

    pub(super) fn spec(&self, message: &Message) -> &MessageSpec {
        self.registry
            .by_name(&message.name)
            .expect("every message is registered")
    }

    pub(super) fn walk<V: SchemaVisitor>(&self, visitor: &mut V) -> Result<(), GenerateError> {
        for (index, definition) in self.schema.structs.iter().enumerate() {
            visitor.visit_struct(self, index, definition)?;
        }
        for (category, message) in self.schema.messages() {
            visitor.visit_message(self, category, message)?;
        }
        Ok(())
    }
}

fn params(struct_types: &[AbiType], message: &Message) -> Vec<Param> {
    message
        .fields
        .iter()
        .map(|field| Param::new(&field.name, abi_type(struct_types, field.ty())))
        .collect()
}

fn abi_type(struct_types: &[AbiType], ty: &ResolvedType) -> AbiType {
    match ty {
        ResolvedType::Bool => AbiType::Bool,
        ResolvedType::Int { signed: true, bits } => AbiType::Int(*bits),
        ResolvedType::Int {
            signed: false,
            bits,
        } => AbiType::Uint(*bits),
        ResolvedType::Address => AbiType::Address,
        ResolvedType::Bytes => AbiType::Bytes,
        ResolvedType::String => AbiType::String,
        ResolvedType::Array(element) => AbiType::array(abi_type(struct_types, element)),
        ResolvedType::StructRef { index } => struct_types[*index].clone(),
    }
}
