use rollabi_abi::Param;
use rollabi_schema::{Category, Message, Schema};
use serde::Serialize;
use serde_json::Value as Json;

use super::common::{GeneratorContext, SchemaVisitor};
use crate::GenerateError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionDescriptor {
    name: String,
    #[serde(rename = "type")]
    kind: &'static str,
    state_mutability: &'static str,
    inputs: Vec<ArgumentDescriptor>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArgumentDescriptor {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    internal_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<Vec<ArgumentDescriptor>>,
}

impl From<&Param> for ArgumentDescriptor {
    fn from(param: &Param) -> Self {
        Self {
            name: param.name.clone(),
            ty: param.ty.json_type(),
            internal_type: param.ty.internal_type(),
            components: param
                .ty
                .components()
                .map(|components| components.iter().map(Self::from).collect()),
        }
    }
}

#[derive(Default)]
struct AbiJsonVisitor {
    functions: Vec<FunctionDescriptor>,
}

impl SchemaVisitor for AbiJsonVisitor {
    /// Structs only show up as the tuples of the arguments using them.
    fn visit_struct(
        &mut self,
        _context: &GeneratorContext,
        _index: usize,
        _definition: &Message,
    ) -> Result<(), GenerateError> {
        Ok(())
    }

    fn visit_message(
        &mut self,
        context: &GeneratorContext,
        _category: Category,
        message: &Message,
    ) -> Result<(), GenerateError> {
        let spec = context.spec(message);
        self.functions.push(FunctionDescriptor {
            name: message.name.clone(),
            kind: "function",
            state_mutability: "nonpayable",
            inputs: spec.params().iter().map(ArgumentDescriptor::from).collect(),
        });
        Ok(())
    }
}

/// Builds the Contract ABI document: one function per report, advance and inspect, in that order.
pub fn generate_abi_json(schema: &Schema) -> Result<Json, GenerateError> {
    let context = GeneratorContext::new(schema)?;
    let mut visitor = AbiJsonVisitor::default();
    context.walk(&mut visitor)?;
    Ok(serde_json::to_value(visitor.functions)?)
}

pub(super) fn generate(schema: &Schema) -> Result<String, GenerateError> {
    let document = generate_abi_json(schema)?;
    Ok(format!("{document:#}\n"))
}
