use std::collections::HashMap;

use serde_json::Value as Json;
use syn::{
    Arm, Expr, Field, FieldMutability, Ident, Item, LitInt, Token, TraitItemFn, Type,
    __private::Span, parse_quote,
};

use rollabi_schema::{Category, Message, ResolvedType, Schema};

use super::abi_json::generate_abi_json;
use super::common::{GeneratorContext, SchemaVisitor};
use crate::GenerateError;

use check_keyword::CheckKeyword;
use heck::{ToPascalCase, ToSnakeCase};

/// Type names the bindings define besides the schema's own.
const GENERATED_TYPES: [&str; 3] = ["Message", "AdvanceHandler", "InspectHandler"];

struct Handler {
    method: Ident,
    message: Ident,
}

#[derive(Default)]
struct RustVisitor {
    output_items: Vec<Item>,
    /// Generated type name to the schema name it was derived from.
    type_names: HashMap<String, String>,
    struct_idents: Vec<Ident>,
    messages: Vec<Ident>,
    advances: Vec<Handler>,
    inspects: Vec<Handler>,
}

impl RustVisitor {
    fn new() -> Self {
        let mut visitor = Self::default();
        for name in GENERATED_TYPES {
            visitor
                .type_names
                .insert(name.to_string(), format!("generated {name}"));
        }
        visitor
    }

    fn name_to_ident(name: &str) -> Ident {
        if ["crate", "self", "super", "Self"].contains(&name) {
            // These are keywords that are not allowed as raw identifiers
            Ident::new(&format!("{}_", name), Span::call_site())
        } else if name.is_keyword() {
            Ident::new_raw(name, Span::call_site())
        } else {
            Ident::new(name, Span::call_site())
        }
    }

    fn unsuffixed(n: impl ToString) -> LitInt {
        LitInt::new(&n.to_string(), Span::call_site())
    }

    fn claim_type_name(&mut self, name: &str) -> Result<Ident, GenerateError> {
        let ident = Self::name_to_ident(&name.to_pascal_case());
        if let Some(first) = self.type_names.get(&ident.to_string()) {
            return Err(GenerateError::IdentifierClash {
                ident: ident.to_string(),
                first: first.clone(),
                second: name.to_string(),
            });
        }
        self.type_names.insert(ident.to_string(), name.to_string());
        Ok(ident)
    }

    fn field_idents<'m>(
        message: &'m Message,
    ) -> Result<Vec<(Ident, &'m rollabi_schema::Field)>, GenerateError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut fields = Vec::with_capacity(message.fields.len());
        for field in &message.fields {
            let ident = Self::name_to_ident(&field.name.to_snake_case());
            if let Some(first) = seen.insert(ident.to_string(), &field.name) {
                return Err(GenerateError::IdentifierClash {
                    ident: ident.to_string(),
                    first: format!("{}.{first}", message.name),
                    second: format!("{}.{}", message.name, field.name),
                });
            }
            fields.push((ident, field));
        }
        Ok(fields)
    }

    /// The smallest native integer holding `bits`, if there is one.
    fn native_width(bits: u16) -> Option<u16> {
        [8, 16, 32, 64, 128].into_iter().find(|width| bits <= *width)
    }

    fn rust_type(&self, ty: &ResolvedType) -> Type {
        match ty {
            ResolvedType::Bool => parse_quote!(bool),
            ResolvedType::Int { signed, bits } => match Self::native_width(*bits) {
                Some(width) => {
                    let prefix = if *signed { "i" } else { "u" };
                    let ident = Ident::new(&format!("{prefix}{width}"), Span::call_site());
                    parse_quote!(#ident)
                }
                None if *signed => parse_quote!(abi::I256),
                None => parse_quote!(abi::U256),
            },
            ResolvedType::Address => parse_quote!(abi::Address),
            ResolvedType::Bytes => parse_quote!(::std::vec::Vec<u8>),
            ResolvedType::String => parse_quote!(::std::string::String),
            ResolvedType::Array(element) => {
                let element = self.rust_type(element);
                parse_quote!(::std::vec::Vec<#element>)
            }
            ResolvedType::StructRef { index } => {
                let ident = &self.struct_idents[*index];
                parse_quote!(#ident)
            }
        }
    }

    fn abi_type_expr(&self, ty: &ResolvedType) -> Expr {
        match ty {
            ResolvedType::Bool => parse_quote!(abi::AbiType::Bool),
            ResolvedType::Int { signed, bits } => {
                let bits = Self::unsuffixed(bits);
                if *signed {
                    parse_quote!(abi::AbiType::Int(#bits))
                } else {
                    parse_quote!(abi::AbiType::Uint(#bits))
                }
            }
            ResolvedType::Address => parse_quote!(abi::AbiType::Address),
            ResolvedType::Bytes => parse_quote!(abi::AbiType::Bytes),
            ResolvedType::String => parse_quote!(abi::AbiType::String),
            ResolvedType::Array(element) => {
                let element = self.abi_type_expr(element);
                parse_quote!(abi::AbiType::array(#element))
            }
            ResolvedType::StructRef { index } => {
                let ident = &self.struct_idents[*index];
                parse_quote!(#ident::abi_type())
            }
        }
    }

    fn param_exprs(&self, fields: &[(Ident, &rollabi_schema::Field)]) -> Vec<Expr> {
        fields
            .iter()
            .map(|(_, field)| {
                let name = &field.name;
                let ty = self.abi_type_expr(field.ty());
                parse_quote!(abi::Param::new(#name, #ty))
            })
            .collect()
    }

    /// `value` is a place of the field's Rust type, or a reference to one when `by_ref` is set.
    fn to_value_expr(ty: &ResolvedType, value: Expr, by_ref: bool) -> Expr {
        match ty {
            ResolvedType::Array(element) => {
                let item = Self::to_value_expr(element, parse_quote!(item), true);
                parse_quote!(abi::Value::Array(#value.iter().map(|item| #item).collect()))
            }
            _ if by_ref => parse_quote!(abi::AbiValue::to_value(#value)),
            _ => parse_quote!(abi::AbiValue::to_value(&#value)),
        }
    }

    /// `value` is an owned `abi::Value`; the expression uses `?` on `abi::Error`.
    fn from_value_expr(&self, ty: &ResolvedType, value: Expr) -> Expr {
        match ty {
            ResolvedType::Array(element) => {
                let item = self.from_value_expr(element, parse_quote!(item));
                parse_quote! {
                    #value
                        .into_array()?
                        .into_iter()
                        .map(|item| ::core::result::Result::<_, abi::Error>::Ok(#item))
                        .collect::<::core::result::Result<::std::vec::Vec<_>, abi::Error>>()?
                }
            }
            _ => {
                let ty = self.rust_type(ty);
                parse_quote!(<#ty as abi::AbiValue>::from_value(#value)?)
            }
        }
    }

    fn struct_item(
        &self,
        ident: &Ident,
        fields: &[(Ident, &rollabi_schema::Field)],
        doc: &str,
    ) -> Item {
        let fields = fields.iter().map(|(name, field)| Field {
            attrs: vec![],
            vis: parse_quote!(pub),
            mutability: FieldMutability::None,
            ident: Some(name.clone()),
            colon_token: Some(Token![:](Span::call_site())),
            ty: self.rust_type(field.ty()),
        });
        parse_quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub struct #ident {
                #(#fields),*
            }
        }
    }

    /// The `let [field0, ..] = ...?;` destructuring and the `Self { .. }` built from it.
    fn destructure(
        &self,
        fields: &[(Ident, &rollabi_schema::Field)],
        source: Expr,
    ) -> (syn::Stmt, Expr) {
        let count = Self::unsuffixed(fields.len());
        let temps: Vec<Ident> = (0..fields.len())
            .map(|i| Ident::new(&format!("field{i}"), Span::call_site()))
            .collect();
        let names = fields.iter().map(|(name, _)| name);
        let values = fields
            .iter()
            .zip(&temps)
            .map(|((_, field), temp)| self.from_value_expr(field.ty(), parse_quote!(#temp)));
        let stmt = parse_quote!(let [#(#temps),*] = abi::fields::<#count>(#source)?;);
        let construct = parse_quote!(Self { #(#names: #values),* });
        (stmt, construct)
    }

    fn finish(&mut self) {
        let messages = &self.messages;
        let types = messages.clone();
        let decode_arms: Vec<Arm> = messages
            .iter()
            .map(|message| {
                parse_quote! {
                    <#message as abi::Message>::SELECTOR => ::core::result::Result::Ok(
                        Self::#message(<#message as abi::Message>::decode(payload)?)
                    ),
                }
            })
            .collect();
        let encode_arms: Vec<Arm> = messages
            .iter()
            .map(|message| parse_quote!(Self::#message(ref message) => abi::Message::encode(message),))
            .collect();
        let selector_arms: Vec<Arm> = messages
            .iter()
            .map(|message| parse_quote!(Self::#message(_) => <#message as abi::Message>::SELECTOR,))
            .collect();
        let name_arms: Vec<Arm> = messages
            .iter()
            .map(|message| parse_quote!(Self::#message(_) => <#message as abi::Message>::NAME,))
            .collect();

        self.output_items.push(parse_quote! {
            /// Any report, advance or inspect of the schema.
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub enum Message {
                #(#messages(#types)),*
            }
        });
        self.output_items.push(parse_quote! {
            impl Message {
                /// Decodes whichever message the payload's selector names.
                pub fn decode(payload: &[u8]) -> ::core::result::Result<Self, abi::Error> {
                    let selector = abi::Selector::from_payload(payload)?;
                    match selector {
                        #(#decode_arms)*
                        _ => ::core::result::Result::Err(abi::Error::SelectorNotFound(selector)),
                    }
                }

                pub fn encode(&self) -> ::core::result::Result<::std::vec::Vec<u8>, abi::Error> {
                    match *self {
                        #(#encode_arms)*
                    }
                }

                pub fn selector(&self) -> abi::Selector {
                    match *self {
                        #(#selector_arms)*
                    }
                }

                pub fn name(&self) -> &'static str {
                    match *self {
                        #(#name_arms)*
                    }
                }
            }
        });

        let advances = std::mem::take(&mut self.advances);
        let inspects = std::mem::take(&mut self.inspects);
        self.output_items
            .extend(Self::handler_items(Category::Advance, &advances));
        self.output_items
            .extend(Self::handler_items(Category::Inspect, &inspects));

        let messages = &self.messages;
        self.output_items.push(parse_quote! {
            /// Builds the selector registry of every message of the schema.
            pub fn registry() -> ::core::result::Result<abi::Registry, abi::Error> {
                let mut registry = abi::Registry::new();
                #(registry.register_message::<#messages>()?;)*
                ::core::result::Result::Ok(registry)
            }
        });
    }

    /// The handler trait of a category and the dispatch function routing payloads to it.
    fn handler_items(category: Category, handlers: &[Handler]) -> [Item; 2] {
        let (handler_trait, dispatch) = match category {
            Category::Advance => ("AdvanceHandler", "dispatch_advance"),
            _ => ("InspectHandler", "dispatch_inspect"),
        };
        let handler_trait = Ident::new(handler_trait, Span::call_site());
        let dispatch = Ident::new(dispatch, Span::call_site());
        let category_name = category.as_str();
        let trait_doc = format!(" Application callbacks for every {category} message.");
        let dispatch_doc = format!(
            " Decodes an {category} payload and passes it to the matching handler method."
        );

        let methods: Vec<TraitItemFn> = handlers
            .iter()
            .map(|Handler { method, message }| {
                parse_quote! {
                    fn #method(&mut self, message: #message) -> ::core::result::Result<(), Self::Error>;
                }
            })
            .collect();
        let arms: Vec<Arm> = handlers
            .iter()
            .map(|Handler { method, message }| {
                parse_quote! {
                    <#message as abi::Message>::SELECTOR => {
                        handler.#method(<#message as abi::Message>::decode(payload)?)
                    }
                }
            })
            .collect();

        [
            parse_quote! {
                #[doc = #trait_doc]
                pub trait #handler_trait {
                    type Error: ::core::convert::From<abi::Error>;
                    #(#methods)*
                }
            },
            parse_quote! {
                #[doc = #dispatch_doc]
                pub fn #dispatch<Handler_: #handler_trait + ?::core::marker::Sized>(
                    handler: &mut Handler_,
                    payload: &[u8],
                ) -> ::core::result::Result<(), Handler_::Error> {
                    let selector = abi::Selector::from_payload(payload)?;
                    match selector {
                        #(#arms)*
                        _ => ::core::result::Result::Err(
                            <Handler_::Error as ::core::convert::From<abi::Error>>::from(
                                abi::Error::UnsupportedMessage {
                                    category: #category_name,
                                    selector,
                                },
                            ),
                        ),
                    }
                }
            },
        ]
    }
}

impl SchemaVisitor for RustVisitor {
    fn visit_struct(
        &mut self,
        _context: &GeneratorContext,
        index: usize,
        definition: &Message,
    ) -> Result<(), GenerateError> {
        debug_assert_eq!(index, self.struct_idents.len());
        let ident = self.claim_type_name(&definition.name)?;
        let fields = Self::field_idents(definition)?;
        let name = &definition.name;

        let doc = format!(" The `{name}` struct.");
        let item = self.struct_item(&ident, &fields, &doc);
        self.output_items.push(item);

        let components = self.param_exprs(&fields);
        self.output_items.push(parse_quote! {
            impl #ident {
                pub fn abi_type() -> abi::AbiType {
                    abi::AbiType::Tuple {
                        name: ::std::string::String::from(#name),
                        components: ::std::vec![#(#components),*],
                    }
                }
            }
        });

        let to_values = fields.iter().map(|(field_ident, field)| {
            Self::to_value_expr(field.ty(), parse_quote!(self.#field_ident), false)
        });
        let (destructure, construct) = self.destructure(&fields, parse_quote!(value.into_tuple()?));
        self.output_items.push(parse_quote! {
            impl abi::AbiValue for #ident {
                fn to_value(&self) -> abi::Value {
                    abi::Value::Tuple(::std::vec![#(#to_values),*])
                }

                fn from_value(value: abi::Value) -> ::core::result::Result<Self, abi::Error> {
                    #destructure
                    ::core::result::Result::Ok(#construct)
                }
            }
        });

        self.struct_idents.push(ident);
        Ok(())
    }

    fn visit_message(
        &mut self,
        context: &GeneratorContext,
        category: Category,
        message: &Message,
    ) -> Result<(), GenerateError> {
        let ident = self.claim_type_name(&message.name)?;
        let fields = Self::field_idents(message)?;
        let spec = context.spec(message);
        let name = &message.name;
        let signature = spec.signature();

        let doc = format!(" The `{signature}` {category}, selector `{}`.", spec.selector());
        let item = self.struct_item(&ident, &fields, &doc);
        self.output_items.push(item);

        let selector = spec
            .selector()
            .0
            .map(|byte| LitInt::new(&format!("{byte:#04x}"), Span::call_site()));
        let params = self.param_exprs(&fields);
        let to_values = fields.iter().map(|(field_ident, field)| {
            Self::to_value_expr(field.ty(), parse_quote!(self.#field_ident), false)
        });
        let (destructure, construct) = self.destructure(&fields, parse_quote!(values));
        self.output_items.push(parse_quote! {
            impl abi::Message for #ident {
                const NAME: &'static str = #name;
                const SIGNATURE: &'static str = #signature;
                const SELECTOR: abi::Selector = abi::Selector([#(#selector),*]);

                fn params() -> ::std::vec::Vec<abi::Param> {
                    ::std::vec![#(#params),*]
                }

                fn to_values(&self) -> ::std::vec::Vec<abi::Value> {
                    ::std::vec![#(#to_values),*]
                }

                fn from_values(
                    values: ::std::vec::Vec<abi::Value>,
                ) -> ::core::result::Result<Self, abi::Error> {
                    #destructure
                    ::core::result::Result::Ok(#construct)
                }
            }
        });

        let handler = || Handler {
            method: Self::name_to_ident(&message.name.to_snake_case()),
            message: ident.clone(),
        };
        match category {
            Category::Advance => self.advances.push(handler()),
            Category::Inspect => self.inspects.push(handler()),
            Category::Report | Category::Struct => {}
        }
        self.messages.push(ident);
        Ok(())
    }
}

/// Generates Rust bindings for `schema`, embedding `abi_json` as `ABI_JSON`.
///
/// With a `module` the bindings are wrapped in `pub mod <module>`, ready for `include!`.
pub fn generate_bindings(
    schema: &Schema,
    abi_json: &Json,
    module: Option<&str>,
) -> Result<String, GenerateError> {
    let module = module
        .map(|module| {
            syn::parse_str::<Ident>(module)
                .map_err(|_| GenerateError::InvalidModuleName(module.to_string()))
        })
        .transpose()?;

    let context = GeneratorContext::new(schema)?;
    let mut visitor = RustVisitor::new();

    visitor.output_items.push(Item::Use(parse_quote!(
        use ::rollabi_abi as abi;
    )));

    context.walk(&mut visitor)?;

    let abi_json = format!("{abi_json:#}");
    visitor.output_items.push(parse_quote! {
        /// The Contract ABI of the schema.
        pub const ABI_JSON: &str = #abi_json;
    });
    visitor.finish();

    let doc_comment = concat!(
        "Generated by ",
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    );
    let items = visitor.output_items;
    let root = match module {
        None => syn::File {
            shebang: None,
            attrs: vec![
                parse_quote!(#![doc = #doc_comment]),
                parse_quote!(#![allow(dead_code, unused_imports, unused_variables)]),
            ],
            items,
        },
        Some(module) => syn::File {
            shebang: None,
            attrs: vec![],
            items: vec![parse_quote! {
                #[doc = #doc_comment]
                #[allow(dead_code, unused_imports, unused_variables)]
                pub mod #module {
                    #(#items)*
                }
            }],
        },
    };
    Ok(prettyplease::unparse(&root))
}

pub(super) fn generate(schema: &Schema, module: Option<&str>) -> Result<String, GenerateError> {
    let abi_json = generate_abi_json(schema)?;
    generate_bindings(schema, &abi_json, module)
}
