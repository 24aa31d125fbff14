use std::fmt;

use crate::lexer::TypeExpr;

/// The section a declaration comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Struct,
    Report,
    Advance,
    Inspect,
}

impl Category {
    /// The message categories, in the order their messages are emitted.
    pub const MESSAGES: [Category; 3] = [Category::Report, Category::Advance, Category::Inspect];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Report => "report",
            Self::Advance => "advance",
            Self::Inspect => "inspect",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A field type after semantic analysis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Bool,
    Int { signed: bool, bits: u16 },
    Address,
    Bytes,
    String,
    Array(Box<ResolvedType>),
    /// Index into [`Schema::structs`].
    StructRef { index: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub raw_type: TypeExpr,
    /// Set by the analyzer.
    pub resolved: Option<ResolvedType>,
}

impl Field {
    pub fn new(name: impl Into<String>, raw_type: TypeExpr) -> Self {
        Self {
            name: name.into(),
            raw_type,
            resolved: None,
        }
    }

    /// The resolved type. Only valid on an analyzed schema.
    pub fn ty(&self) -> &ResolvedType {
        self.resolved
            .as_ref()
            .expect("field type is resolved by the analyzer")
    }
}

/// A struct or a report/advance/inspect: a name and an ordered list of fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    pub structs: Vec<Message>,
    pub reports: Vec<Message>,
    pub advances: Vec<Message>,
    pub inspects: Vec<Message>,
}

impl Schema {
    pub fn category(&self, category: Category) -> &[Message] {
        match category {
            Category::Struct => &self.structs,
            Category::Report => &self.reports,
            Category::Advance => &self.advances,
            Category::Inspect => &self.inspects,
        }
    }

    pub(crate) fn category_mut(&mut self, category: Category) -> &mut Vec<Message> {
        match category {
            Category::Struct => &mut self.structs,
            Category::Report => &mut self.reports,
            Category::Advance => &mut self.advances,
            Category::Inspect => &mut self.inspects,
        }
    }

    /// All reports, then advances, then inspects, each in declaration order.
    pub fn messages(&self) -> impl Iterator<Item = (Category, &Message)> {
        Category::MESSAGES
            .into_iter()
            .flat_map(move |c| self.category(c).iter().map(move |m| (c, m)))
    }

    pub fn message_count(&self) -> usize {
        self.reports.len() + self.advances.len() + self.inspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.message_count() == 0
    }

    pub fn struct_at(&self, index: usize) -> &Message {
        &self.structs[index]
    }
}
