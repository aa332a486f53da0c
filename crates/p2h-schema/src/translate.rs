use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};
use crate::node::{RecordKind, SchemaDocument, TypeNode};

/// State carried through the translation of one schema document.
///
/// Named records are registered when they are first translated so that later
/// references to the same name resolve to the same column type. A record must
/// appear before any reference to it.
#[derive(Debug, Default)]
pub struct TranslationContext {
    named_types: HashMap<String, String>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, node: &TypeNode) -> SchemaResult<String> {
        match node {
            TypeNode::Primitive(primitive) => Ok(primitive.sql_name().to_string()),
            TypeNode::Map { value } => Ok(format!("map<string,{}>", self.translate(value)?)),
            TypeNode::Array { element } => Ok(format!("array<{}>", self.translate(element)?)),
            TypeNode::Record { kind, name, fields } => {
                let mut declarations = Vec::with_capacity(fields.len());
                for field in fields {
                    let data_type = self.translate(&field.data_type)?;
                    declarations.push(format!("`{}`: {data_type}", field.name));
                }
                let sql_type = format!("struct<{}>", declarations.join(", "));
                if let (RecordKind::Record, Some(name)) = (kind, name) {
                    self.register(name, &sql_type);
                }
                Ok(sql_type)
            }
            TypeNode::Nullable(inner) => self.translate(inner),
            TypeNode::Named(name) => self
                .resolve(name)
                .map(str::to_string)
                .ok_or_else(|| SchemaError::UnknownType(Value::String(name.clone()))),
        }
    }

    /// Parses and translates a raw JSON type node.
    pub fn translate_json(&mut self, value: &Value) -> SchemaResult<String> {
        self.translate(&TypeNode::parse(value)?)
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.named_types.get(name).map(String::as_str)
    }

    /// The first definition of a name wins.
    fn register(&mut self, name: &str, sql_type: &str) {
        if !self.named_types.contains_key(name) {
            debug!("Registering named type {name}");
            self.named_types
                .insert(name.to_string(), sql_type.to_string());
        }
    }
}

/// A top-level column of the generated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDeclaration {
    pub name: String,
    pub data_type: String,
}

impl fmt::Display for ColumnDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.name, self.data_type)
    }
}

/// Translates every top-level field of a document with a fresh [`TranslationContext`].
pub fn translate_schema(document: &SchemaDocument) -> SchemaResult<Vec<ColumnDeclaration>> {
    let mut context = TranslationContext::new();
    let mut columns = Vec::with_capacity(document.fields.len());
    for field in &document.fields {
        columns.push(ColumnDeclaration {
            name: field.name.clone(),
            data_type: context.translate(&field.data_type)?,
        });
    }
    Ok(columns)
}
