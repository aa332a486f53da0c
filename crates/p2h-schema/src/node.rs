//! The parsed form of an embedded schema document.
//!
//! Schemas arrive as JSON written either by Avro-style writers (`items`, `values`,
//! named `record`s) or by Spark (`elementType`, `valueType`, anonymous `struct`s).
//! Parsing resolves the shape of every node up front so that translation is a plain
//! match over [`TypeNode`].

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaResult};

/// The literal marking the null branch of a union.
pub const NULL_MARKER: &str = "null";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Int,
    BigInt,
    Float,
    Double,
    Boolean,
    Date,
    Timestamp,
    Binary,
}

impl PrimitiveType {
    /// Names shared with the warehouse map to themselves,
    /// `integer` and `long` are renamed.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" | "integer" => Some(Self::Int),
            "long" => Some(Self::BigInt),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "boolean" => Some(Self::Boolean),
            "date" => Some(Self::Date),
            "timestamp" => Some(Self::Timestamp),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }

    pub fn sql_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_name())
    }
}

/// Named `record`s are registered for later reference, anonymous `struct`s are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Record,
    Struct,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Primitive(PrimitiveType),
    /// Keys are always strings.
    Map {
        value: Box<TypeNode>,
    },
    Array {
        element: Box<TypeNode>,
    },
    Record {
        kind: RecordKind,
        name: Option<String>,
        fields: Vec<FieldNode>,
    },
    /// A two-branch union with a null branch. Nullability itself is not tracked.
    Nullable(Box<TypeNode>),
    /// A reference to a record defined earlier in the document.
    Named(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub data_type: TypeNode,
}

/// Where container types keep their child type.
///
/// The key differs between schema format versions, so each container has a fixed list
/// of candidate keys and the first one present in the node wins.
#[derive(Debug, Clone, Copy)]
pub struct ChildKeyPolicy {
    keys: &'static [&'static str],
}

impl ChildKeyPolicy {
    pub const ARRAY_ELEMENT: Self = Self {
        keys: &["items", "elementType"],
    };
    pub const MAP_VALUE: Self = Self {
        keys: &["values", "valueType"],
    };

    pub fn resolve<'a>(&self, object: &'a Map<String, Value>) -> Option<&'a Value> {
        self.keys.iter().find_map(|key| object.get(*key))
    }
}

impl TypeNode {
    /// Parses a type node.
    ///
    /// Plain strings become primitives when they name one and references otherwise;
    /// whether a reference resolves is only known during translation.
    pub fn parse(value: &Value) -> SchemaResult<Self> {
        match value {
            Value::String(name) => Ok(match PrimitiveType::from_name(name) {
                Some(primitive) => TypeNode::Primitive(primitive),
                None => TypeNode::Named(name.clone()),
            }),
            Value::Object(object) => Self::parse_object(value, object),
            Value::Array(branches) => Self::parse_union(value, branches),
            _ => Err(SchemaError::unknown(value)),
        }
    }

    fn parse_object(value: &Value, object: &Map<String, Value>) -> SchemaResult<Self> {
        let child = |policy: ChildKeyPolicy| {
            policy
                .resolve(object)
                .ok_or_else(|| SchemaError::unknown(value))
                .and_then(Self::parse)
                .map(Box::new)
        };
        match object.get("type").and_then(Value::as_str) {
            Some("map") => Ok(TypeNode::Map {
                value: child(ChildKeyPolicy::MAP_VALUE)?,
            }),
            Some("array") => Ok(TypeNode::Array {
                element: child(ChildKeyPolicy::ARRAY_ELEMENT)?,
            }),
            Some("record") => {
                let name = object
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| SchemaError::unknown(value))?;
                Ok(TypeNode::Record {
                    kind: RecordKind::Record,
                    name: Some(name.to_string()),
                    fields: parse_fields(object)?,
                })
            }
            Some("struct") => Ok(TypeNode::Record {
                kind: RecordKind::Struct,
                name: object
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                fields: parse_fields(object)?,
            }),
            _ => Err(SchemaError::unknown(value)),
        }
    }

    /// Only position 1 is checked for the null marker: `[X, "null"]` yields `X`,
    /// any other pair yields its second branch.
    fn parse_union(value: &Value, branches: &[Value]) -> SchemaResult<Self> {
        let branch = match branches {
            [only] => only,
            [first, second] => {
                if second.as_str() == Some(NULL_MARKER) {
                    first
                } else {
                    second
                }
            }
            _ => return Err(SchemaError::unknown(value)),
        };
        Ok(TypeNode::Nullable(Box::new(Self::parse(branch)?)))
    }
}

impl FieldNode {
    pub fn parse(value: &Value) -> SchemaResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid(format!("field is not an object: {value}")))?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::invalid(format!("field without a name: {value}")))?;
        let data_type = object
            .get("type")
            .ok_or_else(|| SchemaError::invalid(format!("field `{name}` has no type")))?;
        Ok(Self {
            name: name.to_string(),
            data_type: TypeNode::parse(data_type)?,
        })
    }
}

fn parse_fields(object: &Map<String, Value>) -> SchemaResult<Vec<FieldNode>> {
    object
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::invalid("record or struct without a `fields` list"))?
        .iter()
        .map(FieldNode::parse)
        .collect()
}

/// The top-level schema of a file: an ordered list of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    pub fields: Vec<FieldNode>,
}

impl SchemaDocument {
    pub fn parse(value: &Value) -> SchemaResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid("schema document is not a JSON object"))?;
        Ok(Self {
            fields: parse_fields(object)?,
        })
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

impl FromStr for SchemaDocument {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| SchemaError::invalid(e.to_string()))?;
        Self::parse(&value)
    }
}
