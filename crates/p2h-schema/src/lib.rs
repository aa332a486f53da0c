pub mod error;
pub mod footer;
pub mod node;
pub mod translate;

pub use footer::{read_schema, read_schema_at, read_schema_from_reader};
pub use node::{FieldNode, PrimitiveType, RecordKind, SchemaDocument, TypeNode};
pub use translate::{translate_schema, ColumnDeclaration, TranslationContext};
