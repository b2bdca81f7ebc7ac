//! Facet IDL: typed model and loader.

pub mod loader;
pub mod schema;

pub use loader::{IdlFormat, is_identifier, load_schema, parse_document, read_document, schema_from_value};
pub use schema::{
    DocBlock, FacetSchema, MethodDecl, MethodKind, Namespaces, Param, Qualifiers, ReprDecl,
    TypeDecl,
};
