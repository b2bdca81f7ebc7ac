//! Schema Loader
//!
//! Reads an IDL source, parses it into a generic value tree (format chosen
//! by extension), then converts that tree into a [`FacetSchema`] in a single
//! eager validation pass. Every missing or malformed field is reported with
//! its location path, so nothing downstream ever discovers a schema problem
//! late.

use crate::error::{GenerateError, LoadError, SchemaError};
use crate::idl::schema::{
    DocBlock, FacetSchema, MethodDecl, MethodKind, Namespaces, Param, Qualifiers, RECEIVER_NAME,
    ReprDecl, TypeDecl,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"));

/// Suffixes the generator itself appends to `I{F}_`
const RESERVED_REPR_NAMES: &[&str] = &["Any", "Xfer", "Impl"];

/// Returns true iff `s` is a valid C-family identifier
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

// =============================================================================
// Source formats
// =============================================================================

/// Encoding of an IDL source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdlFormat {
    Json5,
    Json,
    Yaml,
    Toml,
}

impl IdlFormat {
    /// Pick the format from the file extension; unknown extensions are json5.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|os| os.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => IdlFormat::Json,
            "yaml" | "yml" => IdlFormat::Yaml,
            "toml" => IdlFormat::Toml,
            _ => IdlFormat::Json5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IdlFormat::Json5 => "json5",
            IdlFormat::Json => "json",
            IdlFormat::Yaml => "yaml",
            IdlFormat::Toml => "toml",
        }
    }

    fn parse(self, text: &str) -> Result<Value, String> {
        match self {
            IdlFormat::Json5 => json5::from_str(text).map_err(|e| e.to_string()),
            IdlFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            IdlFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            IdlFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Read and validate the IDL source at `path`.
pub fn load_schema(path: &Path) -> Result<FacetSchema, GenerateError> {
    let document = read_document(path)?;
    let schema = schema_from_value(&document)?;
    tracing::debug!(
        facet = %schema.facet,
        const_methods = schema.const_methods.len(),
        nonconst_methods = schema.nonconst_methods.len(),
        "loaded facet schema"
    );
    Ok(schema)
}

/// Read `path` and parse it into a generic value tree. No validation.
pub fn read_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text, IdlFormat::from_path(path), path)
}

/// Parse IDL text. `origin` is only used for diagnostics.
pub fn parse_document(text: &str, format: IdlFormat, origin: &Path) -> Result<Value, LoadError> {
    let value = format.parse(text).map_err(|message| LoadError::Syntax {
        path: origin.to_path_buf(),
        format: format.label(),
        message,
    })?;
    if !value.is_object() {
        return Err(LoadError::Syntax {
            path: origin.to_path_buf(),
            format: format.label(),
            message: "top-level value must be a mapping".to_string(),
        });
    }
    Ok(value)
}

/// Convert a parsed document into a validated schema.
pub fn schema_from_value(document: &Value) -> Result<FacetSchema, SchemaError> {
    let root = Node::root(document)?;

    let facet = root.require("facet")?.identifier()?;
    let namespaces = Namespaces {
        outer: root.require("namespace1")?.identifier()?,
        inner: root.require("namespace2")?.identifier()?,
    };
    let brief = root.require("brief")?.string()?;
    let doc = root.optional_doc("doc")?;
    let includes = match root.field("includes") {
        Some(node) => node.string_list()?,
        None => Vec::new(),
    };
    let embed_doc_markup = match root.field("using_doxygen") {
        Some(node) => node.boolean()?,
        None => false,
    };

    let types = match root.field("types") {
        Some(node) => node
            .items()?
            .iter()
            .map(type_decl)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let const_methods = method_list(&root, MethodKind::Const)?;
    let nonconst_methods = method_list(&root, MethodKind::NonConst)?;

    let reprs = match root.field("reprs") {
        Some(node) => repr_list(&node)?,
        None => Vec::new(),
    };

    Ok(FacetSchema {
        facet,
        namespaces,
        brief,
        doc,
        includes,
        embed_doc_markup,
        types,
        const_methods,
        nonconst_methods,
        reprs,
    })
}

fn method_list(root: &Node<'_>, kind: MethodKind) -> Result<Vec<MethodDecl>, SchemaError> {
    root.require(kind.list_key())?
        .items()?
        .iter()
        .map(|node| method_decl(node, kind))
        .collect()
}

fn method_decl(node: &Node<'_>, kind: MethodKind) -> Result<MethodDecl, SchemaError> {
    let name = node.require("name")?.identifier()?;
    let return_type = node.require("return")?.string()?;
    let is_const = match node.field("const") {
        Some(flag) => flag.boolean()?,
        None => kind == MethodKind::Const,
    };
    let noexcept = match node.field("noexcept") {
        Some(flag) => flag.boolean()?,
        None => false,
    };
    let params = match node.field("args") {
        Some(args) => args
            .items()?
            .iter()
            .map(param)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let doc = node.optional_doc("doc")?;

    Ok(MethodDecl {
        name,
        return_type,
        kind,
        qualifiers: Qualifiers { is_const, noexcept },
        params,
        doc,
    })
}

fn param(node: &Node<'_>) -> Result<Param, SchemaError> {
    let ty = node.require("type")?.string()?;
    let name_node = node.require("name")?;
    let name = name_node.identifier()?;
    if name == RECEIVER_NAME {
        return Err(SchemaError::ReservedParameter {
            field: name_node.path,
        });
    }
    Ok(Param { ty, name })
}

fn type_decl(node: &Node<'_>) -> Result<TypeDecl, SchemaError> {
    Ok(TypeDecl {
        name: node.require("name")?.identifier()?,
        definition: node.require("definition")?.string()?,
        doc: node.optional_doc("doc")?,
    })
}

/// Representation names share the `I{F}_*` namespace with the generated
/// adapter, transfer and implementation names, and with each other.
fn repr_list(node: &Node<'_>) -> Result<Vec<ReprDecl>, SchemaError> {
    let mut reprs: Vec<ReprDecl> = Vec::new();
    for item in node.items()? {
        let repr = repr_decl(&item)?;
        let field = item.child_path("name");
        if RESERVED_REPR_NAMES.contains(&repr.name.as_str()) {
            return Err(SchemaError::ReservedName {
                field,
                value: repr.name,
            });
        }
        if reprs.iter().any(|seen| seen.name == repr.name) {
            return Err(SchemaError::DuplicateName {
                field,
                value: repr.name,
            });
        }
        reprs.push(repr);
    }
    Ok(reprs)
}

fn repr_decl(node: &Node<'_>) -> Result<ReprDecl, SchemaError> {
    Ok(ReprDecl {
        name: node.require("name")?.identifier()?,
        include: match node.field("include") {
            Some(include) => Some(include.string()?),
            None => None,
        },
    })
}

// =============================================================================
// Value cursor
// =============================================================================

/// A value plus its location path, for precise diagnostics.
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Result<Self, SchemaError> {
        if !value.is_object() {
            return Err(SchemaError::Malformed {
                field: "<document>".to_string(),
                reason: "expected a mapping".to_string(),
            });
        }
        Ok(Self {
            value,
            path: String::new(),
        })
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn object(&self) -> Result<&'a Map<String, Value>, SchemaError> {
        self.value.as_object().ok_or_else(|| self.malformed("expected a mapping"))
    }

    /// Child under `key`; absent and explicit null are both `None`.
    fn field(&self, key: &str) -> Option<Node<'a>> {
        let value = self.value.as_object()?.get(key)?;
        if value.is_null() {
            return None;
        }
        Some(Node {
            value,
            path: self.child_path(key),
        })
    }

    fn require(&self, key: &str) -> Result<Node<'a>, SchemaError> {
        self.object()?;
        self.field(key).ok_or_else(|| SchemaError::MissingField {
            field: self.child_path(key),
        })
    }

    fn string(&self) -> Result<String, SchemaError> {
        self.value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.malformed("expected a string"))
    }

    fn identifier(&self) -> Result<String, SchemaError> {
        let s = self.string()?;
        if !is_identifier(&s) {
            return Err(SchemaError::InvalidIdentifier {
                field: self.path.clone(),
                value: s,
            });
        }
        Ok(s)
    }

    fn boolean(&self) -> Result<bool, SchemaError> {
        self.value
            .as_bool()
            .ok_or_else(|| self.malformed("expected a boolean"))
    }

    fn items(&self) -> Result<Vec<Node<'a>>, SchemaError> {
        let array = self
            .value
            .as_array()
            .ok_or_else(|| self.malformed("expected a list"))?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: format!("{}[{}]", self.path, i),
            })
            .collect())
    }

    fn string_list(&self) -> Result<Vec<String>, SchemaError> {
        self.items()?.iter().map(Node::string).collect()
    }

    /// Documentation is a list of lines, or a single (possibly multi-line) string.
    fn optional_doc(&self, key: &str) -> Result<DocBlock, SchemaError> {
        let Some(node) = self.field(key) else {
            return Ok(DocBlock::default());
        };
        if let Some(text) = node.value.as_str() {
            return Ok(DocBlock(text.lines().map(str::to_string).collect()));
        }
        Ok(DocBlock(node.string_list()?))
    }

    fn malformed(&self, reason: &str) -> SchemaError {
        SchemaError::Malformed {
            field: if self.path.is_empty() {
                "<document>".to_string()
            } else {
                self.path.clone()
            },
            reason: reason.to_string(),
        }
    }
}
