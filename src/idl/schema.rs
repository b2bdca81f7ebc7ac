//! Typed model of a facet IDL document.
//!
//! A `FacetSchema` is built once per run by the loader, already validated,
//! and never mutated afterwards. Normalization produces a separate
//! `NormalizedFacet` (see `crate::normalize`).

use serde::{Deserialize, Serialize};

/// Receiver name injected as the first parameter of every method.
pub const RECEIVER_NAME: &str = "data";
/// Receiver type for const methods.
pub const CONST_RECEIVER_TYPE: &str = "Copaque";
/// Receiver type for non-const methods.
pub const MUT_RECEIVER_TYPE: &str = "Opaque";

/// One formal parameter. Both parts are opaque text; the generator only
/// joins and concatenates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }

    /// The implicit receiver for a method of the given kind
    pub fn receiver(kind: MethodKind) -> Self {
        Self::new(kind.receiver_type(), RECEIVER_NAME)
    }

    /// True iff this parameter is the implicit receiver for `kind`
    pub fn is_receiver(&self, kind: MethodKind) -> bool {
        self.name == RECEIVER_NAME && self.ty == kind.receiver_type()
    }
}

/// Whether a method reads or mutates the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Const,
    NonConst,
}

impl MethodKind {
    pub fn receiver_type(self) -> &'static str {
        match self {
            MethodKind::Const => CONST_RECEIVER_TYPE,
            MethodKind::NonConst => MUT_RECEIVER_TYPE,
        }
    }

    /// IDL key holding methods of this kind
    pub fn list_key(self) -> &'static str {
        match self {
            MethodKind::Const => "const_methods",
            MethodKind::NonConst => "nonconst_methods",
        }
    }
}

/// Method qualifiers, rendered in the fixed order const, noexcept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qualifiers {
    pub is_const: bool,
    pub noexcept: bool,
}

/// Multi-line documentation, one entry per source line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocBlock(pub Vec<String>);

impl DocBlock {
    /// Line separator used when collapsing a block into one string
    pub const SEPARATOR: &'static str = "\n";

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collapse into a single renderable string, preserving line order
    pub fn join(&self) -> String {
        self.0.join(Self::SEPARATOR)
    }
}

impl From<Vec<String>> for DocBlock {
    fn from(lines: Vec<String>) -> Self {
        Self(lines)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    pub outer: String,
    pub inner: String,
}

/// Auxiliary type alias exposed by the abstract interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub definition: String,
    pub doc: DocBlock,
}

/// One operation on the facet, as declared (no receiver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: String,
    pub kind: MethodKind,
    pub qualifiers: Qualifiers,
    pub params: Vec<Param>,
    pub doc: DocBlock,
}

/// A concrete representation that gets its own implementation header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReprDecl {
    pub name: String,
    pub include: Option<String>,
}

/// Root of a loaded IDL document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSchema {
    pub facet: String,
    pub namespaces: Namespaces,
    pub brief: String,
    pub doc: DocBlock,
    pub includes: Vec<String>,
    pub embed_doc_markup: bool,
    pub types: Vec<TypeDecl>,
    pub const_methods: Vec<MethodDecl>,
    pub nonconst_methods: Vec<MethodDecl>,
    pub reprs: Vec<ReprDecl>,
}

impl FacetSchema {
    /// All methods, const methods first, in declaration order
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.const_methods.iter().chain(self.nonconst_methods.iter())
    }
}
