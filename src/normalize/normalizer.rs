//! Signature Normalizer
//!
//! Turns a loaded [`FacetSchema`] into a [`NormalizedFacet`]: documentation
//! blocks joined, the implicit receiver prepended to every method, derived
//! names computed. This is a pure construction; the loaded schema is never
//! modified, so normalizing twice cannot inject the receiver twice.

use super::names::DerivedNames;
use crate::idl::schema::{FacetSchema, MethodDecl, MethodKind, Namespaces, Param, Qualifiers};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedMethod {
    pub name: String,
    pub return_type: String,
    pub kind: MethodKind,
    pub qualifiers: Qualifiers,
    /// Receiver first, then the declared parameters
    pub params: Vec<Param>,
    pub doc: String,
}

impl NormalizedMethod {
    /// Declared parameters, i.e. everything after the receiver
    pub fn visible_params(&self) -> &[Param] {
        self.params.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedType {
    pub name: String,
    pub definition: String,
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRepr {
    pub name: String,
    pub impl_name: String,
    pub header: String,
    /// `#include` operand, already quoted or bracketed
    pub include: Option<String>,
}

/// Read-only render input shared by every artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedFacet {
    pub names: DerivedNames,
    pub namespaces: Namespaces,
    pub brief: String,
    pub doc: String,
    /// `#include` operands, already quoted or bracketed
    pub includes: Vec<String>,
    pub embed_doc_markup: bool,
    pub types: Vec<NormalizedType>,
    pub const_methods: Vec<NormalizedMethod>,
    pub nonconst_methods: Vec<NormalizedMethod>,
    pub reprs: Vec<NormalizedRepr>,
}

impl NormalizedFacet {
    pub fn methods(&self) -> impl Iterator<Item = &NormalizedMethod> {
        self.const_methods.iter().chain(self.nonconst_methods.iter())
    }
}

/// Normalize a loaded schema.
pub fn normalize(schema: &FacetSchema) -> NormalizedFacet {
    let names = DerivedNames::new(&schema.facet);

    let reprs = schema
        .reprs
        .iter()
        .map(|repr| NormalizedRepr {
            name: repr.name.clone(),
            impl_name: names.repr_impl_name(&repr.name),
            header: names.repr_header(&repr.name),
            include: repr.include.as_deref().map(include_operand),
        })
        .collect();

    let normalized = NormalizedFacet {
        namespaces: schema.namespaces.clone(),
        brief: schema.brief.clone(),
        doc: schema.doc.join(),
        includes: schema.includes.iter().map(|inc| include_operand(inc)).collect(),
        embed_doc_markup: schema.embed_doc_markup,
        types: schema
            .types
            .iter()
            .map(|ty| NormalizedType {
                name: ty.name.clone(),
                definition: ty.definition.clone(),
                doc: ty.doc.join(),
            })
            .collect(),
        const_methods: schema.const_methods.iter().map(normalize_method).collect(),
        nonconst_methods: schema.nonconst_methods.iter().map(normalize_method).collect(),
        reprs,
        names,
    };

    tracing::debug!(
        facet = %normalized.names.facet,
        methods = normalized.methods().count(),
        "normalized facet schema"
    );
    normalized
}

pub fn normalize_method(method: &MethodDecl) -> NormalizedMethod {
    NormalizedMethod {
        name: method.name.clone(),
        return_type: method.return_type.clone(),
        kind: method.kind,
        qualifiers: method.qualifiers,
        params: with_receiver(&method.params, method.kind),
        doc: method.doc.join(),
    }
}

/// Parameter list with the receiver for `kind` in first position.
///
/// Returns the list unchanged (copied) when it already starts with that receiver.
pub fn with_receiver(params: &[Param], kind: MethodKind) -> Vec<Param> {
    if params.first().is_some_and(|p| p.is_receiver(kind)) {
        return params.to_vec();
    }
    let mut out = Vec::with_capacity(params.len() + 1);
    out.push(Param::receiver(kind));
    out.extend_from_slice(params);
    out
}

/// `<foo.hpp>` and `"foo.hpp"` pass through, anything else gets quoted.
fn include_operand(include: &str) -> String {
    let include = include.trim();
    let bracketed = include.starts_with('<') && include.ends_with('>');
    let quoted = include.len() >= 2 && include.starts_with('"') && include.ends_with('"');
    if bracketed || quoted {
        include.to_string()
    } else {
        format!("\"{include}\"")
    }
}
