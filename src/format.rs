//! Signature Formatter
//!
//! Stateless rendering of qualifiers and parameter lists. Templates reach
//! these through the renderer, which only knows the [`SignatureFormatter`]
//! trait; swapping the template engine never touches this module.
//!
//! Every operation treats the first parameter as the receiver slot.

use crate::idl::schema::{Param, Qualifiers};

/// The formatting operations available to templates.
pub trait SignatureFormatter: Send + Sync {
    /// `const`, `noexcept`, both (in that order) or empty.
    fn qualifiers(&self, qualifiers: &Qualifiers) -> String;

    /// `type name, type name` or `type, type`. Empty for no parameters.
    fn arglist(&self, params: &[Param], with_names: bool) -> String;

    /// [`SignatureFormatter::arglist`] without the receiver.
    fn arglist_drop_first(&self, params: &[Param], with_names: bool) -> String {
        self.arglist(params.get(1..).unwrap_or(&[]), with_names)
    }

    /// Parameter names for forwarding a call; with `cast_receiver` the
    /// receiver is wrapped in a downcast back to the concrete type.
    fn argnames_forward(&self, params: &[Param], cast_receiver: bool) -> String;

    /// Parameter names for a router call; the receiver is replaced by the
    /// dispatch context's data accessor.
    fn argnames_route(&self, params: &[Param]) -> String;
}

/// C++ rendering used by the built-in templates.
#[derive(Debug, Clone)]
pub struct CxxSignatureFormatter {
    /// Downcast helper applied to the receiver when forwarding
    pub cast_fn: String,
    /// Expression replacing the receiver in router calls
    pub route_accessor: String,
    /// No-throw marker
    pub nothrow_marker: String,
}

impl Default for CxxSignatureFormatter {
    fn default() -> Self {
        Self {
            cast_fn: "_dcast".to_string(),
            route_accessor: "O::data()".to_string(),
            nothrow_marker: "noexcept".to_string(),
        }
    }
}

impl SignatureFormatter for CxxSignatureFormatter {
    fn qualifiers(&self, qualifiers: &Qualifiers) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2);
        if qualifiers.is_const {
            parts.push("const");
        }
        if qualifiers.noexcept {
            parts.push(&self.nothrow_marker);
        }
        parts.join(" ")
    }

    fn arglist(&self, params: &[Param], with_names: bool) -> String {
        params
            .iter()
            .map(|p| {
                if with_names {
                    format!("{} {}", p.ty, p.name)
                } else {
                    p.ty.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn argnames_forward(&self, params: &[Param], cast_receiver: bool) -> String {
        params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 && cast_receiver {
                    format!("{}({})", self.cast_fn, p.name)
                } else {
                    p.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn argnames_route(&self, params: &[Param]) -> String {
        params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 {
                    self.route_accessor.clone()
                } else {
                    p.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
