//! Built-in template set, embedded at compile time.

pub const ABSTRACT_FACET_HPP: &str = "abstract_facet.hpp.tera";
pub const FACET_ANY_HPP: &str = "facet_any.hpp.tera";
pub const FACET_ANY_CPP: &str = "facet_any.cpp.tera";
pub const FACET_XFER_HPP: &str = "facet_xfer.hpp.tera";
pub const FACET_XFER_CPP: &str = "facet_xfer.cpp.tera";
pub const FACET_ROUTER_HPP: &str = "facet_router.hpp.tera";
pub const FACET_REPR_HPP: &str = "facet_repr.hpp.tera";

/// (template identifier, source) for every built-in template
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        ABSTRACT_FACET_HPP,
        include_str!("../../templates/abstract_facet.hpp.tera"),
    ),
    (FACET_ANY_HPP, include_str!("../../templates/facet_any.hpp.tera")),
    (FACET_ANY_CPP, include_str!("../../templates/facet_any.cpp.tera")),
    (FACET_XFER_HPP, include_str!("../../templates/facet_xfer.hpp.tera")),
    (FACET_XFER_CPP, include_str!("../../templates/facet_xfer.cpp.tera")),
    (
        FACET_ROUTER_HPP,
        include_str!("../../templates/facet_router.hpp.tera"),
    ),
    (FACET_REPR_HPP, include_str!("../../templates/facet_repr.hpp.tera")),
];
