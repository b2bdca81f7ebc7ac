//! Property-Based Invariant Testing
//!
//! Invariants that must hold for any method signature:
//! - Receiver injection happens exactly once, however often it is applied
//! - `arglist` renders one entry per parameter
//! - `arglist_drop_first` equals `arglist` over everything but the receiver
//! - Forwarding and routing only ever rewrite the first name

use facetgen::format::{CxxSignatureFormatter, SignatureFormatter};
use facetgen::idl::{MethodKind, Param, Qualifiers};
use facetgen::normalize::with_receiver;
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("receiver name is reserved", |s| s != "data")
}

fn cxx_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("int".to_string()),
        Just("double".to_string()),
        Just("const std::string &".to_string()),
        Just("std::size_t".to_string()),
        "[A-Z][A-Za-z]{0,6}".prop_map(|s| format!("{s} *")),
    ]
}

fn declared_params() -> impl Strategy<Value = Vec<Param>> {
    prop::collection::vec((cxx_type(), identifier()), 0..6)
        .prop_map(|pairs| pairs.into_iter().map(|(ty, name)| Param::new(ty, name)).collect())
}

fn method_kind() -> impl Strategy<Value = MethodKind> {
    prop_oneof![Just(MethodKind::Const), Just(MethodKind::NonConst)]
}

fn split_count(rendered: &str) -> usize {
    if rendered.is_empty() {
        0
    } else {
        rendered.split(", ").count()
    }
}

proptest! {
    #[test]
    fn receiver_injection_is_idempotent(params in declared_params(), kind in method_kind()) {
        let once = with_receiver(&params, kind);
        let twice = with_receiver(&once, kind);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.len(), params.len() + 1);
        prop_assert!(once[0].is_receiver(kind));
        prop_assert_eq!(&once[1..], &params[..]);
    }

    #[test]
    fn arglist_has_one_entry_per_param(params in declared_params(), kind in method_kind()) {
        let f = CxxSignatureFormatter::default();
        let full = with_receiver(&params, kind);
        // types here never contain ", " so a plain split counts entries
        prop_assert_eq!(split_count(&f.arglist(&full, true)), full.len());
        prop_assert_eq!(split_count(&f.arglist(&full, false)), full.len());
    }

    #[test]
    fn drop_first_matches_tail(params in declared_params(), kind in method_kind(), with_names in any::<bool>()) {
        let f = CxxSignatureFormatter::default();
        let full = with_receiver(&params, kind);
        prop_assert_eq!(f.arglist_drop_first(&full, with_names), f.arglist(&full[1..], with_names));
    }

    #[test]
    fn forward_and_route_only_touch_receiver(params in declared_params(), kind in method_kind()) {
        let f = CxxSignatureFormatter::default();
        let full = with_receiver(&params, kind);

        let forwarded = f.argnames_forward(&full, true);
        let routed = f.argnames_route(&full);
        let plain = f.argnames_forward(&full, false);

        let tail: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        let expect = |head: &str| {
            std::iter::once(head).chain(tail.iter().copied()).collect::<Vec<_>>().join(", ")
        };
        prop_assert_eq!(forwarded, expect("_dcast(data)"));
        prop_assert_eq!(routed, expect("O::data()"));
        prop_assert_eq!(plain, expect("data"));
    }

    #[test]
    fn qualifiers_ignore_params(is_const in any::<bool>(), noexcept in any::<bool>()) {
        let f = CxxSignatureFormatter::default();
        let rendered = f.qualifiers(&Qualifiers { is_const, noexcept });
        prop_assert_eq!(rendered.contains("const"), is_const);
        prop_assert_eq!(rendered.contains("noexcept"), noexcept);
        prop_assert!(!rendered.starts_with(' ') && !rendered.ends_with(' '));
    }
}
