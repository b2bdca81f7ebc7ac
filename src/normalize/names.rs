use serde::Serialize;

/// Identifiers and filenames derived from the facet name.
///
/// Computed once per run and threaded through every template context, so
/// no artifact ever derives a name on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedNames {
    /// Facet name as declared, e.g. `Sequence`
    pub facet: String,
    /// Lower-cased facet name, for identifiers that must not collide with types
    pub lower_name: String,
    /// Abstract interface, `ASequence`
    pub abstract_name: String,
    /// Dispatch interface, `ISequence`
    pub interface_name: String,
    /// Implementation type associated with the dispatch interface, `ISequence_Impl`
    pub impl_name: String,
    /// Type-erased adapter, `ISequence_Any`
    pub any_name: String,
    /// Transfer wrapper, `ISequence_Xfer`
    pub xfer_name: String,
    /// Router, `RSequence`
    pub router_name: String,
    pub abstract_header: String,
    pub any_header: String,
    pub any_body: String,
    pub xfer_header: String,
    pub xfer_body: String,
    pub router_header: String,
}

impl DerivedNames {
    pub fn new(facet: &str) -> Self {
        let interface_name = format!("I{facet}");
        let abstract_name = format!("A{facet}");
        let any_name = format!("{interface_name}_Any");
        let xfer_name = format!("{interface_name}_Xfer");
        let router_name = format!("R{facet}");

        Self {
            facet: facet.to_string(),
            lower_name: facet.to_lowercase(),
            abstract_header: format!("{abstract_name}.hpp"),
            any_header: format!("{any_name}.hpp"),
            any_body: format!("{any_name}.cpp"),
            xfer_header: format!("{xfer_name}.hpp"),
            xfer_body: format!("{xfer_name}.cpp"),
            router_header: format!("{router_name}.hpp"),
            impl_name: format!("{interface_name}_Impl"),
            abstract_name,
            interface_name,
            any_name,
            xfer_name,
            router_name,
        }
    }

    /// Class implementing the facet for representation `repr`, `ISequence_DList`
    pub fn repr_impl_name(&self, repr: &str) -> String {
        format!("{}_{}", self.interface_name, repr)
    }

    pub fn repr_header(&self, repr: &str) -> String {
        format!("{}.hpp", self.repr_impl_name(repr))
    }
}
