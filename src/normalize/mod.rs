//! Derivations shared by every generated artifact.

pub mod names;
pub mod normalizer;

pub use names::DerivedNames;
pub use normalizer::{
    NormalizedFacet, NormalizedMethod, NormalizedRepr, NormalizedType, normalize, normalize_method,
    with_receiver,
};
