//! Precis ontology modules.
//!
//! Each sub-module encodes one area of the résumé vocabulary as Rust static
//! data. Modules are listed in dependency order; see
//! [`crate::Ontology::full`] for the assembly sequence.

pub mod common;
pub mod career;
pub mod education;
pub mod skills;
