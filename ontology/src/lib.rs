//! Precis résumé ontology encoded as typed Rust data.
//!
//! The `precis-ontology` crate provides the vocabulary used to describe a
//! résumé (organizations, work experience, degrees, courses, projects,
//! publications, accolades, skills and prioritized descriptions) as static
//! Rust data structures, along with the [`SchemaProvider`] lookups the
//! ingestion and query engine relies on.
//!
//! # Entry Point
//!
//! ```
//! use precis_ontology::{Ontology, Schema, SchemaProvider};
//!
//! let ontology = Ontology::full();
//! assert_eq!(ontology.modules.len(), 4);
//!
//! let schema = Schema::precis();
//! assert!(schema.is_functional("employedAt", "WorkExperience"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;
pub mod namespaces;
pub mod schema;

pub use model::{iris, Class, Module, Ontology, Property, PropertyKind};
pub use schema::{Schema, SchemaBuilder, SchemaProvider};

impl Ontology {
    /// Returns the complete Precis ontology with all modules.
    ///
    /// Assembly order follows the dependency graph:
    /// `common → career → education → skills`
    #[must_use]
    pub fn full() -> &'static Ontology {
        static ONTOLOGY: std::sync::OnceLock<Ontology> = std::sync::OnceLock::new();
        ONTOLOGY.get_or_init(|| Ontology {
            version: "1.0.0",
            base_iri: iris::PRECIS,
            modules: vec![
                namespaces::common::module(),
                namespaces::career::module(),
                namespaces::education::module(),
                namespaces::skills::module(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_count() {
        assert_eq!(Ontology::full().modules.len(), 4);
    }

    #[test]
    fn class_count() {
        // Organization, Description, WorkExperience, Project, Publication,
        // Accolade, Degree, Course, KnowledgeArea, Skill, SkillGroup.
        assert_eq!(Ontology::full().class_count(), 11);
    }

    #[test]
    fn all_class_ids_unique() {
        let mut ids = std::collections::HashSet::new();
        for class in Ontology::full().classes() {
            assert!(ids.insert(class.id), "Duplicate class id: {}", class.id);
        }
    }

    #[test]
    fn all_property_ids_unique() {
        let mut ids = std::collections::HashSet::new();
        for prop in Ontology::full().properties() {
            assert!(ids.insert(prop.id), "Duplicate property id: {}", prop.id);
        }
    }

    #[test]
    fn restrictions_name_declared_properties() {
        let ontology = Ontology::full();
        for class in ontology.classes() {
            for property in class.at_most_one {
                assert!(
                    ontology.find_property(property).is_some(),
                    "{} restricts undeclared property {}",
                    class.id,
                    property
                );
            }
        }
    }

    #[test]
    fn object_property_ranges_are_classes() {
        let ontology = Ontology::full();
        for prop in ontology.properties() {
            if prop.kind == PropertyKind::Object && prop.range != iris::OWL_THING {
                assert!(
                    ontology.find_class(prop.range).is_some(),
                    "{} has unknown range {}",
                    prop.id,
                    prop.range
                );
            }
        }
    }

    #[test]
    fn iri_joins_base_and_local_name() {
        assert_eq!(
            Ontology::full().iri("hasName"),
            "https://precis.dev/ontology#hasName"
        );
    }
}
