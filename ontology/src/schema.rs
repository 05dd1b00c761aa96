//! Schema lookups consumed by ingestion and querying.
//!
//! [`SchemaProvider`] is the narrow interface the engine needs: which classes
//! exist, which names are object or data properties, and whether a property
//! is functional for a given class. [`Schema`] implements it as an explicit
//! two-key table, computed once from an [`Ontology`] or assembled by hand
//! with [`SchemaBuilder`].

use std::collections::{HashMap, HashSet};

use crate::model::{Ontology, PropertyKind};

/// Read-only schema interface.
pub trait SchemaProvider {
    /// Returns `true` if `name` is a known class.
    fn is_known_class(&self, name: &str) -> bool;

    /// Returns `true` if `property` admits at most one value on `class`.
    fn is_functional(&self, property: &str, class: &str) -> bool;

    /// All class names, in declaration order.
    fn class_names(&self) -> &[String];

    /// All object property names, in declaration order.
    fn object_property_names(&self) -> &[String];

    /// All data property names, in declaration order.
    fn data_property_names(&self) -> &[String];

    /// Returns `true` if `name` is an object property.
    fn is_object_property(&self, name: &str) -> bool {
        self.object_property_names().iter().any(|p| p == name)
    }

    /// Returns `true` if `name` is a data property.
    fn is_data_property(&self, name: &str) -> bool {
        self.data_property_names().iter().any(|p| p == name)
    }
}

/// Table-driven [`SchemaProvider`].
#[derive(Debug, Clone, Default)]
pub struct Schema {
    classes: Vec<String>,
    object_properties: Vec<String>,
    data_properties: Vec<String>,
    /// property → classes on which it is functional.
    functional: HashMap<String, HashSet<String>>,
}

impl Schema {
    /// Builds the lookup table for every (property, class) pair of `ontology`.
    #[must_use]
    pub fn from_ontology(ontology: &Ontology) -> Self {
        let mut builder = Schema::builder();
        for class in ontology.classes() {
            builder = builder.class(class.id);
        }
        for property in ontology.properties() {
            builder = match property.kind {
                PropertyKind::Object => builder.object_property(property.id),
                PropertyKind::Datatype => builder.data_property(property.id),
            };
            for class in ontology.classes() {
                if ontology.is_functional_for(property.id, class.id) {
                    builder = builder.functional(property.id, class.id);
                }
            }
        }
        builder.build()
    }

    /// Returns the schema of the built-in Precis ontology.
    #[must_use]
    pub fn precis() -> &'static Schema {
        static SCHEMA: std::sync::OnceLock<Schema> = std::sync::OnceLock::new();
        SCHEMA.get_or_init(|| Schema::from_ontology(Ontology::full()))
    }

    /// Starts an empty schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }
}

impl SchemaProvider for Schema {
    fn is_known_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    fn is_functional(&self, property: &str, class: &str) -> bool {
        self.functional
            .get(property)
            .is_some_and(|classes| classes.contains(class))
    }

    fn class_names(&self) -> &[String] {
        &self.classes
    }

    fn object_property_names(&self) -> &[String] {
        &self.object_properties
    }

    fn data_property_names(&self) -> &[String] {
        &self.data_properties
    }
}

/// Incremental constructor for [`Schema`].
///
/// ```
/// use precis_ontology::{Schema, SchemaProvider};
///
/// let schema = Schema::builder()
///     .class("Person")
///     .data_property("hasName")
///     .build();
/// assert!(!schema.is_functional("hasName", "Person"));
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declares a class.
    #[must_use]
    pub fn class(mut self, name: &str) -> Self {
        push_unique(&mut self.schema.classes, name);
        self
    }

    /// Declares an object property.
    #[must_use]
    pub fn object_property(mut self, name: &str) -> Self {
        push_unique(&mut self.schema.object_properties, name);
        self
    }

    /// Declares a data property.
    #[must_use]
    pub fn data_property(mut self, name: &str) -> Self {
        push_unique(&mut self.schema.data_properties, name);
        self
    }

    /// Marks `property` functional for `class`.
    #[must_use]
    pub fn functional(mut self, property: &str, class: &str) -> Self {
        self.schema
            .functional
            .entry(property.to_owned())
            .or_default()
            .insert(class.to_owned());
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        self.schema
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precis_schema_knows_every_class() {
        let schema = Schema::precis();
        for class in Ontology::full().classes() {
            assert!(schema.is_known_class(class.id), "missing {}", class.id);
        }
        assert!(!schema.is_known_class("Spaceship"));
    }

    #[test]
    fn globally_functional_property_is_functional_everywhere() {
        let schema = Schema::precis();
        for class in schema.class_names() {
            assert!(schema.is_functional("hasDate", class));
        }
    }

    #[test]
    fn class_restriction_makes_property_functional_only_there() {
        let schema = Schema::precis();
        assert!(schema.is_functional("hasName", "Organization"));
        assert!(!schema.is_functional("hasName", "KnowledgeArea"));
        assert!(schema.is_functional("affiliatedWith", "Degree"));
        assert!(!schema.is_functional("affiliatedWith", "Project"));
    }

    #[test]
    fn properties_are_partitioned_by_kind() {
        let schema = Schema::precis();
        assert!(schema.is_object_property("employedAt"));
        assert!(!schema.is_data_property("employedAt"));
        assert!(schema.is_data_property("hasDate"));
        assert!(!schema.is_object_property("hasDate"));
    }

    #[test]
    fn builder_ignores_duplicate_declarations() {
        let schema = Schema::builder()
            .class("A")
            .class("A")
            .object_property("p")
            .functional("p", "A")
            .build();
        assert_eq!(schema.class_names(), ["A".to_owned()]);
        assert!(schema.is_functional("p", "A"));
        assert!(!schema.is_functional("p", "B"));
    }
}
