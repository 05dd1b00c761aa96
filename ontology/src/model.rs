//! Core ontology model types.
//!
//! These types represent the Precis résumé vocabulary as typed Rust data.
//! All instances are built as owned `Vec`s of `'static` records and
//! referenced via borrows. The top-level entry point is
//! [`Ontology::full()`](crate::Ontology::full).
//!
//! Classes and properties are identified by their local name (e.g.
//! `"WorkExperience"`, `"hasName"`); the full IRI is the ontology base IRI
//! followed by that name.

/// Whether a property is a datatype or an object property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `owl:DatatypeProperty`: relates an individual to an XSD literal.
    Datatype,
    /// `owl:ObjectProperty`: relates two individuals.
    Object,
}

/// An OWL class definition.
#[derive(Debug, Clone)]
pub struct Class {
    /// Local name (e.g., `"Degree"`).
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Description.
    pub comment: &'static str,
    /// Local names of parent classes (`rdfs:subClassOf`).
    pub subclass_of: &'static [&'static str],
    /// Properties restricted to at most one value on this class
    /// (`owl:maxCardinality 1` restrictions). Inherited by subclasses.
    pub at_most_one: &'static [&'static str],
}

/// An OWL property definition.
#[derive(Debug, Clone)]
pub struct Property {
    /// Local name.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Description.
    pub comment: &'static str,
    /// Datatype or object property.
    pub kind: PropertyKind,
    /// Whether this is an `owl:FunctionalProperty` for every class.
    pub functional: bool,
    /// Local names of the domain classes; empty when unrestricted.
    pub domain: &'static [&'static str],
    /// Local name of the range class, or the full IRI of an XSD datatype.
    pub range: &'static str,
}

/// A group of related classes and properties (e.g., `career`, `education`).
#[derive(Debug, Clone)]
pub struct Module {
    /// Short module name.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Description of the module.
    pub comment: &'static str,
    /// All classes defined in this module.
    pub classes: Vec<Class>,
    /// All properties defined in this module.
    pub properties: Vec<Property>,
}

/// The complete Precis ontology.
#[derive(Debug)]
pub struct Ontology {
    /// Ontology version (e.g., `"1.0.0"`).
    pub version: &'static str,
    /// Base IRI of the ontology vocabulary.
    pub base_iri: &'static str,
    /// All modules in dependency order.
    pub modules: Vec<Module>,
}

impl Ontology {
    /// Looks up a class by its local name. Returns `None` if not found.
    #[must_use]
    pub fn find_class(&self, id: &str) -> Option<&Class> {
        self.classes().find(|c| c.id == id)
    }

    /// Looks up a property by its local name. Returns `None` if not found.
    #[must_use]
    pub fn find_property(&self, id: &str) -> Option<&Property> {
        self.properties().find(|p| p.id == id)
    }

    /// Iterates every class across all modules, in module order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.modules.iter().flat_map(|m| m.classes.iter())
    }

    /// Iterates every property across all modules, in module order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.modules.iter().flat_map(|m| m.properties.iter())
    }

    /// Returns the total number of classes across all modules.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.modules.iter().map(|m| m.classes.len()).sum()
    }

    /// Returns the total number of properties across all modules.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.modules.iter().map(|m| m.properties.len()).sum()
    }

    /// Returns the full IRI of a class or property local name.
    #[must_use]
    pub fn iri(&self, local: &str) -> String {
        format!("{}{}", self.base_iri, local)
    }

    /// Returns whether `property` admits at most one value on individuals of
    /// `class`.
    ///
    /// A property is functional for a class when it is globally functional,
    /// or when the class (or one of its ancestors) carries an at-most-one
    /// restriction on it.
    #[must_use]
    pub fn is_functional_for(&self, property: &str, class: &str) -> bool {
        if self.find_property(property).is_some_and(|p| p.functional) {
            return true;
        }
        self.restricts(class, property)
    }

    fn restricts(&self, class: &str, property: &str) -> bool {
        match self.find_class(class) {
            Some(c) => {
                c.at_most_one.iter().any(|p| *p == property)
                    || c.subclass_of.iter().any(|parent| self.restricts(parent, property))
            }
            None => false,
        }
    }
}

/// Standard IRI constants used across the ontology and its serializers.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// Precis ontology base IRI.
    pub const PRECIS: &str = "https://precis.dev/ontology#";

    // XSD datatypes
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:double`.
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:date`.
    pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    /// `xsd:anyURI`.
    pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
    /// `owl:Thing`.
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `owl:NamedIndividual`.
    pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}
