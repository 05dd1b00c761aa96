//! Read-only queries over a populated graph.
//!
//! [`QueryEngine`] flattens individuals into [`Record`]s: data properties
//! become value lists, object properties become label chains, individuals
//! that name this one as their affiliation are listed under `affiliated`,
//! and description texts are listed by priority.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use precis_ontology::SchemaProvider;
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::config::Vocabulary;
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::namespace::Namespace;
use crate::record::{Record, ID_KEY};
use crate::store::{Direction, GraphStore, OrderSpec};

/// Record key listing back-referencing individuals.
pub const AFFILIATED_KEY: &str = "affiliated";

/// Ordering of query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Oldest first; undated individuals last.
    ChronologicalAscending,
    /// Newest first; undated individuals last.
    ChronologicalDescending,
    /// A to Z by name, ignoring case; unnamed individuals dropped.
    AlphabeticalAscending,
    /// Z to A by name, ignoring case; unnamed individuals dropped.
    AlphabeticalDescending,
}

impl Order {
    /// Canonical keywords, in the order of the variants.
    pub const KEYWORDS: [&'static str; 4] = [
        "chronological-ascending",
        "chronological-descending",
        "alphabetical-ascending",
        "alphabetical-descending",
    ];

    /// Canonical keyword of this order.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::ChronologicalAscending => Self::KEYWORDS[0],
            Self::ChronologicalDescending => Self::KEYWORDS[1],
            Self::AlphabeticalAscending => Self::KEYWORDS[2],
            Self::AlphabeticalDescending => Self::KEYWORDS[3],
        }
    }

    /// Storage-level ordering for this order under `vocabulary`.
    #[must_use]
    pub fn spec(self, vocabulary: &Vocabulary) -> OrderSpec {
        match self {
            Self::ChronologicalAscending => {
                OrderSpec::chronological(&vocabulary.date_property, Direction::Ascending)
            }
            Self::ChronologicalDescending => {
                OrderSpec::chronological(&vocabulary.date_property, Direction::Descending)
            }
            Self::AlphabeticalAscending => {
                OrderSpec::alphabetical(&vocabulary.name_property, Direction::Ascending)
            }
            Self::AlphabeticalDescending => {
                OrderSpec::alphabetical(&vocabulary.name_property, Direction::Descending)
            }
        }
    }
}

impl FromStr for Order {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chronological-ascending" | "chron_A" => Ok(Self::ChronologicalAscending),
            "chronological-descending" | "chron_D" => Ok(Self::ChronologicalDescending),
            "alphabetical-ascending" | "alphabetical_A" => Ok(Self::AlphabeticalAscending),
            "alphabetical-descending" | "alphabetical_D" => Ok(Self::AlphabeticalDescending),
            other => Err(Error::OrderValue {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Flattening queries over one namespace of a graph.
#[derive(Clone, Copy)]
pub struct QueryEngine<'g> {
    store: &'g dyn GraphStore,
    schema: &'g dyn SchemaProvider,
    vocabulary: &'g Vocabulary,
    namespace: &'g Namespace,
}

impl<'g> QueryEngine<'g> {
    /// Creates an engine over a populated store.
    #[must_use]
    pub fn new(
        store: &'g dyn GraphStore,
        schema: &'g dyn SchemaProvider,
        vocabulary: &'g Vocabulary,
        namespace: &'g Namespace,
    ) -> Self {
        Self {
            store,
            schema,
            vocabulary,
            namespace,
        }
    }

    /// The queried store.
    #[must_use]
    pub fn store(&self) -> &'g dyn GraphStore {
        self.store
    }

    /// The schema queries are validated against.
    #[must_use]
    pub fn schema(&self) -> &'g dyn SchemaProvider {
        self.schema
    }

    /// Designated names.
    #[must_use]
    pub fn vocabulary(&self) -> &'g Vocabulary {
        self.vocabulary
    }

    /// Namespace bare ids are resolved in.
    #[must_use]
    pub fn namespace(&self) -> &'g Namespace {
        self.namespace
    }

    /// Flattens every individual of `class` in the engine's namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownQueryClass`] if `class` is not in the schema.
    pub fn get_all_of_type(&self, class: &str, order: Option<Order>) -> Result<Vec<Record>> {
        let found = self.individuals_of_type(class, order)?;
        debug!(class, order = ?order, count = found.len(), "queried class");
        Ok(found.into_iter().map(|ind| self.get_individual(ind)).collect())
    }

    /// Flattens every class except the description class.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`QueryEngine::get_all_of_type`].
    pub fn get_all(&self, order: Option<Order>) -> Result<BTreeMap<String, Vec<Record>>> {
        self.schema
            .class_names()
            .iter()
            .filter(|class| **class != self.vocabulary.description_class)
            .map(|class| Ok((class.clone(), self.get_all_of_type(class, order)?)))
            .collect()
    }

    /// Flattens one individual.
    #[must_use]
    pub fn get_individual(&self, individual: &Individual) -> Record {
        let vocab = self.vocabulary;
        let mut record = Record::new(&individual.id);

        for (property, value) in &individual.properties {
            if self.schema.is_data_property(property) {
                for v in value.values() {
                    record.push(property, v.to_json());
                }
            }
        }

        for (property, value) in &individual.properties {
            if *property == vocab.description_property
                || !self.schema.is_object_property(property)
            {
                continue;
            }
            for target in value.values().iter().filter_map(|v| v.as_iri()) {
                if let Some(target) = self.store.find_by_id(target) {
                    record.push(property, Json::from(self.label_chain(target)));
                }
            }
        }

        for relation in &vocab.affiliation_properties {
            for other in self.store.find_back_references(&individual.iri, relation) {
                let mut entry = Map::new();
                entry.insert("type".to_owned(), Json::from(other.class.as_str()));
                entry.insert(vocab.name_property.clone(), Json::from(self.display_name(other)));
                entry.insert(ID_KEY.to_owned(), Json::from(other.id.as_str()));
                record.push(AFFILIATED_KEY, Json::Object(entry));
            }
        }

        let mut descriptions: Vec<(i64, &str)> = individual
            .values(&vocab.description_property)
            .iter()
            .filter_map(|v| v.as_iri())
            .filter_map(|iri| self.store.find_by_id(iri))
            .filter_map(|d| {
                let priority = d
                    .values(&vocab.priority_property)
                    .iter()
                    .find_map(|v| v.as_int())
                    .unwrap_or(0);
                d.first_str(&vocab.text_property).map(|text| (priority, text))
            })
            .collect();
        descriptions.sort_by_key(|(priority, _)| *priority);
        for (_, text) in descriptions {
            record.push(&vocab.description_property, Json::from(text));
        }

        debug!(
            id = %individual.id,
            fields = record.keys().count(),
            "flattened individual"
        );
        record
    }

    /// Looks up an individual by bare id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&'g Individual> {
        self.store.find_by_id(&self.namespace.qualify(id))
    }

    /// Bare ids of every individual of `class` in the engine's namespace, in
    /// insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownQueryClass`] if `class` is not in the schema.
    pub fn ids_of_type(&self, class: &str) -> Result<Vec<String>> {
        Ok(self
            .individuals_of_type(class, None)?
            .into_iter()
            .map(|ind| ind.id.clone())
            .collect())
    }

    /// First name value, falling back to the bare id.
    #[must_use]
    pub fn display_name(&self, individual: &Individual) -> String {
        individual
            .first_str(&self.vocabulary.name_property)
            .unwrap_or(&individual.id)
            .to_owned()
    }

    fn individuals_of_type(&self, class: &str, order: Option<Order>) -> Result<Vec<&'g Individual>> {
        if !self.schema.is_known_class(class) {
            return Err(Error::UnknownQueryClass {
                class: class.to_owned(),
            });
        }
        let spec = order.map(|o| o.spec(self.vocabulary));
        let mut found = self.store.query_by_type(class, spec.as_ref());
        found.retain(|ind| self.namespace.local_name(&ind.iri) == Some(ind.id.as_str()));
        Ok(found)
    }

    /// `[target, affiliation?, parent of affiliation?]`.
    fn label_chain(&self, target: &Individual) -> Vec<String> {
        let vocab = self.vocabulary;
        let mut chain = vec![self.display_name(target)];
        let affiliation = vocab
            .affiliation_properties
            .iter()
            .flat_map(|relation| target.values(relation))
            .find_map(|v| v.as_iri())
            .and_then(|iri| self.store.find_by_id(iri));
        if let Some(affiliation) = affiliation {
            chain.push(self.display_name(affiliation));
            let parent = affiliation
                .values(&vocab.parent_property)
                .iter()
                .find_map(|v| v.as_iri())
                .and_then(|iri| self.store.find_by_id(iri));
            if let Some(parent) = parent {
                chain.push(self.display_name(parent));
            }
        }
        chain
    }
}
