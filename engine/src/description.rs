//! Expansion of inline description entries into description individuals.
//!
//! A description value is either one map or a list of maps, each carrying a
//! text and an optional integer priority:
//!
//! ```json
//! "hasDescription": [
//!     { "hasText": "Led the migration", "hasPriority": 1 },
//!     { "text": "Mentored two interns" }
//! ]
//! ```
//!
//! Entry `i` of object `we1` becomes the individual `we1-description-i`.

use precis_ontology::SchemaProvider;
use serde_json::Value as Json;

use crate::config::Vocabulary;
use crate::error::{describe, Error, Result};
use crate::individual::{Individual, PropertyValue, Value};
use crate::namespace::Namespace;

const TEXT_ALIAS: &str = "text";
const PRIORITY_ALIAS: &str = "priority";

/// Turns description entries into individuals of the description class.
#[derive(Clone, Copy)]
pub struct DescriptionExpander<'a> {
    schema: &'a dyn SchemaProvider,
    vocabulary: &'a Vocabulary,
    namespace: &'a Namespace,
}

impl<'a> DescriptionExpander<'a> {
    /// Creates an expander.
    #[must_use]
    pub fn new(
        schema: &'a dyn SchemaProvider,
        vocabulary: &'a Vocabulary,
        namespace: &'a Namespace,
    ) -> Self {
        Self {
            schema,
            vocabulary,
            namespace,
        }
    }

    /// Builds one description individual per entry of `value`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Type`] if an entry is not a map or its priority is
    /// not an integer, and [`Error::InvalidDescription`] if an entry has no
    /// string text.
    pub fn expand(&self, parent_id: &str, value: &Json) -> Result<Vec<Individual>> {
        let entries: Vec<&Json> = match value {
            Json::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| self.expand_entry(parent_id, index, entry))
            .collect()
    }

    fn expand_entry(&self, parent_id: &str, index: usize, entry: &Json) -> Result<Individual> {
        let vocab = self.vocabulary;
        let Json::Object(map) = entry else {
            return Err(Error::Type {
                id: parent_id.to_owned(),
                property: vocab.description_property.clone(),
                expected: "a map or a list of maps",
                found: describe(entry),
            });
        };

        let text = match map
            .get(&vocab.text_property)
            .or_else(|| map.get(TEXT_ALIAS))
        {
            Some(Json::String(text)) => text.clone(),
            Some(other) => {
                return Err(Error::InvalidDescription {
                    id: parent_id.to_owned(),
                    index,
                    reason: format!("has non-string text {}", describe(other)),
                })
            }
            None => {
                return Err(Error::InvalidDescription {
                    id: parent_id.to_owned(),
                    index,
                    reason: format!("is missing \"{}\"", vocab.text_property),
                })
            }
        };

        let priority = match map
            .get(&vocab.priority_property)
            .or_else(|| map.get(PRIORITY_ALIAS))
        {
            None => 0,
            Some(raw) => raw.as_i64().ok_or_else(|| Error::Type {
                id: format!("{parent_id}-description-{index}"),
                property: vocab.priority_property.clone(),
                expected: "an integer",
                found: describe(raw),
            })?,
        };

        let id = format!("{parent_id}-description-{index}");
        let class = vocab.description_class.clone();
        let properties = vec![
            (
                vocab.priority_property.clone(),
                self.shape(&vocab.priority_property, &class, Value::Int(priority)),
            ),
            (
                vocab.text_property.clone(),
                self.shape(&vocab.text_property, &class, Value::Str(text)),
            ),
        ];
        Ok(Individual {
            iri: self.namespace.qualify(&id),
            id,
            class,
            properties,
        })
    }

    fn shape(&self, property: &str, class: &str, value: Value) -> PropertyValue {
        if self.schema.is_functional(property, class) {
            PropertyValue::Single(value)
        } else {
            PropertyValue::List(vec![value])
        }
    }
}
