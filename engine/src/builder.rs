//! Ingestion of ordered JSON documents into the graph.
//!
//! A document is a top-level array of objects processed strictly in order.
//! Each object names its id (`$id`) and class (`$type`); its remaining keys
//! are object properties, data properties, the reserved description key, or
//! unrecognized keys, which are dropped with a warning.
//!
//! Object property values may be bare ids of individuals defined earlier in
//! the document, or inline objects, which are ingested first and then
//! referenced by id. Everything is staged in an overlay and written to the
//! store only once the whole document has been accepted.

use std::sync::LazyLock;

use chrono::NaiveDate;
use precis_ontology::SchemaProvider;
use regex::Regex;
use serde_json::{Map, Value as Json};
use tracing::{debug, error, info, warn};

use crate::config::Vocabulary;
use crate::description::DescriptionExpander;
use crate::document;
use crate::error::{describe, Error, Result};
use crate::individual::{Individual, PropertyValue, Value};
use crate::namespace::Namespace;
use crate::resolver::ReferenceResolver;
use crate::store::{GraphStore, Staging};

const ID_KEY: &str = "$id";
const TYPE_KEY: &str = "$type";

#[allow(clippy::expect_used)]
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Keys of one object that were dropped because the schema does not know them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedProperty {
    /// Id of the object carrying the keys.
    pub id: String,
    /// The dropped keys, in document order.
    pub keys: Vec<String>,
}

/// Outcome of a successful ingestion pass.
#[derive(Debug, Clone)]
pub struct Ingestion {
    /// Namespace every committed individual was qualified with.
    pub namespace: Namespace,
    /// Number of individuals written to the store, descriptions included.
    pub committed: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<UnrecognizedProperty>,
}

/// Validates and converts JSON objects into [`Individual`]s.
#[derive(Clone, Copy)]
pub struct GraphBuilder<'a> {
    schema: &'a dyn SchemaProvider,
    vocabulary: &'a Vocabulary,
}

impl<'a> GraphBuilder<'a> {
    /// Creates a builder over `schema`.
    #[must_use]
    pub fn new(schema: &'a dyn SchemaProvider, vocabulary: &'a Vocabulary) -> Self {
        Self { schema, vocabulary }
    }

    /// Parses `source` as a JSON document and ingests it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed documents and any error of
    /// [`GraphBuilder::ingest`].
    pub fn ingest_document(
        &self,
        store: &mut dyn GraphStore,
        source: &str,
        namespace: Option<&str>,
    ) -> Result<Ingestion> {
        let objects = document::parse_document(source).inspect_err(|e| error!("{e}"))?;
        self.ingest(store, &objects, namespace)
    }

    /// Ingests `objects` in order under `namespace` (generated when `None`).
    ///
    /// Nothing is written to `store` unless every object is accepted.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error encountered: an invalid namespace, a
    /// missing or unknown `$id`/`$type`, a duplicate id, an unresolved
    /// reference, a cardinality or type violation, a malformed date, or an
    /// invalid description.
    pub fn ingest(
        &self,
        store: &mut dyn GraphStore,
        objects: &[Json],
        namespace: Option<&str>,
    ) -> Result<Ingestion> {
        let namespace = Namespace::resolve(namespace).inspect_err(|e| error!("{e}"))?;
        let (staged, warnings) = {
            let mut pass = Pass {
                builder: *self,
                namespace: &namespace,
                staging: Staging::new(&*store),
                warnings: Vec::new(),
            };
            for (index, object) in objects.iter().enumerate() {
                let Json::Object(map) = object else {
                    let err = Error::Parse(format!(
                        "element {index} is {}, expected an object",
                        describe(object)
                    ));
                    error!("{err}");
                    return Err(err);
                };
                pass.ingest_object(map).inspect_err(|e| error!("{e}"))?;
            }
            (pass.staging.into_staged(), pass.warnings)
        };

        let committed = staged.len();
        for individual in staged {
            store.insert(individual)?;
        }
        info!(
            namespace = %namespace,
            committed,
            warnings = warnings.len(),
            "ingestion committed"
        );
        Ok(Ingestion {
            namespace,
            committed,
            warnings,
        })
    }
}

/// State of one ingestion pass.
struct Pass<'a, 's> {
    builder: GraphBuilder<'a>,
    namespace: &'a Namespace,
    staging: Staging<'s>,
    warnings: Vec<UnrecognizedProperty>,
}

impl Pass<'_, '_> {
    /// Stages `object` (and, first, every inline object it contains).
    /// Returns its bare id.
    fn ingest_object(&mut self, object: &Map<String, Json>) -> Result<String> {
        let schema = self.builder.schema;
        let vocab = self.builder.vocabulary;

        let id = required_key(object, ID_KEY)?;
        Namespace::check_id(&id)?;
        let class = required_key(object, TYPE_KEY)?;
        if !schema.is_known_class(&class) {
            return Err(Error::UnknownClass { class, id });
        }
        let iri = self.namespace.qualify(&id);
        if self.staging.find_by_id(&iri).is_some() {
            return Err(Error::DuplicateIdentifier { id });
        }
        debug!(id = %id, class = %class, "processing object");

        let mut object_keys = Vec::new();
        let mut data_keys = Vec::new();
        let mut description = None;
        let mut unrecognized = Vec::new();
        for (key, value) in object {
            if key == ID_KEY || key == TYPE_KEY {
                continue;
            }
            if *key == vocab.description_property {
                description = Some(value);
            } else if schema.is_object_property(key) {
                object_keys.push((key, value));
            } else if schema.is_data_property(key) {
                data_keys.push((key, value));
            } else {
                unrecognized.push(key.clone());
            }
        }

        let mut properties = Vec::with_capacity(object_keys.len() + data_keys.len() + 1);
        for (property, value) in object_keys {
            let shaped = self.object_property(&id, &class, property, value)?;
            properties.push((property.clone(), shaped));
        }
        for (property, value) in data_keys {
            let shaped = self.builder.data_property(&id, &class, property, value)?;
            properties.push((property.clone(), shaped));
        }
        if let Some(value) = description {
            let shaped = self.descriptions(&id, &class, value)?;
            properties.push((vocab.description_property.clone(), shaped));
        }

        if !unrecognized.is_empty() {
            warn!(
                id = %id,
                keys = ?unrecognized,
                "unrecognized properties ignored"
            );
            self.warnings.push(UnrecognizedProperty {
                id: id.clone(),
                keys: unrecognized,
            });
        }

        self.staging.insert(Individual {
            iri,
            id: id.clone(),
            class,
            properties,
        })?;
        debug!(id = %id, "staged individual");
        Ok(id)
    }

    fn object_property(
        &mut self,
        id: &str,
        class: &str,
        property: &str,
        value: &Json,
    ) -> Result<PropertyValue> {
        let resolver = ReferenceResolver::new(self.namespace);
        let mut targets = Vec::new();
        for element in as_list(value) {
            let bare = match element {
                Json::Object(nested) => self.ingest_object(nested)?,
                Json::String(bare) => bare.clone(),
                other => {
                    return Err(Error::Type {
                        id: id.to_owned(),
                        property: property.to_owned(),
                        expected: "an id or an inline object",
                        found: describe(other),
                    })
                }
            };
            let target = resolver.resolve(&self.staging, &bare, id)?;
            targets.push(Value::IriRef(target.iri.clone()));
        }
        self.builder.shape_references(id, class, property, targets)
    }

    fn descriptions(&mut self, id: &str, class: &str, value: &Json) -> Result<PropertyValue> {
        let vocab = self.builder.vocabulary;
        let expander = DescriptionExpander::new(self.builder.schema, vocab, self.namespace);
        let entries = expander.expand(id, value)?;
        let targets = entries
            .iter()
            .map(|entry| Value::IriRef(entry.iri.clone()))
            .collect();
        let shaped =
            self.builder
                .shape_references(id, class, &vocab.description_property, targets)?;
        for entry in entries {
            debug!(id = %entry.id, "staged description");
            self.staging.insert(entry)?;
        }
        Ok(shaped)
    }
}

impl GraphBuilder<'_> {
    /// Functional relations take exactly one target; others are always lists.
    fn shape_references(
        &self,
        id: &str,
        class: &str,
        property: &str,
        mut targets: Vec<Value>,
    ) -> Result<PropertyValue> {
        if !self.schema.is_functional(property, class) {
            return Ok(PropertyValue::List(targets));
        }
        match targets.len() {
            1 => Ok(PropertyValue::Single(targets.remove(0))),
            n => Err(Error::Cardinality {
                id: id.to_owned(),
                property: property.to_owned(),
                reason: format!("must have exactly one value, found {n}"),
            }),
        }
    }

    fn data_property(
        &self,
        id: &str,
        class: &str,
        property: &str,
        value: &Json,
    ) -> Result<PropertyValue> {
        if self.schema.is_functional(property, class) {
            if value.is_array() {
                return Err(Error::Cardinality {
                    id: id.to_owned(),
                    property: property.to_owned(),
                    reason: "must be a single value, not a list".to_owned(),
                });
            }
            return Ok(PropertyValue::Single(self.literal(id, property, value)?));
        }
        as_list(value)
            .into_iter()
            .map(|element| self.literal(id, property, element))
            .collect::<Result<Vec<_>>>()
            .map(PropertyValue::List)
    }

    fn literal(&self, id: &str, property: &str, value: &Json) -> Result<Value> {
        if self.vocabulary.is_date_like(property) {
            let Json::String(text) = value else {
                return Err(Error::Type {
                    id: id.to_owned(),
                    property: property.to_owned(),
                    expected: "a date string",
                    found: describe(value),
                });
            };
            return parse_date(text)
                .map(Value::Date)
                .ok_or_else(|| Error::DateFormat {
                    id: id.to_owned(),
                    property: property.to_owned(),
                    value: text.clone(),
                });
        }
        match value {
            Json::String(s) => Ok(Value::Str(s.clone())),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Int(i)),
                None => n.as_f64().map(Value::Float).ok_or_else(|| Error::Type {
                    id: id.to_owned(),
                    property: property.to_owned(),
                    expected: "a representable number",
                    found: n.to_string(),
                }),
            },
            other => Err(Error::Type {
                id: id.to_owned(),
                property: property.to_owned(),
                expected: "a string, number or boolean",
                found: describe(other),
            }),
        }
    }
}

/// Strict `YYYY-MM-DD` that must also name a real calendar day.
fn parse_date(text: &str) -> Option<NaiveDate> {
    if !DATE_PATTERN.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn as_list(value: &Json) -> Vec<&Json> {
    match value {
        Json::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn required_key(object: &Map<String, Json>, key: &'static str) -> Result<String> {
    match object.get(key) {
        Some(Json::String(value)) => Ok(value.clone()),
        _ => Err(Error::MissingIdentifier {
            key,
            object: describe(&Json::Object(object.clone())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use precis_ontology::Schema;
    use serde_json::json;

    const NS: &str = "https://example.org/cv/";

    fn ingest(store: &mut MemoryStore, doc: Json) -> Result<Ingestion> {
        let vocabulary = Vocabulary::default();
        let builder = GraphBuilder::new(Schema::precis(), &vocabulary);
        let objects = match doc {
            Json::Array(items) => items,
            other => vec![other],
        };
        builder.ingest(store, &objects, Some(NS))
    }

    fn get<'s>(store: &'s MemoryStore, id: &str) -> &'s Individual {
        store
            .find_by_id(&format!("{NS}{id}"))
            .expect("individual is stored")
    }

    #[test]
    fn non_functional_scalar_reads_back_as_list() {
        let mut store = MemoryStore::new();
        ingest(
            &mut store,
            json!([{ "$id": "k1", "$type": "KnowledgeArea", "hasName": "Alice" }]),
        )
        .expect("valid document");
        assert_eq!(
            get(&store, "k1").get("hasName"),
            Some(&PropertyValue::List(vec![Value::Str("Alice".into())]))
        );
    }

    #[test]
    fn functional_property_stays_scalar() {
        let mut store = MemoryStore::new();
        ingest(
            &mut store,
            json!([{ "$id": "s1", "$type": "Skill", "hasName": "Rust", "hasDate": "2020-02-29" }]),
        )
        .expect("valid document");
        let skill = get(&store, "s1");
        assert!(matches!(skill.get("hasName"), Some(PropertyValue::Single(Value::Str(_)))));
        assert_eq!(
            skill.get("hasDate"),
            Some(&PropertyValue::Single(Value::Date(
                NaiveDate::from_ymd_opt(2020, 2, 29).expect("leap day")
            )))
        );
    }

    #[test]
    fn inline_objects_are_ingested_before_their_parent() {
        let mut store = MemoryStore::new();
        let ingestion = ingest(
            &mut store,
            json!([
                {
                    "$id": "we1",
                    "$type": "WorkExperience",
                    "employedAt": { "$id": "org1", "$type": "Organization", "hasName": "Acme" }
                },
                { "$id": "we2", "$type": "WorkExperience", "employedAt": "org1" }
            ]),
        )
        .expect("valid document");
        assert_eq!(ingestion.committed, 3);
        let ids: Vec<&str> = store.individuals().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["org1", "we1", "we2"]);
        assert!(get(&store, "we2").references("employedAt", &format!("{NS}org1")));
    }

    #[test]
    fn forward_reference_fails_and_leaves_store_untouched() {
        let mut store = MemoryStore::new();
        let err = ingest(
            &mut store,
            json!([
                { "$id": "ok", "$type": "Skill", "hasName": "Go" },
                { "$id": "we1", "$type": "WorkExperience", "employedAt": "org1" },
                { "$id": "org1", "$type": "Organization" }
            ]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Reference { ref missing, ref referrer } if missing == "org1" && referrer == "we1"
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_that_cannot_form_an_iri_are_rejected() {
        let mut store = MemoryStore::new();
        let err = ingest(
            &mut store,
            json!([
                { "$id": "ok", "$type": "Skill" },
                {
                    "$id": "we1",
                    "$type": "WorkExperience",
                    "employedAt": { "$id": "senior dev>x", "$type": "Organization" }
                }
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { ref id, .. } if id == "senior dev>x"));
        assert!(store.is_empty());
    }

    #[test]
    fn two_values_for_functional_relation_is_a_cardinality_error() {
        let mut store = MemoryStore::new();
        let err = ingest(
            &mut store,
            json!([
                { "$id": "a", "$type": "Organization" },
                { "$id": "b", "$type": "Organization" },
                { "$id": "we1", "$type": "WorkExperience", "employedAt": ["a", "b"] }
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Cardinality { ref property, .. } if property == "employedAt"));
    }

    #[test]
    fn list_for_functional_data_property_is_a_cardinality_error() {
        let mut store = MemoryStore::new();
        let err = ingest(
            &mut store,
            json!([{ "$id": "p", "$type": "Project", "hasName": ["x", "y"] }]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Cardinality { ref id, .. } if id == "p"));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in ["2020-1-01", "01/02/2020", "2021-02-30"] {
            let mut store = MemoryStore::new();
            let err = ingest(
                &mut store,
                json!([{ "$id": "s", "$type": "Skill", "hasDate": bad }]),
            )
            .unwrap_err();
            assert!(matches!(err, Error::DateFormat { ref value, .. } if value == bad));
        }
        let mut store = MemoryStore::new();
        let err = ingest(&mut store, json!([{ "$id": "s", "$type": "Skill", "hasDate": 2020 }]))
            .unwrap_err();
        assert!(matches!(err, Error::Type { .. }));
    }

    #[test]
    fn missing_identifiers_and_unknown_classes() {
        let mut store = MemoryStore::new();
        let err = ingest(&mut store, json!([{ "$type": "Skill" }])).unwrap_err();
        assert!(matches!(err, Error::MissingIdentifier { key: "$id", .. }));
        let err = ingest(&mut store, json!([{ "$id": "x" }])).unwrap_err();
        assert!(matches!(err, Error::MissingIdentifier { key: "$type", .. }));
        let err = ingest(&mut store, json!([{ "$id": "x", "$type": "Spaceship" }])).unwrap_err();
        assert!(matches!(err, Error::UnknownClass { ref class, .. } if class == "Spaceship"));
    }

    #[test]
    fn duplicate_ids_are_rejected_within_and_across_passes() {
        let mut store = MemoryStore::new();
        let err = ingest(
            &mut store,
            json!([
                { "$id": "s", "$type": "Skill" },
                { "$id": "s", "$type": "Skill" }
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateIdentifier { ref id } if id == "s"));

        ingest(&mut store, json!([{ "$id": "s", "$type": "Skill" }])).expect("first pass");
        let err = ingest(&mut store, json!([{ "$id": "s", "$type": "Skill" }])).unwrap_err();
        assert!(matches!(err, Error::DuplicateIdentifier { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unrecognized_keys_are_dropped_with_a_warning() {
        let mut store = MemoryStore::new();
        let ingestion = ingest(
            &mut store,
            json!([{ "$id": "s", "$type": "Skill", "hasName": "Rust", "colour": "red", "mood": 1 }]),
        )
        .expect("warnings are not fatal");
        assert_eq!(
            ingestion.warnings,
            vec![UnrecognizedProperty {
                id: "s".into(),
                keys: vec!["colour".into(), "mood".into()],
            }]
        );
        assert!(get(&store, "s").get("colour").is_none());
    }

    #[test]
    fn descriptions_become_individuals() {
        let mut store = MemoryStore::new();
        let ingestion = ingest(
            &mut store,
            json!([{
                "$id": "we1",
                "$type": "WorkExperience",
                "hasDescription": [{ "hasText": "a" }, { "hasText": "b", "hasPriority": -1 }]
            }]),
        )
        .expect("valid document");
        assert_eq!(ingestion.committed, 3);
        let we = get(&store, "we1");
        assert_eq!(we.values("hasDescription").len(), 2);
        assert_eq!(get(&store, "we1-description-1").class, "Description");
    }

    #[test]
    fn functional_description_requires_exactly_one_entry() {
        let mut store = MemoryStore::new();
        let err = ingest(
            &mut store,
            json!([{
                "$id": "acc",
                "$type": "Accolade",
                "hasDescription": [{ "hasText": "a" }, { "hasText": "b" }]
            }]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Cardinality { ref property, .. } if property == "hasDescription"));
    }

    #[test]
    fn object_property_rejects_non_id_values() {
        let mut store = MemoryStore::new();
        let err = ingest(
            &mut store,
            json!([{ "$id": "c", "$type": "Course", "affiliatedWith": 7 }]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Type { .. }));
    }

    #[test]
    fn non_object_elements_and_bad_namespaces_fail() {
        let vocabulary = Vocabulary::default();
        let builder = GraphBuilder::new(Schema::precis(), &vocabulary);
        let mut store = MemoryStore::new();
        let err = builder
            .ingest(&mut store, &[json!("nope")], Some(NS))
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        let err = builder.ingest(&mut store, &[], Some("relative/path")).unwrap_err();
        assert!(matches!(err, Error::Namespace { .. }));
    }

    #[test]
    fn generated_namespace_is_reported() {
        let vocabulary = Vocabulary::default();
        let builder = GraphBuilder::new(Schema::precis(), &vocabulary);
        let mut store = MemoryStore::new();
        let ingestion = builder
            .ingest_document(&mut store, r#"[{"$id": "s", "$type": "Skill"}]"#, None)
            .expect("valid document");
        assert!(store
            .find_by_id(&ingestion.namespace.qualify("s"))
            .is_some());
    }
}
