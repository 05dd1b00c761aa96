//! Template data preparation.
//!
//! A template declares the preference fields it needs and the classes it
//! renders. [`TemplateDriver`] validates user preferences against both the
//! template and the graph, then assembles the dataset handed to a
//! [`Renderer`]:
//!
//! ```yaml
//! name: Ada Lovelace
//! order_overrides:
//!   WorkExperience: chronological-descending
//! item_overrides:
//!   Skill: ["!cobol"]
//! ```
//!
//! The driver moves through [`DriverState`]s in order; each step checks it
//! is called in the right state.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use tracing::{debug, error, info};

use crate::error::{describe, Error, Result};
use crate::overrides::OverrideRegistry;
use crate::query::{Order, QueryEngine};

/// Preference key holding per-class order overrides.
pub const ORDER_OVERRIDES_KEY: &str = "order_overrides";
/// Preference key holding per-class item overrides.
pub const ITEM_OVERRIDES_KEY: &str = "item_overrides";

const EXCLUSION_PREFIX: char = '!';

/// Template metadata and requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Display name of the template.
    pub full_name: String,
    /// What the template produces.
    pub description: String,
    /// Template author.
    pub author: String,
    /// Preference fields copied verbatim into the dataset.
    pub required_input: Vec<String>,
    /// Classes whose records the template renders, in dataset order.
    pub required_classes: Vec<String>,
}

impl TemplateConfig {
    /// Parses a YAML template configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the YAML is malformed or a required
    /// attribute is missing.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| Error::Template(e.to_string()))
    }

    /// Reads and parses a template configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Template`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }
}

/// Progress of a [`TemplateDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DriverState {
    /// No preferences yet.
    Uninitialized,
    /// Preferences parsed and required input present.
    PrefsParsed,
    /// Order and item overrides validated.
    OverridesValidated,
    /// Dataset assembled.
    DataBuilt,
    /// Dataset rendered at least once.
    Ready,
}

/// Consumes a prepared dataset.
pub trait Renderer {
    /// Produces the final document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] when the dataset cannot be rendered.
    fn render(&self, data: &Map<String, Json>) -> Result<String>;
}

/// Renders the dataset as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    /// Indent the output.
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, data: &Map<String, Json>) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        rendered.map_err(|e| Error::Render(e.to_string()))
    }
}

/// Validates preferences and assembles template datasets.
pub struct TemplateDriver<'g> {
    config: TemplateConfig,
    engine: QueryEngine<'g>,
    registry: &'g OverrideRegistry,
    state: DriverState,
    preferences: Map<String, Json>,
    order_overrides: BTreeMap<String, Order>,
    item_overrides: BTreeMap<String, HashSet<String>>,
    data: Option<Map<String, Json>>,
}

impl<'g> TemplateDriver<'g> {
    /// Creates a driver for `config` over the graph behind `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the template requires classes the
    /// schema does not know.
    pub fn new(
        config: TemplateConfig,
        engine: QueryEngine<'g>,
        registry: &'g OverrideRegistry,
    ) -> Result<Self> {
        let unknown: Vec<&str> = config
            .required_classes
            .iter()
            .filter(|class| !engine.schema().is_known_class(class))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(Error::Template(format!(
                "required classes {} are not in the schema",
                unknown.join(", ")
            )));
        }
        Ok(Self {
            config,
            engine,
            registry,
            state: DriverState::Uninitialized,
            preferences: Map::new(),
            order_overrides: BTreeMap::new(),
            item_overrides: BTreeMap::new(),
            data: None,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The template configuration.
    #[must_use]
    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// The assembled dataset, once built.
    #[must_use]
    pub fn data(&self) -> Option<&Map<String, Json>> {
        self.data.as_ref()
    }

    /// Parses YAML preferences and checks the required input is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DriverState`] unless uninitialized,
    /// [`Error::Preferences`] if the YAML is malformed or not a mapping, and
    /// [`Error::MissingPreferences`] if required fields are absent.
    pub fn parse_preferences(&mut self, source: &str) -> Result<()> {
        self.expect_state(DriverState::Uninitialized)?;
        let preferences: Json =
            serde_yaml::from_str(source).map_err(|e| Error::Preferences(e.to_string()))?;
        self.set_preferences(preferences)
    }

    /// Installs already-parsed preferences.
    ///
    /// # Errors
    ///
    /// As [`TemplateDriver::parse_preferences`], minus YAML syntax errors.
    pub fn set_preferences(&mut self, preferences: Json) -> Result<()> {
        self.expect_state(DriverState::Uninitialized)?;
        let preferences = match preferences {
            Json::Object(map) => map,
            other => {
                return Err(Error::Preferences(format!(
                    "expected a mapping, found {}",
                    describe(&other)
                )))
            }
        };
        let mut missing: Vec<String> = self
            .config
            .required_input
            .iter()
            .filter(|field| !preferences.contains_key(field.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            missing.sort();
            let err = Error::MissingPreferences { fields: missing };
            error!("{err}");
            return Err(err);
        }
        debug!(fields = preferences.len(), "user preferences accepted");
        self.preferences = preferences;
        self.state = DriverState::PrefsParsed;
        Ok(())
    }

    /// Validates `order_overrides` and `item_overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DriverState`] unless preferences were parsed,
    /// [`Error::UnknownOverrideClass`], [`Error::InvalidOrderOverride`],
    /// [`Error::MixedOverridePolarity`] or [`Error::InvalidOverrideIds`] for
    /// invalid overrides, and [`Error::Preferences`] for overrides of the
    /// wrong shape.
    pub fn validate_overrides(&mut self) -> Result<()> {
        self.expect_state(DriverState::PrefsParsed)?;
        let order_overrides = self.order_overrides().inspect_err(|e| error!("{e}"))?;
        let item_overrides = self.item_overrides().inspect_err(|e| error!("{e}"))?;
        debug!(
            order = order_overrides.len(),
            item = item_overrides.len(),
            "overrides validated"
        );
        self.order_overrides = order_overrides;
        self.item_overrides = item_overrides;
        self.state = DriverState::OverridesValidated;
        Ok(())
    }

    /// Assembles the dataset: one ordered, filtered record list per required
    /// class, then every required input field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DriverState`] unless overrides were validated, and
    /// propagates query and record override errors.
    pub fn build_data(&mut self) -> Result<&Map<String, Json>> {
        self.expect_state(DriverState::OverridesValidated)?;
        let mut data = Map::new();
        for class in &self.config.required_classes {
            let order = self.order_overrides.get(class).copied();
            let mut records = self.engine.get_all_of_type(class, order)?;
            if self.registry.contains(class) {
                records = self.registry.apply(class, &self.engine, records)?;
            }
            if let Some(keep) = self.item_overrides.get(class) {
                records.retain(|r| r.id().is_some_and(|id| keep.contains(id)));
            }
            debug!(class = %class, count = records.len(), "collected records for template");
            data.insert(
                class.clone(),
                Json::Array(records.into_iter().map(|r| r.into_json()).collect()),
            );
        }
        for field in &self.config.required_input {
            if let Some(value) = self.preferences.get(field) {
                data.insert(field.clone(), value.clone());
            }
        }
        info!(
            template = %self.config.full_name,
            fields = data.len(),
            "template dataset built"
        );
        self.state = DriverState::DataBuilt;
        Ok(self.data.insert(data))
    }

    /// Runs every preparation step on YAML preferences.
    ///
    /// # Errors
    ///
    /// Propagates the error of the first failing step.
    pub fn prepare(&mut self, preferences: &str) -> Result<&Map<String, Json>> {
        self.parse_preferences(preferences)?;
        self.validate_overrides()?;
        self.build_data()
    }

    /// Hands the dataset to `renderer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DriverState`] before the dataset is built, and
    /// propagates renderer errors.
    pub fn render(&mut self, renderer: &dyn Renderer) -> Result<String> {
        let Some(data) = self.data.as_ref().filter(|_| self.state >= DriverState::DataBuilt)
        else {
            return Err(Error::DriverState {
                expected: DriverState::DataBuilt,
                actual: self.state,
            });
        };
        let rendered = renderer.render(data)?;
        self.state = DriverState::Ready;
        Ok(rendered)
    }

    fn expect_state(&self, expected: DriverState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::DriverState {
                expected,
                actual: self.state,
            })
        }
    }

    fn override_section(&self, key: &str) -> Result<Option<&Map<String, Json>>> {
        match self.preferences.get(key) {
            None | Some(Json::Null) => Ok(None),
            Some(Json::Object(section)) => Ok(Some(section)),
            Some(other) => Err(Error::Preferences(format!(
                "{key} must be a mapping, found {}",
                describe(other)
            ))),
        }
    }

    fn unknown_classes(&self, section: &Map<String, Json>) -> Vec<String> {
        let schema = self.engine.schema();
        let mut unknown: Vec<String> = section
            .keys()
            .filter(|class| !schema.is_known_class(class))
            .cloned()
            .collect();
        unknown.sort();
        unknown
    }

    fn order_overrides(&self) -> Result<BTreeMap<String, Order>> {
        let Some(section) = self.override_section(ORDER_OVERRIDES_KEY)? else {
            return Ok(BTreeMap::new());
        };
        let unknown = self.unknown_classes(section);
        if !unknown.is_empty() {
            return Err(Error::UnknownOverrideClass {
                kind: "order",
                classes: unknown,
            });
        }
        section
            .iter()
            .map(|(class, value)| {
                value
                    .as_str()
                    .and_then(|keyword| keyword.parse::<Order>().ok())
                    .map(|order| (class.clone(), order))
                    .ok_or_else(|| Error::InvalidOrderOverride {
                        class: class.clone(),
                        value: value.as_str().map_or_else(|| describe(value), str::to_owned),
                    })
            })
            .collect()
    }

    fn item_overrides(&self) -> Result<BTreeMap<String, HashSet<String>>> {
        let Some(section) = self.override_section(ITEM_OVERRIDES_KEY)? else {
            return Ok(BTreeMap::new());
        };
        let unknown = self.unknown_classes(section);
        if !unknown.is_empty() {
            return Err(Error::UnknownOverrideClass {
                kind: "item",
                classes: unknown,
            });
        }
        let mut resolved = BTreeMap::new();
        for (class, entries) in section {
            let entries = string_list(class, entries)?;
            let ids: HashSet<String> = self.engine.ids_of_type(class)?.into_iter().collect();
            let keep = resolve_item_override(class, &entries, &ids)?;
            resolved.insert(class.clone(), keep);
        }
        Ok(resolved)
    }
}

/// Applies one class's item override to the ids of that class.
///
/// Entries are either all exclusions (`!id`) or all inclusions. An empty list
/// excludes nothing.
fn resolve_item_override(
    class: &str,
    entries: &[&str],
    ids: &HashSet<String>,
) -> Result<HashSet<String>> {
    let exclusions = entries
        .iter()
        .filter(|e| e.starts_with(EXCLUSION_PREFIX))
        .count();
    let (named, exclude): (Vec<&str>, bool) = if exclusions == entries.len() {
        let named = entries
            .iter()
            .map(|e| e.trim_start_matches(EXCLUSION_PREFIX))
            .collect();
        (named, true)
    } else if exclusions == 0 {
        (entries.to_vec(), false)
    } else {
        return Err(Error::MixedOverridePolarity {
            class: class.to_owned(),
        });
    };

    let mut invalid: Vec<String> = named
        .iter()
        .filter(|id| !ids.contains(**id))
        .map(|id| (*id).to_owned())
        .collect();
    if !invalid.is_empty() {
        invalid.sort();
        invalid.dedup();
        return Err(Error::InvalidOverrideIds {
            class: class.to_owned(),
            ids: invalid,
        });
    }

    let named: HashSet<&str> = named.into_iter().collect();
    Ok(if exclude {
        ids.iter()
            .filter(|id| !named.contains(id.as_str()))
            .cloned()
            .collect()
    } else {
        named.into_iter().map(str::to_owned).collect()
    })
}

fn string_list<'v>(class: &str, value: &'v Json) -> Result<Vec<&'v str>> {
    let items: Vec<&Json> = match value {
        Json::Array(items) => items.iter().collect(),
        Json::Null => Vec::new(),
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| {
            item.as_str().ok_or_else(|| {
                Error::Preferences(format!(
                    "item override entries for {class} must be strings, found {}",
                    describe(item)
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::config::Vocabulary;
    use crate::namespace::Namespace;
    use crate::store::MemoryStore;
    use precis_ontology::Schema;
    use serde_json::json;

    const TEMPLATE: &str = "
full_name: Plain
description: A plain CV
author: Precis
required_input: [name, email]
required_classes: [Skill, Project]
";

    struct Fixture {
        store: MemoryStore,
        namespace: Namespace,
        vocabulary: Vocabulary,
        registry: OverrideRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let vocabulary = Vocabulary::default();
            let mut store = MemoryStore::new();
            let doc = json!([
                { "$id": "python", "$type": "Skill", "hasName": "Python", "hasDate": "2015-01-01" },
                { "$id": "go", "$type": "Skill", "hasName": "Go", "hasDate": "2018-01-01" },
                { "$id": "rust", "$type": "Skill", "hasName": "Rust", "hasDate": "2020-01-01" },
                { "$id": "p1", "$type": "Project", "hasName": "Tool", "relatedTo": ["rust", "go"] }
            ]);
            let objects = doc.as_array().cloned().unwrap_or_default();
            let ingestion = GraphBuilder::new(Schema::precis(), &vocabulary)
                .ingest(&mut store, &objects, Some("https://example.org/cv/"))
                .expect("valid document");
            Self {
                store,
                namespace: ingestion.namespace,
                vocabulary,
                registry: OverrideRegistry::with_defaults(),
            }
        }

        fn driver(&self) -> TemplateDriver<'_> {
            let engine = QueryEngine::new(
                &self.store,
                Schema::precis(),
                &self.vocabulary,
                &self.namespace,
            );
            let config = TemplateConfig::from_yaml_str(TEMPLATE).expect("valid template");
            TemplateDriver::new(config, engine, &self.registry).expect("known classes")
        }
    }

    fn skill_ids(data: &Map<String, Json>) -> Vec<&str> {
        data["Skill"]
            .as_array()
            .expect("skill list")
            .iter()
            .filter_map(|r| r["$id"].as_str())
            .collect()
    }

    #[test]
    fn exclusion_keeps_every_other_id() {
        let ids: HashSet<String> = ["python", "go", "rust"].map(str::to_owned).into();
        let keep = resolve_item_override("Skill", &["!python"], &ids).expect("valid");
        assert_eq!(keep, HashSet::from(["go".to_owned(), "rust".to_owned()]));
    }

    #[test]
    fn mixed_polarity_is_rejected() {
        let ids: HashSet<String> = ["python", "go"].map(str::to_owned).into();
        let err = resolve_item_override("Skill", &["python", "!go"], &ids).unwrap_err();
        assert!(matches!(err, Error::MixedOverridePolarity { ref class } if class == "Skill"));
    }

    #[test]
    fn unknown_ids_are_rejected_for_both_polarities() {
        let ids: HashSet<String> = ["python"].map(str::to_owned).into();
        let err = resolve_item_override("Skill", &["cobol"], &ids).unwrap_err();
        assert!(matches!(err, Error::InvalidOverrideIds { ref ids, .. } if ids == &["cobol"]));
        let err = resolve_item_override("Skill", &["!cobol"], &ids).unwrap_err();
        assert!(matches!(err, Error::InvalidOverrideIds { .. }));
    }

    #[test]
    fn full_preparation_orders_filters_and_copies_input() {
        let fixture = Fixture::new();
        let mut driver = fixture.driver();
        let data = driver
            .prepare(
                "
name: Ada
email: ada@example.org
extra: ignored
order_overrides:
  Skill: chron_D
item_overrides:
  Skill: ['!go']
",
            )
            .expect("valid preferences")
            .clone();
        assert_eq!(skill_ids(&data), ["rust", "python"]);
        assert_eq!(data["name"], json!("Ada"));
        assert!(!data.contains_key("extra"));
        assert_eq!(data["Project"][0]["relatedSkills"], json!(["Go", "Rust"]));
        assert_eq!(
            data.keys().collect::<Vec<_>>(),
            ["Skill", "Project", "name", "email"]
        );
        assert_eq!(driver.state(), DriverState::DataBuilt);

        let rendered = driver.render(&JsonRenderer::default()).expect("renders");
        assert!(rendered.starts_with("{\"Skill\""));
        assert_eq!(driver.state(), DriverState::Ready);
    }

    #[test]
    fn inclusion_keeps_query_order() {
        let fixture = Fixture::new();
        let mut driver = fixture.driver();
        let data = driver
            .prepare("name: A\nemail: B\nitem_overrides:\n  Skill: [rust, python]\n")
            .expect("valid preferences");
        assert_eq!(skill_ids(data), ["python", "rust"]);
    }

    #[test]
    fn missing_required_input_is_enumerated() {
        let fixture = Fixture::new();
        let mut driver = fixture.driver();
        let err = driver.parse_preferences("other: 1\n").unwrap_err();
        assert!(
            matches!(err, Error::MissingPreferences { ref fields } if fields == &["email", "name"])
        );
        assert_eq!(driver.state(), DriverState::Uninitialized);
    }

    #[test]
    fn malformed_or_non_mapping_preferences_fail() {
        let fixture = Fixture::new();
        let mut driver = fixture.driver();
        assert!(matches!(
            driver.parse_preferences("name: [unclosed\n"),
            Err(Error::Preferences(_))
        ));
        assert!(matches!(
            driver.parse_preferences("- just\n- a list\n"),
            Err(Error::Preferences(_))
        ));
    }

    #[test]
    fn unknown_order_override_class_is_enumerated() {
        let fixture = Fixture::new();
        let mut driver = fixture.driver();
        driver
            .parse_preferences(
                "name: A\nemail: B\norder_overrides:\n  Spaceship: chron_A\n  Alien: chron_D\n",
            )
            .expect("required input present");
        let err = driver.validate_overrides().unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownOverrideClass { kind: "order", ref classes } if classes == &["Alien", "Spaceship"]
        ));
        assert_eq!(driver.state(), DriverState::PrefsParsed);
        assert!(driver.data().is_none());
    }

    #[test]
    fn invalid_order_value_names_class_and_value() {
        let fixture = Fixture::new();
        let mut driver = fixture.driver();
        driver
            .parse_preferences("name: A\nemail: B\norder_overrides:\n  Skill: sideways\n")
            .expect("required input present");
        let err = driver.validate_overrides().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOrderOverride { ref class, ref value } if class == "Skill" && value == "sideways"
        ));
    }

    #[test]
    fn steps_out_of_order_are_rejected() {
        let fixture = Fixture::new();
        let mut driver = fixture.driver();
        assert!(matches!(
            driver.build_data(),
            Err(Error::DriverState {
                expected: DriverState::OverridesValidated,
                actual: DriverState::Uninitialized
            })
        ));
        assert!(matches!(
            driver.render(&JsonRenderer::default()),
            Err(Error::DriverState { .. })
        ));
        driver.parse_preferences("name: A\nemail: B\n").expect("valid");
        assert!(matches!(
            driver.parse_preferences("name: A\nemail: B\n"),
            Err(Error::DriverState { .. })
        ));
    }

    #[test]
    fn template_with_unknown_class_is_rejected() {
        let fixture = Fixture::new();
        let engine = QueryEngine::new(
            &fixture.store,
            Schema::precis(),
            &fixture.vocabulary,
            &fixture.namespace,
        );
        let config = TemplateConfig {
            full_name: "x".into(),
            description: "x".into(),
            author: "x".into(),
            required_input: Vec::new(),
            required_classes: vec!["Spaceship".into()],
        };
        assert!(matches!(
            TemplateDriver::new(config, engine, &fixture.registry),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn template_config_requires_every_attribute() {
        assert!(matches!(
            TemplateConfig::from_yaml_str("full_name: x\n"),
            Err(Error::Template(_))
        ));
    }
}
