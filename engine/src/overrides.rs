//! Class-specific enrichment of flattened records.
//!
//! Some template fields cannot be produced by plain flattening, for example
//! the sorted names of the skills a project is related to. A
//! [`RecordOverride`] is a transform over the records of one class; the
//! [`OverrideRegistry`] maps class names to transforms.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde_json::{json, Value as Json};
use tracing::debug;

use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::query::QueryEngine;
use crate::record::Record;

/// Transform over the records of one class.
pub trait RecordOverride {
    /// Returns `records` with derived fields added.
    ///
    /// # Errors
    ///
    /// Implementations may fail on inconsistent graph data.
    fn apply(&self, engine: &QueryEngine<'_>, records: Vec<Record>) -> Result<Vec<Record>>;
}

impl<F> RecordOverride for F
where
    F: Fn(&QueryEngine<'_>, Vec<Record>) -> Result<Vec<Record>>,
{
    fn apply(&self, engine: &QueryEngine<'_>, records: Vec<Record>) -> Result<Vec<Record>> {
        self(engine, records)
    }
}

/// Class name to transform.
#[derive(Default)]
pub struct OverrideRegistry {
    overrides: HashMap<String, Box<dyn RecordOverride>>,
}

impl fmt::Debug for OverrideRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<&String> = self.overrides.keys().collect();
        classes.sort();
        f.debug_struct("OverrideRegistry")
            .field("classes", &classes)
            .finish()
    }
}

impl OverrideRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `Project` override.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("Project", ProjectOverride::default());
        registry
    }

    /// Registers `transform` for `class`, replacing any previous one.
    pub fn register(
        &mut self,
        class: impl Into<String>,
        transform: impl RecordOverride + 'static,
    ) -> &mut Self {
        self.overrides.insert(class.into(), Box::new(transform));
        self
    }

    /// Registers a closure for `class`.
    pub fn register_fn<F>(&mut self, class: impl Into<String>, transform: F) -> &mut Self
    where
        F: Fn(&QueryEngine<'_>, Vec<Record>) -> Result<Vec<Record>> + 'static,
    {
        self.register(class, transform)
    }

    /// Returns `true` if `class` has a transform.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.overrides.contains_key(class)
    }

    /// Runs the transform registered for `class`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingOverride`] if nothing is registered for
    /// `class`; callers are expected to check [`OverrideRegistry::contains`]
    /// first. Errors of the transform itself are propagated.
    pub fn apply(
        &self,
        class: &str,
        engine: &QueryEngine<'_>,
        records: Vec<Record>,
    ) -> Result<Vec<Record>> {
        let transform = self
            .overrides
            .get(class)
            .ok_or_else(|| Error::MissingOverride(class.to_owned()))?;
        debug!(class, count = records.len(), "applying record override");
        transform.apply(engine, records)
    }
}

/// Adds `relatedSkills` and `awards` to project records.
///
/// `relatedSkills` holds the sorted names of skills connected to the project
/// through the related relation. `awards` holds one
/// `{award_name, org_name}` entry per accolade connected the same way whose
/// issuer is known.
#[derive(Debug, Clone)]
pub struct ProjectOverride {
    /// Class whose names populate `relatedSkills`.
    pub skill_class: String,
    /// Class of awards.
    pub accolade_class: String,
    /// Relation from an accolade to its issuer.
    pub issuer_property: String,
}

impl Default for ProjectOverride {
    fn default() -> Self {
        Self {
            skill_class: "Skill".to_owned(),
            accolade_class: "Accolade".to_owned(),
            issuer_property: "awardedBy".to_owned(),
        }
    }
}

impl ProjectOverride {
    /// Individuals of `class` related to `project` in either direction.
    fn related<'g>(
        &self,
        engine: &QueryEngine<'g>,
        project: &Individual,
        class: &str,
    ) -> Vec<&'g Individual> {
        let relation = &engine.vocabulary().related_property;
        let store = engine.store();
        let mut found: Vec<&'g Individual> = project
            .values(relation)
            .iter()
            .filter_map(|v| v.as_iri())
            .filter_map(|iri| store.find_by_id(iri))
            .chain(store.find_back_references(&project.iri, relation))
            .filter(|ind| ind.class == class)
            .collect();
        let mut seen = HashSet::new();
        found.retain(|ind| seen.insert(ind.iri.clone()));
        found
    }
}

impl RecordOverride for ProjectOverride {
    fn apply(&self, engine: &QueryEngine<'_>, mut records: Vec<Record>) -> Result<Vec<Record>> {
        for record in &mut records {
            let Some(project) = record.id().and_then(|id| engine.find(id)) else {
                continue;
            };

            let mut skills: Vec<String> = self
                .related(engine, project, &self.skill_class)
                .into_iter()
                .map(|skill| engine.display_name(skill))
                .collect();
            skills.sort();

            let awards: Vec<Json> = self
                .related(engine, project, &self.accolade_class)
                .into_iter()
                .filter_map(|accolade| {
                    let issuer = accolade
                        .values(&self.issuer_property)
                        .iter()
                        .find_map(|v| v.as_iri())
                        .and_then(|iri| engine.store().find_by_id(iri))?;
                    Some(json!({
                        "award_name": engine.display_name(accolade),
                        "org_name": engine.display_name(issuer),
                    }))
                })
                .collect();

            record.insert("relatedSkills", Json::from(skills));
            record.insert("awards", Json::Array(awards));
        }
        Ok(records)
    }
}
