//! Engine settings.
//!
//! [`Vocabulary`] names the properties and classes the engine gives special
//! meaning to (display names, dates, affiliations, descriptions). Defaults
//! match the built-in Precis ontology; a settings file can rename them for a
//! different schema.
//!
//! Settings are TOML:
//!
//! ```toml
//! namespace = "https://example.org/resume/"
//! log_filter = "precis=debug"
//!
//! [vocabulary]
//! name_property = "label"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Designated property and class names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Display name; also the alphabetical sort key.
    pub name_property: String,
    /// Chronological sort key.
    pub date_property: String,
    /// Data properties parsed strictly as `YYYY-MM-DD`.
    pub date_like_properties: Vec<String>,
    /// Relations whose target supplies a second-level label, and through
    /// which back-references are discovered.
    pub affiliation_properties: Vec<String>,
    /// Relation supplying a third-level label.
    pub parent_property: String,
    /// Reserved key holding description entries.
    pub description_property: String,
    /// Class of description individuals.
    pub description_class: String,
    /// Text of a description.
    pub text_property: String,
    /// Priority of a description.
    pub priority_property: String,
    /// Generic association used by record overrides.
    pub related_property: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            name_property: "hasName".to_owned(),
            date_property: "hasDate".to_owned(),
            date_like_properties: vec!["hasDate".to_owned(), "endDate".to_owned()],
            affiliation_properties: vec!["affiliatedWith".to_owned(), "employedAt".to_owned()],
            parent_property: "subOrganizationOf".to_owned(),
            description_property: "hasDescription".to_owned(),
            description_class: "Description".to_owned(),
            text_property: "hasText".to_owned(),
            priority_property: "hasPriority".to_owned(),
            related_property: "relatedTo".to_owned(),
        }
    }
}

impl Vocabulary {
    /// Returns `true` if `property` holds dates.
    #[must_use]
    pub fn is_date_like(&self, property: &str) -> bool {
        self.date_like_properties.iter().any(|p| p == property)
    }
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Namespace used for ingestion when none is given on the command line.
    pub namespace: Option<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
    /// Designated names.
    pub vocabulary: Vocabulary,
}

impl Settings {
    /// Parses settings from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not valid TOML or a key has
    /// the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Config`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
