//! Error taxonomy for ingestion, querying and template preparation.
//!
//! Every variant except [`Error::Io`] is fatal for the phase that raised it
//! and carries enough context (object id, property, offending value) for the
//! user to fix the input. Unrecognized properties are not errors; they are
//! reported as warnings by the graph builder.

use std::path::PathBuf;

use thiserror::Error;

use crate::driver::DriverState;
use crate::query::Order;

/// Result type used throughout the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All engine errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The ingestion document is not valid JSON or not an array of objects.
    #[error("ingestion document is malformed: {0}")]
    Parse(String),

    /// A file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An object lacks `$id` or `$type`.
    #[error("missing required key \"{key}\" in object {object}")]
    MissingIdentifier {
        /// The missing key.
        key: &'static str,
        /// Compact rendering of the offending object.
        object: String,
    },

    /// `$type` names a class the schema does not know.
    #[error("unknown class \"{class}\" for object {id}")]
    UnknownClass {
        /// The unknown class name.
        class: String,
        /// Id of the object that declared it.
        id: String,
    },

    /// An `$id` cannot be appended to a namespace to form an IRI.
    #[error("object id \"{id}\" is not a valid identifier: {reason}")]
    InvalidIdentifier {
        /// The rejected id.
        id: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A query asked for a class the schema does not know.
    #[error("unknown class \"{class}\" requested")]
    UnknownQueryClass {
        /// The unknown class name.
        class: String,
    },

    /// The same `$id` was defined twice in one namespace.
    #[error("object {id} is defined more than once")]
    DuplicateIdentifier {
        /// The duplicated id.
        id: String,
    },

    /// A property was given a shape its cardinality does not allow.
    #[error("property {property} in the object {id} {reason}")]
    Cardinality {
        /// Id of the offending object.
        id: String,
        /// Offending property.
        property: String,
        /// What was wrong with the supplied values.
        reason: String,
    },

    /// A bare id did not resolve to an already committed individual.
    #[error("entity {missing} referenced before assignment in {referrer}")]
    Reference {
        /// The id that could not be found.
        missing: String,
        /// Id of the object holding the reference.
        referrer: String,
    },

    /// A value has the wrong JSON type for its property.
    #[error("property {property} in the object {id} must be {expected}, found {found}")]
    Type {
        /// Id of the offending object.
        id: String,
        /// Offending property.
        property: String,
        /// What the property accepts.
        expected: &'static str,
        /// Compact rendering of the offending value.
        found: String,
    },

    /// A date-like value does not match `YYYY-MM-DD`.
    #[error("property {property} in the object {id} is malformed: \"{value}\" must be a date in the format YYYY-MM-DD")]
    DateFormat {
        /// Id of the offending object.
        id: String,
        /// Offending property.
        property: String,
        /// The offending value.
        value: String,
    },

    /// A description entry is unusable.
    #[error("description {index} in the object {id} {reason}")]
    InvalidDescription {
        /// Id of the parent object.
        id: String,
        /// Position of the description within the parent.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// An explicit namespace is not an absolute URI with an authority.
    #[error("provided namespace {namespace} is invalid: {reason}")]
    Namespace {
        /// The rejected namespace.
        namespace: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An order keyword is not one of the supported options.
    #[error("order \"{value}\" is not valid; must be one of {}", Order::KEYWORDS.join(", "))]
    OrderValue {
        /// The rejected keyword.
        value: String,
    },

    /// An order override names a supported class but an invalid order.
    #[error("invalid order override option \"{value}\" for class {class}; must be one of {}", Order::KEYWORDS.join(", "))]
    InvalidOrderOverride {
        /// Class the override was given for.
        class: String,
        /// The rejected value.
        value: String,
    },

    /// User preferences could not be parsed.
    #[error("user preferences are malformed: {0}")]
    Preferences(String),

    /// Fields required by the template are absent from the preferences.
    #[error("required user preferences {} are missing", .fields.join(", "))]
    MissingPreferences {
        /// Missing field names, sorted.
        fields: Vec<String>,
    },

    /// An order or item override names classes the schema does not know.
    #[error("{kind} override classes {} are not valid", .classes.join(", "))]
    UnknownOverrideClass {
        /// `"order"` or `"item"`.
        kind: &'static str,
        /// Invalid class names, sorted.
        classes: Vec<String>,
    },

    /// An item override mixes inclusion and `!` exclusion entries.
    #[error("both exclusion and inclusion item overrides are used for class {class}")]
    MixedOverridePolarity {
        /// Class the override was given for.
        class: String,
    },

    /// An item override names ids that are not individuals of its class.
    #[error("item overrides {} for class {class} are not valid", .ids.join(", "))]
    InvalidOverrideIds {
        /// Class the override was given for.
        class: String,
        /// Invalid ids, sorted.
        ids: Vec<String>,
    },

    /// A record override was requested for a class without one.
    #[error("no record override is registered for class {0}")]
    MissingOverride(String),

    /// A template driver step was called out of order.
    #[error("template driver is {actual:?}, expected {expected:?}")]
    DriverState {
        /// State the step requires.
        expected: DriverState,
        /// State the driver is in.
        actual: DriverState,
    },

    /// The template configuration is malformed or inconsistent.
    #[error("template configuration is invalid: {0}")]
    Template(String),

    /// A settings file is malformed.
    #[error("settings are malformed: {0}")]
    Config(#[from] toml::de::Error),

    /// The renderer failed.
    #[error("rendering failed: {0}")]
    Render(String),
}

/// Compact single-line rendering of a JSON value for error messages.
pub(crate) fn describe(value: &serde_json::Value) -> String {
    const LIMIT: usize = 80;
    let text = value.to_string();
    if text.chars().count() > LIMIT {
        let cut: String = text.chars().take(LIMIT).collect();
        format!("{cut}…")
    } else {
        text
    }
}
