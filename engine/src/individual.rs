//! Typed individuals held by the graph store.

use chrono::NaiveDate;

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string literal.
    Str(String),
    /// An integer literal.
    Int(i64),
    /// A floating-point literal.
    Float(f64),
    /// A boolean literal.
    Bool(bool),
    /// A calendar date.
    Date(NaiveDate),
    /// A reference to another individual, by qualified identifier.
    IriRef(String),
}

impl Value {
    /// Returns the string content of a [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer of a [`Value::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the referenced identifier of a [`Value::IriRef`].
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::IriRef(iri) => Some(iri),
            _ => None,
        }
    }

    /// Renders the value as JSON; dates become `YYYY-MM-DD` strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Str(s) | Self::IriRef(s) => serde_json::Value::from(s.as_str()),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Bool(b) => serde_json::Value::from(*b),
            Self::Date(d) => serde_json::Value::from(d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Shape of a stored property: functional properties hold exactly one value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Value of a functional property.
    Single(Value),
    /// Values of a non-functional property, in input order.
    List(Vec<Value>),
}

impl PropertyValue {
    /// Every value regardless of shape.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::List(vs) => vs,
        }
    }

    /// The first value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.values().first()
    }
}

/// One node of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    /// Qualified identifier: namespace base followed by `id`.
    pub iri: String,
    /// Bare id from the input document.
    pub id: String,
    /// Schema class name.
    pub class: String,
    /// Properties in the order they were ingested.
    pub properties: Vec<(String, PropertyValue)>,
}

impl Individual {
    /// Returns the stored value of `property`.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Every value of `property`; empty when absent.
    #[must_use]
    pub fn values(&self, property: &str) -> &[Value] {
        match self.get(property) {
            Some(value) => value.values(),
            None => &[],
        }
    }

    /// The first string value of `property`.
    #[must_use]
    pub fn first_str(&self, property: &str) -> Option<&str> {
        self.values(property).iter().find_map(Value::as_str)
    }

    /// Returns `true` if any value of `property` references `target`.
    #[must_use]
    pub fn references(&self, property: &str, target: &str) -> bool {
        self.values(property)
            .iter()
            .any(|v| v.as_iri() == Some(target))
    }
}
