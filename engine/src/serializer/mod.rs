//! RDF export of a populated graph.
//!
//! Three serialization formats are supported:
//! - **Turtle** ([`turtle`]) for reading and RDF tooling
//! - **N-Triples** ([`ntriples`]) for streaming and diff-friendly storage
//! - **JSON-LD** ([`jsonld`]) for JSON consumers
//!
//! Classes and properties are written under the ontology base IRI;
//! individuals keep their qualified identifiers.

use std::fmt;
use std::str::FromStr;

use precis_ontology::iris;

use crate::individual::Value;

pub mod jsonld;
pub mod ntriples;
pub mod turtle;

/// Export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Turtle 1.1.
    Turtle,
    /// N-Triples.
    NTriples,
    /// JSON-LD 1.1.
    JsonLd,
}

impl Format {
    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
            Self::JsonLd => "jsonld",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "ntriples" | "nt" => Ok(Self::NTriples),
            "jsonld" | "json-ld" => Ok(Self::JsonLd),
            other => Err(format!(
                "unknown export format \"{other}\"; expected turtle, ntriples or jsonld"
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Turtle => "turtle",
            Self::NTriples => "ntriples",
            Self::JsonLd => "jsonld",
        })
    }
}

/// Lexical form and datatype IRI of a literal; `None` for references.
pub(crate) fn literal(value: &Value) -> Option<(String, &'static str)> {
    match value {
        Value::Str(s) => Some((s.clone(), iris::XSD_STRING)),
        Value::Int(i) => Some((i.to_string(), iris::XSD_INTEGER)),
        Value::Float(f) => Some((f.to_string(), iris::XSD_DOUBLE)),
        Value::Bool(b) => Some((b.to_string(), iris::XSD_BOOLEAN)),
        Value::Date(d) => Some((d.format("%Y-%m-%d").to_string(), iris::XSD_DATE)),
        Value::IriRef(_) => None,
    }
}

/// Escapes a string for a double-quoted RDF literal.
pub(crate) fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
pub(crate) mod fixture {
    use precis_ontology::Schema;
    use serde_json::json;

    use crate::builder::GraphBuilder;
    use crate::config::Vocabulary;
    use crate::store::MemoryStore;

    pub const NS: &str = "https://example.org/cv/";

    pub fn store() -> MemoryStore {
        let vocabulary = Vocabulary::default();
        let mut store = MemoryStore::new();
        let doc = json!([
            { "$id": "org1", "$type": "Organization", "hasName": "Acme \"Labs\"" },
            { "$id": "we1", "$type": "WorkExperience", "employedAt": "org1",
              "hasDate": "2020-01-01", "hasURL": ["https://a.example", "https://b.example"] }
        ]);
        let objects = doc.as_array().cloned().unwrap_or_default();
        GraphBuilder::new(Schema::precis(), &vocabulary)
            .ingest(&mut store, &objects, Some(NS))
            .expect("valid document");
        store
    }
}
