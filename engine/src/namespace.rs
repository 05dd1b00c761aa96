//! Ingestion namespaces.
//!
//! Every individual created during one ingestion pass is identified by the
//! namespace base followed by its bare `$id`. A namespace is either supplied
//! explicitly (and must be an absolute URI with an authority) or generated
//! fresh for the run so that repeated loads never collide.

use std::fmt;

use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Prefix of generated namespaces.
pub const GENERATED_BASE: &str = "https://precis.dev/individuals/";

/// Base identifier prefix scoping one ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    base: String,
}

impl Namespace {
    /// Validates an explicitly supplied namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Namespace`] unless `candidate` parses as a URI with
    /// both a scheme and a non-empty authority.
    pub fn parse(candidate: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::Namespace {
            namespace: candidate.to_owned(),
            reason: reason.to_owned(),
        };
        if let Some(c) = forbidden_char(candidate) {
            return Err(invalid(&format!("{c:?} is not allowed in an IRI")));
        }
        let url = Url::parse(candidate).map_err(|e| invalid(&e.to_string()))?;
        if !url.host_str().is_some_and(|host| !host.is_empty()) {
            return Err(invalid("missing authority component"));
        }
        Ok(Self {
            base: candidate.to_owned(),
        })
    }

    /// Generates a namespace unique to this run.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            base: format!("{GENERATED_BASE}{}/", Uuid::new_v4()),
        }
    }

    /// Uses `explicit` when given, otherwise generates a fresh namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Namespace`] if `explicit` is invalid.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(candidate) => Self::parse(candidate),
            None => Ok(Self::generate()),
        }
    }

    /// The base prefix.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Checks that `id` can be appended to a base to form an IRI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if `id` is empty or contains
    /// whitespace, a control character or one of ``<>"{}|^`\``.
    pub fn check_id(id: &str) -> Result<()> {
        let reason = if id.is_empty() {
            "must not be empty".to_owned()
        } else if let Some(c) = forbidden_char(id) {
            format!("{c:?} is not allowed in an IRI")
        } else {
            return Ok(());
        };
        Err(Error::InvalidIdentifier {
            id: id.to_owned(),
            reason,
        })
    }

    /// Qualifies a bare id (plain concatenation with the base).
    #[must_use]
    pub fn qualify(&self, id: &str) -> String {
        format!("{}{}", self.base, id)
    }

    /// Strips the base from a qualified identifier.
    #[must_use]
    pub fn local_name<'a>(&self, iri: &'a str) -> Option<&'a str> {
        iri.strip_prefix(self.base.as_str())
    }
}

/// First character that may not appear in an RDF `IRIREF`.
fn forbidden_char(s: &str) -> Option<char> {
    s.chars()
        .find(|c| c.is_whitespace() || c.is_control() || "<>\"{}|^`\\".contains(*c))
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
