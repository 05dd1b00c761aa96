//! Bare-id reference resolution.

use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::namespace::Namespace;
use crate::store::GraphStore;

/// Resolves bare ids within one namespace.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'n> {
    namespace: &'n Namespace,
}

impl<'n> ReferenceResolver<'n> {
    /// Creates a resolver for `namespace`.
    #[must_use]
    pub fn new(namespace: &'n Namespace) -> Self {
        Self { namespace }
    }

    /// Finds the individual `bare_id` refers to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reference`] naming `bare_id` and `referrer` when no
    /// individual with that id has been stored or staged yet.
    pub fn resolve<'g>(
        &self,
        graph: &'g dyn GraphStore,
        bare_id: &str,
        referrer: &str,
    ) -> Result<&'g Individual> {
        graph
            .find_by_id(&self.namespace.qualify(bare_id))
            .ok_or_else(|| Error::Reference {
                missing: bare_id.to_owned(),
                referrer: referrer.to_owned(),
            })
    }
}
