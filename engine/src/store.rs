//! Graph storage.
//!
//! [`GraphStore`] is the seam between ingestion/querying and the concrete
//! storage. [`MemoryStore`] keeps individuals in insertion order with an
//! identifier index. [`Staging`] overlays uncommitted individuals on top of a
//! store so that a whole document can be validated before anything is
//! written.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::individual::{Individual, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// What to do with individuals lacking the sort property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// Keep them, after every individual that has the property.
    Optional,
    /// Drop them.
    Required,
}

/// Ordering request passed to [`GraphStore::query_by_type`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    /// Property whose first value is the sort key.
    pub property: String,
    /// Sort direction.
    pub direction: Direction,
    /// Treatment of individuals without the property.
    pub join: Join,
    /// Compare strings case-insensitively.
    pub case_insensitive: bool,
}

impl OrderSpec {
    /// Date ordering that keeps undated individuals.
    #[must_use]
    pub fn chronological(property: &str, direction: Direction) -> Self {
        Self {
            property: property.to_owned(),
            direction,
            join: Join::Optional,
            case_insensitive: false,
        }
    }

    /// Case-insensitive name ordering that drops unnamed individuals.
    #[must_use]
    pub fn alphabetical(property: &str, direction: Direction) -> Self {
        Self {
            property: property.to_owned(),
            direction,
            join: Join::Required,
            case_insensitive: true,
        }
    }

    /// Orders `individuals` in place. The sort is stable: ties keep their
    /// relative order whatever the direction.
    pub fn apply(&self, individuals: &mut Vec<&Individual>) {
        let (mut keyed, unkeyed): (Vec<&Individual>, Vec<&Individual>) = individuals
            .drain(..)
            .partition(|ind| ind.values(&self.property).first().is_some());
        keyed.sort_by(|a, b| {
            let ordering = compare(
                &a.values(&self.property)[0],
                &b.values(&self.property)[0],
                self.case_insensitive,
            );
            match self.direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
        individuals.extend(keyed);
        if self.join == Join::Optional {
            individuals.extend(unkeyed);
        }
    }
}

fn compare(a: &Value, b: &Value, case_insensitive: bool) -> Ordering {
    match (a, b) {
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) if case_insensitive => {
            x.to_lowercase().cmp(&y.to_lowercase())
        }
        (Value::Str(x), Value::Str(y)) | (Value::IriRef(x), Value::IriRef(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Int(_) => 1,
        Value::Float(_) => 2,
        Value::Date(_) => 3,
        Value::Str(_) => 4,
        Value::IriRef(_) => 5,
    }
}

/// Storage of committed individuals.
pub trait GraphStore {
    /// Adds an individual.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateIdentifier`] if an individual with the same
    /// qualified identifier is already present.
    fn insert(&mut self, individual: Individual) -> Result<()>;

    /// Exact lookup by qualified identifier.
    fn find_by_id(&self, iri: &str) -> Option<&Individual>;

    /// Every individual, in insertion order.
    fn individuals(&self) -> Box<dyn Iterator<Item = &Individual> + '_>;

    /// Individuals of exactly `class`, in insertion order unless `order` is
    /// given.
    fn query_by_type(&self, class: &str, order: Option<&OrderSpec>) -> Vec<&Individual> {
        let mut found: Vec<&Individual> = self
            .individuals()
            .filter(|ind| ind.class == class)
            .collect();
        if let Some(order) = order {
            order.apply(&mut found);
        }
        found
    }

    /// Individuals holding `relation` pointing at `iri`, in insertion order.
    fn find_back_references(&self, iri: &str, relation: &str) -> Vec<&Individual> {
        self.individuals()
            .filter(|ind| ind.references(relation, iri))
            .collect()
    }

    /// Number of stored individuals.
    fn len(&self) -> usize {
        self.individuals().count()
    }

    /// Returns `true` when nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`GraphStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    individuals: Vec<Individual>,
    index: HashMap<String, usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GraphStore for MemoryStore {
    fn insert(&mut self, individual: Individual) -> Result<()> {
        if self.index.contains_key(&individual.iri) {
            return Err(Error::DuplicateIdentifier { id: individual.id });
        }
        self.index
            .insert(individual.iri.clone(), self.individuals.len());
        self.individuals.push(individual);
        Ok(())
    }

    fn find_by_id(&self, iri: &str) -> Option<&Individual> {
        self.index.get(iri).map(|&i| &self.individuals[i])
    }

    fn individuals(&self) -> Box<dyn Iterator<Item = &Individual> + '_> {
        Box::new(self.individuals.iter())
    }

    fn len(&self) -> usize {
        self.individuals.len()
    }
}

/// Uncommitted individuals layered over a read-only store.
pub struct Staging<'s> {
    base: &'s dyn GraphStore,
    staged: MemoryStore,
}

impl<'s> Staging<'s> {
    /// Starts an empty overlay over `base`.
    #[must_use]
    pub fn new(base: &'s dyn GraphStore) -> Self {
        Self {
            base,
            staged: MemoryStore::new(),
        }
    }

    /// Releases the overlay, returning staged individuals in staging order.
    #[must_use]
    pub fn into_staged(self) -> Vec<Individual> {
        self.staged.individuals
    }
}

impl GraphStore for Staging<'_> {
    fn insert(&mut self, individual: Individual) -> Result<()> {
        if self.base.find_by_id(&individual.iri).is_some() {
            return Err(Error::DuplicateIdentifier { id: individual.id });
        }
        self.staged.insert(individual)
    }

    fn find_by_id(&self, iri: &str) -> Option<&Individual> {
        self.staged
            .find_by_id(iri)
            .or_else(|| self.base.find_by_id(iri))
    }

    fn individuals(&self) -> Box<dyn Iterator<Item = &Individual> + '_> {
        Box::new(self.base.individuals().chain(self.staged.individuals()))
    }
}
