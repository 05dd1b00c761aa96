//! Precis engine: ingest ordered JSON résumé data into a typed graph and
//! serve ordered, denormalized views of it.
//!
//! The pipeline is
//! [`GraphBuilder`] → [`GraphStore`] → [`QueryEngine`] → [`OverrideRegistry`]
//! → [`TemplateDriver`] → [`Renderer`].
//!
//! # Example
//!
//! ```
//! use precis_engine::{GraphBuilder, MemoryStore, QueryEngine, Order, Vocabulary};
//! use precis_ontology::Schema;
//!
//! let vocabulary = Vocabulary::default();
//! let mut store = MemoryStore::new();
//! let ingestion = GraphBuilder::new(Schema::precis(), &vocabulary).ingest_document(
//!     &mut store,
//!     r#"[
//!         {"$id": "org1", "$type": "Organization", "hasName": "Acme"},
//!         {"$id": "we1", "$type": "WorkExperience", "employedAt": "org1", "hasDate": "2020-01-01"}
//!     ]"#,
//!     Some("https://example.org/cv/"),
//! )?;
//!
//! let engine = QueryEngine::new(&store, Schema::precis(), &vocabulary, &ingestion.namespace);
//! let records = engine.get_all_of_type("WorkExperience", Some(Order::ChronologicalAscending))?;
//! assert_eq!(records[0].get("employedAt"), Some(&serde_json::json!([["Acme"]])));
//! # Ok::<(), precis_engine::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod builder;
pub mod config;
pub mod description;
pub mod document;
pub mod driver;
pub mod error;
pub mod individual;
pub mod namespace;
pub mod overrides;
pub mod query;
pub mod record;
pub mod resolver;
pub mod serializer;
pub mod store;

pub use builder::{GraphBuilder, Ingestion, UnrecognizedProperty};
pub use config::{Settings, Vocabulary};
pub use description::DescriptionExpander;
pub use driver::{DriverState, JsonRenderer, Renderer, TemplateConfig, TemplateDriver};
pub use error::{Error, Result};
pub use individual::{Individual, PropertyValue, Value};
pub use namespace::Namespace;
pub use overrides::{OverrideRegistry, ProjectOverride, RecordOverride};
pub use query::{Order, QueryEngine};
pub use record::Record;
pub use resolver::ReferenceResolver;
pub use serializer::Format;
pub use store::{Direction, GraphStore, Join, MemoryStore, OrderSpec, Staging};
