//! N-Triples serializer for a populated graph.
//!
//! One triple per line with absolute IRIs, suitable for streaming, bulk
//! loading and diff-friendly storage.

use precis_ontology::{iris, Ontology};

use super::{escape, literal};
use crate::individual::Value;
use crate::store::GraphStore;

/// Serializes every individual in `store` to an N-Triples string.
#[must_use]
pub fn to_ntriples(store: &dyn GraphStore, ontology: &Ontology) -> String {
    let mut out = String::with_capacity(64 * 1024);

    for individual in store.individuals() {
        triple(&mut out, &individual.iri, iris::RDF_TYPE, &iri(iris::OWL_NAMED_INDIVIDUAL));
        triple(&mut out, &individual.iri, iris::RDF_TYPE, &iri(&ontology.iri(&individual.class)));
        for (property, value) in &individual.properties {
            let predicate = ontology.iri(property);
            for v in value.values() {
                triple(&mut out, &individual.iri, &predicate, &object(v));
            }
        }
    }

    out
}

fn triple(out: &mut String, subj: &str, pred: &str, obj: &str) {
    out.push('<');
    out.push_str(subj);
    out.push_str("> <");
    out.push_str(pred);
    out.push_str("> ");
    out.push_str(obj);
    out.push_str(" .\n");
}

fn iri(s: &str) -> String {
    format!("<{s}>")
}

fn object(value: &Value) -> String {
    match literal(value) {
        Some((lexical, datatype)) => format!("\"{}\"^^<{}>", escape(&lexical), datatype),
        None => iri(value.as_iri().unwrap_or_default()),
    }
}
