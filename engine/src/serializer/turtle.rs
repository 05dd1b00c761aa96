//! Turtle 1.1 serializer for a populated graph.
//!
//! Produces prefix declarations followed by one subject block per
//! individual, in store order.

use precis_ontology::{iris, Ontology};

use super::{escape, literal};
use crate::individual::Value;
use crate::store::GraphStore;

/// Serializes every individual in `store` to a Turtle string.
#[must_use]
pub fn to_turtle(store: &dyn GraphStore, ontology: &Ontology) -> String {
    let mut out = String::with_capacity(64 * 1024);

    // Prefix declarations
    out.push_str(&format!("@prefix owl:    <{}> .\n", iris::OWL));
    out.push_str(&format!("@prefix rdf:    <{}> .\n", iris::RDF));
    out.push_str(&format!("@prefix rdfs:   <{}> .\n", iris::RDFS));
    out.push_str(&format!("@prefix xsd:    <{}> .\n", iris::XSD));
    out.push_str(&format!("@prefix precis: <{}> .\n", ontology.base_iri));
    out.push('\n');

    for individual in store.individuals() {
        let mut block = format!(
            "<{}>\n  a owl:NamedIndividual , precis:{}",
            individual.iri, individual.class
        );
        for (property, value) in &individual.properties {
            let objects: Vec<String> = value.values().iter().map(value_to_turtle).collect();
            if objects.is_empty() {
                continue;
            }
            block.push_str(&format!(" ;\n  precis:{} {}", property, objects.join(" , ")));
        }
        block.push_str(" .\n\n");
        out.push_str(&block);
    }

    out
}

fn value_to_turtle(value: &Value) -> String {
    match literal(value) {
        Some((lexical, iris::XSD_STRING)) => format!("\"{}\"", escape(&lexical)),
        Some((lexical, datatype)) => {
            let short = datatype.strip_prefix(iris::XSD).unwrap_or(datatype);
            format!("\"{}\"^^xsd:{}", escape(&lexical), short)
        }
        None => format!("<{}>", value.as_iri().unwrap_or_default()),
    }
}
