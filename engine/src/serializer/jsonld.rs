//! JSON-LD 1.1 serializer for a populated graph.
//!
//! Produces a single document with an `@context` binding the ontology and
//! XSD prefixes, and an `@graph` array with one node per individual.

use precis_ontology::{iris, Ontology};
use serde_json::{json, Map, Value as Json};

use super::literal;
use crate::individual::{Individual, PropertyValue};
use crate::store::GraphStore;

/// Serializes every individual in `store` to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(store: &dyn GraphStore, ontology: &Ontology) -> Json {
    let graph: Vec<Json> = store.individuals().map(individual_to_json).collect();
    json!({
        "@context": {
            "owl": iris::OWL,
            "rdf": iris::RDF,
            "rdfs": iris::RDFS,
            "xsd": iris::XSD,
            "precis": ontology.base_iri
        },
        "@graph": graph
    })
}

fn individual_to_json(individual: &Individual) -> Json {
    let mut node = Map::new();
    node.insert("@id".to_owned(), json!(individual.iri));
    node.insert(
        "@type".to_owned(),
        json!(["owl:NamedIndividual", format!("precis:{}", individual.class)]),
    );
    for (property, value) in &individual.properties {
        let encoded = match value {
            PropertyValue::Single(v) => value_to_json(v),
            PropertyValue::List(vs) => Json::Array(vs.iter().map(value_to_json).collect()),
        };
        node.insert(format!("precis:{property}"), encoded);
    }
    Json::Object(node)
}

fn value_to_json(value: &crate::individual::Value) -> Json {
    match literal(value) {
        Some((lexical, iris::XSD_STRING)) => json!(lexical),
        Some((lexical, datatype)) => {
            let short = datatype.strip_prefix(iris::XSD).unwrap_or(datatype);
            json!({ "@value": lexical, "@type": format!("xsd:{short}") })
        }
        None => json!({ "@id": value.as_iri().unwrap_or_default() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::fixture;

    #[test]
    fn graph_has_one_node_per_individual() {
        let store = fixture::store();
        let doc = to_json_ld(&store, Ontology::full());
        assert_eq!(doc["@context"]["precis"], json!("https://precis.dev/ontology#"));
        assert_eq!(doc["@graph"].as_array().map(Vec::len), Some(store.len()));
    }

    #[test]
    fn shapes_follow_cardinality() {
        let doc = to_json_ld(&fixture::store(), Ontology::full());
        let we = &doc["@graph"][1];
        assert_eq!(we["@id"], json!(format!("{}we1", fixture::NS)));
        assert_eq!(we["precis:employedAt"], json!({ "@id": format!("{}org1", fixture::NS) }));
        assert_eq!(we["precis:hasURL"], json!(["https://a.example", "https://b.example"]));
        assert_eq!(
            we["precis:hasDate"],
            json!({ "@value": "2020-01-01", "@type": "xsd:date" })
        );
    }
}
