//! `education` module: degrees, courses and knowledge areas.

use crate::model::iris::*;
use crate::model::{Class, Module, Property, PropertyKind};

/// Returns the `education` module.
#[must_use]
pub fn module() -> Module {
    Module {
        name: "education",
        label: "Precis Education",
        comment: "Academic history: degrees, the courses taken for them and \
                  broader knowledge areas.",
        classes: classes(),
        properties: properties(),
    }
}

fn classes() -> Vec<Class> {
    vec![
        Class {
            id: "Degree",
            label: "Degree",
            comment: "An academic degree, affiliated with the awarding \
                      institution.",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName", "affiliatedWith", "degreeType"],
        },
        Class {
            id: "Course",
            label: "Course",
            comment: "A course taken, usually affiliated with an institution \
                      or related to a degree.",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName", "affiliatedWith"],
        },
        Class {
            id: "KnowledgeArea",
            label: "Knowledge Area",
            comment: "A field of study. Admits several names (aliases).",
            subclass_of: &[OWL_THING],
            at_most_one: &[],
        },
    ]
}

fn properties() -> Vec<Property> {
    vec![
        Property {
            id: "degreeType",
            label: "degree type",
            comment: "Kind of degree (e.g. \"B.S.\", \"Ph.D.\").",
            kind: PropertyKind::Datatype,
            functional: false,
            domain: &["Degree"],
            range: XSD_STRING,
        },
        Property {
            id: "degreeConcentration",
            label: "degree concentration",
            comment: "Majors, minors or concentrations of a degree.",
            kind: PropertyKind::Datatype,
            functional: false,
            domain: &["Degree"],
            range: XSD_STRING,
        },
        Property {
            id: "courseCode",
            label: "course code",
            comment: "Catalog code of a course.",
            kind: PropertyKind::Datatype,
            functional: true,
            domain: &["Course"],
            range: XSD_STRING,
        },
    ]
}
