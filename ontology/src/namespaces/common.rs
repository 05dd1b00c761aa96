//! `common` module: organizations, descriptions and the shared vocabulary.
//!
//! Every other module builds on the properties declared here: names, dates,
//! locations, the reserved `hasDescription` relation and the affiliation
//! relations used to denormalize records at query time.

use crate::model::iris::*;
use crate::model::{Class, Module, Property, PropertyKind};

/// Returns the `common` module.
#[must_use]
pub fn module() -> Module {
    Module {
        name: "common",
        label: "Precis Common",
        comment: "Shared vocabulary: organizations, descriptions, names, dates \
                  and affiliation relations.",
        classes: classes(),
        properties: properties(),
    }
}

fn classes() -> Vec<Class> {
    vec![
        Class {
            id: "Organization",
            label: "Organization",
            comment: "A company, university, publisher or any other body an \
                      entity can be affiliated with. Organizations may be \
                      nested via subOrganizationOf.",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName"],
        },
        Class {
            id: "Description",
            label: "Description",
            comment: "A prioritized block of free text attached to another \
                      individual through hasDescription. Lower priorities are \
                      rendered first.",
            subclass_of: &[OWL_THING],
            at_most_one: &[],
        },
    ]
}

fn properties() -> Vec<Property> {
    vec![
        Property {
            id: "hasName",
            label: "has name",
            comment: "Display name of an individual. Functional only where a \
                      class restricts it; some classes admit aliases.",
            kind: PropertyKind::Datatype,
            functional: false,
            domain: &[],
            range: XSD_STRING,
        },
        Property {
            id: "hasDate",
            label: "has date",
            comment: "Start (or only) date of an individual, used for \
                      chronological ordering.",
            kind: PropertyKind::Datatype,
            functional: true,
            domain: &[],
            range: XSD_DATE,
        },
        Property {
            id: "endDate",
            label: "end date",
            comment: "End date of a time-bounded individual.",
            kind: PropertyKind::Datatype,
            functional: true,
            domain: &[],
            range: XSD_DATE,
        },
        Property {
            id: "inCity",
            label: "in city",
            comment: "City (or cities) where something took place.",
            kind: PropertyKind::Datatype,
            functional: false,
            domain: &[],
            range: XSD_STRING,
        },
        Property {
            id: "hasURL",
            label: "has URL",
            comment: "Web address associated with an individual.",
            kind: PropertyKind::Datatype,
            functional: false,
            domain: &[],
            range: XSD_ANY_URI,
        },
        Property {
            id: "hasText",
            label: "has text",
            comment: "Text of a description.",
            kind: PropertyKind::Datatype,
            functional: true,
            domain: &["Description"],
            range: XSD_STRING,
        },
        Property {
            id: "hasPriority",
            label: "has priority",
            comment: "Ordering key of a description; ascending.",
            kind: PropertyKind::Datatype,
            functional: true,
            domain: &["Description"],
            range: XSD_INTEGER,
        },
        Property {
            id: "hasDescription",
            label: "has description",
            comment: "Attaches Description individuals. Reserved: ingested \
                      through its own expansion step.",
            kind: PropertyKind::Object,
            functional: false,
            domain: &[],
            range: "Description",
        },
        Property {
            id: "relatedTo",
            label: "related to",
            comment: "Generic association between two individuals (e.g. a \
                      project and the skills it exercised).",
            kind: PropertyKind::Object,
            functional: false,
            domain: &[],
            range: OWL_THING,
        },
        Property {
            id: "affiliatedWith",
            label: "affiliated with",
            comment: "Institutional affiliation. Its target's name is nested \
                      as a second-level label when flattening.",
            kind: PropertyKind::Object,
            functional: false,
            domain: &[],
            range: "Organization",
        },
        Property {
            id: "subOrganizationOf",
            label: "sub-organization of",
            comment: "Parent organization; resolved as a third-level label.",
            kind: PropertyKind::Object,
            functional: true,
            domain: &["Organization"],
            range: "Organization",
        },
    ]
}
