//! `career` module: work history, projects, publications and accolades.

use crate::model::iris::*;
use crate::model::{Class, Module, Property, PropertyKind};

/// Returns the `career` module.
#[must_use]
pub fn module() -> Module {
    Module {
        name: "career",
        label: "Precis Career",
        comment: "Professional history: positions held, projects, publications \
                  and awards.",
        classes: classes(),
        properties: properties(),
    }
}

fn classes() -> Vec<Class> {
    vec![
        Class {
            id: "WorkExperience",
            label: "Work Experience",
            comment: "A position held at an organization. The name is the \
                      role title.",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName", "inCity"],
        },
        Class {
            id: "Project",
            label: "Project",
            comment: "A piece of work, usually related to skills and accolades.",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName"],
        },
        Class {
            id: "Publication",
            label: "Publication",
            comment: "A published paper, article or book.",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName"],
        },
        Class {
            id: "Accolade",
            label: "Accolade",
            comment: "An award or honor, issued by an organization.",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName", "hasDescription"],
        },
    ]
}

fn properties() -> Vec<Property> {
    vec![
        Property {
            id: "employedAt",
            label: "employed at",
            comment: "Employer of a work experience. Counts as an affiliation \
                      when flattening.",
            kind: PropertyKind::Object,
            functional: true,
            domain: &["WorkExperience"],
            range: "Organization",
        },
        Property {
            id: "awardedBy",
            label: "awarded by",
            comment: "Issuer of an accolade.",
            kind: PropertyKind::Object,
            functional: true,
            domain: &["Accolade"],
            range: "Organization",
        },
        Property {
            id: "publishedIn",
            label: "published in",
            comment: "Venue of a publication.",
            kind: PropertyKind::Datatype,
            functional: true,
            domain: &["Publication"],
            range: XSD_STRING,
        },
    ]
}
