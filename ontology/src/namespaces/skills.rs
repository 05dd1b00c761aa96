//! `skills` module: skills and the groups they belong to.

use crate::model::iris::*;
use crate::model::{Class, Module, Property, PropertyKind};

/// Returns the `skills` module.
#[must_use]
pub fn module() -> Module {
    Module {
        name: "skills",
        label: "Precis Skills",
        comment: "Skills and skill groups.",
        classes: classes(),
        properties: properties(),
    }
}

fn classes() -> Vec<Class> {
    vec![
        Class {
            id: "Skill",
            label: "Skill",
            comment: "A single skill (a language, tool or technique).",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName"],
        },
        Class {
            id: "SkillGroup",
            label: "Skill Group",
            comment: "A named group of skills (e.g. \"Languages\").",
            subclass_of: &[OWL_THING],
            at_most_one: &["hasName"],
        },
    ]
}

fn properties() -> Vec<Property> {
    vec![Property {
        id: "memberOf",
        label: "member of",
        comment: "Groups a skill belongs to.",
        kind: PropertyKind::Object,
        functional: false,
        domain: &["Skill"],
        range: "SkillGroup",
    }]
}
