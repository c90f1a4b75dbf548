//! Naming convention for logical ids
//!
//! Applies to objects of every section. Options: `{case?: "pascal" | "camel"}`,
//! pascal by default. Patterns are anchored at the start only, so an id
//! passes once it opens in the expected case.

use super::CheckOptions;
use crate::core::error::Result;
use crate::core::finding::Finding;
use crate::core::template::TemplateObject;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    #[default]
    Pascal,
    Camel,
}

impl Case {
    const PASCAL_PATTERN: &'static str = r"^([A-Z][a-z0-9]*)+";
    const CAMEL_PATTERN: &'static str = r"^([a-z0-9]+)([A-Z][a-z0-9]+)*";

    fn regex(self) -> &'static Regex {
        static PASCAL: OnceLock<Regex> = OnceLock::new();
        static CAMEL: OnceLock<Regex> = OnceLock::new();

        match self {
            Case::Pascal => PASCAL.get_or_init(|| Regex::new(Self::PASCAL_PATTERN).expect("pascal pattern")),
            Case::Camel => CAMEL.get_or_init(|| Regex::new(Self::CAMEL_PATTERN).expect("camel pattern")),
        }
    }

    pub fn is_match(self, logical_id: &str) -> bool {
        self.regex().is_match(logical_id)
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Case::Pascal => f.write_str("pascal"),
            Case::Camel => f.write_str("camel"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogicalIdOptions {
    #[serde(default)]
    pub case: Case,
}

impl CheckOptions for LogicalIdOptions {}

pub fn check(objects: &[TemplateObject], options: &LogicalIdOptions) -> Result<Vec<Finding>> {
    let findings = objects
        .iter()
        .filter(|object| !options.case.is_match(&object.logical_id))
        .map(|object| {
            Finding::new(
                &object.logical_id,
                format!("Logical ID does not match {}case", options.case),
            )
        })
        .collect();

    Ok(findings)
}
