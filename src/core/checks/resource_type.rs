//! Allowed resource types
//!
//! With `allow`, every type not listed is reported; with `deny`, every
//! listed type is reported. Types are compared exactly.

use super::{resources, CheckOptions};
use crate::core::error::Result;
use crate::core::finding::Finding;
use crate::core::template::TemplateObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceTypeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<Vec<String>>,
}

impl CheckOptions for ResourceTypeOptions {}

pub fn check(objects: &[TemplateObject], options: &ResourceTypeOptions) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    for object in resources(objects) {
        let resource_type = object.resource_type.as_deref().unwrap_or_default();

        if let Some(allow) = &options.allow {
            if !allow.iter().any(|t| t == resource_type) {
                findings.push(Finding::new(
                    &object.logical_id,
                    format!("Resource Type {} not allowed", resource_type),
                ));
            }
        }
        if let Some(deny) = &options.deny {
            if deny.iter().any(|t| t == resource_type) {
                findings.push(Finding::new(
                    &object.logical_id,
                    format!("Resource Type {} denied", resource_type),
                ));
            }
        }
    }

    Ok(findings)
}
