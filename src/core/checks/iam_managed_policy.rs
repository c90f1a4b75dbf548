//! Managed policy attachments of IAM users, groups and roles
//!
//! Options: `{allow?: [pattern], deny?: [pattern]}` matched against each
//! entry of `ManagedPolicyArns`.

use super::{resources, CheckOptions};
use crate::core::error::Result;
use crate::core::finding::Finding;
use crate::core::iam::{IamEntity, PatternMatcher};
use crate::core::refs::string_list;
use crate::core::template::TemplateObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagedPolicyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<Vec<String>>,
}

impl CheckOptions for ManagedPolicyOptions {}

pub fn check(objects: &[TemplateObject], options: &ManagedPolicyOptions) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    let principals = resources(objects)
        .filter(|object| IamEntity::of(object).is_some_and(IamEntity::is_principal));

    for object in principals {
        let Some(arns) = object.property("ManagedPolicyArns") else {
            continue;
        };

        for arn in string_list(arns) {
            if let Some(allow) = &options.allow {
                if !PatternMatcher::matches_any(allow, &arn) {
                    findings.push(Finding::new(
                        &object.logical_id,
                        format!("ManagedPolicyARN {} not allowed", arn),
                    ));
                }
            }
            if let Some(deny) = &options.deny {
                if PatternMatcher::matches_any(deny, &arn) {
                    findings.push(Finding::new(
                        &object.logical_id,
                        format!("ManagedPolicyARN {} denied", arn),
                    ));
                }
            }
        }
    }

    Ok(findings)
}
