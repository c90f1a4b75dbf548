//! Inline policies on IAM users, groups and roles
//!
//! Options: boolean. `true` permits inline policies, `false` reports every
//! `AWS::IAM::Policy` and every principal with `Policies`.

use super::{resources, CheckOptions};
use crate::core::error::Result;
use crate::core::finding::Finding;
use crate::core::iam::IamEntity;
use crate::core::template::TemplateObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlinePolicyOptions {
    pub allowed: bool,
}

impl Default for InlinePolicyOptions {
    fn default() -> Self {
        InlinePolicyOptions { allowed: true }
    }
}

impl CheckOptions for InlinePolicyOptions {
    fn from_toggle(enabled: bool) -> Self {
        InlinePolicyOptions { allowed: enabled }
    }
}

pub fn check(objects: &[TemplateObject], options: &InlinePolicyOptions) -> Result<Vec<Finding>> {
    if options.allowed {
        return Ok(Vec::new());
    }

    let findings = resources(objects)
        .filter(|object| match IamEntity::of(object) {
            Some(IamEntity::Policy) => true,
            Some(entity) if entity.is_principal() => object.property("Policies").is_some(),
            _ => false,
        })
        .map(|object| Finding::new(&object.logical_id, "Inline Policy not allowed"))
        .collect();

    Ok(findings)
}
