//! Allowed actions and resources of IAM policies
//!
//! Applies to standalone and managed policies, and to users, groups and
//! roles with inline policies. Options: `{allow?: [rule], deny?: [rule]}`,
//! where a rule is `{action, resource}` (wildcards allowed) or a bare
//! action pattern.

use super::{resources, CheckOptions};
use crate::core::error::Result;
use crate::core::finding::Finding;
use crate::core::iam::{extract_statements, IamEntity, IamPolicyOptions, PolicyEvaluator};
use crate::core::template::TemplateObject;

impl CheckOptions for IamPolicyOptions {}

pub fn check(objects: &[TemplateObject], options: &IamPolicyOptions) -> Result<Vec<Finding>> {
    let evaluator = PolicyEvaluator::new(options);
    let mut findings = Vec::new();

    for object in resources(objects) {
        let Some(entity) = IamEntity::of(object) else {
            continue;
        };
        if let Some(statements) = extract_statements(object, entity)? {
            findings.extend(evaluator.evaluate(&object.logical_id, &statements));
        }
    }

    Ok(findings)
}
