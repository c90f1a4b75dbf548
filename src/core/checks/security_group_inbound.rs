//! Public inbound rules on security groups of private resources
//!
//! Only security groups attached to an external load balancer may admit
//! traffic from public addresses. Groups attached to anything else must
//! restrict inbound traffic to other security groups or private ranges.
//! Assumes EC2-VPC. Options: none (`true`).

use super::{resources, CheckOptions};
use crate::core::error::Result;
use crate::core::finding::Finding;
use crate::core::network::{Exposure, SecurityGroupGraph, SECURITY_GROUP};
use crate::core::template::TemplateObject;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityGroupInboundOptions {}

impl CheckOptions for SecurityGroupInboundOptions {}

pub fn check(
    objects: &[TemplateObject],
    _options: &SecurityGroupInboundOptions,
) -> Result<Vec<Finding>> {
    let groups: Vec<&TemplateObject> = resources(objects)
        .filter(|object| object.is_resource_of(SECURITY_GROUP))
        .collect();
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let graph = SecurityGroupGraph::build(objects)?;
    let mut findings = Vec::new();

    for group in groups {
        match graph.exposure(group)? {
            Exposure::Violation => findings.push(Finding::new(
                &group.logical_id,
                "public inbound rules for private attachments found",
            )),
            Exposure::NoRules => {
                warn!(group = %group.logical_id, "security group has no classifiable ingress rules")
            }
            Exposure::NoAttachments => {
                warn!(group = %group.logical_id, "security group is not attached to any resource")
            }
            Exposure::Compliant => {}
        }
    }

    Ok(findings)
}
