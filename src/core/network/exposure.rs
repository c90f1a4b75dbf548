//! Security group exposure classification
//!
//! A security group is compared on two axes: what it is attached to
//! (public-facing or private-only resources) and what its ingress rules
//! admit (public or private sources). Only a group attached exclusively to
//! private resources that admits public sources is a violation.

use super::attachment::{collect_attachments, SecurityGroupAttachment};
use super::cidr::is_private;
use crate::core::error::{CheckError, Result};
use crate::core::refs::{alternatives, group_ref, list_items, render};
use crate::core::template::TemplateObject;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub const SECURITY_GROUP: &str = "AWS::EC2::SecurityGroup";
pub const SECURITY_GROUP_INGRESS: &str = "AWS::EC2::SecurityGroupIngress";

/// One inbound rule, inline or standalone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngressRule {
    pub cidr: Option<String>,
    pub cidr_ipv6: Option<String>,
    /// Source group, by logical id when it resolves inside the template,
    /// otherwise as written
    pub source_security_group: Option<String>,
    pub ip_protocol: Option<String>,
    pub from_port: Option<i64>,
    pub to_port: Option<i64>,
}

impl IngressRule {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).map(render);
        let port = |key: &str| {
            value.get(key).and_then(|port| match port {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
        };
        let source = value
            .get("SourceSecurityGroupId")
            .or_else(|| value.get("SourceSecurityGroupName"))
            .map(|source| match group_ref(source) {
                Some(id) => id.to_string(),
                None => render(source),
            });

        IngressRule {
            cidr: text("CidrIp"),
            cidr_ipv6: text("CidrIpv6"),
            source_security_group: source,
            ip_protocol: text("IpProtocol"),
            from_port: port("FromPort"),
            to_port: port("ToPort"),
        }
    }

    /// Admits a source outside the private address space
    pub fn is_public(&self) -> bool {
        self.cidr.as_deref().is_some_and(|cidr| !is_private(cidr)) || self.cidr_ipv6.is_some()
    }

    /// Admits another security group or a private address range
    pub fn is_private(&self) -> bool {
        self.source_security_group.is_some() || self.cidr.as_deref().is_some_and(is_private)
    }
}

/// Outcome of classifying one security group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exposure {
    /// Rules are consistent with the attachments
    Compliant,
    /// Private-only attachments admit public traffic
    Violation,
    /// Attached, but no rule admits anything classifiable
    NoRules,
    /// Nothing in the template attaches to the group
    NoAttachments,
}

/// Decide the exposure outcome from the four classification flags
///
/// First match wins: public attachments accept any rules; private-only
/// attachments reject public rules.
pub fn classify(
    public_attachments: bool,
    private_attachments: bool,
    public_rules: bool,
    private_rules: bool,
) -> Exposure {
    match (public_attachments, private_attachments, public_rules, private_rules) {
        (false, false, _, _) => Exposure::NoAttachments,
        (_, _, false, false) => Exposure::NoRules,
        (true, _, _, _) => Exposure::Compliant,
        (false, true, true, _) => Exposure::Violation,
        (false, true, false, true) => Exposure::Compliant,
    }
}

/// Ingress rules and attachments of every security group in a template
#[derive(Debug, Default)]
pub struct SecurityGroupGraph {
    attachments: HashMap<String, Vec<SecurityGroupAttachment>>,
    ingress: HashMap<String, Vec<IngressRule>>,
}

impl SecurityGroupGraph {
    /// Build the graph once for all groups
    ///
    /// # Errors
    ///
    /// Returns `MissingProperty` for an attachable resource without its
    /// group list, or a standalone ingress without `GroupId`, and
    /// `InvalidProperty` for a group list that is not a list.
    pub fn build(objects: &[TemplateObject]) -> Result<Self> {
        let mut graph = SecurityGroupGraph::default();

        for attachment in collect_attachments(objects)? {
            graph
                .attachments
                .entry(attachment.group_id.clone())
                .or_default()
                .push(attachment);
        }

        for object in objects.iter().filter(|o| o.is_resource_of(SECURITY_GROUP_INGRESS)) {
            let group = object
                .property("GroupId")
                .ok_or_else(|| CheckError::missing(&object.logical_id, "GroupId"))?;

            let Some(properties) = object.properties() else {
                continue;
            };
            let rule = IngressRule::from_value(properties);

            // GroupId outside the template (literal id, import) binds to nothing here
            for group_id in alternatives(group).into_iter().filter_map(group_ref) {
                graph
                    .ingress
                    .entry(group_id.to_string())
                    .or_default()
                    .push(rule.clone());
            }
        }

        Ok(graph)
    }

    /// Attachments referencing the group
    pub fn attachments_of(&self, group_id: &str) -> &[SecurityGroupAttachment] {
        self.attachments.get(group_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Standalone ingress rules followed by the group's inline rules
    ///
    /// Inline rules under a condition count for every branch.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProperty` if `SecurityGroupIngress` is not a list.
    pub fn rules_of(&self, group: &TemplateObject) -> Result<Vec<IngressRule>> {
        let mut rules = self
            .ingress
            .get(&group.logical_id)
            .cloned()
            .unwrap_or_default();

        if let Some(inline) = group.property("SecurityGroupIngress") {
            let inline = list_items(inline)
                .ok_or_else(|| CheckError::invalid(&group.logical_id, "SecurityGroupIngress"))?;
            rules.extend(inline.into_iter().map(IngressRule::from_value));
        }
        Ok(rules)
    }

    /// Classify one security group
    pub fn exposure(&self, group: &TemplateObject) -> Result<Exposure> {
        let attachments = self.attachments_of(&group.logical_id);
        let rules = self.rules_of(group)?;

        let outcome = classify(
            attachments.iter().any(|a| a.is_public),
            attachments.iter().any(|a| !a.is_public),
            rules.iter().any(IngressRule::is_public),
            rules.iter().any(IngressRule::is_private),
        );

        debug!(
            group = %group.logical_id,
            attachments = attachments.len(),
            rules = rules.len(),
            ?outcome,
            "classified security group"
        );
        Ok(outcome)
    }
}
