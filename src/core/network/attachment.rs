//! Resources that attach to security groups
//!
//! Each attachable resource type names its security groups in its own
//! place. [`AttachmentKind`] is the closed set of supported types; it knows
//! where to find the group references and whether the resource faces the
//! public internet.

use crate::core::error::{CheckError, Result};
use crate::core::refs::{group_ref, group_refs, list_items};
use crate::core::template::TemplateObject;
use serde_json::Value;

/// Resource types that can be attached to a security group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    LoadBalancer,
    LaunchConfiguration,
    Instance,
    SpotFleet,
    DbInstance,
    DbCluster,
    RedshiftCluster,
    CacheCluster,
    ReplicationGroup,
    EfsMountTarget,
    OpsWorksLayer,
    NetworkInterface,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 12] = [
        AttachmentKind::LoadBalancer,
        AttachmentKind::LaunchConfiguration,
        AttachmentKind::Instance,
        AttachmentKind::SpotFleet,
        AttachmentKind::DbInstance,
        AttachmentKind::DbCluster,
        AttachmentKind::RedshiftCluster,
        AttachmentKind::CacheCluster,
        AttachmentKind::ReplicationGroup,
        AttachmentKind::EfsMountTarget,
        AttachmentKind::OpsWorksLayer,
        AttachmentKind::NetworkInterface,
    ];

    /// CloudFormation resource type
    pub fn resource_type(self) -> &'static str {
        match self {
            AttachmentKind::LoadBalancer => "AWS::ElasticLoadBalancing::LoadBalancer",
            AttachmentKind::LaunchConfiguration => "AWS::AutoScaling::LaunchConfiguration",
            AttachmentKind::Instance => "AWS::EC2::Instance",
            AttachmentKind::SpotFleet => "AWS::EC2::SpotFleet",
            AttachmentKind::DbInstance => "AWS::RDS::DBInstance",
            AttachmentKind::DbCluster => "AWS::RDS::DBCluster",
            AttachmentKind::RedshiftCluster => "AWS::Redshift::Cluster",
            AttachmentKind::CacheCluster => "AWS::ElastiCache::CacheCluster",
            AttachmentKind::ReplicationGroup => "AWS::ElastiCache::ReplicationGroup",
            AttachmentKind::EfsMountTarget => "AWS::EFS::MountTarget",
            AttachmentKind::OpsWorksLayer => "AWS::OpsWorks::Layer",
            AttachmentKind::NetworkInterface => "AWS::EC2::NetworkInterface",
        }
    }

    pub fn from_type(resource_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.resource_type() == resource_type)
    }

    /// Resolve the attachment kind of a Resource-section object
    pub fn of(object: &TemplateObject) -> Option<Self> {
        if !object.is_resource() {
            return None;
        }
        object.resource_type.as_deref().and_then(Self::from_type)
    }

    /// Logical ids of the security groups this resource references
    ///
    /// # Errors
    ///
    /// Returns `MissingProperty` when the property holding the group list is
    /// absent, and `InvalidProperty` when it is not a list once conditions
    /// are expanded; such a resource cannot be placed in the attachment graph.
    pub fn normalize(self, object: &TemplateObject) -> Result<Vec<String>> {
        match self {
            AttachmentKind::LoadBalancer
            | AttachmentKind::LaunchConfiguration
            | AttachmentKind::EfsMountTarget => flat_groups(object, "SecurityGroups"),
            AttachmentKind::DbInstance => flat_groups(object, "VPCSecurityGroups"),
            AttachmentKind::DbCluster
            | AttachmentKind::RedshiftCluster
            | AttachmentKind::CacheCluster => flat_groups(object, "VpcSecurityGroupIds"),
            AttachmentKind::ReplicationGroup => flat_groups(object, "SecurityGroupIds"),
            AttachmentKind::OpsWorksLayer => flat_groups(object, "CustomSecurityGroupIds"),
            AttachmentKind::NetworkInterface => flat_groups(object, "GroupSet"),
            AttachmentKind::Instance => match object.property("NetworkInterfaces") {
                Some(interfaces) => {
                    let interfaces = list_items(interfaces)
                        .ok_or_else(|| CheckError::invalid(&object.logical_id, "NetworkInterfaces"))?;

                    let mut ids = Vec::new();
                    for (index, interface) in interfaces.into_iter().enumerate() {
                        let Some(groups) = interface.get("GroupSet") else {
                            continue;
                        };
                        ids.extend(group_refs(groups).ok_or_else(|| {
                            CheckError::invalid(
                                &object.logical_id,
                                format!("NetworkInterfaces[{}].GroupSet", index),
                            )
                        })?);
                    }
                    Ok(ids)
                }
                None => flat_groups(object, "SecurityGroupIds"),
            },
            AttachmentKind::SpotFleet => {
                let config = object.property("SpotFleetRequestConfigData").ok_or_else(|| {
                    CheckError::missing(&object.logical_id, "SpotFleetRequestConfigData")
                })?;
                let Some(specifications) = config.get("LaunchSpecifications") else {
                    return Ok(Vec::new());
                };
                let specifications = list_items(specifications).ok_or_else(|| {
                    CheckError::invalid(
                        &object.logical_id,
                        "SpotFleetRequestConfigData.LaunchSpecifications",
                    )
                })?;

                let mut ids = Vec::new();
                for (index, specification) in specifications.into_iter().enumerate() {
                    let Some(groups) = specification.get("SecurityGroups") else {
                        continue;
                    };
                    ids.extend(spot_fleet_groups(groups).ok_or_else(|| {
                        CheckError::invalid(
                            &object.logical_id,
                            format!("LaunchSpecifications[{}].SecurityGroups", index),
                        )
                    })?);
                }
                Ok(ids)
            }
        }
    }

    /// True if the resource accepts traffic from the public internet
    ///
    /// Only a load balancer without `Scheme: internal` is public.
    pub fn is_public(self, object: &TemplateObject) -> bool {
        match self {
            AttachmentKind::LoadBalancer => {
                object.property("Scheme").and_then(Value::as_str) != Some("internal")
            }
            _ => false,
        }
    }
}

fn flat_groups(object: &TemplateObject, property: &str) -> Result<Vec<String>> {
    let groups = object
        .property(property)
        .ok_or_else(|| CheckError::missing(&object.logical_id, property))?;
    group_refs(groups).ok_or_else(|| CheckError::invalid(&object.logical_id, property))
}

// Launch specifications list either `{"Ref": ..}` or `{"GroupId": {"Ref": ..}}`
fn spot_fleet_groups(groups: &Value) -> Option<Vec<String>> {
    let ids = list_items(groups)?
        .into_iter()
        .filter_map(|entry| group_ref(entry).or_else(|| entry.get("GroupId").and_then(group_ref)))
        .map(str::to_string)
        .collect();
    Some(ids)
}

/// One resource referencing one security group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupAttachment {
    /// Logical id of the referenced security group
    pub group_id: String,
    /// Logical id of the attaching resource
    pub attached_id: String,
    pub kind: AttachmentKind,
    pub is_public: bool,
}

/// Every attachment expressed in the template, in object order
pub fn collect_attachments(objects: &[TemplateObject]) -> Result<Vec<SecurityGroupAttachment>> {
    let mut attachments = Vec::new();

    for object in objects {
        let Some(kind) = AttachmentKind::of(object) else {
            continue;
        };
        let is_public = kind.is_public(object);

        for group_id in kind.normalize(object)? {
            attachments.push(SecurityGroupAttachment {
                group_id,
                attached_id: object.logical_id.clone(),
                kind,
                is_public,
            });
        }
    }

    Ok(attachments)
}
