//! Individual template checks
//!
//! Every check is a pure function from the flattened objects and its options
//! to a list of findings. [`CheckKind`] is the closed set of checks the runner
//! can dispatch to.

pub mod iam_inline_policy;
pub mod iam_managed_policy;
pub mod iam_policy;
pub mod logical_id;
pub mod resource_type;
pub mod security_group_inbound;

use crate::core::error::{CheckError, Result};
use crate::core::finding::Finding;
use crate::core::template::TemplateObject;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Options accepted by a check
///
/// A check enabled with a bare boolean gets [`CheckOptions::from_toggle`];
/// any other value is deserialized.
pub trait CheckOptions: DeserializeOwned + Default {
    fn from_toggle(_enabled: bool) -> Self {
        Self::default()
    }
}

/// Parse the options value configured for a check
///
/// # Errors
///
/// Returns `InvalidOptions` if the value does not fit the check's options.
pub fn parse_options<T: CheckOptions>(check: &str, value: &Value) -> Result<T> {
    match value {
        Value::Null => Ok(T::default()),
        Value::Bool(enabled) => Ok(T::from_toggle(*enabled)),
        other => serde_json::from_value(other.clone()).map_err(|source| {
            CheckError::InvalidOptions {
                check: check.to_string(),
                source,
            }
        }),
    }
}

/// Available checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    IamPolicy,
    IamManagedPolicy,
    IamInlinePolicy,
    SecurityGroupInbound,
    ResourceType,
    LogicalId,
}

impl CheckKind {
    pub const ALL: [CheckKind; 6] = [
        CheckKind::IamPolicy,
        CheckKind::IamManagedPolicy,
        CheckKind::IamInlinePolicy,
        CheckKind::SecurityGroupInbound,
        CheckKind::ResourceType,
        CheckKind::LogicalId,
    ];

    /// Name used in checks configuration
    pub fn name(self) -> &'static str {
        match self {
            CheckKind::IamPolicy => "iamPolicy",
            CheckKind::IamManagedPolicy => "iamManagedPolicy",
            CheckKind::IamInlinePolicy => "iamInlinePolicy",
            CheckKind::SecurityGroupInbound => "securityGroupInbound",
            CheckKind::ResourceType => "resourceType",
            CheckKind::LogicalId => "logicalID",
        }
    }

    /// Run the check with its raw options value
    pub fn run(self, objects: &[TemplateObject], options: &Value) -> Result<Vec<Finding>> {
        let name = self.name();
        match self {
            CheckKind::IamPolicy => iam_policy::check(objects, &parse_options(name, options)?),
            CheckKind::IamManagedPolicy => {
                iam_managed_policy::check(objects, &parse_options(name, options)?)
            }
            CheckKind::IamInlinePolicy => {
                iam_inline_policy::check(objects, &parse_options(name, options)?)
            }
            CheckKind::SecurityGroupInbound => {
                security_group_inbound::check(objects, &parse_options(name, options)?)
            }
            CheckKind::ResourceType => resource_type::check(objects, &parse_options(name, options)?),
            CheckKind::LogicalId => logical_id::check(objects, &parse_options(name, options)?),
        }
    }
}

impl FromStr for CheckKind {
    type Err = CheckError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| CheckError::UnknownCheck(name.to_string()))
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource-section objects only
pub(crate) fn resources(objects: &[TemplateObject]) -> impl Iterator<Item = &TemplateObject> {
    objects.iter().filter(|object| object.is_resource())
}

#[cfg(test)]
mod tests;
