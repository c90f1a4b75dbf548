//! IAM policy documents as found inside templates
//!
//! Statements are read leniently: a malformed statement is kept with the
//! fields that could be understood, so the evaluator still sees it.

use crate::core::error::{CheckError, Result};
use crate::core::refs::{alternatives, list_items, string_list};
use crate::core::template::TemplateObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Effect of a policy statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Grants the listed capabilities
    Allow,
    /// Revokes the listed capabilities
    Deny,
}

impl Effect {
    fn parse(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "Allow" => Some(Effect::Allow),
            "Deny" => Some(Effect::Deny),
            _ => None,
        }
    }
}

/// A single policy statement
///
/// Each list is `None` when the key is absent; scalar values are coerced
/// into one-element lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// `None` when the effect is absent or unrecognised
    pub effect: Option<Effect>,
    pub action: Option<Vec<String>>,
    pub not_action: Option<Vec<String>>,
    pub resource: Option<Vec<String>>,
    pub not_resource: Option<Vec<String>>,
}

impl PolicyStatement {
    /// Create an Allow statement
    pub fn allow(action: Vec<String>, resource: Vec<String>) -> Self {
        PolicyStatement {
            effect: Some(Effect::Allow),
            action: Some(action),
            resource: Some(resource),
            ..Default::default()
        }
    }

    /// Read a statement from its template form
    pub fn from_value(value: &Value) -> Self {
        let list = |key: &str| value.get(key).map(string_list);
        PolicyStatement {
            effect: value.get("Effect").and_then(Effect::parse),
            action: list("Action"),
            not_action: list("NotAction"),
            resource: list("Resource"),
            not_resource: list("NotResource"),
        }
    }

    pub fn is_allow(&self) -> bool {
        self.effect == Some(Effect::Allow)
    }

    /// True if the statement uses an open complement set
    pub fn has_complement(&self) -> bool {
        self.not_action.is_some() || self.not_resource.is_some()
    }
}

/// IAM resource types that carry policy statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IamEntity {
    Policy,
    ManagedPolicy,
    User,
    Group,
    Role,
}

impl IamEntity {
    pub fn from_type(resource_type: &str) -> Option<Self> {
        match resource_type {
            "AWS::IAM::Policy" => Some(IamEntity::Policy),
            "AWS::IAM::ManagedPolicy" => Some(IamEntity::ManagedPolicy),
            "AWS::IAM::User" => Some(IamEntity::User),
            "AWS::IAM::Group" => Some(IamEntity::Group),
            "AWS::IAM::Role" => Some(IamEntity::Role),
            _ => None,
        }
    }

    /// Resolve the entity kind of a Resource-section object
    pub fn of(object: &TemplateObject) -> Option<Self> {
        if !object.is_resource() {
            return None;
        }
        object.resource_type.as_deref().and_then(Self::from_type)
    }

    /// Users, groups and roles; the entities that take inline and managed
    /// policy attachments
    pub fn is_principal(self) -> bool {
        matches!(self, IamEntity::User | IamEntity::Group | IamEntity::Role)
    }
}

/// Statements of a policy document
///
/// A single statement object is accepted in place of a list, and a missing
/// `Statement` means no statements. Conditional documents and statements
/// contribute every branch. Returns `None` when the document or its
/// `Statement` has a shape that cannot hold statements.
pub fn document_statements(document: &Value) -> Option<Vec<PolicyStatement>> {
    let mut statements = Vec::new();

    for document in alternatives(document) {
        let Some(statement) = document.as_object()?.get("Statement") else {
            continue;
        };
        for statement in alternatives(statement) {
            match statement {
                Value::Object(_) => statements.push(PolicyStatement::from_value(statement)),
                list => statements.extend(
                    list_items(list)?
                        .into_iter()
                        .map(PolicyStatement::from_value),
                ),
            }
        }
    }

    Some(statements)
}

/// Extract every statement an IAM object carries
///
/// Standalone and managed policies read `Properties.PolicyDocument`;
/// users, groups and roles concatenate the documents of their inline
/// `Properties.Policies`. Returns `Ok(None)` for principals without a
/// `Policies` property, which carry nothing to evaluate.
///
/// # Errors
///
/// Returns `MissingProperty` if a policy lacks its `PolicyDocument`, and
/// `InvalidProperty` if `Policies`, a document or its `Statement` has a
/// shape that cannot be analysed.
pub fn extract_statements(
    object: &TemplateObject,
    entity: IamEntity,
) -> Result<Option<Vec<PolicyStatement>>> {
    match entity {
        IamEntity::Policy | IamEntity::ManagedPolicy => {
            let document = object
                .property("PolicyDocument")
                .ok_or_else(|| CheckError::missing(&object.logical_id, "PolicyDocument"))?;
            let statements = document_statements(document)
                .ok_or_else(|| CheckError::invalid(&object.logical_id, "PolicyDocument"))?;
            Ok(Some(statements))
        }
        IamEntity::User | IamEntity::Group | IamEntity::Role => {
            let Some(policies) = object.property("Policies") else {
                return Ok(None);
            };
            let policies = list_items(policies)
                .ok_or_else(|| CheckError::invalid(&object.logical_id, "Policies"))?;

            let mut statements = Vec::new();
            for (index, policy) in policies.into_iter().enumerate() {
                let path = format!("Policies[{}].PolicyDocument", index);
                let document = policy
                    .get("PolicyDocument")
                    .ok_or_else(|| CheckError::missing(&object.logical_id, path.as_str()))?;
                statements.extend(
                    document_statements(document)
                        .ok_or_else(|| CheckError::invalid(&object.logical_id, path))?,
                );
            }
            Ok(Some(statements))
        }
    }
}
