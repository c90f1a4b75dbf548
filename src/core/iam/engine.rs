//! Grant evaluation against allow/deny configuration
//!
//! Every Allow statement grants the full cross product of its actions and
//! resources. Each of those pairs must be covered by some allow rule (when an
//! allow list is configured) and by no deny rule (when a deny list is
//! configured). Statements using `NotAction` / `NotResource` describe open
//! complement sets that cannot be compared against a closed list, so their
//! presence is reported on its own.

use super::{PatternMatcher, PolicyStatement};
use crate::core::finding::Finding;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ANY: &str = "*";

/// A concrete capability: one action on one resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionResourcePair {
    pub action: String,
    pub resource: String,
}

impl ActionResourcePair {
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        ActionResourcePair {
            action: action.into(),
            resource: resource.into(),
        }
    }
}

/// Cross product of actions and resources, action-outer / resource-inner
///
/// An absent side defaults to `["*"]`.
///
/// # Examples
/// ```
/// use cfn_check::iam::{cross, ActionResourcePair};
///
/// assert_eq!(cross(None, None), vec![ActionResourcePair::new("*", "*")]);
/// ```
pub fn cross(actions: Option<&[String]>, resources: Option<&[String]>) -> Vec<ActionResourcePair> {
    let any = [ANY.to_string()];
    let actions = actions.unwrap_or(&any);
    let resources = resources.unwrap_or(&any);

    actions
        .iter()
        .flat_map(|action| {
            resources
                .iter()
                .map(move |resource| ActionResourcePair::new(action.as_str(), resource.as_str()))
        })
        .collect()
}

/// Every pair granted by the Allow statements, in statement order
///
/// Deny statements grant nothing and are skipped.
pub fn granted_pairs(statements: &[PolicyStatement]) -> Vec<ActionResourcePair> {
    statements
        .iter()
        .filter(|statement| statement.is_allow())
        .flat_map(|statement| cross(statement.action.as_deref(), statement.resource.as_deref()))
        .collect()
}

/// A configured allow or deny rule
///
/// Written either as `{"action": .., "resource": ..}` with each side
/// defaulting to `*`, or as a bare string naming an action pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleRepr")]
pub struct AllowDenyRule {
    pub action: String,
    pub resource: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleRepr {
    Action(String),
    Pair(RulePair),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RulePair {
    #[serde(default = "any")]
    action: String,
    #[serde(default = "any")]
    resource: String,
}

fn any() -> String {
    ANY.to_string()
}

impl From<RuleRepr> for AllowDenyRule {
    fn from(repr: RuleRepr) -> Self {
        match repr {
            RuleRepr::Action(action) => AllowDenyRule::new(action, ANY),
            RuleRepr::Pair(RulePair { action, resource }) => AllowDenyRule::new(action, resource),
        }
    }
}

impl AllowDenyRule {
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        AllowDenyRule {
            action: action.into(),
            resource: resource.into(),
        }
    }

    /// True if both the action and the resource pattern match
    pub fn matches(&self, pair: &ActionResourcePair) -> bool {
        PatternMatcher::matches(&self.action, &pair.action)
            && PatternMatcher::matches(&self.resource, &pair.resource)
    }
}

impl Default for AllowDenyRule {
    fn default() -> Self {
        AllowDenyRule::new(ANY, ANY)
    }
}

/// Allow and deny lists; an absent list places no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IamPolicyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<AllowDenyRule>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<Vec<AllowDenyRule>>,
}

/// Policy evaluator bound to one allow/deny configuration
pub struct PolicyEvaluator<'a> {
    options: &'a IamPolicyOptions,
}

impl<'a> PolicyEvaluator<'a> {
    pub fn new(options: &'a IamPolicyOptions) -> Self {
        PolicyEvaluator { options }
    }

    /// Evaluate the statements owned by one template object
    ///
    /// `NotAction` values are always findings. `NotResource` values are
    /// findings only when no `NotAction` finding exists. Granted pairs are
    /// evaluated only when neither clause produced a finding.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfn_check::iam::{AllowDenyRule, IamPolicyOptions, PolicyEvaluator, PolicyStatement};
    ///
    /// let options = IamPolicyOptions {
    ///     allow: Some(vec![AllowDenyRule::new("s3:Get*", "*")]),
    ///     deny: None,
    /// };
    /// let statements = vec![PolicyStatement::allow(
    ///     vec!["s3:GetObject".to_string(), "s3:PutObject".to_string()],
    ///     vec!["*".to_string()],
    /// )];
    ///
    /// let findings = PolicyEvaluator::new(&options).evaluate("Policy", &statements);
    /// assert_eq!(findings.len(), 1);
    /// assert_eq!(findings[0].message, "Action s3:PutObject on Resource * not allowed");
    /// ```
    pub fn evaluate(&self, logical_id: &str, statements: &[PolicyStatement]) -> Vec<Finding> {
        let complements = complement_findings(logical_id, statements);
        if !complements.is_empty() {
            return complements;
        }

        let pairs = granted_pairs(statements);
        debug!(
            logical_id,
            statements = statements.len(),
            pairs = pairs.len(),
            "evaluating granted pairs"
        );

        let mut findings = Vec::new();
        for pair in &pairs {
            if let Some(allow) = &self.options.allow {
                if !allow.iter().any(|rule| rule.matches(pair)) {
                    findings.push(Finding::new(
                        logical_id,
                        format!("Action {} on Resource {} not allowed", pair.action, pair.resource),
                    ));
                }
            }
            if let Some(deny) = &self.options.deny {
                if deny.iter().any(|rule| rule.matches(pair)) {
                    findings.push(Finding::new(
                        logical_id,
                        format!("Action {} on Resource {} denied", pair.action, pair.resource),
                    ));
                }
            }
        }
        findings
    }
}

fn complement_findings(logical_id: &str, statements: &[PolicyStatement]) -> Vec<Finding> {
    if !statements.iter().any(PolicyStatement::has_complement) {
        return Vec::new();
    }

    let not_actions: Vec<Finding> = statements
        .iter()
        .filter_map(|statement| statement.not_action.as_ref())
        .flatten()
        .map(|action| Finding::new(logical_id, format!("NotAction {} is not allowed", action)))
        .collect();

    if !not_actions.is_empty() {
        return not_actions;
    }

    statements
        .iter()
        .filter_map(|statement| statement.not_resource.as_ref())
        .flatten()
        .map(|resource| Finding::new(logical_id, format!("NotResource {} is not allowed", resource)))
        .collect()
}
