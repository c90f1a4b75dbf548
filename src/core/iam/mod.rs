//! IAM policy analysis for templates
//!
//! Provides:
//! - Wildcard matching for actions, resources and ARNs
//! - Lenient parsing of policy statements from template objects
//! - Cross-product grant expansion with allow/deny list evaluation
//! - Reporting of open complement clauses (`NotAction` / `NotResource`)

mod engine;
mod pattern;
mod policy;

pub use engine::{
    cross, granted_pairs, ActionResourcePair, AllowDenyRule, IamPolicyOptions, PolicyEvaluator,
};
pub use pattern::PatternMatcher;
pub use policy::{document_statements, extract_statements, Effect, IamEntity, PolicyStatement};
