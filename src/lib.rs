//! # cfn-check - Static Policy Checks for CloudFormation Templates
//!
//! `cfn-check` flattens a CloudFormation-style JSON template into typed
//! objects and runs independent checks over them, reporting every violation
//! as a [`Finding`]. No cloud API is ever called; analysis is closed-world
//! over the one template.
//!
//! - **iamPolicy**: every action/resource pair granted by an IAM policy must
//!   be allow-listed and not deny-listed (wildcards supported)
//! - **securityGroupInbound**: security groups of private-only resources may
//!   not admit public traffic
//! - **iamManagedPolicy**, **iamInlinePolicy**, **resourceType**,
//!   **logicalID**: simpler structural checks
//!
//! ## Quick Start
//!
//! ```rust
//! use cfn_check::{check_template, ChecksConfig, Result};
//! use serde_json::json;
//!
//! # fn main() -> Result<()> {
//! let template = json!({
//!     "Resources": {
//!         "ReadPolicy": {
//!             "Type": "AWS::IAM::ManagedPolicy",
//!             "Properties": {
//!                 "PolicyDocument": {
//!                     "Statement": [{
//!                         "Effect": "Allow",
//!                         "Action": ["s3:GetObject", "s3:PutObject"],
//!                         "Resource": "*"
//!                     }]
//!                 }
//!             }
//!         }
//!     }
//! });
//!
//! let config = ChecksConfig::from_json_str(
//!     r#"{"iamPolicy": {"allow": [{"action": "s3:Get*"}]}}"#,
//! )?;
//!
//! let findings = check_template(&template, &config)?;
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].message, "Action s3:PutObject on Resource * not allowed");
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Findings are never errors. A check fails only when the template is
//! structurally unusable for it, for example a managed policy without a
//! `PolicyDocument` or an EC2 instance with no security group property.
//! Such a failure aborts the whole run instead of silently skipping the
//! resource.

pub mod core;

pub use crate::core::{
    checks::CheckKind,
    config::ChecksConfig,
    error::{CheckError, Result},
    finding::Finding,
    iam,
    iam::PatternMatcher,
    network,
    network::{is_private, Exposure},
    runner::{check_file, check_str, check_template, run_checks},
    template::{flatten, Section, TemplateObject},
};
