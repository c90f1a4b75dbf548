//! Check runner
//!
//! Flattens a template once and runs each configured check over the same
//! read-only objects, concatenating findings in configuration order. Any
//! check error aborts the whole run.

use crate::core::config::ChecksConfig;
use crate::core::error::{CheckError, Result};
use crate::core::finding::Finding;
use crate::core::template::{flatten, TemplateObject};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Run every configured check over already flattened objects
pub fn run_checks(objects: &[TemplateObject], config: &ChecksConfig) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    for (kind, options) in config.entries()? {
        debug!(check = %kind, "running check");
        let check_findings = kind.run(objects, options)?;
        info!(check = %kind, findings = check_findings.len(), "check complete");
        findings.extend(check_findings);
    }

    Ok(findings)
}

/// Flatten a template and run the configured checks
///
/// # Examples
///
/// ```
/// use cfn_check::{check_template, ChecksConfig};
/// use serde_json::json;
///
/// let template = json!({
///     "Resources": {
///         "badName": {"Type": "AWS::SNS::Topic"}
///     }
/// });
/// let config = ChecksConfig::from_json_str(r#"{"logicalID": true}"#).unwrap();
///
/// let findings = check_template(&template, &config).unwrap();
/// assert_eq!(findings.len(), 1);
/// assert_eq!(findings[0].logical_id, "badName");
/// ```
pub fn check_template(template: &Value, config: &ChecksConfig) -> Result<Vec<Finding>> {
    let objects = flatten(template);
    info!(objects = objects.len(), checks = config.len(), "checking template");
    run_checks(&objects, config)
}

/// Parse a JSON template and run the configured checks
pub fn check_str(json: &str, config: &ChecksConfig) -> Result<Vec<Finding>> {
    let template: Value = serde_json::from_str(json)?;
    if !template.is_object() {
        return Err(CheckError::InvalidTemplate(
            "top-level value must be an object".to_string(),
        ));
    }
    check_template(&template, config)
}

/// Read a JSON template from disk and run the configured checks
pub fn check_file(path: impl AsRef<Path>, config: &ChecksConfig) -> Result<Vec<Finding>> {
    let json = std::fs::read_to_string(path.as_ref())?;
    check_str(&json, config)
}
