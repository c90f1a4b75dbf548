//! Checks configuration
//!
//! An ordered mapping from check name to that check's options. Loaded from
//! JSON or TOML; the order of entries is the order checks run in.
//!
//! ```json
//! {
//!   "logicalID": {"case": "pascal"},
//!   "iamPolicy": {"allow": [{"action": "s3:Get*", "resource": "*"}]},
//!   "securityGroupInbound": true
//! }
//! ```

use crate::core::checks::CheckKind;
use crate::core::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecksConfig {
    checks: Map<String, Value>,
}

impl ChecksConfig {
    /// Configuration with no checks enabled
    pub fn empty() -> Self {
        ChecksConfig { checks: Map::new() }
    }

    /// Enable a check with the given options; replaces earlier options for
    /// the same check but keeps its position
    pub fn with(mut self, check: CheckKind, options: Value) -> Self {
        self.checks.insert(check.name().to_string(), options);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(source)?;
        Ok(serde_json::from_value(serde_json::to_value(table)?)?)
    }

    /// Load from a file; `.toml` files are read as TOML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&source),
            _ => Self::from_json_str(&source),
        }
    }

    /// Enabled checks with their options, in configuration order
    ///
    /// # Errors
    ///
    /// Returns `UnknownCheck` for the first name that is not a known check.
    pub fn entries(&self) -> Result<Vec<(CheckKind, &Value)>> {
        self.checks
            .iter()
            .map(|(name, options)| CheckKind::from_str(name).map(|kind| (kind, options)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for ChecksConfig {
    fn default() -> Self {
        ChecksConfig::empty()
            .with(CheckKind::LogicalId, Value::Bool(true))
            .with(CheckKind::IamPolicy, Value::Bool(true))
            .with(CheckKind::IamInlinePolicy, Value::Bool(true))
            .with(CheckKind::SecurityGroupInbound, Value::Bool(true))
    }
}

impl FromStr for ChecksConfig {
    type Err = CheckError;

    fn from_str(json: &str) -> Result<Self> {
        Self::from_json_str(json)
    }
}
