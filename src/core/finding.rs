//! Findings reported by checks

use serde::{Deserialize, Serialize};
use std::fmt;

/// One reported violation, tied to the logical id of the offending object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "logicalID")]
    pub logical_id: String,
    pub message: String,
}

impl Finding {
    pub fn new(logical_id: impl Into<String>, message: impl Into<String>) -> Self {
        Finding {
            logical_id: logical_id.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.logical_id, self.message)
    }
}
