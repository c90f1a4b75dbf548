use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("can not find property {property} in {logical_id}")]
    MissingProperty {
        logical_id: String,
        property: String,
    },

    #[error("can not interpret property {property} in {logical_id}")]
    InvalidProperty {
        logical_id: String,
        property: String,
    },

    #[error("Unknown check: {0}")]
    UnknownCheck(String),

    #[error("Invalid options for check {check}: {source}")]
    InvalidOptions {
        check: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CheckError {
    /// Shorthand for a structural error on one template object
    pub fn missing(logical_id: &str, property: impl Into<String>) -> Self {
        CheckError::MissingProperty {
            logical_id: logical_id.to_string(),
            property: property.into(),
        }
    }

    /// A property is present but its shape cannot be analysed
    pub fn invalid(logical_id: &str, property: impl Into<String>) -> Self {
        CheckError::InvalidProperty {
            logical_id: logical_id.to_string(),
            property: property.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
