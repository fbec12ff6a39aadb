//! CSAPI client error types.

use thiserror::Error;

/// Result type alias using CsapiError.
pub type CsapiResult<T> = Result<T, CsapiError>;

/// Errors raised while building or validating CSAPI queries.
///
/// Every error is raised at the validation step that detects it and is
/// returned to the caller as-is. A build call either yields a complete URL
/// or one of these.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CsapiError {
    /// Collection description (or link template) cannot be used for queries.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The collection does not declare the requested query family.
    #[error("Collection '{collection}' does not support {query_type} queries.")]
    UnsupportedQueryType {
        collection: String,
        query_type: String,
    },

    /// A requested parameter name is not declared by the collection.
    #[error("Parameter '{parameter}' is not supported by collection '{collection}'.")]
    UnknownParameter {
        collection: String,
        parameter: String,
    },

    /// A requested CRS is not declared by the collection.
    #[error(
        "Unsupported CRS: '{crs}'{}. Supported CRS are: {}",
        collection_suffix(.collection),
        .supported.join(", ")
    )]
    UnsupportedCrs {
        crs: String,
        collection: Option<String>,
        supported: Vec<String>,
    },

    /// A structurally invalid datetime, vertical level or bounding box value.
    #[error("Malformed {parameter} parameter: {message}")]
    MalformedParameter { parameter: String, message: String },
}

fn collection_suffix(collection: &Option<String>) -> String {
    collection
        .as_deref()
        .map(|c| format!(" for collection '{}'", c))
        .unwrap_or_default()
}

impl CsapiError {
    /// Shorthand for a malformed parameter error.
    pub fn malformed(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        CsapiError::MalformedParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Stable name of the error class, as reported to users.
    pub fn kind(&self) -> &'static str {
        match self {
            CsapiError::Configuration(_) => "ConfigurationError",
            CsapiError::UnsupportedQueryType { .. } => "UnsupportedQueryTypeError",
            CsapiError::UnknownParameter { .. } => "UnknownParameterError",
            CsapiError::UnsupportedCrs { .. } => "UnsupportedCrsError",
            CsapiError::MalformedParameter { .. } => "MalformedParameterError",
        }
    }

    /// Attach the owning collection to a CRS error raised by a standalone validator.
    pub fn for_collection(self, collection_id: &str) -> Self {
        match self {
            CsapiError::UnsupportedCrs { crs, supported, .. } => CsapiError::UnsupportedCrs {
                crs,
                collection: Some(collection_id.to_string()),
                supported,
            },
            other => other,
        }
    }
}
