//! Error types for asymplot

use thiserror::Error;

/// asymplot error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The request is structurally invalid for the shape of the data
    /// (e.g. asking for summed totals when PID is a separate output stage).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The two hypotheses produced different named outputs.
    #[error("The output names of the h0 and h1 pipelines do not agree - {h0:?} and {h1:?}")]
    MismatchedOutputs {
        /// Sorted output names of hypothesis h0
        h0: Vec<String>,
        /// Sorted output names of hypothesis h1
        h1: Vec<String>,
    },

    /// Bin labels of a shared dimension differ between two maps.
    #[error("Bin mismatch: {0}")]
    BinMismatch(String),

    /// A referenced pipeline or resource path does not resolve.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Malformed data (shapes, edges, names)
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_outputs_names_both_lists() {
        let err = Error::MismatchedOutputs {
            h0: vec!["a".into(), "b".into()],
            h1: vec!["a".into(), "c".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains(r#"["a", "b"]"#), "{msg}");
        assert!(msg.contains(r#"["a", "c"]"#), "{msg}");
    }
}
