use thiserror::Error;

/// Why an import blob was rejected. Persisted state is untouched in every case.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Import data is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Import data must be a JSON object")]
    NotAnObject,

    #[error("Import data has no `requests` field")]
    MissingRequests,

    #[error("`requests` must be an array")]
    RequestsNotArray,

    #[error("Request #{index} is invalid: {source}")]
    InvalidRequest {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("`members` must be an array of names: {0}")]
    InvalidMembers(#[source] serde_json::Error),
}
