//! Error types for the harness.

use crate::testing::assertion::AssertionFailure;

/// Failure to complete an HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response: {0}")]
    ReadBody(String),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a single case did not pass.
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An earlier case was expected to capture this value and did not.
    #[error("session has no {0}")]
    MissingState(&'static str),
}

/// A suite whose cases cannot be put in a valid order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuiteError {
    #[error("suite `{suite}` declares case `{case}` twice")]
    DuplicateCase { suite: String, case: String },

    #[error("case `{case}` depends on unknown case `{prerequisite}`")]
    UnknownPrerequisite { case: String, prerequisite: String },

    #[error("dependency cycle among cases: {}", .0.join(", "))]
    Cycle(Vec<String>),
}
