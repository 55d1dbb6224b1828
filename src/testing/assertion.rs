//! Checks evaluated against responses.
//!
//! Each check returns `Err` on the first mismatch so a case can chain them
//! with `?` and stop at the first failure.

use std::fmt::{self, Debug, Display};

use serde::Serialize;

use crate::http::ApiResponse;
use crate::models::{ApiError, ENTITY_NOT_FOUND};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
/// The service answers lookups of missing entities with 400, not 404.
pub const STATUS_NOT_FOUND: u16 = 400;

/// Literal body of a successful delete.
pub const DELETED_BODY: &str = "true";

/// Part of the response an assertion looked at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum AssertionTarget {
    StatusCode,
    Latency,
    Body,
    Field(String),
    Collection(String),
}

impl Display for AssertionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionTarget::StatusCode => write!(f, "status code"),
            AssertionTarget::Latency => write!(f, "response time"),
            AssertionTarget::Body => write!(f, "body"),
            AssertionTarget::Field(name) => write!(f, "field `{name}`"),
            AssertionTarget::Collection(name) => write!(f, "collection `{name}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{target}: expected {expected}, got {actual}")]
pub struct AssertionFailure {
    pub target: AssertionTarget,
    pub expected: String,
    pub actual: String,
}

impl AssertionFailure {
    pub fn new(target: AssertionTarget, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            target,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Upper bound on response time for a class of endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyCeiling {
    /// Single-entity reads, list reads and simple writes.
    Standard,
    ProductCreate,
}

impl LatencyCeiling {
    pub fn millis(self) -> u64 {
        match self {
            LatencyCeiling::Standard => 2_000,
            LatencyCeiling::ProductCreate => 3_000,
        }
    }
}

pub fn status(response: &ApiResponse, expected: u16) -> Result<(), AssertionFailure> {
    if response.status == expected {
        return Ok(());
    }
    Err(AssertionFailure::new(
        AssertionTarget::StatusCode,
        expected.to_string(),
        response.status.to_string(),
    ))
}

/// Post-hoc check; the request itself was never cut short.
pub fn latency(response: &ApiResponse, ceiling: LatencyCeiling) -> Result<(), AssertionFailure> {
    let limit = ceiling.millis();
    if response.elapsed_ms < limit {
        return Ok(());
    }
    Err(AssertionFailure::new(
        AssertionTarget::Latency,
        format!("< {limit} ms"),
        format!("{} ms", response.elapsed_ms),
    ))
}

pub fn present<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T, AssertionFailure> {
    value
        .as_ref()
        .ok_or_else(|| AssertionFailure::new(AssertionTarget::Field(field.to_string()), "a value", "null"))
}

/// Present and not blank.
pub fn non_blank<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, AssertionFailure> {
    let text = present(field, value)?;
    if text.trim().is_empty() {
        return Err(AssertionFailure::new(
            AssertionTarget::Field(field.to_string()),
            "a non-empty string",
            "\"\"",
        ));
    }
    Ok(text)
}

/// Server-assigned ids are positive integers.
pub fn assigned_id(field: &str, value: Option<i64>) -> Result<i64, AssertionFailure> {
    match value {
        Some(id) if id > 0 => Ok(id),
        Some(id) => Err(AssertionFailure::new(
            AssertionTarget::Field(field.to_string()),
            "a positive id",
            id.to_string(),
        )),
        None => Err(AssertionFailure::new(
            AssertionTarget::Field(field.to_string()),
            "a positive id",
            "null",
        )),
    }
}

pub fn equals<T>(field: &str, actual: &T, expected: &T) -> Result<(), AssertionFailure>
where
    T: PartialEq + Debug + ?Sized,
{
    if actual == expected {
        return Ok(());
    }
    Err(AssertionFailure::new(
        AssertionTarget::Field(field.to_string()),
        format!("{expected:?}"),
        format!("{actual:?}"),
    ))
}

pub fn non_empty<T>(name: &str, items: &[T]) -> Result<(), AssertionFailure> {
    if !items.is_empty() {
        return Ok(());
    }
    Err(AssertionFailure::new(
        AssertionTarget::Collection(name.to_string()),
        "at least one item",
        "0 items",
    ))
}

/// 200 with the literal body `true`.
pub fn deleted(response: &ApiResponse) -> Result<(), AssertionFailure> {
    status(response, STATUS_OK)?;
    if response.body == DELETED_BODY {
        return Ok(());
    }
    Err(AssertionFailure::new(
        AssertionTarget::Body,
        format!("{DELETED_BODY:?}"),
        format!("{:?}", response.body),
    ))
}

/// 400 with an error body named `EntityNotFoundError`.
pub fn not_found(response: &ApiResponse) -> Result<(), AssertionFailure> {
    status(response, STATUS_NOT_FOUND)?;
    let error = response.json::<ApiError>().unwrap_or_default();
    if error.is_not_found() {
        return Ok(());
    }
    Err(AssertionFailure::new(
        AssertionTarget::Field("name".to_string()),
        ENTITY_NOT_FOUND,
        error.name.unwrap_or_else(|| "<none>".to_string()),
    ))
}
