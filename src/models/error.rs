use serde::Deserialize;

/// Error name the service reports when a looked-up entity does not exist.
pub const ENTITY_NOT_FOUND: &str = "EntityNotFoundError";

/// Error body returned by the service. `message` is a string or a list of
/// validation messages depending on the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        self.name.as_deref() == Some(ENTITY_NOT_FOUND)
    }
}
