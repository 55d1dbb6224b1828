use serde::{Deserialize, Serialize};

/// A product category.
///
/// `id` and `slug` are assigned by the server and never sent in request bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing)]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            image: Some(image.into()),
            ..Self::default()
        }
    }

    /// Replace every client-settable field.
    pub fn update(&mut self, name: impl Into<String>, image: impl Into<String>) {
        self.name = Some(name.into());
        self.image = Some(image.into());
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}
