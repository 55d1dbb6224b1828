use serde::{Deserialize, Serialize};

use super::category::Category;

/// A product listed under a category.
///
/// The embedded `category` only appears on read responses; `id` and `slug`
/// are server-assigned. None of the three is ever serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing)]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing)]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl Product {
    pub fn new(
        title: impl Into<String>,
        price: i64,
        description: impl Into<String>,
        category_id: i64,
        images: Vec<String>,
    ) -> Self {
        let mut product = Self::default();
        product.full_update(title, price, description, category_id, images);
        product
    }

    /// Set title and price only; everything else stays unset and is left out
    /// of the request body.
    pub fn partial_update(&mut self, title: impl Into<String>, price: i64) {
        self.title = Some(title.into());
        self.price = Some(price);
    }

    pub fn full_update(
        &mut self,
        title: impl Into<String>,
        price: i64,
        description: impl Into<String>,
        category_id: i64,
        images: Vec<String>,
    ) {
        self.title = Some(title.into());
        self.price = Some(price);
        self.description = Some(description.into());
        self.category_id = Some(category_id);
        self.images = Some(images);
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Category id from the embedded category, falling back to `categoryId`.
    pub fn category_id(&self) -> Option<i64> {
        self.category
            .as_ref()
            .and_then(Category::id)
            .or(self.category_id)
    }
}
