//! State captured by earlier cases of a run and consumed by later ones.
//!
//! A `Session` lives for exactly one suite run. Nothing in it is shared
//! between runs or persisted.

use crate::error::CaseError;
use crate::models::{Category, LoginRequest, LoginResponse, Product, User};

#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Category created by the run, or the existing one it picked.
    pub category: Option<Category>,
    /// Last server-side view of the product under test.
    pub product: Option<Product>,
    pub user: Option<User>,
    pub credentials: Option<LoginRequest>,
    pub tokens: Option<LoginResponse>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category_id(&self) -> Result<i64, CaseError> {
        self.category
            .as_ref()
            .and_then(Category::id)
            .ok_or(CaseError::MissingState("category id"))
    }

    pub fn category_slug(&self) -> Result<&str, CaseError> {
        self.category
            .as_ref()
            .and_then(Category::slug)
            .ok_or(CaseError::MissingState("category slug"))
    }

    pub fn product(&self) -> Result<&Product, CaseError> {
        self.product
            .as_ref()
            .ok_or(CaseError::MissingState("product"))
    }

    pub fn product_id(&self) -> Result<i64, CaseError> {
        self.product()?
            .id()
            .ok_or(CaseError::MissingState("product id"))
    }

    pub fn product_slug(&self) -> Result<&str, CaseError> {
        self.product()?
            .slug()
            .ok_or(CaseError::MissingState("product slug"))
    }

    pub fn user_id(&self) -> Result<i64, CaseError> {
        self.user
            .as_ref()
            .and_then(User::id)
            .ok_or(CaseError::MissingState("user id"))
    }

    pub fn credentials(&self) -> Result<&LoginRequest, CaseError> {
        self.credentials
            .as_ref()
            .ok_or(CaseError::MissingState("login credentials"))
    }

    pub fn access_token(&self) -> Result<&str, CaseError> {
        self.tokens
            .as_ref()
            .and_then(|tokens| tokens.access_token.as_deref())
            .filter(|token| !token.is_empty())
            .ok_or(CaseError::MissingState("access token"))
    }
}
