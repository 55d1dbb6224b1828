use serde::{Deserialize, Serialize};

pub const DEFAULT_ROLE: &str = "customer";

/// A customer account. `role` is assigned by the server and never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing)]
    pub role: Option<String>,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        let mut user = Self::default();
        user.update(email, password, name, avatar);
        user
    }

    pub fn update(
        &mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        avatar: impl Into<String>,
    ) {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self.name = Some(name.into());
        self.avatar = Some(avatar.into());
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }
}
