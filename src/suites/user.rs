//! User CRUD, ordered by priority alone.

use crate::error::SuiteError;
use crate::http::ApiRequest;
use crate::models::{DEFAULT_ROLE, LoginRequest, User};
use crate::testing::assertion::{self, LatencyCeiling, STATUS_CREATED, STATUS_OK};
use crate::testing::{Case, CaseContext, CaseFuture, Suite};

use super::unique_email;

pub const NAME: &str = "user";

const PASSWORD: &str = "H123456";
const USER_NAME: &str = "Mostafa";
const AVATAR: &str = "hamed.png";

pub fn suite() -> Result<Suite, SuiteError> {
    Suite::new(
        NAME,
        vec![
            Case::new("get_all_users", "Get All Users", get_all_users).priority(1),
            Case::new("create_user", "Create New User", create_user).priority(2),
            Case::new("get_user_by_id", "Get User by ID", get_user_by_id).priority(3),
            Case::new("update_user", "Update Existing User", update_user).priority(4),
            Case::new("delete_user", "Delete User", delete_user).priority(5),
            Case::new("verify_user_deleted", "Verify Deleted User", verify_user_deleted)
                .priority(6)
                .after("delete_user"),
        ],
    )
}

fn get_all_users(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let response = cx.send(ApiRequest::get("/users/")).await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let users: Vec<User> = response.json()?;
        assertion::non_empty("users", &users)?;
        Ok(())
    })
}

/// Shared with the end-to-end suite: creates a fresh customer and records it
/// and its credentials in the session.
pub(crate) async fn create_customer(cx: &mut CaseContext) -> Result<(), crate::error::CaseError> {
    let user = User::new(unique_email("H"), PASSWORD, USER_NAME, AVATAR);
    let response = cx.send(ApiRequest::post("/users/").json(&user)?).await?;

    assertion::status(&response, STATUS_CREATED)?;
    let created: User = response.json()?;
    assertion::assigned_id("id", created.id)?;
    cx.session.credentials = Some(LoginRequest::new(
        user.email.clone().unwrap_or_default(),
        PASSWORD,
    ));
    cx.session.user = Some(created.clone());

    assertion::equals("role", &created.role.as_deref(), &Some(DEFAULT_ROLE))?;
    Ok(())
}

fn create_user(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(create_customer(cx))
}

fn get_user_by_id(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.user_id()?;
        let response = cx.send(ApiRequest::get(format!("/users/{id}"))).await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let user: User = response.json()?;
        assertion::equals("name", &user.name.as_deref(), &Some(USER_NAME))?;
        assertion::equals("avatar", &user.avatar.as_deref(), &Some(AVATAR))?;
        Ok(())
    })
}

fn update_user(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.user_id()?;
        let mut update = User::default();
        update.update(unique_email("test"), "H654321", "Hamed", "Mo.png");

        let response = cx
            .send(ApiRequest::put(format!("/users/{id}")).json(&update)?)
            .await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let updated: User = response.json()?;
        assertion::equals("email", &updated.email, &update.email)?;
        // The service echoes the password back.
        assertion::equals("password", &updated.password, &update.password)?;
        assertion::equals("name", &updated.name, &update.name)?;
        assertion::equals("avatar", &updated.avatar, &update.avatar)?;
        assertion::equals("role", &updated.role.as_deref(), &Some(DEFAULT_ROLE))?;
        cx.session.user = Some(updated);
        Ok(())
    })
}

fn delete_user(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.user_id()?;
        let response = cx.send(ApiRequest::delete(format!("/users/{id}"))).await?;

        assertion::deleted(&response)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        Ok(())
    })
}

fn verify_user_deleted(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.user_id()?;
        let response = cx.send(ApiRequest::get(format!("/users/{id}"))).await?;

        assertion::not_found(&response)?;
        Ok(())
    })
}
