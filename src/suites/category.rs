//! Category CRUD: list, create, read by id and slug, update, delete.

use crate::error::SuiteError;
use crate::http::ApiRequest;
use crate::models::Category;
use crate::testing::assertion::{self, LatencyCeiling, STATUS_CREATED, STATUS_OK};
use crate::testing::{Case, CaseContext, CaseFuture, Suite};

use super::unique_suffix;

pub const NAME: &str = "category";

const UPDATED_NAME: &str = "Updated Category";
const UPDATED_IMAGE: &str = "UpdatedImage.png";

pub fn suite() -> Result<Suite, SuiteError> {
    Suite::new(
        NAME,
        vec![
            Case::new("get_all_categories", "Get All Categories", get_all_categories).priority(1),
            Case::new("create_category", "Create Category", create_category)
                .after("get_all_categories"),
            Case::new("get_category_by_id", "Get Category By ID", get_category_by_id)
                .after("create_category"),
            Case::new("get_category_by_slug", "Get Category By Slug", get_category_by_slug)
                .after("create_category"),
            Case::new("update_category", "Update Category", update_category)
                .after("create_category"),
            Case::new("delete_category", "Delete Category", delete_category)
                .after("update_category"),
            Case::new(
                "verify_category_deleted",
                "Verify Deleted Category",
                verify_category_deleted,
            )
            .after("delete_category"),
        ],
    )
}

fn get_all_categories(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let response = cx.send(ApiRequest::get("/categories")).await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let categories: Vec<Category> = response.json()?;
        assertion::non_empty("categories", &categories)?;
        Ok(())
    })
}

fn create_category(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let category = Category::new(
            format!("category {}", unique_suffix()),
            "https://placeimg.com/640/480/any",
        );
        let response = cx
            .send(ApiRequest::post("/categories/").json(&category)?)
            .await?;

        assertion::status(&response, STATUS_CREATED)?;
        let created: Category = response.json()?;
        assertion::assigned_id("id", created.id)?;
        cx.session.category = Some(created.clone());

        assertion::latency(&response, LatencyCeiling::Standard)?;
        assertion::present("name", &created.name)?;
        assertion::non_blank("slug", &created.slug)?;
        assertion::present("image", &created.image)?;
        Ok(())
    })
}

fn get_category_by_id(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.category_id()?;
        let response = cx.send(ApiRequest::get(format!("/categories/{id}"))).await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let category: Category = response.json()?;
        assertion::equals("id", &category.id, &Some(id))?;
        assertion::present("name", &category.name)?;
        assertion::present("slug", &category.slug)?;
        assertion::present("image", &category.image)?;
        Ok(())
    })
}

fn get_category_by_slug(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let slug = cx.session.category_slug()?.to_string();
        let response = cx
            .send(ApiRequest::get(format!("/categories/slug/{slug}")))
            .await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let category: Category = response.json()?;
        assertion::present("name", &category.name)?;
        assertion::equals("slug", &category.slug.as_deref(), &Some(slug.as_str()))?;
        assertion::present("image", &category.image)?;
        Ok(())
    })
}

fn update_category(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.category_id()?;
        let mut update = Category::default();
        update.update(UPDATED_NAME, UPDATED_IMAGE);

        let response = cx
            .send(ApiRequest::put(format!("/categories/{id}")).json(&update)?)
            .await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let updated: Category = response.json()?;
        assertion::equals("name", &updated.name.as_deref(), &Some(UPDATED_NAME))?;
        assertion::equals("image", &updated.image.as_deref(), &Some(UPDATED_IMAGE))?;

        if let Some(category) = cx.session.category.as_mut() {
            category.name = updated.name;
            category.image = updated.image;
        }
        Ok(())
    })
}

fn delete_category(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.category_id()?;
        let response = cx.send(ApiRequest::delete(format!("/categories/{id}"))).await?;

        assertion::deleted(&response)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        Ok(())
    })
}

fn verify_category_deleted(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.category_id()?;
        let response = cx.send(ApiRequest::get(format!("/categories/{id}"))).await?;

        assertion::not_found(&response)?;
        Ok(())
    })
}
