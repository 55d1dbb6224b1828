//! Product CRUD against an existing category.

use crate::error::SuiteError;
use crate::http::ApiRequest;
use crate::models::{Category, Product};
use crate::testing::assertion::{self, LatencyCeiling, STATUS_CREATED, STATUS_OK};
use crate::testing::{Case, CaseContext, CaseFuture, Suite};

use super::{cat_images, placeholder_images};

pub const NAME: &str = "product";

const TITLE: &str = "Cat";
const PRICE: i64 = 100;
const DESCRIPTION: &str = "Egyptian Cat";
const UPDATED_TITLE: &str = "Change title";
const UPDATED_PRICE: i64 = 250;
const UPDATED_DESCRIPTION: &str = "Changed Description";

pub fn suite() -> Result<Suite, SuiteError> {
    Suite::new(
        NAME,
        vec![
            Case::new("get_all_products", "Get All Products", get_all_products).priority(1),
            Case::new("pick_category", "Pick Existing Category", pick_category)
                .after("get_all_products"),
            Case::new("create_product", "Create Product", create_product).after("pick_category"),
            Case::new("get_product_by_id", "Get Product by ID", get_product_by_id)
                .after("create_product"),
            Case::new("get_product_by_slug", "Get Product by Slug", get_product_by_slug)
                .after("create_product"),
            Case::new("update_product", "Update Product", update_product).after("create_product"),
            Case::new("delete_product", "Delete Product", delete_product).after("update_product"),
            Case::new(
                "verify_product_deleted",
                "Verify Deleted Product",
                verify_product_deleted,
            )
            .after("delete_product"),
        ],
    )
}

fn get_all_products(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let response = cx.send(ApiRequest::get("/products")).await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let products: Vec<Product> = response.json()?;
        assertion::non_empty("products", &products)?;
        Ok(())
    })
}

fn pick_category(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let response = cx.send(ApiRequest::get("/categories")).await?;

        assertion::status(&response, STATUS_OK)?;
        let categories: Vec<Category> = response.json()?;
        assertion::non_empty("categories", &categories)?;

        let first = categories.into_iter().next();
        let category = assertion::present("categories[0]", &first)?;
        assertion::assigned_id("categories[0].id", category.id)?;
        cx.session.category = first;
        Ok(())
    })
}

fn create_product(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let category_id = cx.session.category_id()?;
        let product = Product::new(TITLE, PRICE, DESCRIPTION, category_id, cat_images());
        let response = cx
            .send(ApiRequest::post("/products/").json(&product)?)
            .await?;

        assertion::status(&response, STATUS_CREATED)?;
        let created: Product = response.json()?;
        assertion::assigned_id("id", created.id)?;
        cx.session.product = Some(created.clone());

        assertion::latency(&response, LatencyCeiling::ProductCreate)?;
        assertion::non_blank("slug", &created.slug)?;
        assertion::equals("title", &created.title.as_deref(), &Some(TITLE))?;
        assertion::equals("description", &created.description.as_deref(), &Some(DESCRIPTION))?;
        Ok(())
    })
}

fn get_product_by_id(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.product_id()?;
        let response = cx.send(ApiRequest::get(format!("/products/{id}"))).await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let first: Product = response.json()?;
        assertion::equals("title", &first.title.as_deref(), &Some(TITLE))?;
        assertion::equals("description", &first.description.as_deref(), &Some(DESCRIPTION))?;

        // Nothing changed in between, so a second read must match the first.
        let again = cx.send(ApiRequest::get(format!("/products/{id}"))).await?;
        assertion::status(&again, STATUS_OK)?;
        let second: Product = again.json()?;
        assertion::equals("product", &second, &first)?;
        Ok(())
    })
}

fn get_product_by_slug(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let slug = cx.session.product_slug()?.to_string();
        let response = cx
            .send(ApiRequest::get(format!("/products/slug/{slug}")))
            .await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let product: Product = response.json()?;
        assertion::equals("title", &product.title.as_deref(), &Some(TITLE))?;
        assertion::equals("description", &product.description.as_deref(), &Some(DESCRIPTION))?;
        Ok(())
    })
}

fn update_product(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.product_id()?;
        let category_id = cx.session.category_id()?;
        let images = placeholder_images();
        let mut update = Product::default();
        update.full_update(
            UPDATED_TITLE,
            UPDATED_PRICE,
            UPDATED_DESCRIPTION,
            category_id,
            images.clone(),
        );

        let response = cx
            .send(ApiRequest::put(format!("/products/{id}")).json(&update)?)
            .await?;

        assertion::status(&response, STATUS_OK)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        let updated: Product = response.json()?;
        assertion::equals("title", &updated.title.as_deref(), &Some(UPDATED_TITLE))?;
        assertion::equals(
            "description",
            &updated.description.as_deref(),
            &Some(UPDATED_DESCRIPTION),
        )?;
        assertion::equals("price", &updated.price, &Some(UPDATED_PRICE))?;
        assertion::equals("categoryId", &updated.category_id(), &Some(category_id))?;
        assertion::equals("images", &updated.images, &Some(images))?;
        Ok(())
    })
}

fn delete_product(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.product_id()?;
        let response = cx.send(ApiRequest::delete(format!("/products/{id}"))).await?;

        assertion::deleted(&response)?;
        assertion::latency(&response, LatencyCeiling::Standard)?;
        Ok(())
    })
}

fn verify_product_deleted(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.product_id()?;
        let response = cx.send(ApiRequest::get(format!("/products/{id}"))).await?;

        assertion::not_found(&response)?;
        Ok(())
    })
}
