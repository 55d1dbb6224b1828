//! Full lifecycle across resources: a new customer logs in, builds a category
//! and a product, mutates the product both ways, then tears everything down.

use crate::error::SuiteError;
use crate::http::ApiRequest;
use crate::models::{Category, LoginResponse, Product, User};
use crate::testing::assertion::{self, STATUS_CREATED, STATUS_OK};
use crate::testing::{Case, CaseContext, CaseFuture, Suite};

use super::user::create_customer;
use super::{cat_images, placeholder_images, unique_email, unique_suffix};

pub const NAME: &str = "e2e";

const CATEGORY_NAME: &str = "Animals";
const CATEGORY_IMAGE: &str = "pet.jpg";
const PRODUCT_TITLE: &str = "Cat";
const PRODUCT_PRICE: i64 = 100;
const PRODUCT_DESCRIPTION: &str = "Egyptian Cat";
const CHANGED_TITLE: &str = "Change title";
const CHANGED_PRICE: i64 = 250;
const CHANGED_DESCRIPTION: &str = "Changed Description";

pub fn suite() -> Result<Suite, SuiteError> {
    Suite::new(
        NAME,
        vec![
            Case::new("create_user", "Create New User", create_user).priority(1),
            Case::new("login_user", "Login with Created User", login_user).priority(2),
            Case::new("get_user_profile", "Access User Profile", get_user_profile).priority(3),
            Case::new("update_user", "Update User", update_user).priority(4),
            Case::new("create_category", "Create Category", create_category).priority(5),
            Case::new("create_product", "Create Product", create_product).priority(6),
            Case::new("get_product", "Get Product", get_product).priority(7),
            Case::new(
                "partially_update_product",
                "Partially Update Product",
                partially_update_product,
            )
            .priority(8),
            Case::new(
                "fully_update_product",
                "Fully Update Product",
                fully_update_product,
            )
            .priority(9),
            Case::new(
                "filter_products_by_category",
                "Filter Product by Category",
                filter_products_by_category,
            )
            .priority(10),
            Case::new("delete_product", "Delete Product", delete_product)
                .priority(11)
                .after("create_product"),
            Case::new(
                "verify_product_deleted",
                "Verify Deleted Product",
                verify_product_deleted,
            )
            .priority(12)
            .after("delete_product"),
            Case::new("delete_category", "Delete Category", delete_category)
                .priority(13)
                .after("delete_product"),
            Case::new("delete_user", "Delete User", delete_user).priority(14),
        ],
    )
}

fn create_user(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(create_customer(cx))
}

fn login_user(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let credentials = cx.session.credentials()?.clone();
        let response = cx
            .send(ApiRequest::post("/auth/login").json(&credentials)?)
            .await?;

        assertion::status(&response, STATUS_CREATED)?;
        let tokens: LoginResponse = response.json()?;
        assertion::non_blank("access_token", &tokens.access_token)?;
        assertion::non_blank("refresh_token", &tokens.refresh_token)?;
        cx.session.tokens = Some(tokens);
        Ok(())
    })
}

fn get_user_profile(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let user_id = cx.session.user_id()?;
        let email = cx.session.credentials()?.email.clone();
        let response = cx
            .send(ApiRequest::get("/auth/profile").authenticated())
            .await?;

        assertion::status(&response, STATUS_OK)?;
        let profile: User = response.json()?;
        assertion::equals("id", &profile.id, &Some(user_id))?;
        assertion::equals("email", &profile.email, &Some(email))?;
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
        let updated: User = response.json()?;
        assertion::equals("email", &updated.email, &update.email)?;
        assertion::equals("name", &updated.name, &update.name)?;
        assertion::equals("avatar", &updated.avatar, &update.avatar)?;
        cx.session.user = Some(updated);
        Ok(())
    })
}

fn create_category(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let category = Category::new(format!("{CATEGORY_NAME} {}", unique_suffix()), CATEGORY_IMAGE);
        let response = cx
            .send(ApiRequest::post("/categories/").json(&category)?)
            .await?;

        assertion::status(&response, STATUS_CREATED)?;
        let created: Category = response.json()?;
        assertion::assigned_id("id", created.id)?;
        cx.session.category = Some(created.clone());

        assertion::present("name", &created.name)?;
        assertion::non_blank("slug", &created.slug)?;
        assertion::present("image", &created.image)?;
        Ok(())
    })
}

fn create_product(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let category_id = cx.session.category_id()?;
        let product = Product::new(
            PRODUCT_TITLE,
            PRODUCT_PRICE,
            PRODUCT_DESCRIPTION,
            category_id,
            cat_images(),
        );
        let response = cx
            .send(ApiRequest::post("/products/").json(&product)?)
            .await?;

        assertion::status(&response, STATUS_CREATED)?;
        let created: Product = response.json()?;
        assertion::assigned_id("id", created.id)?;
        assertion::non_blank("slug", &created.slug)?;
        cx.session.product = Some(created);
        Ok(())
    })
}

fn get_product(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.product_id()?;
        let response = cx.send(ApiRequest::get(format!("/products/{id}"))).await?;

        assertion::status(&response, STATUS_OK)?;
        let product: Product = response.json()?;
        assertion::equals("id", &product.id, &Some(id))?;
        assertion::present("title", &product.title)?;
        assertion::present("description", &product.description)?;
        assertion::present("category", &product.category)?;
        cx.session.product = Some(product);
        Ok(())
    })
}

fn partially_update_product(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let before = cx.session.product()?.clone();
        let id = cx.session.product_id()?;
        let mut update = Product::default();
        update.partial_update(CHANGED_TITLE, CHANGED_PRICE);

        let response = cx
            .send(ApiRequest::put(format!("/products/{id}")).json(&update)?)
            .await?;
        assertion::status(&response, STATUS_OK)?;

        // Read back: only title and price may have moved.
        let response = cx.send(ApiRequest::get(format!("/products/{id}"))).await?;
        assertion::status(&response, STATUS_OK)?;
        let after: Product = response.json()?;
        assertion::equals("title", &after.title.as_deref(), &Some(CHANGED_TITLE))?;
        assertion::equals("price", &after.price, &Some(CHANGED_PRICE))?;
        assertion::equals("description", &after.description, &before.description)?;
        assertion::equals("categoryId", &after.category_id(), &before.category_id())?;
        assertion::equals("images", &after.images, &before.images)?;
        assertion::equals("slug", &after.slug, &before.slug)?;
        cx.session.product = Some(after);
        Ok(())
    })
}

fn fully_update_product(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.product_id()?;
        let slug = cx.session.product()?.slug.clone();
        let category_id = cx.session.category_id()?;
        let images = placeholder_images();
        let mut update = Product::default();
        update.full_update(
            CHANGED_TITLE,
            CHANGED_PRICE,
            CHANGED_DESCRIPTION,
            category_id,
            images.clone(),
        );

        let response = cx
            .send(ApiRequest::put(format!("/products/{id}")).json(&update)?)
            .await?;

        assertion::status(&response, STATUS_OK)?;
        let updated: Product = response.json()?;
        assertion::equals("title", &updated.title.as_deref(), &Some(CHANGED_TITLE))?;
        assertion::equals(
            "description",
            &updated.description.as_deref(),
            &Some(CHANGED_DESCRIPTION),
        )?;
        assertion::equals("price", &updated.price, &Some(CHANGED_PRICE))?;
        assertion::equals("categoryId", &updated.category_id(), &Some(category_id))?;
        assertion::equals("images", &updated.images, &Some(images))?;
        assertion::equals("id", &updated.id, &Some(id))?;
        assertion::equals("slug", &updated.slug, &slug)?;
        cx.session.product = Some(updated);
        Ok(())
    })
}

fn filter_products_by_category(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let category_id = cx.session.category_id()?;
        let response = cx
            .send(ApiRequest::get("/products/").query("categoryId", category_id))
            .await?;

        assertion::status(&response, STATUS_OK)?;
        let products: Vec<Product> = response.json()?;
        assertion::non_empty("products", &products)?;
        for product in &products {
            let embedded = product.category.as_ref().and_then(Category::id);
            assertion::equals("category.id", &embedded, &Some(category_id))?;
        }
        Ok(())
    })
}

fn delete_product(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.product_id()?;
        let response = cx.send(ApiRequest::delete(format!("/products/{id}"))).await?;

        assertion::deleted(&response)?;
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

fn delete_category(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.category_id()?;
        let response = cx.send(ApiRequest::delete(format!("/categories/{id}"))).await?;

        assertion::deleted(&response)?;
        Ok(())
    })
}

fn delete_user(cx: &mut CaseContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let id = cx.session.user_id()?;
        let response = cx.send(ApiRequest::delete(format!("/users/{id}"))).await?;

        assertion::deleted(&response)?;
        Ok(())
    })
}
