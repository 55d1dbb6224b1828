//! In-memory stand-in for the storefront API, used by suite tests.
//!
//! Follows the service's conventions: lists are bare arrays, deletes answer
//! `true`, unknown ids answer 400 `EntityNotFoundError`, login answers 201.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::http::client::TransportFuture;
use crate::http::method::HttpMethod;
use crate::http::{ApiRequest, ApiResponse, Transport};
use crate::models::{Category, LoginRequest, Product, User};

/// Canned answer for one method and path.
#[derive(Debug, Clone)]
pub struct Fault {
    pub method: HttpMethod,
    pub path: String,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
struct StoredProduct {
    id: i64,
    title: String,
    slug: String,
    price: i64,
    description: String,
    category_id: i64,
    images: Vec<String>,
}

#[derive(Debug)]
struct State {
    next_id: i64,
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, StoredProduct>,
    users: BTreeMap<i64, User>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<Option<State>>,
    requests: Mutex<Vec<ApiRequest>>,
    faults: Vec<Fault>,
    latency: Vec<(HttpMethod, String, u64)>,
    partial_update_clears_description: bool,
    ignores_category_filter: bool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `status` and a generic error body.
    pub fn with_fault(mut self, method: HttpMethod, path: &str, status: u16) -> Self {
        self.faults.push(Fault {
            method,
            path: normalize(path),
            status,
            body: json!({"message": "injected failure", "statusCode": status}).to_string(),
        });
        self
    }

    /// Report `millis` as the elapsed time of calls whose path starts with `prefix`.
    pub fn with_latency(mut self, method: HttpMethod, prefix: &str, millis: u64) -> Self {
        self.latency.push((method, normalize(prefix), millis));
        self
    }

    /// Misbehave on title/price-only updates by wiping the description.
    pub fn clearing_description_on_partial_update(mut self) -> Self {
        self.partial_update_clears_description = true;
        self
    }

    /// Answer `GET /products?categoryId=` with every product, whatever the filter.
    pub fn ignoring_category_filter(mut self) -> Self {
        self.ignores_category_filter = true;
        self
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn category_count(&self) -> usize {
        self.state.lock().await.as_ref().map_or(0, |state| state.categories.len())
    }

    pub async fn product_count(&self) -> usize {
        self.state.lock().await.as_ref().map_or(0, |state| state.products.len())
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.as_ref().map_or(0, |state| state.users.len())
    }

    async fn handle(&self, request: ApiRequest) -> ApiResponse {
        self.requests.lock().await.push(request.clone());

        let path = normalize(&request.path);
        let elapsed_ms = self
            .latency
            .iter()
            .find(|(method, prefix, _)| *method == request.method && path.starts_with(prefix.as_str()))
            .map_or(5, |(_, _, millis)| *millis);

        let (status, body) = match self
            .faults
            .iter()
            .find(|fault| fault.method == request.method && fault.path == path)
        {
            Some(fault) => (fault.status, fault.body.clone()),
            None => {
                let mut guard = self.state.lock().await;
                let state = guard.get_or_insert_with(State::seeded);
                self.route(state, &request, &path)
            }
        };

        ApiResponse {
            status,
            elapsed_ms,
            headers: vec![("content-type".into(), "application/json; charset=utf-8".into())],
            body,
        }
    }

    fn route(&self, state: &mut State, request: &ApiRequest, path: &str) -> (u16, String) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let body = request.body.clone().unwrap_or(Value::Null);

        match (request.method, segments.as_slice()) {
            (HttpMethod::Get, ["categories"]) => {
                let all: Vec<Value> = state.categories.values().map(category_json).collect();
                ok(Value::Array(all))
            }
            (HttpMethod::Post, ["categories"]) => state.create_category(body),
            (HttpMethod::Get, ["categories", "slug", slug]) => state
                .categories
                .values()
                .find(|category| category.slug.as_deref() == Some(*slug))
                .map_or_else(|| not_found("Category"), |category| ok(category_json(category))),
            (HttpMethod::Get, ["categories", id]) => match parse_id(id) {
                Some(id) => state
                    .categories
                    .get(&id)
                    .map_or_else(|| not_found("Category"), |category| ok(category_json(category))),
                None => bad_id(),
            },
            (HttpMethod::Put, ["categories", id]) => match parse_id(id) {
                Some(id) => state.update_category(id, body),
                None => bad_id(),
            },
            (HttpMethod::Delete, ["categories", id]) => match parse_id(id) {
                Some(id) => deleted(state.categories.remove(&id).is_some(), "Category"),
                None => bad_id(),
            },

            (HttpMethod::Get, ["products"]) => {
                let filter = request
                    .query
                    .iter()
                    .find(|(key, _)| key == "categoryId")
                    .and_then(|(_, value)| value.parse::<i64>().ok())
                    .filter(|_| !self.ignores_category_filter);
                let all: Vec<Value> = state
                    .products
                    .values()
                    .filter(|product| filter.is_none_or(|id| product.category_id == id))
                    .map(|product| state.product_json(product))
                    .collect();
                ok(Value::Array(all))
            }
            (HttpMethod::Post, ["products"]) => state.create_product(body),
            (HttpMethod::Get, ["products", "slug", slug]) => state
                .products
                .values()
                .find(|product| product.slug == *slug)
                .map_or_else(|| not_found("Product"), |product| ok(state.product_json(product))),
            (HttpMethod::Get, ["products", id]) => match parse_id(id) {
                Some(id) => state
                    .products
                    .get(&id)
                    .map_or_else(|| not_found("Product"), |product| ok(state.product_json(product))),
                None => bad_id(),
            },
            (HttpMethod::Put, ["products", id]) => match parse_id(id) {
                Some(id) => state.update_product(id, body, self.partial_update_clears_description),
                None => bad_id(),
            },
            (HttpMethod::Delete, ["products", id]) => match parse_id(id) {
                Some(id) => deleted(state.products.remove(&id).is_some(), "Product"),
                None => bad_id(),
            },

            (HttpMethod::Get, ["users"]) => {
                let all: Vec<Value> = state.users.values().map(user_json).collect();
                ok(Value::Array(all))
            }
            (HttpMethod::Post, ["users"]) => state.create_user(body),
            (HttpMethod::Get, ["users", id]) => match parse_id(id) {
                Some(id) => state
                    .users
                    .get(&id)
                    .map_or_else(|| not_found("User"), |user| ok(user_json(user))),
                None => bad_id(),
            },
            (HttpMethod::Put, ["users", id]) => match parse_id(id) {
                Some(id) => state.update_user(id, body),
                None => bad_id(),
            },
            (HttpMethod::Delete, ["users", id]) => match parse_id(id) {
                Some(id) => deleted(state.users.remove(&id).is_some(), "User"),
                None => bad_id(),
            },

            (HttpMethod::Post, ["auth", "login"]) => state.login(body),
            (HttpMethod::Get, ["auth", "profile"]) => state.profile(request.bearer_token.as_deref()),

            (method, _) => (
                404,
                json!({
                    "message": format!("Cannot {method} /{path}"),
                    "error": "Not Found",
                    "statusCode": 404
                })
                .to_string(),
            ),
        }
    }
}

impl Transport for FakeApi {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        Box::pin(async move { Ok(self.handle(request).await) })
    }
}

impl State {
    fn seeded() -> Self {
        let mut state = State {
            next_id: 1,
            categories: BTreeMap::new(),
            products: BTreeMap::new(),
            users: BTreeMap::new(),
        };
        state.create_category(json!({"name": "Clothes", "image": "https://i.imgur.com/QkIa5tT.jpeg"}));
        state.create_product(json!({
            "title": "Classic Tee",
            "price": 44,
            "description": "A soft cotton tee",
            "categoryId": 1,
            "images": ["https://i.imgur.com/9DqEOV5.jpeg"]
        }));
        state.create_user(json!({
            "email": "john@mail.com",
            "password": "changeme",
            "name": "Jhon",
            "avatar": "https://i.imgur.com/LDOO4Qs.jpg"
        }));
        state
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn unique_slug(&self, text: &str, taken: impl Fn(&str) -> bool, id: i64) -> String {
        let slug = slugify(text);
        if taken(&slug) { format!("{slug}-{id}") } else { slug }
    }

    fn create_category(&mut self, body: Value) -> (u16, String) {
        let Ok(input) = serde_json::from_value::<Category>(body) else {
            return invalid("body must be an object");
        };
        let (Some(name), Some(image)) = (input.name, input.image) else {
            return invalid("name and image should not be empty");
        };

        let id = self.allocate_id();
        let slug = self.unique_slug(
            &name,
            |slug| self.categories.values().any(|c| c.slug.as_deref() == Some(slug)),
            id,
        );
        let category = Category {
            id: Some(id),
            name: Some(name),
            slug: Some(slug),
            image: Some(image),
        };
        let body = category_json(&category);
        self.categories.insert(id, category);
        created(body)
    }

    fn update_category(&mut self, id: i64, body: Value) -> (u16, String) {
        let Ok(input) = serde_json::from_value::<Category>(body) else {
            return invalid("body must be an object");
        };
        let Some(category) = self.categories.get_mut(&id) else {
            return not_found("Category");
        };
        if let Some(name) = input.name {
            category.name = Some(name);
        }
        if let Some(image) = input.image {
            category.image = Some(image);
        }
        ok(category_json(category))
    }

    fn product_json(&self, product: &StoredProduct) -> Value {
        json!({
            "id": product.id,
            "title": product.title,
            "slug": product.slug,
            "price": product.price,
            "description": product.description,
            "category": self.categories.get(&product.category_id).map(category_json),
            "images": product.images,
            "creationAt": "2025-01-01T00:00:00.000Z",
            "updatedAt": "2025-01-01T00:00:00.000Z"
        })
    }

    fn create_product(&mut self, body: Value) -> (u16, String) {
        let Ok(input) = serde_json::from_value::<Product>(body) else {
            return invalid("body must be an object");
        };
        let (Some(title), Some(price), Some(description), Some(category_id), Some(images)) = (
            input.title,
            input.price,
            input.description,
            input.category_id,
            input.images,
        ) else {
            return invalid("title, price, description, categoryId and images are required");
        };
        if !self.categories.contains_key(&category_id) {
            return not_found("Category");
        }

        let id = self.allocate_id();
        let slug = self.unique_slug(&title, |slug| self.products.values().any(|p| p.slug == slug), id);
        let product = StoredProduct {
            id,
            title,
            slug,
            price,
            description,
            category_id,
            images,
        };
        let body = self.product_json(&product);
        self.products.insert(id, product);
        created(body)
    }

    fn update_product(&mut self, id: i64, body: Value, clear_description: bool) -> (u16, String) {
        let Ok(input) = serde_json::from_value::<Product>(body) else {
            return invalid("body must be an object");
        };
        if let Some(category_id) = input.category_id {
            if !self.categories.contains_key(&category_id) {
                return not_found("Category");
            }
        }
        let partial = input.description.is_none() && input.category_id.is_none() && input.images.is_none();
        let Some(product) = self.products.get_mut(&id) else {
            return not_found("Product");
        };

        if let Some(title) = input.title {
            product.title = title;
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(description) = input.description {
            product.description = description;
        } else if partial && clear_description {
            product.description.clear();
        }
        if let Some(category_id) = input.category_id {
            product.category_id = category_id;
        }
        if let Some(images) = input.images {
            product.images = images;
        }

        let product = product.clone();
        ok(self.product_json(&product))
    }

    fn create_user(&mut self, body: Value) -> (u16, String) {
        let Ok(input) = serde_json::from_value::<User>(body) else {
            return invalid("body must be an object");
        };
        let (Some(email), Some(password), Some(name), Some(avatar)) =
            (input.email, input.password, input.name, input.avatar)
        else {
            return invalid("email, password, name and avatar are required");
        };
        if self.users.values().any(|user| user.email.as_deref() == Some(email.as_str())) {
            return invalid("email already registered");
        }

        let id = self.allocate_id();
        let user = User {
            id: Some(id),
            email: Some(email),
            password: Some(password),
            name: Some(name),
            avatar: Some(avatar),
            role: Some("customer".into()),
        };
        let body = user_json(&user);
        self.users.insert(id, user);
        created(body)
    }

    fn update_user(&mut self, id: i64, body: Value) -> (u16, String) {
        let Ok(input) = serde_json::from_value::<User>(body) else {
            return invalid("body must be an object");
        };
        let Some(user) = self.users.get_mut(&id) else {
            return not_found("User");
        };
        if input.email.is_some() {
            user.email = input.email;
        }
        if input.password.is_some() {
            user.password = input.password;
        }
        if input.name.is_some() {
            user.name = input.name;
        }
        if input.avatar.is_some() {
            user.avatar = input.avatar;
        }
        ok(user_json(user))
    }

    fn login(&self, body: Value) -> (u16, String) {
        let Ok(credentials) = serde_json::from_value::<LoginRequest>(body) else {
            return unauthorized();
        };
        self.users
            .values()
            .find(|user| {
                user.email.as_deref() == Some(credentials.email.as_str())
                    && user.password.as_deref() == Some(credentials.password.as_str())
            })
            .and_then(User::id)
            .map_or_else(unauthorized, |id| {
                created(json!({
                    "access_token": format!("access-{id}"),
                    "refresh_token": format!("refresh-{id}")
                }))
            })
    }

    fn profile(&self, bearer: Option<&str>) -> (u16, String) {
        bearer
            .and_then(|token| token.strip_prefix("access-"))
            .and_then(|id| id.parse::<i64>().ok())
            .and_then(|id| self.users.get(&id))
            .map_or_else(unauthorized, |user| ok(user_json(user)))
    }
}

fn category_json(category: &Category) -> Value {
    json!({
        "id": category.id,
        "name": category.name,
        "slug": category.slug,
        "image": category.image,
        "creationAt": "2025-01-01T00:00:00.000Z",
        "updatedAt": "2025-01-01T00:00:00.000Z"
    })
}

fn user_json(user: &User) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "password": user.password,
        "name": user.name,
        "role": user.role,
        "avatar": user.avatar,
        "creationAt": "2025-01-01T00:00:00.000Z"
    })
}

fn normalize(path: &str) -> String {
    path.trim().trim_matches('/').to_string()
}

fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

fn ok(body: Value) -> (u16, String) {
    (200, body.to_string())
}

fn created(body: Value) -> (u16, String) {
    (201, body.to_string())
}

fn deleted(existed: bool, entity: &str) -> (u16, String) {
    if existed { (200, "true".to_string()) } else { not_found(entity) }
}

fn not_found(entity: &str) -> (u16, String) {
    (
        400,
        json!({
            "path": "/api/v1",
            "timestamp": "2025-01-01T00:00:00.000Z",
            "name": "EntityNotFoundError",
            "message": format!("Could not find any entity of type \"{entity}\"")
        })
        .to_string(),
    )
}

fn invalid(message: &str) -> (u16, String) {
    (
        400,
        json!({"message": [message], "error": "Bad Request", "statusCode": 400}).to_string(),
    )
}

fn bad_id() -> (u16, String) {
    invalid("Validation failed (numeric string is expected)")
}

fn unauthorized() -> (u16, String) {
    (401, json!({"message": "Unauthorized", "statusCode": 401}).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Animals"), "animals");
        assert_eq!(slugify("category 1700000000000"), "category-1700000000000");
        assert_eq!(slugify("  Hello,  World! "), "hello-world");
    }

    #[tokio::test]
    async fn lists_are_bare_arrays_and_seeded() {
        let api = FakeApi::new();
        let response = api.send(ApiRequest::get("/categories")).await.unwrap();
        assert_eq!(response.status, 200);
        let categories: Vec<Category> = response.json().unwrap();
        assert_eq!(categories.len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_a_400_not_found() {
        let api = FakeApi::new();
        let response = api.send(ApiRequest::get("/products/999")).await.unwrap();
        assert_eq!(response.status, 400);
        assert!(response.body.contains("EntityNotFoundError"));
    }

    #[tokio::test]
    async fn faults_and_latency_are_applied() {
        let api = FakeApi::new()
            .with_fault(HttpMethod::Get, "/users/", 500)
            .with_latency(HttpMethod::Get, "/categories", 2_500);

        let users = api.send(ApiRequest::get("/users")).await.unwrap();
        assert_eq!(users.status, 500);

        let categories = api.send(ApiRequest::get("/categories")).await.unwrap();
        assert_eq!(categories.elapsed_ms, 2_500);
    }

    #[tokio::test]
    async fn category_filter_can_be_ignored() {
        let api = FakeApi::new().ignoring_category_filter();
        let response = api
            .send(ApiRequest::get("/products/").query("categoryId", 999))
            .await
            .unwrap();
        let products: Vec<Product> = response.json().unwrap();
        assert_eq!(products.len(), 1);
    }
}
