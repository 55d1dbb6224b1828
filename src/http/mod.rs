pub mod client;
pub mod method;
pub mod request;
pub mod response;

pub use client::{HttpClient, Transport};
pub use request::ApiRequest;
pub use response::ApiResponse;
