use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::TransportError;

use super::request::ApiRequest;
use super::response::ApiResponse;

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + Send + 'a>>;

/// Issues one request and reports status, latency and body.
///
/// Calls complete before returning; there is no request-level timeout.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// `Transport` over a reqwest client with a fixed base address.
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, default_headers: &[(String, String)]) -> Result<Self, TransportError> {
        let base = base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(base).map_err(|err| TransportError::InvalidUrl {
            url: base.to_string(),
            reason: err.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in build_headers(default_headers)? {
            if let Some(name) = name {
                headers.insert(name, value);
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> Result<reqwest::Url, TransportError> {
        let raw = format!("{}/{}", self.base_url, request.path.trim_start_matches('/'));
        let mut url = reqwest::Url::parse(&raw).map_err(|err| TransportError::InvalidUrl {
            url: raw.clone(),
            reason: err.to_string(),
        })?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request)?;
        let mut builder = self
            .client
            .request(request.method.into(), url)
            .headers(build_headers(&request.headers)?);

        if let Some(token) = request.bearer_token.as_deref() {
            builder = builder.bearer_auth(token.trim());
        }

        if request.method.has_body() {
            if let Some(body) = &request.body {
                builder = builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(serde_json::to_string(body)?);
            }
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TransportError::ReadBody(err.to_string()))?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        Ok(ApiResponse {
            status,
            elapsed_ms,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

impl Transport for HttpClient {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        Box::pin(self.execute(request))
    }
}

/// Parse `(name, value)` pairs into a header map. Empty names are skipped.
pub fn build_headers(input: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();

    for (key, value) in input {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let header_name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|err| TransportError::InvalidHeader {
                name: key.to_string(),
                reason: err.to_string(),
            })?;
        let header_value =
            HeaderValue::from_str(value.trim()).map_err(|err| TransportError::InvalidHeader {
                name: key.to_string(),
                reason: err.to_string(),
            })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Split `Key: Value` lines into header pairs.
pub fn parse_header_lines<'a, I>(lines: I) -> Result<Vec<(String, String)>, TransportError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut pairs = Vec::new();

    for line in lines {
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }

        let (key, value) = raw.split_once(':').ok_or_else(|| TransportError::InvalidHeader {
            name: raw.to_string(),
            reason: "expected `Key: Value`".to_string(),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(TransportError::InvalidHeader {
                name: raw.to_string(),
                reason: "header key is empty".to_string(),
            });
        }
        pairs.push((key.to_string(), value.trim().to_string()));
    }

    Ok(pairs)
}
