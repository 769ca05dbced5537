//! Typed wrappers around the REST surface.

use super::error::ClientError;
use crate::domain::model::{Person, Product, SheetEntity};
use crate::transport::http::types::HealthResponse;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value as JsonValue;
use std::marker::PhantomData;
use std::time::Duration;

/// Every request fails as a network error after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::Network(format!("invalid base URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Network(format!("invalid base URL '{}'", base_url)));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { http, base })
    }

    pub fn users(&self) -> Resource<Person> {
        Resource::new(self.clone(), "users")
    }

    pub fn products(&self) -> Resource<Product> {
        Resource::new(self.clone(), "products")
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let body = self.send(self.get(&["health"])).await?;
        decode(body)
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    /// GET with a cache-busting `_t` parameter.
    fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.http
            .get(self.url(segments))
            .query(&[("_t", Utc::now().timestamp_millis().to_string())])
    }

    async fn send(&self, request: RequestBuilder) -> Result<JsonValue, ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed before a response arrived");
            ClientError::Network(e.to_string())
        })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let body: JsonValue = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(v) => v,
                Err(_) if !status.is_success() => JsonValue::Null,
                Err(e) => return Err(ClientError::Decode(e.to_string())),
            }
        };
        if !status.is_success() {
            let err = ClientError::from_response(status.as_u16(), &body);
            tracing::debug!(%status, message = %err, "Request rejected");
            return Err(err);
        }
        Ok(body)
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: JsonValue) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

fn data<T: serde::de::DeserializeOwned>(mut body: JsonValue) -> Result<T, ClientError> {
    match body.get_mut("data") {
        Some(v) => decode(v.take()),
        None => Err(ClientError::Decode("response has no `data`".to_string())),
    }
}

/// One REST resource (`/api/users`, `/api/products`).
#[derive(Clone)]
pub struct Resource<E> {
    client: ApiClient,
    path: &'static str,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SheetEntity> Resource<E> {
    fn new(client: ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> Result<Vec<E>, ClientError> {
        let body = self.client.send(self.client.get(&[self.path])).await?;
        data(body)
    }

    pub async fn create(&self, input: &E::Input) -> Result<E, ClientError> {
        let request = self.client.http.post(self.client.url(&[self.path])).json(input);
        data(self.client.send(request).await?)
    }

    pub async fn update(&self, row_index: u32, input: &E::Input) -> Result<E, ClientError> {
        let row = row_index.to_string();
        let request = self
            .client
            .http
            .put(self.client.url(&[self.path, &row]))
            .json(input);
        data(self.client.send(request).await?)
    }

    pub async fn delete(&self, row_index: u32) -> Result<(), ClientError> {
        let row = row_index.to_string();
        let request = self.client.http.delete(self.client.url(&[self.path, &row]));
        self.client.send(request).await.map(|_| ())
    }
}
