//! Client layer: validates payloads, routes them to endpoints, and calls the
//! API over a shared transport.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::schema::{Reason, Schema, ValidationError, Violation, registry};
use crate::transport::{SEND_TYPE_FIELD, join_endpoint, query_pairs, split_send_type};

const DEFAULT_HOST: &str = "https://api-sms.cloud.toast.com";

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v2.2";

const CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json;charset=UTF-8");

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn request<'a>(
        &'a self,
        method: HttpMethod,
        url: &'a str,
        headers: &'a [(&'static str, &'static str)],
        query: &'a [(String, String)],
        body: Option<&'a Value>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn request<'a>(
        &'a self,
        method: HttpMethod,
        url: &'a str,
        headers: &'a [(&'static str, &'static str)],
        query: &'a [(String, String)],
        body: Option<&'a Value>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let method = match method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };
            let mut builder = self.client.request(method, url);
            for (name, value) in headers {
                builder = builder.header(*name, *value);
            }
            if !query.is_empty() {
                builder = builder.query(query);
            }
            if let Some(body) = body {
                builder = builder.json(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`ToastSmsClient`].
pub enum ToastSmsError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be decoded as JSON.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The payload failed its schema contract. Raised before any network
    /// call; the inner error lists every violated constraint.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The configured host is not a valid URL.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Compiled validators, one per operation schema, shared by all clones of
/// the client.
#[derive(Debug)]
struct SchemaSet {
    basic: Schema,
    tag: Schema,
    upload: Schema,
    query: Schema,
    category: Schema,
    template: Schema,
}

impl SchemaSet {
    fn new() -> Self {
        Self {
            basic: registry::basic_send(),
            tag: registry::tag_send(),
            upload: registry::upload(),
            query: registry::query(),
            category: registry::category(),
            template: registry::template(),
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`ToastSmsClient`].
///
/// Use this when you need a different API version, host, timeout, or
/// user-agent.
pub struct ToastSmsClientBuilder {
    app_key: String,
    version: String,
    host: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ToastSmsClientBuilder {
    /// Create a builder with the default host and API version.
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            version: DEFAULT_API_VERSION.to_owned(),
            host: DEFAULT_HOST.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API version path segment (default [`DEFAULT_API_VERSION`]).
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Override the API host, e.g. for a test server.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`ToastSmsClient`].
    pub fn build(self) -> Result<ToastSmsClient, ToastSmsError> {
        let host = Url::parse(&self.host)?;
        let base = format!(
            "{}/sms/{}/appKeys/{}",
            host.as_str().trim_end_matches('/'),
            self.version,
            self.app_key
        );

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| ToastSmsError::Transport(Box::new(err)))?;

        Ok(ToastSmsClient {
            base,
            schemas: Arc::new(SchemaSet::new()),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Client for the Toast Cloud SMS/MMS API.
///
/// Every write operation validates its payload against the matching schema
/// before anything goes on the wire; a failing payload never reaches the
/// network. The base URL
/// `https://api-sms.cloud.toast.com/sms/{version}/appKeys/{appKey}` is
/// computed once at construction.
///
/// Payloads are taken by value, so the `sendType` routing key is stripped
/// from the forwarded body without touching the caller's own copy.
///
/// The client is cheap to clone; clones share the connection pool and the
/// compiled validators.
pub struct ToastSmsClient {
    base: String,
    schemas: Arc<SchemaSet>,
    http: Arc<dyn HttpTransport>,
}

impl ToastSmsClient {
    /// Create a client with the default host, API version, and transport.
    ///
    /// For a custom version, timeout, or user-agent use
    /// [`ToastSmsClient::builder`].
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            base: format!(
                "{DEFAULT_HOST}/sms/{DEFAULT_API_VERSION}/appKeys/{}",
                app_key.into()
            ),
            schemas: Arc::new(SchemaSet::new()),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(app_key: impl Into<String>) -> ToastSmsClientBuilder {
        ToastSmsClientBuilder::new(app_key)
    }

    /// Issue one request and return the raw response without interpreting
    /// the status. The endpoint suffix may carry a leading slash or not.
    async fn call(
        &self,
        end_point: &str,
        method: HttpMethod,
        params: Option<&Value>,
        json: Option<&Value>,
    ) -> Result<HttpResponse, ToastSmsError> {
        let url = join_endpoint(&self.base, end_point);
        let query = params.map(query_pairs).unwrap_or_default();
        self.http
            .request(method, &url, &[CONTENT_TYPE], &query, json)
            .await
            .map_err(ToastSmsError::Transport)
    }

    /// Validate against `schema`, strip the `sendType` routing key, and
    /// dispatch to `{prefix}/{sendType}`.
    async fn dispatch_routed(
        &self,
        schema: &Schema,
        prefix: &str,
        method: HttpMethod,
        payload: Value,
    ) -> Result<Value, ToastSmsError> {
        schema.validate(&payload)?;
        let Some((send_type, body)) = split_send_type(payload) else {
            return Err(ValidationError::new(
                schema.name(),
                vec![Violation {
                    path: SEND_TYPE_FIELD.to_owned(),
                    reason: Reason::MissingProperty,
                }],
            )
            .into());
        };

        let end_point = format!("{prefix}/{send_type}");
        let response = match method {
            HttpMethod::Get => {
                self.call(&end_point, HttpMethod::Get, Some(&body), None)
                    .await?
            }
            method => self.call(&end_point, method, None, Some(&body)).await?,
        };
        decode(response)
    }

    /// Create a template category.
    pub async fn add_category(&self, payload: Value) -> Result<Value, ToastSmsError> {
        self.schemas.category.validate(&payload)?;
        let response = self
            .call("/categories", HttpMethod::Post, None, Some(&payload))
            .await?;
        decode(response)
    }

    /// Look up one category by id, or list categories filtered by `params`.
    /// Read path: `params` is forwarded as query parameters unvalidated.
    pub async fn inquiry_category(
        &self,
        params: Option<Value>,
        category_id: Option<i64>,
    ) -> Result<Value, ToastSmsError> {
        let response = match category_id {
            Some(id) => {
                self.call(&format!("/categories/{id}"), HttpMethod::Get, None, None)
                    .await?
            }
            None => {
                self.call("/categories", HttpMethod::Get, params.as_ref(), None)
                    .await?
            }
        };
        decode(response)
    }

    /// Update an existing category.
    pub async fn update_category(
        &self,
        category_id: i64,
        payload: Value,
    ) -> Result<Value, ToastSmsError> {
        self.schemas.category.validate(&payload)?;
        let response = self
            .call(
                &format!("/categories/{category_id}"),
                HttpMethod::Put,
                None,
                Some(&payload),
            )
            .await?;
        decode(response)
    }

    /// Delete a category. No body, so nothing to validate.
    pub async fn delete_category(&self, category_id: i64) -> Result<Value, ToastSmsError> {
        let response = self
            .call(
                &format!("/categories/{category_id}"),
                HttpMethod::Delete,
                None,
                None,
            )
            .await?;
        decode(response)
    }

    /// Register a message template.
    ///
    /// When the payload carries no `categoryId`, `category_id` is injected
    /// before validation (the API's root category is `0`).
    pub async fn add_template(
        &self,
        mut payload: Value,
        category_id: i64,
    ) -> Result<Value, ToastSmsError> {
        if let Some(map) = payload.as_object_mut() {
            if !map.contains_key("categoryId") {
                map.insert("categoryId".to_owned(), Value::from(category_id));
            }
        }
        self.schemas.template.validate(&payload)?;
        let response = self
            .call("/templates", HttpMethod::Post, None, Some(&payload))
            .await?;
        decode(response)
    }

    /// Look up one template by id, or list templates filtered by `params`
    /// (categoryId, useYn, pageSize, pageNum, ...). Read path, unvalidated.
    pub async fn inquiry_template(
        &self,
        params: Option<Value>,
        template_id: Option<&str>,
    ) -> Result<Value, ToastSmsError> {
        let response = match template_id {
            Some(id) => {
                self.call(&format!("/templates/{id}"), HttpMethod::Get, None, None)
                    .await?
            }
            None => {
                self.call("/templates", HttpMethod::Get, params.as_ref(), None)
                    .await?
            }
        };
        decode(response)
    }

    /// Update an existing template.
    pub async fn update_template(
        &self,
        template_id: &str,
        payload: Value,
    ) -> Result<Value, ToastSmsError> {
        self.schemas.template.validate(&payload)?;
        let response = self
            .call(
                &format!("/templates/{template_id}"),
                HttpMethod::Put,
                None,
                Some(&payload),
            )
            .await?;
        decode(response)
    }

    /// Delete a template. No body, so nothing to validate.
    pub async fn delete_template(&self, template_id: &str) -> Result<Value, ToastSmsError> {
        let response = self
            .call(
                &format!("/templates/{template_id}"),
                HttpMethod::Delete,
                None,
                None,
            )
            .await?;
        decode(response)
    }

    /// Send a message (SMS or MMS) to an explicit recipient list.
    ///
    /// The payload's `sendType` picks `/sender/sms` or `/sender/mms` and is
    /// stripped from the forwarded body.
    pub async fn send_message(&self, payload: Value) -> Result<Value, ToastSmsError> {
        self.dispatch_routed(&self.schemas.basic, "/sender", HttpMethod::Post, payload)
            .await
    }

    /// Look up sent-message results. `sendType` picks the endpoint; the
    /// remaining fields become query parameters.
    pub async fn inquiry_sent_result(&self, params: Value) -> Result<Value, ToastSmsError> {
        self.dispatch_routed(&self.schemas.query, "/sender", HttpMethod::Get, params)
            .await
    }

    /// Send a message to recipients selected by a tag expression.
    pub async fn send_tag_message(&self, payload: Value) -> Result<Value, ToastSmsError> {
        self.dispatch_routed(&self.schemas.tag, "/tag-sender", HttpMethod::Post, payload)
            .await
    }

    /// Upload an MMS attachment (base64 chunks in `fileBody`).
    pub async fn upload_attach_file(&self, payload: Value) -> Result<Value, ToastSmsError> {
        self.schemas.upload.validate(&payload)?;
        let response = self
            .call(
                "/attachfile/binaryUpload",
                HttpMethod::Post,
                None,
                Some(&payload),
            )
            .await?;
        decode(response)
    }
}

/// Interpret a raw response: non-2xx/3xx statuses become
/// [`ToastSmsError::HttpStatus`], everything else is decoded as JSON.
fn decode(response: HttpResponse) -> Result<Value, ToastSmsError> {
    if response.status >= 400 {
        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body)
        };
        return Err(ToastSmsError::HttpStatus {
            status: response.status,
            body,
        });
    }
    serde_json::from_str(&response.body).map_err(ToastSmsError::Decode)
}
