#![allow(dead_code)]

/// REST client for the portal backend.
///
/// Every call takes the bearer token explicitly; nothing in this module
/// reads ambient state. Requests are fire-and-forget from the caller's point
/// of view: no retries, no cancellation, only the client-wide timeout.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::errors::PortalError;
use crate::models::{ContentUnit, UnitDraft, UnitKind};

pub mod endpoints;

pub use endpoints::Collection;

/// Bearer token supplied by whoever owns the user session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthToken(Option<String>);

impl AuthToken {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Attaches `Authorization: Bearer <token>` when a token is present.
pub fn authorized(builder: RequestBuilder, token: &AuthToken) -> RequestBuilder {
    match token.as_deref() {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    info: Option<Info>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    info: Option<Info>,
}

#[derive(Debug, Default, Deserialize)]
struct Info {
    #[serde(default)]
    message: String,
}

/// Successful response: the payload plus the server's `info.message`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply<T> {
    pub data: T,
    pub message: String,
}

/// Operations the portal needs from the backend.
///
/// View-models hold a `&dyn PortalApi` so they can be driven by the real
/// client or by an in-memory backend in tests.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn list_units(
        &self,
        token: &AuthToken,
        kind: UnitKind,
    ) -> Result<ApiReply<Vec<ContentUnit>>, PortalError>;

    async fn get_unit(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
    ) -> Result<ApiReply<ContentUnit>, PortalError>;

    async fn create_unit(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        draft: &UnitDraft,
    ) -> Result<ApiReply<ContentUnit>, PortalError>;

    async fn update_unit(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
        draft: &UnitDraft,
    ) -> Result<ApiReply<ContentUnit>, PortalError>;

    async fn delete_unit(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
    ) -> Result<ApiReply<Value>, PortalError>;

    /// One all-or-nothing upsert of a child collection.
    async fn bulk_save(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
        collection: Collection,
        payload: Value,
    ) -> Result<ApiReply<Value>, PortalError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, PortalError> {
        if base_url.cannot_be_a_base() {
            return Err(PortalError::Validation(format!(
                "API URL '{base_url}' cannot be used as a base"
            )));
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, PortalError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortalError::Validation(format!("API URL '{}' cannot be used as a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: &AuthToken,
    ) -> Result<RequestBuilder, PortalError> {
        let url = self.endpoint(segments)?;
        Ok(authorized(self.client.request(method, url), token))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiReply<T>, PortalError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!("{method} {path}");

        let response = match self.client.execute(request).await {
            Ok(r) => r,
            Err(e) => {
                warn!("{method} {path} did not complete: {e}");
                return Err(PortalError::Http(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.info)
                .map(|i| i.message)
                .unwrap_or_default();
            warn!("{method} {path} returned {status}: {message}");
            return Err(PortalError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(ApiReply {
            data: envelope.data,
            message: envelope.info.map(|i| i.message).unwrap_or_default(),
        })
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        token: &AuthToken,
        body: &B,
    ) -> Result<ApiReply<T>, PortalError> {
        let builder = self.request(method, segments, token)?.json(body);
        self.send(builder).await
    }
}

#[async_trait]
impl PortalApi for ApiClient {
    async fn list_units(
        &self,
        token: &AuthToken,
        kind: UnitKind,
    ) -> Result<ApiReply<Vec<ContentUnit>>, PortalError> {
        let builder = self.request(Method::GET, &endpoints::units(kind), token)?;
        self.send(builder).await
    }

    async fn get_unit(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
    ) -> Result<ApiReply<ContentUnit>, PortalError> {
        let builder = self.request(Method::GET, &endpoints::unit(kind, id), token)?;
        self.send(builder).await
    }

    async fn create_unit(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        draft: &UnitDraft,
    ) -> Result<ApiReply<ContentUnit>, PortalError> {
        self.send_json(Method::POST, &endpoints::units(kind), token, draft)
            .await
    }

    async fn update_unit(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
        draft: &UnitDraft,
    ) -> Result<ApiReply<ContentUnit>, PortalError> {
        self.send_json(Method::PUT, &endpoints::unit(kind, id), token, draft)
            .await
    }

    async fn delete_unit(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
    ) -> Result<ApiReply<Value>, PortalError> {
        let builder = self.request(Method::DELETE, &endpoints::unit(kind, id), token)?;
        self.send(builder).await
    }

    async fn bulk_save(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
        collection: Collection,
        payload: Value,
    ) -> Result<ApiReply<Value>, PortalError> {
        self.send_json(
            Method::PUT,
            &endpoints::bulk(kind, id, collection),
            token,
            &payload,
        )
        .await
    }
}
