//! Outbound request gateway.
//!
//! Every request goes through [`ApiClient::send`]:
//! - a stored token is attached as `Authorization: Bearer <token>`; no token,
//!   no header
//! - a 401 clears the session, sends the client to the login view and is
//!   still returned to the caller as [`ApiError::Unauthorized`]
//! - every other failure status is returned untouched; there is no retry

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use itdesk_auth::{Navigator, Session, SessionStore, SessionUser, View};
use itdesk_events::{AppEvent, EventBus, InMemoryEventBus};
use itdesk_observability::redact_token;

use crate::config::ClientConfig;
use crate::error::ApiError;

pub type AppEventBus = InMemoryEventBus<AppEvent>;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: SessionUser,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    sessions: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    events: Option<Arc<AppEventBus>>,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        sessions: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.api_base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            sessions,
            navigator,
            events: None,
        })
    }

    /// Announce session teardown on `events`.
    pub fn with_events(mut self, events: Arc<AppEventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Send a request through the auth interceptor.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.sessions.token() {
            Some(token) => {
                tracing::trace!(token = %redact_token(&token), "attaching bearer token");
                request.bearer_auth(token)
            }
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let path = response.url().path().to_string();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(path = %path, "backend rejected credential");
            self.on_unauthorized();
            return Err(ApiError::Unauthorized(body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, url)).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, url).json(body)).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and discard the response body.
    pub async fn execute(&self, method: Method, url: Url) -> Result<(), ApiError> {
        self.send(self.request(method, url)).await.map(|_| ())
    }

    /// `POST /auth/login`; on success the session is persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        let LoginResponse { token, user } = self
            .post_json(url, &LoginRequest { email, password })
            .await?;

        self.sessions.set(&token, &user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "signed in");

        Ok(Session::new(token, user))
    }

    /// Drop the session and go to the login view.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.sessions.clear()?;
        tracing::info!("signed out");
        self.publish(AppEvent::SessionCleared);
        self.navigator.navigate(View::Login);
        Ok(())
    }

    fn on_unauthorized(&self) {
        if let Err(err) = self.sessions.clear() {
            tracing::error!("failed to clear session after 401: {err}");
        }
        self.publish(AppEvent::SessionCleared);
        self.navigator.navigate(View::Login);
    }

    fn publish(&self, event: AppEvent) {
        if let Some(events) = &self.events {
            if events.publish(event).is_err() {
                tracing::debug!(event = %event, "no subscribers for event");
            }
        }
    }
}
