//! REST HTTP client implementation.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use crate::auth::Token;
use crate::error::{Error, ProtocolError};
use crate::types::ApiUrl;

use super::endpoints::ErrorResponse;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for catalog service requests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl ApiClient {
    /// Create a new client for the given API base with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(api: ApiUrl) -> Result<Self, Error> {
        Self::with_timeout(api, DEFAULT_TIMEOUT)
    }

    /// Create a new client with an explicit per-request timeout.
    pub fn with_timeout(api: ApiUrl, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, api })
    }

    /// Returns the API base this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Make an authenticated GET request.
    #[instrument(skip(self, token), fields(api = %self.api))]
    pub async fn get_authed<Q, R>(&self, path: &str, params: &Q, token: &Token) -> Result<R, Error>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(path, "authenticated GET");
        trace!(?params, "query parameters");

        let request = self.client.get(&url).query(params);
        self.send(authed(request, token)).await
    }

    /// Make an unauthenticated POST request.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(path, "POST");

        self.send(self.client.post(&url).json(body)).await
    }

    /// Make an unauthenticated POST request whose response body is ignored.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post_no_response<B>(&self, path: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize,
    {
        let url = self.api.endpoint(path);
        debug!(path, "POST (no response)");

        self.send_no_response(self.client.post(&url).json(body))
            .await
    }

    /// Make an authenticated POST request.
    #[instrument(skip(self, body, token), fields(api = %self.api))]
    pub async fn post_authed<B, R>(&self, path: &str, body: &B, token: &Token) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(path, "authenticated POST");

        self.send(authed(self.client.post(&url).json(body), token))
            .await
    }

    /// Make an authenticated PUT request.
    #[instrument(skip(self, body, token), fields(api = %self.api))]
    pub async fn put_authed<B, R>(&self, path: &str, body: &B, token: &Token) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(path, "authenticated PUT");

        self.send(authed(self.client.put(&url).json(body), token))
            .await
    }

    /// Make an authenticated DELETE request that returns no content.
    #[instrument(skip(self, token), fields(api = %self.api))]
    pub async fn delete_authed(&self, path: &str, token: &Token) -> Result<(), Error> {
        let url = self.api.endpoint(path);
        debug!(path, "authenticated DELETE");

        self.send_no_response(authed(self.client.delete(&url), token))
            .await
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, Error> {
        let response = request.send().await?;
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            Ok(response.json::<R>().await?)
        } else {
            Err(Error::Protocol(parse_error_response(response).await))
        }
    }

    async fn send_no_response(&self, request: RequestBuilder) -> Result<(), Error> {
        let response = request.send().await?;
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(parse_error_response(response).await))
        }
    }
}

fn authed(request: RequestBuilder, token: &Token) -> RequestBuilder {
    request.header(reqwest::header::AUTHORIZATION, token.bearer())
}

/// Parse an error response, keeping whatever message the service sent.
async fn parse_error_response(response: reqwest::Response) -> ProtocolError {
    let status = response.status().as_u16();

    match response.json::<ErrorResponse>().await {
        Ok(body) => ProtocolError::new(status, body.error, body.message),
        Err(_) => ProtocolError::new(status, None, None),
    }
}
