//! HTTP-backed gateway implementation.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::Result;
use crate::api::{
    AddMovieRequest, ApiClient, ListMoviesQuery, LOGIN, LoginRequest, LoginResponse, MOVIES,
    PROFILE, SIGNUP, SignupRequest, movie,
};
use crate::auth::{Credentials, Registration, Token, UserProfile};
use crate::catalog::{CatalogItem, ItemFields};
use crate::types::{ApiUrl, ItemId, UserId};

use super::CatalogApi;

const NO_PARAMS: [(&str, &str); 0] = [];

/// A page of items, either as a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PageResponse {
    Bare(Vec<CatalogItem>),
    Wrapped {
        #[serde(alias = "items", alias = "data")]
        movies: Vec<CatalogItem>,
    },
}

impl PageResponse {
    fn into_items(self) -> Vec<CatalogItem> {
        match self {
            PageResponse::Bare(items) => items,
            PageResponse::Wrapped { movies } => movies,
        }
    }
}

/// A network-backed gateway talking to the catalog REST service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: ApiClient,
}

impl HttpGateway {
    /// Create a gateway for the given API base.
    pub fn new(api: ApiUrl) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(api)?,
        })
    }

    /// Create a gateway from a preconfigured client.
    pub fn from_client(client: ApiClient) -> Self {
        Self { client }
    }

    /// Returns the API base for this gateway.
    pub fn api(&self) -> &ApiUrl {
        self.client.api()
    }
}

#[async_trait]
impl CatalogApi for HttpGateway {
    #[instrument(skip(self), fields(username = %registration.username()))]
    async fn signup(&self, registration: &Registration) -> Result<()> {
        debug!("Registering account");

        let request = SignupRequest {
            username: registration.username(),
            email: registration.email(),
            password: registration.password(),
        };

        self.client.post_no_response(SIGNUP, &request).await
    }

    #[instrument(skip(self), fields(email = %credentials.email()))]
    async fn login(&self, credentials: &Credentials) -> Result<Token> {
        debug!("Logging in");

        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };

        let response: LoginResponse = self.client.post(LOGIN, &request).await?;
        Ok(Token::new(response.token))
    }

    #[instrument(skip(self, token))]
    async fn profile(&self, token: &Token) -> Result<UserProfile> {
        debug!("Fetching profile");
        self.client.get_authed(PROFILE, &NO_PARAMS, token).await
    }

    #[instrument(skip(self, token), fields(%owner))]
    async fn list_items(
        &self,
        token: &Token,
        owner: &UserId,
        page: u32,
        limit: u32,
    ) -> Result<Vec<CatalogItem>> {
        debug!("Listing catalog page");

        let owner = owner.to_string();
        let query = ListMoviesQuery {
            user_id: &owner,
            page,
            limit,
        };

        let response: PageResponse = self.client.get_authed(MOVIES, &query, token).await?;
        Ok(response.into_items())
    }

    #[instrument(skip(self, token, payload), fields(%owner, title = %payload.title))]
    async fn add_item(
        &self,
        token: &Token,
        owner: &UserId,
        payload: &ItemFields,
    ) -> Result<CatalogItem> {
        debug!("Adding catalog item");

        let request = AddMovieRequest {
            fields: payload,
            user_id: owner,
        };

        self.client.post_authed(MOVIES, &request, token).await
    }

    #[instrument(skip(self, token, payload), fields(%id))]
    async fn update_item(
        &self,
        token: &Token,
        id: &ItemId,
        payload: &ItemFields,
    ) -> Result<CatalogItem> {
        debug!("Updating catalog item");
        self.client.put_authed(&movie(id), payload, token).await
    }

    #[instrument(skip(self, token), fields(%id))]
    async fn delete_item(&self, token: &Token, id: &ItemId) -> Result<()> {
        debug!("Deleting catalog item");
        self.client.delete_authed(&movie(id), token).await
    }
}
