//! OAuth authorization-code flow used to obtain an access token.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::{
    client::{api_error, decode_json},
    context::Context,
    errors::{ApiError, OAuthError},
    query::Params,
    types::Meta,
    Error,
};

pub const AUTHORIZE_URL: &str = "https://api.instagram.com/oauth/authorize/";
pub const ACCESS_TOKEN_URL: &str = "https://api.instagram.com/oauth/access_token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One application's side of the OAuth exchange.
#[derive(Clone, Debug)]
pub struct OAuth {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    token_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

impl OAuth {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            token_url: ACCESS_TOKEN_URL.to_string(),
            http,
        })
    }

    /// Sends the code exchange somewhere else. Used for testing with wiremock.
    pub fn with_token_url(mut self, token_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self
    }

    /// The URL to send the user to. `state` is omitted when empty.
    pub fn authorize_url(&self, state: &str) -> String {
        let mut params = Params::new()
            .with("client_id", self.client_id.as_str())
            .with("redirect_uri", self.redirect_uri.as_str())
            .with("response_type", "code");
        if !state.is_empty() {
            params.set("state", state);
        }
        format!("{}?{}", AUTHORIZE_URL, params.encode())
    }

    /// Pulls the authorization code out of the redirect, checking `state`
    /// when one was sent.
    pub fn code_from_redirect(&self, redirect: &Url, state: &str) -> Result<String, Error> {
        let query = Params::from_url(redirect);
        if !state.is_empty() && query.get("state") != Some(state) {
            return Err(OAuthError::StateMismatch.into());
        }
        match query.get("code") {
            Some(code) if !code.is_empty() => Ok(code.to_string()),
            _ => Err(OAuthError::MissingCode.into()),
        }
    }

    /// Trades an authorization code for an access token.
    pub async fn access_token(&self, ctx: &Context, code: &str) -> Result<String, Error> {
        ctx.run(self.exchange(code)).await
    }

    async fn exchange(&self, code: &str) -> Result<String, Error> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ];
        tracing::debug!("POST {}", self.token_url);
        let resp = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::from_reqwest)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(Error::from_reqwest)?;
        if status != StatusCode::OK {
            return Err(token_error(status, &body));
        }

        let token: TokenResponse =
            decode_json(&body).map_err(|e| Error::Decode(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(OAuthError::MissingToken.into());
        }
        Ok(token.access_token)
    }
}

/// The token endpoint reports errors as a bare meta object, not nested
/// under `meta`.
fn token_error(status: StatusCode, body: &[u8]) -> Error {
    match decode_json::<Meta>(body) {
        Ok(meta) if meta.code != 0 => {
            tracing::warn!("Token exchange rejected: {:?}", meta.error_message);
            Error::Api(ApiError::from(meta))
        }
        _ => api_error(status, body),
    }
}
