use std::env;

use anyhow::{Context as _, Result};
use instagram_api::{Client, Credentials, OAuth};

/// Settings read from the environment (and `.env`, loaded in `main`).
#[derive(Debug, Default)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub redirect_uri: String,
    pub base_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let base_url = get("INSTAGRAM_BASE_URL");
        Self {
            client_id: get("INSTAGRAM_CLIENT_ID"),
            client_secret: get("INSTAGRAM_CLIENT_SECRET"),
            access_token: get("INSTAGRAM_ACCESS_TOKEN"),
            redirect_uri: get("INSTAGRAM_REDIRECT_URI"),
            base_url: (!base_url.is_empty()).then_some(base_url),
        }
    }

    /// Signed requests are enforced whenever a client secret is configured.
    pub fn enforce_signed_request(&self) -> bool {
        !self.client_secret.is_empty()
    }

    pub fn client(&self, keep_raw_body: bool) -> Result<Client> {
        let credentials =
            Credentials::new(&self.client_id, &self.client_secret, &self.access_token);
        let mut client = Client::new(credentials, self.enforce_signed_request())
            .context("set INSTAGRAM_ACCESS_TOKEN or INSTAGRAM_CLIENT_ID")?
            .with_raw_body(keep_raw_body);
        if let Some(ref base_url) = self.base_url {
            client = client.with_base_url(base_url);
        }
        Ok(client)
    }

    pub fn oauth(&self) -> Result<OAuth> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            anyhow::bail!("INSTAGRAM_CLIENT_ID and INSTAGRAM_CLIENT_SECRET are required");
        }
        if self.redirect_uri.is_empty() {
            anyhow::bail!("INSTAGRAM_REDIRECT_URI is required");
        }
        Ok(OAuth::new(
            &self.client_id,
            &self.client_secret,
            &self.redirect_uri,
        )?)
    }
}
