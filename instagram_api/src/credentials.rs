use std::fmt;

use crate::Error;

/// Application and user credentials. Immutable once handed to a [`crate::Client`].
///
/// Empty strings are treated as unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    client_id: Option<String>,
    client_secret: Option<String>,
    access_token: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

impl Credentials {
    pub fn new(client_id: &str, client_secret: &str, access_token: &str) -> Self {
        Self {
            client_id: non_empty(client_id),
            client_secret: non_empty(client_secret),
            access_token: non_empty(access_token),
        }
    }

    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.client_id = non_empty(client_id);
        self
    }

    pub fn with_client_secret(mut self, client_secret: &str) -> Self {
        self.client_secret = non_empty(client_secret);
        self
    }

    pub fn with_access_token(mut self, access_token: &str) -> Self {
        self.access_token = non_empty(access_token);
        self
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Checks that requests can be authenticated, and signed if required.
    pub fn validate(&self, enforce_signed_request: bool) -> Result<(), Error> {
        if self.client_id.is_none() && self.access_token.is_none() {
            return Err(Error::Config(
                "client id or access token must be given".to_string(),
            ));
        }
        if enforce_signed_request && self.client_secret.is_none() {
            return Err(Error::Config(
                "client secret is required for signed requests".to_string(),
            ));
        }
        Ok(())
    }

    /// The query parameter that authenticates a request. Access tokens win
    /// over client ids.
    pub(crate) fn auth_param(&self) -> Option<(&'static str, &str)> {
        match (&self.access_token, &self.client_id) {
            (Some(token), _) => Some(("access_token", token)),
            (None, Some(id)) => Some(("client_id", id)),
            (None, None) => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("access_token", &redact(&self.access_token))
            .finish()
    }
}
