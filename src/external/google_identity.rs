use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{IdentityProvider, UserProfile},
    error::{auth_failure, upstream_error, Error},
};

pub const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenInfo {
    pub aud: String,
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl From<TokenInfo> for UserProfile {
    fn from(info: TokenInfo) -> Self {
        Self {
            uid: info.sub,
            display_name: info.name,
            email: info.email,
            photo_url: info.picture,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct TokenError {
    error: Option<String>,
    error_description: Option<String>,
}

/// Verifies Google ID tokens obtained by the client.
///
/// Without a configured client id every token is refused, since the audience
/// cannot be checked.
pub struct GoogleIdentityProvider {
    http: reqwest::Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: Option<String>) -> Self {
        Self::with_tokeninfo_url(TOKENINFO_URL, client_id)
    }

    pub fn with_tokeninfo_url(tokeninfo_url: impl Into<String>, client_id: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokeninfo_url: tokeninfo_url.into(),
            client_id,
        }
    }

    /// Rejects tokens minted for another OAuth client.
    pub fn check_audience(&self, info: &TokenInfo) -> Result<(), Error> {
        match &self.client_id {
            Some(client_id) if client_id == &info.aud => Ok(()),
            Some(_) => Err(auth_failure("ID token was issued for a different client")),
            None => Err(auth_failure("Google sign-in is not configured")),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    #[tracing::instrument(skip(self, credential))]
    async fn sign_in(&self, credential: &str) -> Result<UserProfile, Error> {
        if credential.is_empty() {
            return Err(auth_failure("missing ID token"));
        }

        if self.client_id.is_none() {
            return Err(auth_failure("Google sign-in is not configured"));
        }

        let res = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", credential)])
            .send()
            .await?;

        let status = res.status();

        if status.is_client_error() {
            let body: TokenError = res.json().await?;
            let message = body
                .error_description
                .or(body.error)
                .unwrap_or_else(|| "invalid ID token".into());
            return Err(auth_failure(message));
        } else if !status.is_success() {
            return Err(upstream_error());
        }

        let info: TokenInfo = res.json().await?;
        self.check_audience(&info)?;

        let user: UserProfile = info.into();
        tracing::info!(uid = %user.uid, "ID token verified");

        Ok(user)
    }

    /// ID tokens expire on their own; there is nothing to revoke.
    async fn sign_out(&self, user: &UserProfile) -> Result<(), Error> {
        tracing::debug!(uid = %user.uid, "signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn info(aud: &str) -> TokenInfo {
        serde_json::from_value(serde_json::json!({
            "iss": "https://accounts.google.com",
            "aud": aud,
            "sub": "110169484474386276334",
            "email": "runner@example.com",
            "name": "Errand Runner",
            "picture": "https://lh3.googleusercontent.com/a/photo",
            "exp": "1760000000"
        }))
        .unwrap()
    }

    #[test]
    fn token_info_maps_to_profile() {
        let user: UserProfile = info("client").into();

        assert_eq!(user.uid, "110169484474386276334");
        assert_eq!(user.display_name.as_deref(), Some("Errand Runner"));
        assert_eq!(
            user.photo_url.as_deref(),
            Some("https://lh3.googleusercontent.com/a/photo")
        );
    }

    #[test]
    fn audience_is_checked_when_configured() {
        let provider = GoogleIdentityProvider::new(Some("client".into()));
        assert!(provider.check_audience(&info("client")).is_ok());
        assert_eq!(
            provider.check_audience(&info("other")).unwrap_err().kind(),
            ErrorKind::AuthFailure
        );

        let unconfigured = GoogleIdentityProvider::new(None);
        assert_eq!(
            unconfigured.check_audience(&info("other")).unwrap_err().kind(),
            ErrorKind::AuthFailure
        );
    }

    #[tokio::test]
    async fn unconfigured_provider_refuses_tokens_locally() {
        let provider =
            GoogleIdentityProvider::with_tokeninfo_url("http://127.0.0.1:9/tokeninfo", None);

        let err = provider.sign_in("eyJhbGciOi").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AuthFailure);
        assert_eq!(err.message, "Google sign-in is not configured");
    }

    #[tokio::test]
    async fn empty_credential_is_rejected_locally() {
        let provider = GoogleIdentityProvider::new(Some("client".into()));

        let err = provider.sign_in("").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AuthFailure);
        assert_eq!(err.message, "missing ID token");
    }
}
