use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

use crate::{
    auth::{IdentityProvider, Session, SignedIn, UserProfile},
    error::{auth_failure, Error, ErrorKind},
};

pub const BYPASS_PARAM: &str = "bypass";
pub const BYPASS_VALUE: &str = "mellon";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LogoutOutcome {
    SignedOut,
    /// The client must reload at `location` so no bypass state lingers.
    Reload { location: String },
}

/// What a single request presents to identify its client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    /// Token handed out by [`SessionProvider::login`].
    pub token: Option<String>,
    /// The request carried the `bypass=mellon` marker.
    pub bypass: bool,
}

pub fn has_bypass_marker(location: &Url) -> bool {
    location
        .query_pairs()
        .any(|(key, value)| key == BYPASS_PARAM && value == BYPASS_VALUE)
}

pub fn strip_bypass_marker(location: &Url) -> Url {
    let kept: Vec<(String, String)> = location
        .query_pairs()
        .filter(|(key, value)| !(key == BYPASS_PARAM && value == BYPASS_VALUE))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut stripped = location.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }

    stripped
}

/// Sessions of every signed-in client, keyed by their login token.
///
/// The bypass identity is only granted when the application location carries
/// the bypass marker, and then only to requests that carry it as well. Each
/// session publishes its changes on its own watch channel, see
/// [`SessionProvider::subscribe`].
pub struct SessionProvider {
    identity: Arc<dyn IdentityProvider>,
    location: Url,
    bypass_enabled: bool,
    sessions: RwLock<HashMap<String, watch::Sender<Session>>>,
}

impl SessionProvider {
    pub fn new(identity: Arc<dyn IdentityProvider>, location: Url) -> Self {
        let bypass_enabled = has_bypass_marker(&location);

        if bypass_enabled {
            tracing::warn!("authentication bypass with mellon is enabled");
        }

        Self {
            identity,
            location,
            bypass_enabled,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn is_bypassed(&self, credentials: &Credentials) -> bool {
        credentials.bypass && self.bypass_enabled
    }

    /// Session of the client presenting `credentials`.
    pub async fn session(&self, credentials: &Credentials) -> Session {
        if self.is_bypassed(credentials) {
            return Session::resolved(Some(UserProfile::new_bypass_user()));
        }

        let Some(token) = &credentials.token else {
            return Session::resolved(None);
        };

        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .map(|sender| sender.borrow().clone())
            .unwrap_or_else(|| Session::resolved(None))
    }

    /// Signed-in user, or `AuthFailure` when the client has no session.
    pub async fn current_user(&self, credentials: &Credentials) -> Result<UserProfile, Error> {
        self.session(credentials)
            .await
            .user
            .ok_or_else(|| auth_failure("sign in required"))
    }

    /// Changes to the session behind `token`, `None` for an unknown token.
    pub async fn subscribe(&self, token: &str) -> Option<watch::Receiver<Session>> {
        self.sessions
            .read()
            .await
            .get(token)
            .map(watch::Sender::subscribe)
    }

    #[tracing::instrument(skip(self, credential))]
    pub async fn login(&self, credential: &str) -> Result<SignedIn, Error> {
        let user = self.identity.sign_in(credential).await.map_err(|err| {
            tracing::error!(%err, "login failed");
            match err.kind() {
                ErrorKind::AuthFailure => err,
                _ => auth_failure(err.message),
            }
        })?;

        tracing::info!(uid = %user.uid, "session opened");

        let token = Uuid::new_v4().to_string();
        let session = Session::resolved(Some(user));
        let (sender, _) = watch::channel(session.clone());
        self.sessions.write().await.insert(token.clone(), sender);

        Ok(SignedIn { token, session })
    }

    #[tracing::instrument(skip(self, credentials))]
    pub async fn logout(&self, credentials: &Credentials) -> LogoutOutcome {
        let closed = match &credentials.token {
            Some(token) => self.sessions.write().await.remove(token),
            None => None,
        };

        if let Some(sender) = closed {
            let user = sender.borrow().user.clone();
            if let Some(user) = user {
                if let Err(err) = self.identity.sign_out(&user).await {
                    tracing::error!(%err, "logout failed");
                }
            }

            sender.send_replace(Session::resolved(None));
        }

        if !self.is_bypassed(credentials) {
            return LogoutOutcome::SignedOut;
        }

        // a fresh load of the stripped location has no bypass marker
        LogoutOutcome::Reload {
            location: strip_bypass_marker(&self.location).to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::auth::{IdentityProvider, UserProfile};
    use crate::error::{auth_failure, upstream_error, Error};

    /// Accepts the credential `valid-token` and counts provider calls.
    #[derive(Default)]
    pub struct FakeIdentity {
        pub calls: AtomicUsize,
        pub fail_sign_out: AtomicBool,
    }

    impl FakeIdentity {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    pub fn user() -> UserProfile {
        UserProfile {
            uid: "uid-1".into(),
            display_name: Some("Errand Runner".into()),
            email: Some("runner@example.com".into()),
            photo_url: None,
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn sign_in(&self, credential: &str) -> Result<UserProfile, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if credential != "valid-token" {
                return Err(auth_failure("auth/popup-closed-by-user"));
            }
            Ok(user())
        }

        async fn sign_out(&self, _user: &UserProfile) -> Result<(), Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_sign_out.load(Ordering::SeqCst) {
                return Err(upstream_error());
            }
            Ok(())
        }
    }
}
