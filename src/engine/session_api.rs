use super::Engine;

use async_trait::async_trait;

use crate::{
    api::SessionAPI,
    auth::{Credentials, LogoutOutcome, Session, SignedIn, UserProfile},
    error::Error,
};

#[async_trait]
impl SessionAPI for Engine {
    async fn session(&self, credentials: &Credentials) -> Session {
        self.session.session(credentials).await
    }

    async fn current_user(&self, credentials: &Credentials) -> Result<UserProfile, Error> {
        self.session.current_user(credentials).await
    }

    async fn login(&self, credential: String) -> Result<SignedIn, Error> {
        self.session.login(&credential).await
    }

    async fn logout(&self, credentials: &Credentials) -> LogoutOutcome {
        self.session.logout(credentials).await
    }
}
