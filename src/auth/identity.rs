use async_trait::async_trait;

use crate::auth::UserProfile;
use crate::error::Error;

/// External sign-in service.
///
/// `sign_in` receives whatever credential the client obtained from the
/// provider's own sign-in flow and returns the verified profile. The provider
/// keeps no per-client state; sessions live in [`crate::auth::SessionProvider`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credential: &str) -> Result<UserProfile, Error>;
    async fn sign_out(&self, user: &UserProfile) -> Result<(), Error>;
}
