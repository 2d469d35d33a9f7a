mod identity;
mod session;
mod user;

pub use identity::IdentityProvider;
pub use session::{
    has_bypass_marker, strip_bypass_marker, Credentials, LogoutOutcome, SessionProvider,
    BYPASS_PARAM, BYPASS_VALUE,
};
pub use user::{Session, SignedIn, UserProfile};

#[cfg(test)]
pub(crate) use session::test_support;
