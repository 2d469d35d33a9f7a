use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl UserProfile {
    /// Stand-in identity used when authentication is bypassed.
    pub fn new_bypass_user() -> Self {
        Self {
            uid: "bypass-mellon".into(),
            display_name: Some("Gandalf".into()),
            email: Some("gandalf@middleearth.com".into()),
            photo_url: Some(
                "https://ui-avatars.com/api/?name=Gandalf&background=random".into(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl Session {
    pub fn resolved(user: Option<UserProfile>) -> Self {
        Self {
            is_authenticated: user.is_some(),
            user,
            loading: false,
        }
    }
}

/// Result of a successful login: the session plus the token that selects it
/// on later requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedIn {
    pub token: String,
    #[serde(flatten)]
    pub session: Session,
}
