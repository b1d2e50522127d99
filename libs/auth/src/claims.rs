use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Caller identity attached to every authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id issued by the identity provider
    pub sub: String,
    pub exp: usize,
    /// Administrators may act on any channel
    #[serde(default)]
    pub admin: bool,
}

impl Claims {
    pub fn admin() -> Self {
        Self {
            sub: crate::ANY_ID.to_string(),
            exp: 0,
            admin: true,
        }
    }

    pub fn user(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            exp: 0,
            admin: false,
        }
    }

    pub fn can_access(&self, owner: &str) -> bool {
        self.admin || self.sub == owner
    }
}

impl Display for Claims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sub: {}, expire: {}, role: {}",
            self.sub,
            self.exp,
            if self.admin { "admin" } else { "user" }
        )
    }
}
