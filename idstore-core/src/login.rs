//! External login references attached to users.

use serde::{Deserialize, Serialize};

/// A reference to an identity held by an external provider.
///
/// A user has at most one login per `(provider, provider_key)` pair. Matching is
/// exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoginInfo {
    pub provider: String,
    pub provider_key: String,
    pub display_name: Option<String>,
}

impl UserLoginInfo {
    pub fn new(
        provider: impl Into<String>,
        provider_key: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            provider_key: provider_key.into(),
            display_name: Some(display_name.into()),
        }
    }

    /// Returns `true` if this login belongs to the given provider and key.
    pub fn is(&self, provider: &str, provider_key: &str) -> bool {
        self.provider == provider && self.provider_key == provider_key
    }
}
