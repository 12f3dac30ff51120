//! The user record and the operations on its sub-collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    claim::{Claim, ClaimSet},
    login::UserLoginInfo,
    record::{Record, RecordKind, RecordRef},
};

/// A shared handle to a stored user.
pub type UserRef = RecordRef<IdentityUser>;

/// A user record.
///
/// Scalar fields are public and carry no invariants of their own. The id is fixed at
/// construction. The claim, login and role collections are only reachable through
/// methods that keep them free of duplicates, and deserialization goes through the
/// same rules.
///
/// # Example
///
/// ```ignore
/// use idstore::prelude::*;
///
/// let user = IdentityUser::with_id("1", "Test")
///     .with_normalized_user_name("test")
///     .with_role("Role1")
///     .with_login(UserLoginInfo::new("P1", "K1", "Provider One"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    id: String,
    pub user_name: Option<String>,
    pub normalized_user_name: Option<String>,
    pub email: Option<String>,
    pub normalized_email: Option<String>,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub password_hash: Option<String>,
    pub security_stamp: Option<String>,
    pub two_factor_enabled: bool,
    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub access_failed_count: u32,
    #[serde(default, deserialize_with = "deserialize_logins")]
    logins: Vec<UserLoginInfo>,
    #[serde(default, deserialize_with = "deserialize_roles")]
    roles: Vec<String>,
    #[serde(default)]
    claims: ClaimSet,
}

impl IdentityUser {
    /// Creates a user with a freshly generated id.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), user_name)
    }

    /// Creates a user with a caller-assigned id.
    pub fn with_id(id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_name: Some(user_name.into()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn with_normalized_user_name(mut self, normalized_user_name: impl Into<String>) -> Self {
        self.normalized_user_name = Some(normalized_user_name.into());
        self
    }

    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.add_claim(claim);
        self
    }

    pub fn with_login(mut self, login: UserLoginInfo) -> Self {
        self.add_login(login);
        self
    }

    pub fn with_role(mut self, role_name: impl Into<String>) -> Self {
        self.add_role(role_name.into());
        self
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    pub fn logins(&self) -> &[UserLoginInfo] {
        &self.logins
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Adds a claim, replacing a matching one.
    pub fn add_claim(&mut self, claim: Claim) {
        self.claims.insert(claim);
    }

    /// Removes the matching claim. Returns `false` if there was none.
    pub fn remove_claim(&mut self, claim: &Claim) -> bool {
        self.claims.remove(claim).is_some()
    }

    /// Returns `true` if a matching claim is attached.
    pub fn has_claim(&self, claim: &Claim) -> bool {
        self.claims.contains(claim)
    }

    /// Adds a login, replacing one with the same provider and key.
    pub fn add_login(&mut self, login: UserLoginInfo) {
        self.remove_login(&login.provider, &login.provider_key);
        self.logins.push(login);
    }

    /// Removes the login with the given provider and key. Returns `false` if there was none.
    pub fn remove_login(&mut self, provider: &str, provider_key: &str) -> bool {
        match self.logins.iter().position(|l| l.is(provider, provider_key)) {
            Some(index) => {
                self.logins.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_login(&self, provider: &str, provider_key: &str) -> bool {
        self.logins
            .iter()
            .any(|l| l.is(provider, provider_key))
    }

    /// Adds the user to a role. Adding an existing membership moves it to the end.
    pub fn add_role(&mut self, role_name: String) {
        self.remove_role(&role_name);
        self.roles.push(role_name);
    }

    /// Removes a role membership. Returns `false` if the user was not a member.
    pub fn remove_role(&mut self, role_name: &str) -> bool {
        match self.roles.iter().position(|r| r == role_name) {
            Some(index) => {
                self.roles.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_in_role(&self, role_name: &str) -> bool {
        self.roles
            .iter()
            .any(|r| r == role_name)
    }

    /// Returns `true` if a non-empty password hash is set.
    pub fn has_password(&self) -> bool {
        self.password_hash
            .as_deref()
            .is_some_and(|hash| !hash.is_empty())
    }
}

impl Record for IdentityUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn normalized_name(&self) -> Option<&str> {
        self.normalized_user_name.as_deref()
    }

    fn set_normalized_name(&mut self, normalized_name: Option<String>) {
        self.normalized_user_name = normalized_name;
    }

    fn kind() -> RecordKind {
        RecordKind::User
    }
}

fn deserialize_logins<'de, D>(deserializer: D) -> Result<Vec<UserLoginInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut user = IdentityUser::default();
    for login in Vec::<UserLoginInfo>::deserialize(deserializer)? {
        user.add_login(login);
    }
    Ok(user.logins)
}

fn deserialize_roles<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut user = IdentityUser::default();
    for role in Vec::<String>::deserialize(deserializer)? {
        user.add_role(role);
    }
    Ok(user.roles)
}
