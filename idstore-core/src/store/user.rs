use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use crate::{
    claim::Claim,
    error::IdentityStoreResult,
    login::UserLoginInfo,
    user::UserRef,
};

/// Lifecycle and identity fields of user records.
///
/// Implementers own a collection of users and guarantee that no two stored users share
/// an id or a normalized user name at the moment they were created or updated.
///
/// # Thread Safety
///
/// All implementations must support concurrent callers. Structural operations
/// (`create`, `update`, `delete`) must be atomic with respect to each other.
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Admits a user into the store.
    ///
    /// The store first looks for a stored user with the same id, then for one with the
    /// same normalized user name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::AlreadyExists`](crate::error::IdentityStoreError::AlreadyExists)
    /// if either lookup finds a user. The stored user is left untouched.
    async fn create(&self, user: &UserRef) -> IdentityStoreResult<()>;

    /// Replaces the stored user matching `user` with `user` itself.
    ///
    /// The match uses the same id-then-name lookup as [`UserStore::create`]. The whole
    /// record is replaced; nothing from the previously stored record is merged in.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::NotFound`](crate::error::IdentityStoreError::NotFound)
    /// if no stored user matches, or
    /// [`IdentityStoreError::AlreadyExists`](crate::error::IdentityStoreError::AlreadyExists)
    /// if the new normalized user name belongs to a different stored user.
    ///
    /// The name conflict goes beyond the usual identity store contract, where update
    /// only reports a missing user. Callers written against that contract should
    /// handle both errors.
    async fn update(&self, user: &UserRef) -> IdentityStoreResult<()>;

    /// Removes the stored user matching `user`.
    ///
    /// The removed record is the one found by the id-then-name lookup, which is not
    /// necessarily the record behind `user`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::NotFound`](crate::error::IdentityStoreError::NotFound)
    /// if no stored user matches.
    async fn delete(&self, user: &UserRef) -> IdentityStoreResult<()>;

    async fn find_by_id(&self, user_id: &str) -> Option<UserRef>;

    async fn find_by_name(&self, normalized_user_name: &str) -> Option<UserRef>;

    async fn user_id(&self, user: &UserRef) -> String;

    async fn user_name(&self, user: &UserRef) -> Option<String>;

    async fn set_user_name(&self, user: &UserRef, user_name: Option<String>);

    async fn normalized_user_name(&self, user: &UserRef) -> Option<String>;

    /// Sets the normalized user name. A stored user is found under the new name right
    /// away; a name another stored user already holds stays with that user.
    async fn set_normalized_user_name(&self, user: &UserRef, normalized_name: Option<String>);
}

/// Claims attached to users.
#[async_trait]
pub trait UserClaimStore: UserStore {
    /// Returns a copy of the user's claims.
    async fn claims(&self, user: &UserRef) -> Vec<Claim>;

    /// Adds a claim, replacing a claim that matches it.
    async fn add_claim(&self, user: &UserRef, claim: Claim);

    /// Removes the claim matching `claim`. Does nothing if none matches.
    async fn remove_claim(&self, user: &UserRef, claim: &Claim);

    /// Returns every stored user carrying a claim that matches `claim`.
    async fn users_for_claim(&self, claim: &Claim) -> Vec<UserRef>;

    async fn add_claims(&self, user: &UserRef, claims: Vec<Claim>) {
        for claim in claims {
            self.add_claim(user, claim).await;
        }
    }

    async fn remove_claims(&self, user: &UserRef, claims: &[Claim]) {
        for claim in claims {
            self.remove_claim(user, claim).await;
        }
    }

    /// Removes `claim` and then adds `new_claim`, if one is given.
    ///
    /// The add runs whether or not `claim` was present.
    async fn replace_claim(&self, user: &UserRef, claim: &Claim, new_claim: Option<Claim>) {
        self.remove_claim(user, claim).await;

        if let Some(new_claim) = new_claim {
            self.add_claim(user, new_claim).await;
        }
    }
}

#[async_trait]
pub trait UserEmailStore: UserStore {
    async fn email(&self, user: &UserRef) -> Option<String>;

    async fn set_email(&self, user: &UserRef, email: Option<String>);

    async fn email_confirmed(&self, user: &UserRef) -> bool;

    async fn set_email_confirmed(&self, user: &UserRef, confirmed: bool);

    async fn normalized_email(&self, user: &UserRef) -> Option<String>;

    async fn set_normalized_email(&self, user: &UserRef, normalized_email: Option<String>);

    /// Returns the first stored user with the given normalized email.
    async fn find_by_email(&self, normalized_email: &str) -> Option<UserRef>;
}

/// Lockout bookkeeping. The store records state only; thresholds are the caller's business.
#[async_trait]
pub trait UserLockoutStore: UserStore {
    async fn lockout_end(&self, user: &UserRef) -> Option<DateTime<Utc>>;

    async fn set_lockout_end(&self, user: &UserRef, lockout_end: Option<DateTime<Utc>>);

    async fn lockout_enabled(&self, user: &UserRef) -> bool;

    async fn set_lockout_enabled(&self, user: &UserRef, enabled: bool);

    async fn access_failed_count(&self, user: &UserRef) -> u32;

    /// Increments the failed access counter and returns the new value.
    async fn increment_access_failed_count(&self, user: &UserRef) -> u32;

    async fn reset_access_failed_count(&self, user: &UserRef);
}

/// External provider logins attached to users.
#[async_trait]
pub trait UserLoginStore: UserStore {
    /// Adds a login, replacing a login with the same provider and key.
    async fn add_login(&self, user: &UserRef, login: UserLoginInfo);

    /// Removes the login with exactly this provider and key. Does nothing if absent.
    async fn remove_login(&self, user: &UserRef, provider: &str, provider_key: &str);

    async fn logins(&self, user: &UserRef) -> Vec<UserLoginInfo>;

    /// Returns the first stored user owning a login with this provider and key.
    async fn find_by_login(&self, provider: &str, provider_key: &str) -> Option<UserRef>;
}

#[async_trait]
pub trait UserPasswordStore: UserStore {
    async fn password_hash(&self, user: &UserRef) -> Option<String>;

    async fn set_password_hash(&self, user: &UserRef, password_hash: Option<String>);

    /// Returns `true` if the user has a non-empty password hash.
    async fn has_password(&self, user: &UserRef) -> bool;
}

#[async_trait]
pub trait UserPhoneNumberStore: UserStore {
    async fn phone_number(&self, user: &UserRef) -> Option<String>;

    async fn set_phone_number(&self, user: &UserRef, phone_number: Option<String>);

    async fn phone_number_confirmed(&self, user: &UserRef) -> bool;

    async fn set_phone_number_confirmed(&self, user: &UserRef, confirmed: bool);
}

/// Role memberships of users, by role name.
///
/// Names are compared exactly. Membership does not require a matching role record.
#[async_trait]
pub trait UserRoleStore: UserStore {
    async fn add_to_role(&self, user: &UserRef, role_name: &str);

    async fn remove_from_role(&self, user: &UserRef, role_name: &str);

    async fn roles(&self, user: &UserRef) -> Vec<String>;

    async fn is_in_role(&self, user: &UserRef, role_name: &str) -> bool;

    async fn users_in_role(&self, role_name: &str) -> Vec<UserRef>;
}

#[async_trait]
pub trait UserSecurityStampStore: UserStore {
    async fn security_stamp(&self, user: &UserRef) -> Option<String>;

    async fn set_security_stamp(&self, user: &UserRef, stamp: Option<String>);
}

#[async_trait]
pub trait UserTwoFactorStore: UserStore {
    async fn two_factor_enabled(&self, user: &UserRef) -> bool;

    async fn set_two_factor_enabled(&self, user: &UserRef, enabled: bool);
}

#[async_trait]
pub trait QueryableUserStore: UserStore {
    /// Returns handles to every stored user.
    ///
    /// The set of handles is fixed when the call returns, but each handle reflects
    /// later changes made to its record.
    async fn users(&self) -> Vec<UserRef>;
}
