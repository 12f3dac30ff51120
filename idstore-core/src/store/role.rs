use async_trait::async_trait;
use std::fmt::Debug;

use crate::{claim::Claim, error::IdentityStoreResult, role::RoleRef};

/// Lifecycle and identity fields of role records.
///
/// Mirrors [`UserStore`](super::UserStore): the same id-then-name lookup decides
/// whether `create` is rejected and which record `update` and `delete` act on.
#[async_trait]
pub trait RoleStore: Send + Sync + Debug {
    /// Admits a role into the store.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::AlreadyExists`](crate::error::IdentityStoreError::AlreadyExists)
    /// if a stored role has the same id or normalized name.
    async fn create(&self, role: &RoleRef) -> IdentityStoreResult<()>;

    /// Replaces the matching stored role with `role`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::NotFound`](crate::error::IdentityStoreError::NotFound)
    /// if no stored role matches, or
    /// [`IdentityStoreError::AlreadyExists`](crate::error::IdentityStoreError::AlreadyExists)
    /// if the new normalized name belongs to a different stored role.
    ///
    /// The name conflict goes beyond the usual identity store contract, where update
    /// only reports a missing role.
    async fn update(&self, role: &RoleRef) -> IdentityStoreResult<()>;

    /// Removes the matching stored role.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::NotFound`](crate::error::IdentityStoreError::NotFound)
    /// if no stored role matches.
    async fn delete(&self, role: &RoleRef) -> IdentityStoreResult<()>;

    async fn find_by_id(&self, role_id: &str) -> Option<RoleRef>;

    async fn find_by_name(&self, normalized_role_name: &str) -> Option<RoleRef>;

    async fn role_id(&self, role: &RoleRef) -> String;

    async fn role_name(&self, role: &RoleRef) -> Option<String>;

    async fn set_role_name(&self, role: &RoleRef, role_name: Option<String>);

    async fn normalized_role_name(&self, role: &RoleRef) -> Option<String>;

    /// Sets the normalized role name. A stored role is found under the new name right
    /// away; a name another stored role already holds stays with that role.
    async fn set_normalized_role_name(&self, role: &RoleRef, normalized_name: Option<String>);
}

#[async_trait]
pub trait RoleClaimStore: RoleStore {
    async fn claims(&self, role: &RoleRef) -> Vec<Claim>;

    /// Adds a claim, replacing a claim that matches it.
    async fn add_claim(&self, role: &RoleRef, claim: Claim);

    /// Removes the claim matching `claim`. Does nothing if none matches.
    async fn remove_claim(&self, role: &RoleRef, claim: &Claim);

    /// Removes `claim` and then adds `new_claim`, if one is given.
    async fn replace_claim(&self, role: &RoleRef, claim: &Claim, new_claim: Option<Claim>) {
        self.remove_claim(role, claim).await;

        if let Some(new_claim) = new_claim {
            self.add_claim(role, new_claim).await;
        }
    }
}

#[async_trait]
pub trait QueryableRoleStore: RoleStore {
    /// Returns handles to every stored role.
    async fn roles(&self) -> Vec<RoleRef>;
}
