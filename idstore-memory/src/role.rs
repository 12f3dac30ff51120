//! In-memory role store.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::trace;

use idstore_core::{
    claim::Claim,
    error::IdentityStoreResult,
    role::{IdentityRole, RoleRef},
    store::{QueryableRoleStore, RoleClaimStore, RoleStore, StoreBuilder},
};

use crate::collection::RecordCollection;

/// Thread-safe in-memory role store.
///
/// Shares its locking model with [`InMemoryUserStore`](crate::InMemoryUserStore) but
/// keeps an entirely separate collection; role memberships held by users are not
/// checked against it.
#[derive(Default, Clone, Debug)]
pub struct InMemoryRoleStore {
    roles: Arc<RecordCollection<IdentityRole>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InMemoryRoleStoreBuilder {
        InMemoryRoleStoreBuilder::default()
    }

    /// Returns the stored roles whose current state satisfies `predicate`.
    pub async fn query<F>(&self, predicate: F) -> Vec<RoleRef>
    where
        F: Fn(&IdentityRole) -> bool + Send + Sync,
    {
        self.roles.filter(predicate).await
    }

    pub async fn len(&self) -> usize {
        self.roles.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes every role from the store.
    pub async fn clear(&self) {
        self.roles.clear().await;
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn create(&self, role: &RoleRef) -> IdentityStoreResult<()> {
        self.roles.create(role).await
    }

    async fn update(&self, role: &RoleRef) -> IdentityStoreResult<()> {
        self.roles.update(role).await
    }

    async fn delete(&self, role: &RoleRef) -> IdentityStoreResult<()> {
        self.roles.delete(role).await
    }

    async fn find_by_id(&self, role_id: &str) -> Option<RoleRef> {
        self.roles.find_by_id(role_id).await
    }

    async fn find_by_name(&self, normalized_role_name: &str) -> Option<RoleRef> {
        self.roles.find_by_name(normalized_role_name).await
    }

    async fn role_id(&self, role: &RoleRef) -> String {
        role.read(|r| r.id().to_string()).await
    }

    async fn role_name(&self, role: &RoleRef) -> Option<String> {
        role.read(|r| r.name.clone()).await
    }

    async fn set_role_name(&self, role: &RoleRef, role_name: Option<String>) {
        role.write(|r| r.name = role_name).await;
    }

    async fn normalized_role_name(&self, role: &RoleRef) -> Option<String> {
        role.read(|r| r.normalized_name.clone()).await
    }

    async fn set_normalized_role_name(&self, role: &RoleRef, normalized_name: Option<String>) {
        self.roles.rename(role, normalized_name).await;
    }
}

#[async_trait]
impl RoleClaimStore for InMemoryRoleStore {
    async fn claims(&self, role: &RoleRef) -> Vec<Claim> {
        role.read(|r| r.claims().to_vec()).await
    }

    async fn add_claim(&self, role: &RoleRef, claim: Claim) {
        role.write(|r| {
            trace!(role_id = %r.id(), claim_type = %claim.claim_type, "Adding claim");
            r.add_claim(claim);
        })
        .await;
    }

    async fn remove_claim(&self, role: &RoleRef, claim: &Claim) {
        role.write(|r| {
            if r.remove_claim(claim) {
                trace!(role_id = %r.id(), claim_type = %claim.claim_type, "Removed claim");
            }
        })
        .await;
    }
}

#[async_trait]
impl QueryableRoleStore for InMemoryRoleStore {
    async fn roles(&self) -> Vec<RoleRef> {
        self.roles.all().await
    }
}

/// Builder for constructing [`InMemoryRoleStore`] instances.
#[derive(Default, Debug)]
pub struct InMemoryRoleStoreBuilder {
    capacity: usize,
}

impl InMemoryRoleStoreBuilder {
    /// Reserves room for `capacity` roles up front.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

#[async_trait]
impl StoreBuilder for InMemoryRoleStoreBuilder {
    type Store = InMemoryRoleStore;

    async fn build(self) -> IdentityStoreResult<Self::Store> {
        Ok(InMemoryRoleStore {
            roles: Arc::new(RecordCollection::with_capacity(self.capacity)),
        })
    }
}
