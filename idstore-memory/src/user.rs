//! In-memory user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::trace;

use idstore_core::{
    claim::Claim,
    error::IdentityStoreResult,
    login::UserLoginInfo,
    store::{
        QueryableUserStore, StoreBuilder, UserClaimStore, UserEmailStore, UserLockoutStore,
        UserLoginStore, UserPasswordStore, UserPhoneNumberStore, UserRoleStore,
        UserSecurityStampStore, UserStore, UserTwoFactorStore,
    },
    user::{IdentityUser, UserRef},
};

use crate::collection::RecordCollection;

/// Thread-safe in-memory user store.
///
/// Implements every user store contract over a single collection of [`UserRef`]
/// handles. The collection is guarded by an async reader-writer lock; each user is
/// guarded by its own lock, which every getter and setter takes for the duration of
/// the field access.
///
/// # Thread Safety
///
/// `InMemoryUserStore` is cloneable and uses an `Arc`-wrapped collection, so clones
/// share the same users and can be handed to separate tasks.
///
/// # Example
///
/// ```ignore
/// use idstore::{prelude::*, memory::InMemoryUserStore};
///
/// #[tokio::main]
/// async fn main() -> IdentityStoreResult<()> {
///     let store = InMemoryUserStore::new();
///     let user = UserRef::new(IdentityUser::with_id("1", "Test").with_normalized_user_name("test"));
///
///     store.create(&user).await?;
///     store.add_to_role(&user, "Role1").await;
///
///     assert!(store.find_by_name("test").await.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryUserStore {
    users: Arc<RecordCollection<IdentityUser>>,
}

impl InMemoryUserStore {
    /// Creates a new empty user store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for constructing an `InMemoryUserStore` with custom options.
    pub fn builder() -> InMemoryUserStoreBuilder {
        InMemoryUserStoreBuilder::default()
    }

    /// Returns the stored users whose current state satisfies `predicate`.
    pub async fn query<F>(&self, predicate: F) -> Vec<UserRef>
    where
        F: Fn(&IdentityUser) -> bool + Send + Sync,
    {
        self.users.filter(predicate).await
    }

    pub async fn len(&self) -> usize {
        self.users.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes every user from the store.
    pub async fn clear(&self) {
        self.users.clear().await;
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &UserRef) -> IdentityStoreResult<()> {
        self.users.create(user).await
    }

    async fn update(&self, user: &UserRef) -> IdentityStoreResult<()> {
        self.users.update(user).await
    }

    async fn delete(&self, user: &UserRef) -> IdentityStoreResult<()> {
        self.users.delete(user).await
    }

    async fn find_by_id(&self, user_id: &str) -> Option<UserRef> {
        self.users.find_by_id(user_id).await
    }

    async fn find_by_name(&self, normalized_user_name: &str) -> Option<UserRef> {
        self.users.find_by_name(normalized_user_name).await
    }

    async fn user_id(&self, user: &UserRef) -> String {
        user.read(|u| u.id().to_string()).await
    }

    async fn user_name(&self, user: &UserRef) -> Option<String> {
        user.read(|u| u.user_name.clone()).await
    }

    async fn set_user_name(&self, user: &UserRef, user_name: Option<String>) {
        user.write(|u| u.user_name = user_name).await;
    }

    async fn normalized_user_name(&self, user: &UserRef) -> Option<String> {
        user.read(|u| u.normalized_user_name.clone()).await
    }

    async fn set_normalized_user_name(&self, user: &UserRef, normalized_name: Option<String>) {
        self.users.rename(user, normalized_name).await;
    }
}

#[async_trait]
impl UserClaimStore for InMemoryUserStore {
    async fn claims(&self, user: &UserRef) -> Vec<Claim> {
        user.read(|u| u.claims().to_vec()).await
    }

    async fn add_claim(&self, user: &UserRef, claim: Claim) {
        user.write(|u| {
            trace!(user_id = %u.id(), claim_type = %claim.claim_type, "Adding claim");
            u.add_claim(claim);
        })
        .await;
    }

    async fn remove_claim(&self, user: &UserRef, claim: &Claim) {
        user.write(|u| {
            if u.remove_claim(claim) {
                trace!(user_id = %u.id(), claim_type = %claim.claim_type, "Removed claim");
            }
        })
        .await;
    }

    async fn users_for_claim(&self, claim: &Claim) -> Vec<UserRef> {
        self.users
            .filter(|u| u.has_claim(claim))
            .await
    }
}

#[async_trait]
impl UserEmailStore for InMemoryUserStore {
    async fn email(&self, user: &UserRef) -> Option<String> {
        user.read(|u| u.email.clone()).await
    }

    async fn set_email(&self, user: &UserRef, email: Option<String>) {
        user.write(|u| u.email = email).await;
    }

    async fn email_confirmed(&self, user: &UserRef) -> bool {
        user.read(|u| u.email_confirmed).await
    }

    async fn set_email_confirmed(&self, user: &UserRef, confirmed: bool) {
        user.write(|u| u.email_confirmed = confirmed).await;
    }

    async fn normalized_email(&self, user: &UserRef) -> Option<String> {
        user.read(|u| u.normalized_email.clone()).await
    }

    async fn set_normalized_email(&self, user: &UserRef, normalized_email: Option<String>) {
        user.write(|u| u.normalized_email = normalized_email).await;
    }

    async fn find_by_email(&self, normalized_email: &str) -> Option<UserRef> {
        self.users
            .find(|u| u.normalized_email.as_deref() == Some(normalized_email))
            .await
    }
}

#[async_trait]
impl UserLockoutStore for InMemoryUserStore {
    async fn lockout_end(&self, user: &UserRef) -> Option<DateTime<Utc>> {
        user.read(|u| u.lockout_end).await
    }

    async fn set_lockout_end(&self, user: &UserRef, lockout_end: Option<DateTime<Utc>>) {
        user.write(|u| u.lockout_end = lockout_end).await;
    }

    async fn lockout_enabled(&self, user: &UserRef) -> bool {
        user.read(|u| u.lockout_enabled).await
    }

    async fn set_lockout_enabled(&self, user: &UserRef, enabled: bool) {
        user.write(|u| u.lockout_enabled = enabled).await;
    }

    async fn access_failed_count(&self, user: &UserRef) -> u32 {
        user.read(|u| u.access_failed_count).await
    }

    async fn increment_access_failed_count(&self, user: &UserRef) -> u32 {
        user.write(|u| {
            u.access_failed_count = u.access_failed_count.saturating_add(1);
            trace!(user_id = %u.id(), count = u.access_failed_count, "Recorded failed access");
            u.access_failed_count
        })
        .await
    }

    async fn reset_access_failed_count(&self, user: &UserRef) {
        user.write(|u| u.access_failed_count = 0).await;
    }
}

#[async_trait]
impl UserLoginStore for InMemoryUserStore {
    async fn add_login(&self, user: &UserRef, login: UserLoginInfo) {
        user.write(|u| {
            trace!(user_id = %u.id(), provider = %login.provider, "Adding login");
            u.add_login(login);
        })
        .await;
    }

    async fn remove_login(&self, user: &UserRef, provider: &str, provider_key: &str) {
        user.write(|u| {
            if u.remove_login(provider, provider_key) {
                trace!(user_id = %u.id(), provider = %provider, "Removed login");
            }
        })
        .await;
    }

    async fn logins(&self, user: &UserRef) -> Vec<UserLoginInfo> {
        user.read(|u| u.logins().to_vec()).await
    }

    async fn find_by_login(&self, provider: &str, provider_key: &str) -> Option<UserRef> {
        self.users
            .find(|u| u.has_login(provider, provider_key))
            .await
    }
}

#[async_trait]
impl UserPasswordStore for InMemoryUserStore {
    async fn password_hash(&self, user: &UserRef) -> Option<String> {
        user.read(|u| u.password_hash.clone()).await
    }

    async fn set_password_hash(&self, user: &UserRef, password_hash: Option<String>) {
        user.write(|u| u.password_hash = password_hash).await;
    }

    async fn has_password(&self, user: &UserRef) -> bool {
        user.read(IdentityUser::has_password).await
    }
}

#[async_trait]
impl UserPhoneNumberStore for InMemoryUserStore {
    async fn phone_number(&self, user: &UserRef) -> Option<String> {
        user.read(|u| u.phone_number.clone()).await
    }

    async fn set_phone_number(&self, user: &UserRef, phone_number: Option<String>) {
        user.write(|u| u.phone_number = phone_number).await;
    }

    async fn phone_number_confirmed(&self, user: &UserRef) -> bool {
        user.read(|u| u.phone_number_confirmed).await
    }

    async fn set_phone_number_confirmed(&self, user: &UserRef, confirmed: bool) {
        user.write(|u| u.phone_number_confirmed = confirmed).await;
    }
}

#[async_trait]
impl UserRoleStore for InMemoryUserStore {
    async fn add_to_role(&self, user: &UserRef, role_name: &str) {
        user.write(|u| {
            trace!(user_id = %u.id(), role = %role_name, "Adding role membership");
            u.add_role(role_name.to_string());
        })
        .await;
    }

    async fn remove_from_role(&self, user: &UserRef, role_name: &str) {
        user.write(|u| {
            if u.remove_role(role_name) {
                trace!(user_id = %u.id(), role = %role_name, "Removed role membership");
            }
        })
        .await;
    }

    async fn roles(&self, user: &UserRef) -> Vec<String> {
        user.read(|u| u.roles().to_vec()).await
    }

    async fn is_in_role(&self, user: &UserRef, role_name: &str) -> bool {
        user.read(|u| u.is_in_role(role_name)).await
    }

    async fn users_in_role(&self, role_name: &str) -> Vec<UserRef> {
        self.users
            .filter(|u| u.is_in_role(role_name))
            .await
    }
}

#[async_trait]
impl UserSecurityStampStore for InMemoryUserStore {
    async fn security_stamp(&self, user: &UserRef) -> Option<String> {
        user.read(|u| u.security_stamp.clone()).await
    }

    async fn set_security_stamp(&self, user: &UserRef, stamp: Option<String>) {
        user.write(|u| u.security_stamp = stamp).await;
    }
}

#[async_trait]
impl UserTwoFactorStore for InMemoryUserStore {
    async fn two_factor_enabled(&self, user: &UserRef) -> bool {
        user.read(|u| u.two_factor_enabled).await
    }

    async fn set_two_factor_enabled(&self, user: &UserRef, enabled: bool) {
        user.write(|u| u.two_factor_enabled = enabled).await;
    }
}

#[async_trait]
impl QueryableUserStore for InMemoryUserStore {
    async fn users(&self) -> Vec<UserRef> {
        self.users.all().await
    }
}

/// Builder for constructing [`InMemoryUserStore`] instances.
///
/// # Example
///
/// ```ignore
/// use idstore::{prelude::*, memory::InMemoryUserStore};
///
/// let store = InMemoryUserStore::builder()
///     .with_capacity(1024)
///     .build()
///     .await
///     .unwrap();
/// ```
#[derive(Default, Debug)]
pub struct InMemoryUserStoreBuilder {
    capacity: usize,
}

impl InMemoryUserStoreBuilder {
    /// Reserves room for `capacity` users up front.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

#[async_trait]
impl StoreBuilder for InMemoryUserStoreBuilder {
    type Store = InMemoryUserStore;

    async fn build(self) -> IdentityStoreResult<Self::Store> {
        Ok(InMemoryUserStore {
            users: Arc::new(RecordCollection::with_capacity(self.capacity)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idstore_core::{claim::types, error::IdentityStoreError, record::RecordKind};

    fn test_user() -> IdentityUser {
        let mut user = IdentityUser::with_id("1", "Test")
            .with_normalized_user_name("test")
            .with_login(UserLoginInfo::new("Provider1", "ProviderKey1", "DisplayName1"))
            .with_login(UserLoginInfo::new("Provider2", "ProviderKey2", "DisplayName2"))
            .with_role("Role1")
            .with_role("Role2")
            .with_role("Role3")
            .with_claim(Claim::new(types::NAME, "Test"))
            .with_claim(Claim::new(types::EMAIL, "test@example.com"));

        user.access_failed_count = 2;
        user.email = Some("Test@Example.com".to_string());
        user.normalized_email = Some("test@example.com".to_string());
        user.email_confirmed = true;
        user.lockout_enabled = true;
        user.password_hash = Some("aaaaa".to_string());
        user.phone_number = Some("555-555-5555".to_string());
        user.phone_number_confirmed = true;
        user.security_stamp = Some("bbbbb".to_string());
        user.two_factor_enabled = true;
        user
    }

    #[tokio::test]
    async fn test_create_user() {
        let store = InMemoryUserStore::new();

        store.create(&UserRef::new(test_user())).await.unwrap();

        assert_eq!(store.users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_is_rejected() {
        let store = InMemoryUserStore::new();
        let original = UserRef::new(test_user());
        store.create(&original).await.unwrap();

        let duplicate = UserRef::new(IdentityUser::with_id("1", "Other").with_normalized_user_name("other"));
        let err = store.create(&duplicate).await.unwrap_err();

        assert_eq!(err, IdentityStoreError::AlreadyExists(RecordKind::User, "1".to_string()));
        let stored = store.find_by_id("1").await.unwrap();
        assert!(stored.ptr_eq(&original));
        assert_eq!(store.user_name(&stored).await.as_deref(), Some("Test"));
    }

    #[tokio::test]
    async fn test_create_duplicate_name_is_rejected() {
        let store = InMemoryUserStore::new();
        store.create(&UserRef::new(test_user())).await.unwrap();

        let duplicate = UserRef::new(IdentityUser::with_id("2", "TEST").with_normalized_user_name("test"));

        assert!(matches!(
            store.create(&duplicate).await,
            Err(IdentityStoreError::AlreadyExists(RecordKind::User, _))
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_users_without_names_do_not_collide() {
        let store = InMemoryUserStore::new();

        store.create(&UserRef::new(IdentityUser::with_id("1", "a"))).await.unwrap();
        store.create(&UserRef::new(IdentityUser::with_id("2", "b"))).await.unwrap();

        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_user() {
        let store = InMemoryUserStore::new();
        store.create(&UserRef::new(test_user())).await.unwrap();

        let by_id = store.find_by_id("1").await.unwrap();
        assert_eq!(store.user_id(&by_id).await, "1");

        let by_name = store.find_by_name("test").await.unwrap();
        assert_eq!(store.user_id(&by_name).await, "1");

        let by_email = store.find_by_email("test@example.com").await.unwrap();
        assert_eq!(store.user_id(&by_email).await, "1");

        assert!(store.find_by_login("Provider1", "ProviderKey1").await.is_some());
        assert!(store.find_by_login("Provider2", "ProviderKey2").await.is_some());

        assert!(store.find_by_id("0").await.is_none());
        assert!(store.find_by_name("NotThere").await.is_none());
        assert!(store.find_by_email("notthere@example.com").await.is_none());
        assert!(store.find_by_login("Provider1", "ProviderKey2").await.is_none());
        assert!(store.find_by_login("Provider2", "ProviderKey1").await.is_none());
        assert!(store.find_by_login("Provider1", "").await.is_none());
        assert!(store.find_by_login("", "ProviderKey1").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_then_find_returns_none() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(test_user());
        store.create(&user).await.unwrap();

        store.delete(&user).await.unwrap();

        assert!(store.find_by_id("1").await.is_none());
        assert!(store.find_by_name("test").await.is_none());
        assert!(matches!(
            store.delete(&user).await,
            Err(IdentityStoreError::NotFound(RecordKind::User, _))
        ));
    }

    #[tokio::test]
    async fn test_delete_by_name_removes_the_matched_record() {
        let store = InMemoryUserStore::new();
        let stored = UserRef::new(test_user());
        store.create(&stored).await.unwrap();

        let lookalike = UserRef::new(IdentityUser::with_id("99", "Test").with_normalized_user_name("test"));
        store.delete(&lookalike).await.unwrap();

        assert!(store.is_empty().await);
        // The stored record itself stays usable by whoever still holds it.
        assert_eq!(store.user_id(&stored).await, "1");
    }

    #[tokio::test]
    async fn test_update_never_created_is_not_found() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(test_user());

        let err = store.update(&user).await.unwrap_err();

        assert_eq!(err.code(), "UserNotFound");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_replaces_the_whole_record() {
        let store = InMemoryUserStore::new();
        store.create(&UserRef::new(test_user())).await.unwrap();

        let replacement = UserRef::new(IdentityUser::with_id("1", "Renamed").with_normalized_user_name("renamed"));
        store.update(&replacement).await.unwrap();

        let stored = store.find_by_id("1").await.unwrap();
        assert!(stored.ptr_eq(&replacement));
        assert!(store.claims(&stored).await.is_empty());
        assert!(store.find_by_name("test").await.is_none());
        assert!(store.find_by_name("renamed").await.is_some());
    }

    #[tokio::test]
    async fn test_rename_through_setter_moves_the_record() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(test_user());
        store.create(&user).await.unwrap();

        store.set_normalized_user_name(&user, Some("renamed".to_string())).await;

        assert!(store.find_by_name("renamed").await.unwrap().ptr_eq(&user));
        assert!(store.find_by_name("test").await.is_none());

        let taken = UserRef::new(IdentityUser::with_id("2", "Renamed").with_normalized_user_name("renamed"));
        assert!(matches!(
            store.create(&taken).await,
            Err(IdentityStoreError::AlreadyExists(RecordKind::User, _))
        ));

        let freed = UserRef::new(IdentityUser::with_id("3", "Test").with_normalized_user_name("test"));
        store.create(&freed).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert_eq!(store.query(|u| u.normalized_user_name.as_deref() == Some("renamed")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_name_of_another_record() {
        let store = InMemoryUserStore::new();
        store.create(&UserRef::new(test_user())).await.unwrap();
        let other = UserRef::new(IdentityUser::with_id("2", "Other").with_normalized_user_name("other"));
        store.create(&other).await.unwrap();

        store.set_normalized_user_name(&other, Some("test".to_string())).await;

        assert!(matches!(
            store.update(&other).await,
            Err(IdentityStoreError::AlreadyExists(RecordKind::User, _))
        ));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_getters() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(test_user());

        assert_eq!(store.access_failed_count(&user).await, 2);
        assert_eq!(store.claims(&user).await.len(), 2);
        assert_eq!(store.email(&user).await.as_deref(), Some("Test@Example.com"));
        assert!(store.email_confirmed(&user).await);
        assert!(store.lockout_enabled(&user).await);
        assert_eq!(store.lockout_end(&user).await, None);
        assert_eq!(store.logins(&user).await.len(), 2);
        assert_eq!(store.normalized_email(&user).await.as_deref(), Some("test@example.com"));
        assert_eq!(store.normalized_user_name(&user).await.as_deref(), Some("test"));
        assert_eq!(store.password_hash(&user).await.as_deref(), Some("aaaaa"));
        assert!(store.has_password(&user).await);
        assert_eq!(store.phone_number(&user).await.as_deref(), Some("555-555-5555"));
        assert!(store.phone_number_confirmed(&user).await);
        assert_eq!(store.roles(&user).await.len(), 3);
        assert_eq!(store.security_stamp(&user).await.as_deref(), Some("bbbbb"));
        assert!(store.two_factor_enabled(&user).await);
        assert_eq!(store.user_id(&user).await, "1");
        assert_eq!(store.user_name(&user).await.as_deref(), Some("Test"));
    }

    #[tokio::test]
    async fn test_setters() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(IdentityUser::default());
        let lockout_end = Utc::now();

        store.set_email(&user, Some("Test@Example.com".to_string())).await;
        store.set_email_confirmed(&user, true).await;
        store.set_lockout_enabled(&user, true).await;
        store.set_lockout_end(&user, Some(lockout_end)).await;
        store.set_normalized_email(&user, Some("test@example.com".to_string())).await;
        store.set_normalized_user_name(&user, Some("test".to_string())).await;
        store.set_password_hash(&user, Some("aaaaa".to_string())).await;
        store.set_phone_number(&user, Some("555-555-5555".to_string())).await;
        store.set_phone_number_confirmed(&user, true).await;
        store.set_security_stamp(&user, Some("bbbbb".to_string())).await;
        store.set_two_factor_enabled(&user, true).await;
        store.set_user_name(&user, Some("Test".to_string())).await;

        let u = user.snapshot().await;
        assert_eq!(u.email.as_deref(), Some("Test@Example.com"));
        assert!(u.email_confirmed);
        assert!(u.lockout_enabled);
        assert_eq!(u.lockout_end, Some(lockout_end));
        assert_eq!(u.normalized_email.as_deref(), Some("test@example.com"));
        assert_eq!(u.normalized_user_name.as_deref(), Some("test"));
        assert_eq!(u.password_hash.as_deref(), Some("aaaaa"));
        assert_eq!(u.phone_number.as_deref(), Some("555-555-5555"));
        assert!(u.phone_number_confirmed);
        assert_eq!(u.security_stamp.as_deref(), Some("bbbbb"));
        assert!(u.two_factor_enabled);
        assert_eq!(u.user_name.as_deref(), Some("Test"));
    }

    #[tokio::test]
    async fn test_access_failed_count() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(IdentityUser::default());

        assert_eq!(store.increment_access_failed_count(&user).await, 1);
        assert_eq!(store.increment_access_failed_count(&user).await, 2);
        assert_eq!(store.access_failed_count(&user).await, 2);

        store.reset_access_failed_count(&user).await;
        assert_eq!(store.access_failed_count(&user).await, 0);
    }

    #[tokio::test]
    async fn test_roles() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(IdentityUser::default());

        store.add_to_role(&user, "Role1").await;
        store.add_to_role(&user, "Role2").await;
        store.add_to_role(&user, "Role2").await;

        assert_eq!(store.roles(&user).await, vec!["Role1".to_string(), "Role2".to_string()]);
        assert!(store.is_in_role(&user, "Role1").await);
        assert!(store.is_in_role(&user, "Role2").await);
        assert!(!store.is_in_role(&user, "Role3").await);

        store.remove_from_role(&user, "Role3").await;
        assert_eq!(store.roles(&user).await.len(), 2);

        store.remove_from_role(&user, "Role1").await;
        assert!(!store.is_in_role(&user, "Role1").await);
        assert!(store.is_in_role(&user, "Role2").await);

        store.remove_from_role(&user, "Role2").await;
        assert!(store.roles(&user).await.is_empty());
    }

    #[tokio::test]
    async fn test_users_in_role() {
        let store = InMemoryUserStore::new();
        store.create(&UserRef::new(test_user())).await.unwrap();
        store
            .create(&UserRef::new(IdentityUser::with_id("2", "Other").with_role("Role1")))
            .await
            .unwrap();

        assert_eq!(store.users_in_role("Role1").await.len(), 2);
        assert_eq!(store.users_in_role("Role3").await.len(), 1);
        assert!(store.users_in_role("role1").await.is_empty());
    }

    #[tokio::test]
    async fn test_logins() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(IdentityUser::default());

        store.add_login(&user, UserLoginInfo::new("Provider1", "ProviderKey1", "DisplayName1")).await;
        store.add_login(&user, UserLoginInfo::new("Provider2", "ProviderKey2", "DisplayName2")).await;
        assert_eq!(store.logins(&user).await.len(), 2);

        store.add_login(&user, UserLoginInfo::new("Provider1", "ProviderKey1", "Renamed")).await;
        let logins = store.logins(&user).await;
        assert_eq!(logins.len(), 2);
        assert!(logins
            .iter()
            .any(|l| l.is("Provider1", "ProviderKey1") && l.display_name.as_deref() == Some("Renamed")));

        store.remove_login(&user, "Provider1", "ProviderKey2").await;
        assert_eq!(store.logins(&user).await.len(), 2);

        store.remove_login(&user, "Provider1", "ProviderKey1").await;
        let logins = store.logins(&user).await;
        assert_eq!(logins.len(), 1);
        assert!(logins[0].is("Provider2", "ProviderKey2"));

        store.remove_login(&user, "Provider2", "ProviderKey2").await;
        assert!(store.logins(&user).await.is_empty());
    }

    #[tokio::test]
    async fn test_claims() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(IdentityUser::default());
        fn count(claims: &[Claim], claim_type: &str, value: &str) -> usize {
            claims
                .iter()
                .filter(|c| c.claim_type == claim_type && c.value == value)
                .count()
        }

        store
            .add_claims(&user, vec![Claim::new(types::NAME, "Test"), Claim::new(types::EMAIL, "test@example.com")])
            .await;
        let claims = store.claims(&user).await;
        assert_eq!(claims.len(), 2);
        assert_eq!(count(&claims, types::NAME, "Test"), 1);
        assert_eq!(count(&claims, types::EMAIL, "test@example.com"), 1);

        store
            .replace_claim(&user, &Claim::new(types::NAME, "Test"), Some(Claim::new(types::NAME, "Test2")))
            .await;
        let claims = store.claims(&user).await;
        assert_eq!(claims.len(), 2);
        assert_eq!(count(&claims, types::NAME, "Test"), 0);
        assert_eq!(count(&claims, types::NAME, "Test2"), 1);

        store.remove_claims(&user, &[Claim::new(types::NAME, "NotThere")]).await;
        assert_eq!(store.claims(&user).await.len(), 2);

        store.remove_claims(&user, &[Claim::new(types::NAME, "Test2")]).await;
        assert_eq!(store.claims(&user).await.len(), 1);

        store.remove_claims(&user, &[Claim::new(types::EMAIL, "test@example.com")]).await;
        assert!(store.claims(&user).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_claim_twice_keeps_one() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(IdentityUser::default());

        store.add_claim(&user, Claim::new("T", "V")).await;
        store.add_claim(&user, Claim::new("T", "V")).await;

        assert_eq!(store.claims(&user).await, vec![Claim::new("T", "V")]);
    }

    #[tokio::test]
    async fn test_replace_missing_claim_still_adds() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(IdentityUser::default());

        store
            .replace_claim(&user, &Claim::new("T", "old"), Some(Claim::new("T", "new")))
            .await;
        assert_eq!(store.claims(&user).await, vec![Claim::new("T", "new")]);

        store.replace_claim(&user, &Claim::new("T", "new"), None).await;
        assert!(store.claims(&user).await.is_empty());
    }

    #[tokio::test]
    async fn test_users_for_claim() {
        let store = InMemoryUserStore::new();
        store.create(&UserRef::new(test_user())).await.unwrap();
        store
            .create(&UserRef::new(
                IdentityUser::with_id("2", "Other").with_claim(Claim::new(types::NAME, "Other")),
            ))
            .await
            .unwrap();

        let users = store.users_for_claim(&Claim::new(types::NAME, "Test")).await;
        assert_eq!(users.len(), 1);
        assert_eq!(store.user_id(&users[0]).await, "1");

        let users = store
            .users_for_claim(&Claim::new(types::NAME, "Test").with_issuer("elsewhere"))
            .await;
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_query_sees_later_mutation() {
        let store = InMemoryUserStore::new();
        let user = UserRef::new(test_user());
        store.create(&user).await.unwrap();

        let users = store.users().await;
        store.set_email_confirmed(&user, false).await;

        assert!(!store.email_confirmed(&users[0]).await);
        assert!(store.query(|u| u.email_confirmed).await.is_empty());
        assert_eq!(store.query(|u| u.two_factor_enabled).await.len(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryUserStore::builder()
            .with_capacity(16)
            .build()
            .await
            .unwrap();
        store.create(&UserRef::new(test_user())).await.unwrap();

        store.clear().await;

        assert!(store.is_empty().await);
        assert!(store.find_by_name("test").await.is_none());
    }
}
