//! Store contracts for users and roles.
//!
//! The contracts are split by concern the same way an identity framework consumes them:
//! a framework that only needs password sign-in asks for [`UserPasswordStore`], one that
//! does claims-based authorization asks for [`UserClaimStore`], and so on. Every
//! concern-specific trait extends [`UserStore`] or [`RoleStore`].
//!
//! # Fallibility
//!
//! Only `create`, `update` and `delete` return an
//! [`IdentityStoreResult`](crate::error::IdentityStoreResult). Lookups return `Option`
//! or an empty `Vec` when nothing matches, and removals of absent entries are no-ops.
//!
//! # Example
//!
//! ```ignore
//! use idstore::{prelude::*, memory::InMemoryUserStore};
//!
//! async fn register(store: &impl UserRoleStore, user: IdentityUser) -> IdentityStoreResult<UserRef> {
//!     let user = UserRef::new(user);
//!     store.create(&user).await?;
//!     store.add_to_role(&user, "member").await;
//!     Ok(user)
//! }
//! ```

mod role;
mod user;

pub use role::{QueryableRoleStore, RoleClaimStore, RoleStore};
pub use user::{
    QueryableUserStore, UserClaimStore, UserEmailStore, UserLockoutStore, UserLoginStore,
    UserPasswordStore, UserPhoneNumberStore, UserRoleStore, UserSecurityStampStore, UserStore,
    UserTwoFactorStore,
};

use async_trait::async_trait;

use crate::error::IdentityStoreResult;

/// Factory trait for constructing store instances from their configuration.
#[async_trait]
pub trait StoreBuilder {
    type Store;

    async fn build(self) -> IdentityStoreResult<Self::Store>;
}
