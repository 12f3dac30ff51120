//! Main idstore crate providing an in-process identity store.
//!
//! This crate is the primary entry point for users of idstore. It re-exports the record
//! types and store contracts from `idstore-core` and the in-memory stores from
//! `idstore-memory`.
//!
//! # Features
//!
//! - **Users and roles** - Typed records with claims, logins and role memberships
//! - **Split store contracts** - One async trait per concern, so callers ask only for what they use
//! - **Concurrent access** - Stores are cheap to clone and safe to share across tasks
//! - **Uniqueness** - Ids and normalized names are unique within each store
//!
//! # Quick Start
//!
//! ```ignore
//! use idstore::{prelude::*, memory::InMemoryUserStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryUserStore::new();
//!
//!     let user = UserRef::new(
//!         IdentityUser::with_id("1", "Test")
//!             .with_normalized_user_name("test")
//!             .with_login(UserLoginInfo::new("P1", "K1", "Provider One")),
//!     );
//!
//!     store.create(&user).await.unwrap();
//!     store.add_claim(&user, Claim::new(types::EMAIL, "test@example.com")).await;
//!     store.add_to_role(&user, "Role1").await;
//!
//!     let found = store.find_by_login("P1", "K1").await.unwrap();
//!     assert!(store.is_in_role(&found, "Role1").await);
//! }
//! ```
//!
//! # Roles
//!
//! Roles live in their own store. Role memberships recorded on a user are plain names and
//! are not checked against the role store.
//!
//! ```ignore
//! use idstore::{prelude::*, memory::InMemoryRoleStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let roles = InMemoryRoleStore::builder().with_capacity(16).build().await.unwrap();
//!
//!     let admin = RoleRef::new(IdentityRole::new("Admin").with_normalized_name("admin"));
//!     roles.create(&admin).await.unwrap();
//!     roles.add_claim(&admin, Claim::new("permission", "users.manage")).await;
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Thread-safe in-memory stores

pub mod prelude;

pub use idstore_core::{claim, error, login, record, role, store, user};

/// In-memory store implementations.
pub mod memory {
    pub use idstore_memory::{
        InMemoryRoleStore, InMemoryRoleStoreBuilder, InMemoryUserStore, InMemoryUserStoreBuilder,
    };
}
