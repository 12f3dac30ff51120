//! In-memory identity store for idstore.
//!
//! This crate provides thread-safe, in-memory implementations of the user and role store
//! contracts from `idstore-core`. It is meant for development, testing, and small
//! deployments where nothing has to survive the process.
//!
//! # Features
//!
//! - **Thread-safe access** - Each store guards its collection with an async-aware RwLock,
//!   and every record carries its own lock for field and sub-collection edits
//! - **Two-step lookup** - Records are matched by id first and normalized name second
//! - **Uniqueness** - Duplicate ids and duplicate normalized names are rejected on create and update
//! - **Live handles** - Lookups return shared handles, so later edits are visible to every holder
//!
//! # Quick Start
//!
//! ```ignore
//! use idstore_core::{store::{UserStore, UserRoleStore}, user::{IdentityUser, UserRef}};
//! use idstore_memory::InMemoryUserStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryUserStore::new();
//!     let user = UserRef::new(IdentityUser::new("Alice").with_normalized_user_name("alice"));
//!
//!     store.create(&user).await?;
//!     store.add_to_role(&user, "Admin").await;
//!
//!     let found = store.find_by_name("alice").await.unwrap();
//!     assert!(store.is_in_role(&found, "Admin").await);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as idstore_memory;

mod collection;
mod index;

pub mod role;
pub mod user;

pub use role::{InMemoryRoleStore, InMemoryRoleStoreBuilder};
pub use user::{InMemoryUserStore, InMemoryUserStoreBuilder};
