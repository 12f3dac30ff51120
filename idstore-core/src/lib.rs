//! Core types and contracts for an in-process identity store.
//!
//! This crate is the core of the idstore project and provides:
//!
//! - **Records** ([`record`], [`user`], [`role`]) - User and role records and the shared handles stores hand out
//! - **Claims** ([`claim`]) - Claims, their semantic equality, and the deduplicating claim set
//! - **Logins** ([`login`]) - External provider login references
//! - **Store contracts** ([`store`]) - Async traits an identity framework consumes
//! - **Error handling** ([`error`]) - The two structural failure kinds and the result alias
//!
//! # Example
//!
//! ```ignore
//! use idstore_core::{claim::{Claim, types}, user::{IdentityUser, UserRef}};
//!
//! let user = UserRef::new(
//!     IdentityUser::with_id("1", "Test")
//!         .with_normalized_user_name("test")
//!         .with_claim(Claim::new(types::NAME, "Test")),
//! );
//! ```

#[allow(unused_extern_crates)]
extern crate self as idstore_core;

pub mod claim;
pub mod error;
pub mod login;
pub mod record;
pub mod role;
pub mod store;
pub mod user;
