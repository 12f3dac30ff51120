//! Convenient re-exports of commonly used types from idstore.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use idstore::prelude::*;
//! ```
//!
//! This provides access to:
//! - User and role records and their shared handles
//! - Claims, claim types and logins
//! - Every store contract and the store builder
//! - Error types

pub use idstore_core::{
    claim::{types, value_types, Claim, ClaimMatcher, ClaimSet, DEFAULT_ISSUER},
    error::{IdentityStoreError, IdentityStoreResult},
    login::UserLoginInfo,
    record::{Record, RecordKey, RecordKind, RecordRef},
    role::{IdentityRole, RoleRef},
    store::{
        QueryableRoleStore, QueryableUserStore, RoleClaimStore, RoleStore, StoreBuilder,
        UserClaimStore, UserEmailStore, UserLockoutStore, UserLoginStore, UserPasswordStore,
        UserPhoneNumberStore, UserRoleStore, UserSecurityStampStore, UserStore,
        UserTwoFactorStore,
    },
    user::{IdentityUser, UserRef},
};

pub use async_trait::async_trait;
