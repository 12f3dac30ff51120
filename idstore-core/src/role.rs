//! The role record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    claim::{Claim, ClaimSet},
    record::{Record, RecordKind, RecordRef},
};

/// A shared handle to a stored role.
pub type RoleRef = RecordRef<IdentityRole>;

/// A role record.
///
/// The id is fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityRole {
    id: String,
    pub name: Option<String>,
    pub normalized_name: Option<String>,
    #[serde(default)]
    claims: ClaimSet,
}

impl IdentityRole {
    /// Creates a role with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name)
    }

    /// Creates a role with a caller-assigned id.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn with_normalized_name(mut self, normalized_name: impl Into<String>) -> Self {
        self.normalized_name = Some(normalized_name.into());
        self
    }

    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.add_claim(claim);
        self
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    /// Adds a claim, replacing a matching one.
    pub fn add_claim(&mut self, claim: Claim) {
        self.claims.insert(claim);
    }

    /// Removes the matching claim. Returns `false` if there was none.
    pub fn remove_claim(&mut self, claim: &Claim) -> bool {
        self.claims.remove(claim).is_some()
    }
}

impl Record for IdentityRole {
    fn id(&self) -> &str {
        &self.id
    }

    fn normalized_name(&self) -> Option<&str> {
        self.normalized_name.as_deref()
    }

    fn set_normalized_name(&mut self, normalized_name: Option<String>) {
        self.normalized_name = normalized_name;
    }

    fn kind() -> RecordKind {
        RecordKind::Role
    }
}
