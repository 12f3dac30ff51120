//! Claims and the semantic equality used to deduplicate them.
//!
//! A [`Claim`] is a typed attribute attached to a user or role. Two claims are
//! considered the same claim when [`ClaimMatcher::matches`] says so, which compares
//! six fields and ignores [`Claim::properties`]. A [`ClaimSet`] buckets claims by
//! type and resolves collisions inside a bucket with the matcher.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Issuer assigned to claims created without an explicit issuer.
pub const DEFAULT_ISSUER: &str = "LOCAL AUTHORITY";

/// Well-known claim value types.
pub mod value_types {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// Well-known claim types.
pub mod types {
    pub const NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
    pub const NAME_IDENTIFIER: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
    pub const EMAIL: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
    pub const ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
    pub const GIVEN_NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/givenname";
    pub const SURNAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/surname";
    pub const MOBILE_PHONE: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/mobilephone";
}

/// A typed attribute attached to a record.
///
/// `subject` names the identity the claim describes, when known. `properties`
/// carries free-form metadata and takes no part in claim matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub issuer: String,
    pub original_issuer: String,
    pub subject: Option<String>,
    pub claim_type: String,
    pub value: String,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Claim {
    /// Creates a string claim issued by [`DEFAULT_ISSUER`].
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            original_issuer: DEFAULT_ISSUER.to_string(),
            subject: None,
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: value_types::STRING.to_string(),
            properties: BTreeMap::new(),
        }
    }

    /// Sets the issuer. The original issuer follows unless set separately afterwards.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        self.original_issuer = issuer.clone();
        self.issuer = issuer;
        self
    }

    pub fn with_original_issuer(mut self, original_issuer: impl Into<String>) -> Self {
        self.original_issuer = original_issuer.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Semantic equality over claims.
///
/// The bucket key is deliberately narrower than the equality key: every claim of a
/// given type lands in the same bucket, and [`ClaimMatcher::matches`] must be used
/// to tell them apart.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaimMatcher;

impl ClaimMatcher {
    /// Returns `true` if both claims denote the same claim.
    pub fn matches(left: &Claim, right: &Claim) -> bool {
        if left == right {
            return true;
        }

        left.issuer == right.issuer
            && left.original_issuer == right.original_issuer
            && left.subject == right.subject
            && left.claim_type == right.claim_type
            && left.value == right.value
            && left.value_type == right.value_type
    }

    /// Returns the bucket key of a claim.
    pub fn bucket_key(claim: &Claim) -> &str {
        &claim.claim_type
    }
}

/// An unordered collection of claims with no two matching entries.
///
/// Two sets are equal when they hold the same claims, whatever order they were
/// inserted in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Claim>", into = "Vec<Claim>")]
pub struct ClaimSet {
    buckets: HashMap<String, Vec<Claim>>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.buckets
            .values()
            .flatten()
    }

    /// Returns `true` if a matching claim is present.
    pub fn contains(&self, claim: &Claim) -> bool {
        self.buckets
            .get(ClaimMatcher::bucket_key(claim))
            .is_some_and(|bucket| bucket.iter().any(|c| ClaimMatcher::matches(c, claim)))
    }

    /// Adds a claim, replacing a matching claim if one is present.
    ///
    /// Returns the claim that was replaced.
    pub fn insert(&mut self, claim: Claim) -> Option<Claim> {
        let replaced = self.remove(&claim);

        self.buckets
            .entry(ClaimMatcher::bucket_key(&claim).to_string())
            .or_default()
            .push(claim);

        replaced
    }

    /// Removes the claim matching `claim`, returning it if one was present.
    pub fn remove(&mut self, claim: &Claim) -> Option<Claim> {
        let key = ClaimMatcher::bucket_key(claim);
        let bucket = self.buckets.get_mut(key)?;
        let position = bucket
            .iter()
            .position(|c| ClaimMatcher::matches(c, claim))?;
        let removed = bucket.remove(position);

        if bucket.is_empty() {
            self.buckets.remove(key);
        }

        Some(removed)
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Returns a copy of every claim in the set.
    pub fn to_vec(&self) -> Vec<Claim> {
        self.iter()
            .cloned()
            .collect()
    }
}

impl PartialEq for ClaimSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|claim| {
                other
                    .buckets
                    .get(ClaimMatcher::bucket_key(claim))
                    .is_some_and(|bucket| bucket.contains(claim))
            })
    }
}

impl Eq for ClaimSet {}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        let mut set = ClaimSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Claim> for ClaimSet {
    fn extend<I: IntoIterator<Item = Claim>>(&mut self, iter: I) {
        for claim in iter {
            self.insert(claim);
        }
    }
}

impl From<Vec<Claim>> for ClaimSet {
    fn from(claims: Vec<Claim>) -> Self {
        claims.into_iter().collect()
    }
}

impl From<ClaimSet> for Vec<Claim> {
    fn from(set: ClaimSet) -> Self {
        set.buckets
            .into_values()
            .flatten()
            .collect()
    }
}
