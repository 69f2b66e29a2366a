//! Rider age lookup.
//!
//! Fares depend on the rider's age when it is known. Identity and login
//! belong to the surrounding application; the path service only asks a
//! [`RiderAgeResolver`] for an age.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an authenticated member.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        MemberId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the age of the rider making a query.
pub trait RiderAgeResolver {
    /// Age in years, or `None` for anonymous riders and unknown members.
    fn resolve_age(&self, member: Option<&MemberId>) -> Option<u32>;
}

/// Fixed member → age table.
#[derive(Debug, Clone, Default)]
pub struct RiderDirectory {
    ages: HashMap<MemberId, u32>,
}

impl RiderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a member's age, replacing any previous value.
    pub fn insert(&mut self, member: MemberId, age: u32) {
        self.ages.insert(member, age);
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }
}

impl FromIterator<(MemberId, u32)> for RiderDirectory {
    fn from_iter<I: IntoIterator<Item = (MemberId, u32)>>(iter: I) -> Self {
        Self {
            ages: iter.into_iter().collect(),
        }
    }
}

impl RiderAgeResolver for RiderDirectory {
    fn resolve_age(&self, member: Option<&MemberId>) -> Option<u32> {
        member.and_then(|m| self.ages.get(m).copied())
    }
}
