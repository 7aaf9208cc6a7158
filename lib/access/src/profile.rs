//! Identity provider profile and the group-membership decision.
//!
//! The profile endpoint is queried with `fields=id,name,groups{id}` and
//! answers with a document shaped like:
//!
//! ```json
//! {"id": "10", "name": "Alice", "groups": {"data": [{"id": "A"}, {"id": "B"}]}}
//! ```
//!
//! Every field is optional at the schema level so that an unexpected shape
//! becomes a `MembershipError` instead of a panic.

use serde::Deserialize;

use crate::error::MembershipError;

/// The subset of the provider's profile document used for the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    groups: Option<GroupPage>,
}

/// One page of the profile's group edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct GroupPage {
    #[serde(default)]
    data: Vec<GroupEntry>,
}

/// A single group the user belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct GroupEntry {
    #[serde(default)]
    id: Option<String>,
}

/// Identity of a user whose membership was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: Option<String>,
    name: Option<String>,
}

impl Member {
    /// Returns the provider's user ID, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the user's display name, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Profile {
    /// Decodes a profile response body.
    ///
    /// # Errors
    ///
    /// Returns `MembershipError::Decode` if the body is not JSON or a field
    /// has the wrong type.
    pub fn from_slice(body: &[u8]) -> Result<Self, MembershipError> {
        serde_json::from_slice(body).map_err(|e| MembershipError::Decode {
            reason: e.to_string(),
        })
    }

    /// Returns true if any listed group has the given ID.
    #[must_use]
    pub fn is_member(&self, group_id: &str) -> bool {
        self.verify_member(group_id).is_ok()
    }

    /// Scans the group list for `group_id`.
    ///
    /// # Errors
    ///
    /// Returns `MissingGroups` if the profile has no group list and
    /// `NotAMember` if the list was scanned without a match.
    pub fn verify_member(&self, group_id: &str) -> Result<Member, MembershipError> {
        let page = self.groups.as_ref().ok_or(MembershipError::MissingGroups)?;

        let found = page
            .data
            .iter()
            .any(|entry| entry.id.as_deref() == Some(group_id));

        if !found {
            tracing::debug!(
                scanned = page.data.len(),
                group_id,
                "secret group not in profile"
            );
            return Err(MembershipError::NotAMember {
                group_id: group_id.to_string(),
            });
        }

        Ok(Member {
            id: self.id.clone(),
            name: self.name.clone(),
        })
    }
}
