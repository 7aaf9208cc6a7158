//! Error types for the access crate.
//!
//! Errors are designed for layered context using rootcause: callers wrap
//! `MembershipError` in a `Report` as it crosses the HTTP boundary.

use std::fmt;

/// Errors from verifying group membership.
///
/// Every variant means "not authorized"; they differ only in why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// The profile request could not be sent or the body could not be read.
    Request { details: String },
    /// The provider answered with a non-success status.
    Status { status: u16 },
    /// The profile body is not valid JSON or has an unexpected shape.
    Decode { reason: String },
    /// The profile carries no group list.
    MissingGroups,
    /// The group list does not contain the secret group.
    NotAMember { group_id: String },
}

impl fmt::Display for MembershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { details } => {
                write!(f, "profile request failed: {details}")
            }
            Self::Status { status } => {
                write!(f, "profile request returned status {status}")
            }
            Self::Decode { reason } => {
                write!(f, "invalid profile response: {reason}")
            }
            Self::MissingGroups => {
                write!(f, "profile response has no groups")
            }
            Self::NotAMember { group_id } => {
                write!(f, "not a member of group {group_id}")
            }
        }
    }
}

impl std::error::Error for MembershipError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_member_display() {
        let err = MembershipError::NotAMember {
            group_id: "1234".to_string(),
        };
        assert!(err.to_string().contains("not a member"));
        assert!(err.to_string().contains("1234"));
    }

    #[test]
    fn status_display() {
        let err = MembershipError::Status { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn decode_display() {
        let err = MembershipError::Decode {
            reason: "expected value at line 1".to_string(),
        };
        assert!(err.to_string().contains("invalid profile response"));
        assert!(err.to_string().contains("line 1"));
    }
}
