//! Access rules for the fbrp file gate.
//!
//! This crate provides:
//! - Session data carried in the signed session cookie (`SessionData`)
//! - The identity provider's profile schema (`Profile`)
//! - The group-membership decision (`Profile::verify_member`)
//! - Membership error types
//!
//! # Access Model
//!
//! A browser session is either authenticated or not. It becomes authenticated
//! only when the profile fetched at login lists the configured secret group.
//! Membership is evaluated once per login and never cached.
//!
//! # Example
//!
//! ```
//! use fbrp_access::{Profile, SessionData};
//!
//! let profile = Profile::from_slice(
//!     br#"{"id":"1","name":"Alice","groups":{"data":[{"id":"A"},{"id":"B"}]}}"#,
//! )
//! .expect("valid profile");
//!
//! let member = profile.verify_member("B").expect("member of B");
//! assert_eq!(member.name(), Some("Alice"));
//!
//! let mut session = SessionData::default();
//! session.set_has_auth(true);
//! assert!(session.has_auth());
//! ```

pub mod error;
pub mod profile;
pub mod session;

// Re-export main types at crate root
pub use error::MembershipError;
pub use profile::{Member, Profile};
pub use session::SessionData;
