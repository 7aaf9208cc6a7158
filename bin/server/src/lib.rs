//! fbrp: a static file server gated by OAuth login and group membership.
//!
//! Users log in through the identity provider; the server checks that they
//! belong to one configured group and records the result in a signed
//! session cookie. Files under `/files` are served only to sessions whose
//! last login passed that check.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod pages;
