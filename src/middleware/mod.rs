//! Middleware Module
//!
//! HTTP middleware for the two capability gates:
//!
//! - **`auth`** - Authentication gate: token extraction and verification
//! - **`role`** - Authorization gate: role-based access control
//!
//! The gates compose as an ordered pipeline: authentication first, then
//! any number of role requirements, each producing either a continuation
//! context or a terminal rejection.

pub mod auth;
pub mod role;

pub use auth::{authenticate, AuthUser, AuthenticatedUser};
pub use role::require_role;
