//! Error Module
//!
//! This module defines the error taxonomy for the authentication core and
//! its conversion to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - AuthError definition and status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # HTTP Response Conversion
//!
//! `AuthError` implements `IntoResponse`, so handlers and middleware return
//! it directly and the gate/flow boundary is where every identity error
//! becomes a status code plus `{"message": ...}` JSON body.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::AuthError;
