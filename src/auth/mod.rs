//! Authentication Module
//!
//! This module is the authentication/authorization core: credential
//! verification, token issuance, session cookies, and the federated
//! identity bridge.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports
//! ├── users.rs     - User model, roles, and the store boundary
//! ├── password.rs  - bcrypt hashing and verification
//! ├── sessions.rs  - Token issuer/verifier and cookie policy
//! ├── federated.rs - Federated identity bridge and Google client
//! └── handlers/    - HTTP handlers for the auth endpoints
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username and password are validated, the password is
//!    hashed, and a user record is created. No token is issued.
//! 2. **Login**: credentials are verified, then a signed token is issued
//!    and delivered as an httpOnly cookie and in the response body.
//! 3. **Federated login**: a provider-verified identity is find-or-created
//!    locally, with the same token delivery as login.
//! 4. **Protected requests**: the gates in [`crate::middleware`] verify the
//!    token and enforce roles.
//!
//! # Security
//!
//! - Passwords are bcrypt-hashed before storage; plaintext never persists
//! - Tokens are HMAC-signed, expire after 1 hour by default
//! - Invalid credentials produce one indistinguishable response (no
//!   username enumeration)

/// User model, roles and store operations
pub mod users;

/// Password hashing
pub mod password;

/// Token issuance/verification and session cookies
pub mod sessions;

/// Federated identity bridge
pub mod federated;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::types::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UserResponse};
pub use handlers::{google_callback, google_login, login, logout, profile, register};
pub use sessions::{Claims, TokenKeys, TokenRejection};
pub use users::{MemoryUserStore, PgUserStore, Role, User, UserStore};
