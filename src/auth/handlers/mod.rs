//! HTTP handlers for the authentication endpoints
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Handler exports
//! ├── types.rs    - Request/response types
//! ├── register.rs - User registration handler
//! ├── login.rs    - Credential login handler
//! ├── logout.rs   - Session-cookie clearing handler
//! ├── profile.rs  - Current-identity handler
//! └── google.rs   - Federated login handlers
//! ```

pub mod types;

pub mod register;
pub mod login;
pub mod logout;
pub mod profile;
pub mod google;

pub use google::{google_callback, google_login};
pub use login::login;
pub use logout::logout;
pub use profile::profile;
pub use register::register;
