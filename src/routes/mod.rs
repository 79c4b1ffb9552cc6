//! Route Configuration
//!
//! Router assembly for the HTTP surface:
//!
//! - **`router`** - top-level router combining all route groups
//! - **`api_routes`** - protected `/api` routes behind the gates

pub mod api_routes;
pub mod router;

pub use router::create_router;
