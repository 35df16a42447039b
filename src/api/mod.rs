//! API Module
//!
//! Admin HTTP surface for inspecting and steering a running stat cache.
//!
//! # Endpoints
//! - `GET|PUT|DELETE /stat/*path` - Look up, insert or delete a cached path
//! - `POST /size/*path` - Adjust the cached size of a path
//! - `GET|PUT /noobj/*path` - Check or record a missing object
//! - `POST /clear` - Drop every entry
//! - `GET|PUT /config` - Read or change cache policy
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
