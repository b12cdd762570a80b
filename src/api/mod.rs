//! API Module
//!
//! HTTP handlers and routing for the cache operations endpoint.
//!
//! # Endpoints
//! - `GET /stats` - Cache statistics
//! - `GET /categories` - Registered categories and TTLs
//! - `DELETE /identities/:identity` - Invalidate an identity
//! - `DELETE /categories/:category` - Invalidate a category
//! - `DELETE /categories/:category/identities/:identity` - Invalidate one entry
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
