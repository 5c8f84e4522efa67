//! Static/SPA request router.
//!
//! Serves a pre-built single-page application from an ordered pair of asset
//! roots (build output first, repository root second), substituting the entry
//! document for any path that matches no real file so a client-side router can
//! take over. A JSON health endpoint is the only API surface.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
