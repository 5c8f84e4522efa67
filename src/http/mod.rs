//! HTTP protocol layer module
//!
//! MIME detection, conditional-request support, and response builders,
//! decoupled from the routing logic.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_405_response, build_file_response, build_health_response,
    build_not_found_response, build_options_response, build_server_error_response,
    ASSET_CACHE_CONTROL, ENTRY_CACHE_CONTROL,
};
