//! HTTP response building module
//!
//! Builders for every response shape the server produces. Builder failures
//! never panic on the request path; they degrade to an empty response and
//! log the fault.

use crate::config::HttpConfig;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Real assets may be cached; a deploy replaces them under new hashed names.
pub const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";
/// The entry document must revalidate so deploys propagate immediately.
pub const ENTRY_CACHE_CONTROL: &str = "no-cache";

// Frozen wire contract: existing monitors string-match this exact message,
// which predates this server.
const HEALTH_MESSAGE: &str = "Flask server is running";

/// Health check payload
#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    message: &'static str,
    port: u16,
}

/// Build a 200 response for a resolved file with `ETag` and cache headers
pub fn build_file_response(
    data: &[u8],
    content_type: &'static str,
    etag: &str,
    cache_control: &'static str,
    http: &HttpConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data.to_owned())
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", cache_control)
        .header("Server", &http.server_name);

    if http.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the health check response carrying the configured listen port
pub fn build_health_response(port: u16, http: &HttpConfig, is_head: bool) -> Response<Full<Bytes>> {
    let payload = HealthStatus {
        status: "healthy",
        message: HEALTH_MESSAGE,
        port,
    };
    let json = serde_json::to_string(&payload).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to serialize health payload: {e}"));
        format!(r#"{{"status":"healthy","port":{port}}}"#)
    });

    json_response(StatusCode::OK, json, http, is_head)
}

/// Build the terminal 404 response, used only when even the entry document
/// is absent from both asset roots
pub fn build_not_found_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::NOT_FOUND,
        r#"{"error": "Not found"}"#.to_string(),
        http,
        false,
    )
}

/// Build a 500 response for filesystem faults other than absence
pub fn build_server_error_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error": "Internal server error"}"#.to_string(),
        http,
        false,
    )
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build a JSON response with the common headers applied
fn json_response(
    status: StatusCode,
    json: String,
    http: &HttpConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = json.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(json)
    };

    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", content_length)
        .header("Server", &http.server_name);

    if http.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn http_config(enable_cors: bool) -> HttpConfig {
        HttpConfig {
            enable_cors,
            server_name: "spaserve/test".to_string(),
        }
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn health_response_carries_configured_port() {
        let resp = build_health_response(8081, &http_config(true), false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["port"], 8081);
    }

    #[tokio::test]
    async fn not_found_response_is_structured_json() {
        let resp = build_not_found_response(&http_config(false));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get("access-control-allow-origin").is_none());

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn head_file_response_has_headers_but_no_body() {
        let data = b"hello world";
        let resp = build_file_response(
            data,
            "text/plain; charset=utf-8",
            "\"etag\"",
            ASSET_CACHE_CONTROL,
            &http_config(true),
            true,
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-length"].to_str().unwrap(),
            data.len().to_string()
        );
        assert!(body_bytes(resp).await.is_empty());
    }

    #[test]
    fn options_preflight_advertises_read_methods() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers()["access-control-allow-methods"],
            "GET, HEAD, OPTIONS"
        );
    }
}
