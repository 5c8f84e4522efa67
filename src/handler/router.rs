//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the health
//! endpoint, and dispatch into the static/SPA lookup chain. Every request
//! terminates in a valid HTTP response; file errors are either recovered by
//! the fallback chain or mapped to a structured JSON status here.

use crate::config::Config;
use crate::handler::static_files::{self, ResolveError};
use crate::http::{self, cache};
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

const HEALTH_PATH: &str = "/api/health";

/// Request context encapsulating what routing needs from the request
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    config: Arc<Config>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match check_http_method(&method, config.http.enable_cors) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: &path,
                is_head: method == Method::HEAD,
                if_none_match: req
                    .headers()
                    .get("if-none-match")
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
            };
            route_request(&ctx, &config).await
        }
    };

    if config.access_log_enabled() {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        logger::log_access(
            &remote_addr,
            method.as_str(),
            &path,
            response.status().as_u16(),
            body_bytes,
        );
    }

    Ok(response)
}

/// Check HTTP method and return an early response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path
pub async fn route_request(ctx: &RequestContext<'_>, config: &Config) -> Response<Full<Bytes>> {
    // Health check first; it must never fall into the SPA chain.
    if ctx.path == HEALTH_PATH {
        return http::build_health_response(config.server.port, &config.http, ctx.is_head);
    }

    serve_spa(ctx, config).await
}

/// Serve a path through the static/SPA lookup chain
async fn serve_spa(ctx: &RequestContext<'_>, config: &Config) -> Response<Full<Bytes>> {
    match static_files::resolve(&config.assets, ctx.path).await {
        Ok(asset) => {
            let etag = cache::generate_etag(&asset.content);
            if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
                return http::build_304_response(&etag);
            }
            let cache_control = if asset.is_entry_fallback {
                http::ENTRY_CACHE_CONTROL
            } else {
                http::ASSET_CACHE_CONTROL
            };
            http::build_file_response(
                &asset.content,
                asset.content_type,
                &etag,
                cache_control,
                &config.http,
                ctx.is_head,
            )
        }
        Err(ResolveError::NotFound) => http::build_not_found_response(&config.http),
        Err(ResolveError::Io(e)) => {
            logger::log_error(&format!("Asset lookup failed for '{}': {e}", ctx.path));
            http::build_server_error_response(&config.http)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssetsConfig, HttpConfig, LoggingConfig, ServerConfig};
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(primary: &std::path::Path, secondary: &std::path::Path, port: u16) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port,
                debug: false,
                secret_key: "test".to_string(),
                workers: None,
            },
            assets: AssetsConfig {
                primary_root: primary.to_string_lossy().into_owned(),
                secondary_root: secondary.to_string_lossy().into_owned(),
                entry_document: "index.html".to_string(),
            },
            http: HttpConfig {
                enable_cors: true,
                server_name: "spaserve/test".to_string(),
            },
            logging: LoggingConfig { access_log: false },
        }
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_route_reports_configured_port() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), tmp.path(), 9999);

        let resp = route_request(&ctx("/api/health"), &config).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["port"], 9999);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn unknown_path_without_entry_document_is_json_404() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), tmp.path(), 8081);

        let resp = route_request(&ctx("/nothing-here"), &config).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn unknown_path_with_entry_document_serves_it_with_200() {
        let tmp = TempDir::new().unwrap();
        let primary = tmp.path().join("dist");
        fs::create_dir(&primary).unwrap();
        fs::write(primary.join("index.html"), b"<html>spa</html>").unwrap();
        let config = test_config(&primary, tmp.path(), 8081);

        let resp = route_request(&ctx("/some/client/route"), &config).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["cache-control"], "no-cache");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<html>spa</html>");
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let tmp = TempDir::new().unwrap();
        let primary = tmp.path().join("dist");
        fs::create_dir(&primary).unwrap();
        fs::write(primary.join("app.css"), b"body{margin:0}").unwrap();
        let config = test_config(&primary, tmp.path(), 8081);

        let first = route_request(&ctx("/app.css"), &config).await;
        let second = route_request(&ctx("/app.css"), &config).await;
        assert_eq!(first.status(), second.status());
        assert_eq!(first.headers()["etag"], second.headers()["etag"]);
        assert_eq!(first.headers()["cache-control"], "public, max-age=3600");
        let a = first.into_body().collect().await.unwrap().to_bytes();
        let b = second.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn matching_etag_yields_304() {
        let tmp = TempDir::new().unwrap();
        let primary = tmp.path().join("dist");
        fs::create_dir(&primary).unwrap();
        fs::write(primary.join("app.js"), b"let a = 1;").unwrap();
        let config = test_config(&primary, tmp.path(), 8081);

        let first = route_request(&ctx("/app.js"), &config).await;
        let etag = first.headers()["etag"].to_str().unwrap().to_string();

        let revalidation = RequestContext {
            path: "/app.js",
            is_head: false,
            if_none_match: Some(etag),
        };
        let resp = route_request(&revalidation, &config).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn method_gate_allows_reads_only() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::HEAD, false).is_none());

        let preflight = check_http_method(&Method::OPTIONS, true).unwrap();
        assert_eq!(preflight.status(), StatusCode::NO_CONTENT);

        let rejected = check_http_method(&Method::POST, false).unwrap();
        assert_eq!(rejected.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(rejected.headers()["allow"], "GET, HEAD, OPTIONS");
    }
}
