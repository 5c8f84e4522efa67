//! Logger module
//!
//! Startup banner, access logging in Common Log Format, and error/warning
//! output. Everything goes to stdout/stderr; there is no log-file backend.

use crate::config::Config;
use chrono::Local;
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("SPA server started successfully");
    println!("Listening on: http://{addr}");
    println!(
        "Asset roots: {} (fallback: {})",
        config.assets.primary_root, config.assets.secondary_root
    );
    println!("Entry document: {}", config.assets.entry_document);
    println!("Health check: http://{addr}/api/health");
    if config.server.debug {
        println!("Debug mode: on");
    }
    if config.http.enable_cors {
        println!("CORS: enabled (*)");
    }
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("======================================\n");
}

/// Log one request in Common Log Format:
/// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
pub fn log_access(remote_addr: &SocketAddr, method: &str, path: &str, status: u16, body_bytes: u64) {
    println!(
        "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
        remote_addr.ip(),
        Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        path,
        status,
        body_bytes,
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_shutdown() {
    println!("\n[Shutdown] Ctrl-C received, stopping accept loop");
}
