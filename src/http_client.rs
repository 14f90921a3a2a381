//! HTTP client construction
//!
//! Both collaborators (metadata and stream provider) share the same client
//! setup and differ only in default headers and total timeout:
//! - TLS via rustls
//! - Brotli, Gzip, Deflate compression (auto-negotiated)
//! - Connection pooling with keep-alive
//! - Hard per-request timeout, no retries

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::debug;

use crate::error::Result;

/// Connect phase budget, shared by every collaborator.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a client with the given default headers and total request timeout.
pub fn build_client(headers: HeaderMap, timeout: Duration) -> Result<Client> {
    debug!(timeout_secs = timeout.as_secs(), "Building HTTP client");

    let client = Client::builder()
        // ═══════════════════════════════════════════════════════════════
        // CONNECTION
        // ═══════════════════════════════════════════════════════════════
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .use_rustls_tls()
        // ═══════════════════════════════════════════════════════════════
        // COMPRESSION (auto-negotiated via Accept-Encoding)
        // ═══════════════════════════════════════════════════════════════
        .brotli(true)
        .gzip(true)
        .deflate(true)
        // ═══════════════════════════════════════════════════════════════
        // FINGERPRINT
        // ═══════════════════════════════════════════════════════════════
        .default_headers(headers)
        // ═══════════════════════════════════════════════════════════════
        // TIMEOUTS
        // ═══════════════════════════════════════════════════════════════
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    Ok(client)
}
