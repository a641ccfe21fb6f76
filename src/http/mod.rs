//! HTTP transport for backend nodes.
//!
//! # Responsibilities
//! - Implement [`crate::connection::Connection`] over HTTP/1.1
//! - Build request URLs from a base URL, relative path, and ordered params
//! - Enforce per-request timeouts
//! - Classify failures (transport vs node response)

pub mod client;

pub use client::HttpConnection;
