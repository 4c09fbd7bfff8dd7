//! Synchronous test client for the PetFriends pet-catalog service.
//!
//! # Overview
//! `PetFriends` wraps the remote REST API in one blocking method per
//! endpoint. Every call performs a single round-trip and returns the
//! server's verdict as an [`ApiResponse`]: a status code plus a body that
//! is either decoded JSON or raw text, depending on what the server sent.
//!
//! # Design
//! - The client is a transport shim: it never retries, never times out
//!   beyond the transport defaults, and never interprets status codes.
//!   Asserting on the outcome is the caller's job.
//! - Non-2xx statuses are data, not errors. Only transport faults (socket,
//!   TLS, unreadable photo file) surface as [`ApiError`].
//! - Responses that fail to decode as JSON fall back to [`ApiBody::Raw`];
//!   the service is known to answer some error paths with plain text.

pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod types;

pub use client::PetFriends;
pub use config::Credentials;
pub use error::ApiError;
pub use response::{ApiBody, ApiResponse};
pub use types::{AuthKey, Pet, PetList};
