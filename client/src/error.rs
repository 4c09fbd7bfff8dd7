//! Error types for the PetFriends client.
//!
//! # Design
//! HTTP status codes are never errors here; they come back inside
//! `ApiResponse` for the caller to judge. `ApiError` covers only the faults
//! that prevent a round-trip from completing at all: the transport layer
//! and photo files that cannot be read before upload.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Faults that abort a call before a `(status, body)` pair exists.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP layer failed: unreachable host, TLS, malformed header, or
    /// an unreadable response stream.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// A photo attachment could not be read from disk.
    #[error("could not read photo {path}: {source}")]
    Photo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
