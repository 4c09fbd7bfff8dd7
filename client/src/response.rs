//! Response normalization shared by every client operation.
//!
//! # Design
//! The service answers most requests with JSON but falls back to plain text
//! (or nothing) on several error paths, and on one documented path returns
//! 200 with an empty body. `ApiBody` makes that duality explicit: a decoded
//! JSON value or the raw text, chosen by decode success. Field accessors
//! answer "not present" uniformly for both variants so assertions such as
//! "no `key` in the body" work without caring which shape came back.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Body of a service response: decoded JSON, or the raw text when the body
/// is not valid JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Decoded(Value),
    Raw(String),
}

impl ApiBody {
    /// Normalize a response body. Decode failure is not an error; it
    /// selects the `Raw` variant.
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ApiBody::Decoded(value),
            Err(_) => ApiBody::Raw(text),
        }
    }

    /// The decoded JSON value, if the body decoded.
    pub fn json(&self) -> Option<&Value> {
        match self {
            ApiBody::Decoded(value) => Some(value),
            ApiBody::Raw(_) => None,
        }
    }

    /// The raw text, if the body did not decode.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiBody::Decoded(_) => None,
            ApiBody::Raw(text) => Some(text),
        }
    }

    /// Look up a top-level field. `None` for raw bodies and missing keys.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.json().and_then(|value| value.get(name))
    }

    /// Whether a top-level field is present. Always `false` for raw bodies.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// A top-level field as a string slice.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Deserialize the decoded body into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Outcome of one round-trip: the HTTP status and the normalized body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ApiBody,
}
