//! DTOs mirroring the service's JSON payloads.
//!
//! The service owns these shapes; the client only relays them. All fields
//! are strings because the API treats every pet attribute, `age` included,
//! as text.

use serde::{Deserialize, Serialize};

/// Token returned by the key endpoint, sent as the `auth_key` header on
/// every authenticated call.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// A pet record as the service returns it. `pet_photo` is a data URI, or
/// empty when no photo has been attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
}

/// Payload of the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}
