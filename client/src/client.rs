//! Blocking HTTP facade over the PetFriends REST API.
//!
//! # Design
//! `PetFriends` holds only a base URL and a reqwest client; it carries no
//! state between calls. Every operation is one synchronous round-trip that
//! ends in [`dispatch`](PetFriends::dispatch): read the body as text, try a
//! JSON decode, and hand back `(status, body)` untouched. Non-2xx statuses
//! are returned, never raised; interpreting them is the caller's job.
//!
//! The two `*_without_name` / `*_numeric_type` constructors build requests
//! that are malformed on purpose; they exist to probe server-side
//! validation.

use std::fs;
use std::path::Path;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};

use crate::error::ApiError;
use crate::response::{ApiBody, ApiResponse};
use crate::types::AuthKey;

/// Header carrying the auth token on every call after the key request.
const AUTH_KEY_HEADER: &str = "auth_key";

/// Synchronous client for the pet-catalog service.
#[derive(Debug, Clone)]
pub struct PetFriends {
    http: Client,
    base_url: String,
}

impl PetFriends {
    /// Build a client against `base_url`. A trailing slash is tolerated.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("petfriends-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client against `PETFRIENDS_BASE_URL`, falling back to the
    /// live service.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&crate::config::base_url_from_env())
    }

    /// Request an auth key. Credentials travel in `email` / `password`
    /// headers; a 200 body carries the `key` field.
    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .get(self.url("api/key"))
            .header("email", email)
            .header("password", password);
        self.dispatch("get_api_key", request)
    }

    /// List pets. `filter` is `""` for every pet or `"my_pets"` for the
    /// caller's own; the 200 body carries a `pets` array.
    pub fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .get(self.url("api/pets"))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str())
            .query(&[("filter", filter)]);
        self.dispatch("get_list_of_pets", request)
    }

    /// Create a pet with a photo attachment (multipart POST). The photo is
    /// read from disk before the request is built, so the file handle is
    /// closed on every path.
    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
        pet_photo: &Path,
    ) -> Result<ApiResponse, ApiError> {
        let form = Form::new()
            .text("name", name.to_string())
            .text("animal_type", animal_type.to_string())
            .text("age", age.to_string())
            .part("pet_photo", photo_part(pet_photo)?);
        let request = self
            .http
            .post(self.url("api/pets"))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str())
            .multipart(form);
        self.dispatch("add_new_pet", request)
    }

    /// Create a pet without a photo (urlencoded POST).
    pub fn add_new_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .post(self.url("api/create_pet_simple"))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str())
            .form(&[("name", name), ("animal_type", animal_type), ("age", age)]);
        self.dispatch("add_new_pet_without_photo", request)
    }

    /// Create a pet without a photo, but multipart-encoded. The service
    /// accepts both encodings on the simple endpoint.
    pub fn add_new_pet_simple(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ApiError> {
        let form = Form::new()
            .text("name", name.to_string())
            .text("animal_type", animal_type.to_string())
            .text("age", age.to_string());
        let request = self
            .http
            .post(self.url("api/create_pet_simple"))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str())
            .multipart(form);
        self.dispatch("add_new_pet_simple", request)
    }

    /// Attach or replace the photo of an owned pet.
    pub fn add_pet_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        pet_photo: &Path,
    ) -> Result<ApiResponse, ApiError> {
        let form = Form::new().part("pet_photo", photo_part(pet_photo)?);
        let request = self
            .http
            .post(self.url(&format!("api/pets/set_photo/{pet_id}")))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str())
            .multipart(form);
        self.dispatch("add_pet_photo", request)
    }

    /// Update name, type and age of an owned pet (urlencoded PUT).
    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("api/pets/{pet_id}")))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str())
            .form(&[("name", name), ("animal_type", animal_type), ("age", age)]);
        self.dispatch("update_pet_info", request)
    }

    /// Delete a pet. Known service defect: the answer is 200 with an empty
    /// body even on success, so removal can only be confirmed by
    /// re-listing.
    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .delete(self.url(&format!("api/pets/{pet_id}")))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str());
        self.dispatch("delete_pet", request)
    }

    /// Deliberately malformed creation: the required `name` field is left
    /// out entirely.
    pub fn add_new_pet_simple_without_name(
        &self,
        auth_key: &AuthKey,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .post(self.url("api/create_pet_simple"))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str())
            .form(&[("animal_type", animal_type), ("age", age)]);
        self.dispatch("add_new_pet_simple_without_name", request)
    }

    /// Deliberately malformed creation: a number where the API expects a
    /// string for `animal_type`.
    pub fn add_new_pet_simple_numeric_type(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: u32,
        age: &str,
    ) -> Result<ApiResponse, ApiError> {
        let animal_type = animal_type.to_string();
        let request = self
            .http
            .post(self.url("api/create_pet_simple"))
            .header(AUTH_KEY_HEADER, auth_key.key.as_str())
            .form(&[
                ("name", name),
                ("animal_type", animal_type.as_str()),
                ("age", age),
            ]);
        self.dispatch("add_new_pet_simple_numeric_type", request)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Send the request and normalize the answer. Only transport faults
    /// become errors; every status code comes back as data.
    fn dispatch(&self, op: &'static str, request: RequestBuilder) -> Result<ApiResponse, ApiError> {
        let response = request.send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        tracing::debug!(op, status, "round-trip completed");
        Ok(ApiResponse {
            status,
            body: ApiBody::from_text(text),
        })
    }
}

/// Read a photo into a multipart part. The file is consumed eagerly so no
/// handle stays open across the request.
fn photo_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = fs::read(path).map_err(|source| ApiError::Photo {
        path: path.to_path_buf(),
        source,
    })?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("pet_photo")
        .to_string();
    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())?)
}
