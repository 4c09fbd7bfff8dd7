use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Header carrying the auth token on every call after the key request.
const AUTH_KEY_HEADER: &str = "auth_key";

/// The live service answers auth failures with plain text, not JSON.
const FORBIDDEN_BODY: &str = "403 Forbidden: missing or invalid credentials";

/// Account accepted by the key endpoint.
#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub password: String,
}

impl Account {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A stored pet record. `owner` is bookkeeping for the `my_pets` filter and
/// never appears in responses.
#[derive(Clone, Debug, Serialize)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    #[serde(skip)]
    owner: String,
}

#[derive(Serialize)]
struct PetList {
    pets: Vec<Pet>,
}

#[derive(Default)]
pub struct Catalog {
    accounts: HashMap<String, String>,
    keys: HashMap<String, String>,
    pets: HashMap<Uuid, Pet>,
}

pub type Db = Arc<RwLock<Catalog>>;

pub fn app(account: Account) -> Router {
    let mut catalog = Catalog::default();
    catalog.accounts.insert(account.email, account.password);
    let db: Db = Arc::new(RwLock::new(catalog));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet))
        .route("/api/pets/set_photo/{id}", post(set_photo))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .with_state(db)
}

pub async fn run(listener: TcpListener, account: Account) -> Result<(), std::io::Error> {
    axum::serve(listener, app(account)).await
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Response {
    let email = header_str(&headers, "email");
    let password = header_str(&headers, "password");
    let mut catalog = db.write().await;
    let authorized = !email.is_empty()
        && !password.is_empty()
        && catalog
            .accounts
            .get(email)
            .is_some_and(|stored| stored == password);
    if !authorized {
        return forbidden();
    }
    let key = Uuid::new_v4().simple().to_string();
    catalog.keys.insert(key.clone(), email.to_string());
    tracing::debug!(email, "issued auth key");
    Json(serde_json::json!({ "key": key })).into_response()
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    filter: String,
}

async fn list_pets(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(email) = caller_email(&db, &headers).await else {
        return forbidden();
    };
    let catalog = db.read().await;
    let pets: Vec<Pet> = match query.filter.as_str() {
        "" => catalog.pets.values().cloned().collect(),
        "my_pets" => catalog
            .pets
            .values()
            .filter(|pet| pet.owner == email)
            .cloned()
            .collect(),
        _ => return invalid("filter must be empty or \"my_pets\""),
    };
    Json(PetList { pets }).into_response()
}

/// Create a pet. Serves both creation endpoints: multipart with a photo on
/// `/api/pets`, and multipart or urlencoded without one on
/// `/api/create_pet_simple`.
async fn create_pet(State(db): State<Db>, request: Request) -> Response {
    let Some(email) = caller_email(&db, request.headers()).await else {
        return forbidden();
    };
    let form = match read_pet_form(request).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    if !form.fields.contains_key("name") {
        return invalid("name is required");
    }
    if let Err(response) = validate_field_values(&form.fields) {
        return response;
    }
    let pet_photo = form
        .photo
        .as_ref()
        .map(|(mime, bytes)| photo_data_uri(mime, bytes))
        .unwrap_or_default();
    let pet = Pet {
        id: Uuid::new_v4(),
        name: form.fields.get("name").cloned().unwrap_or_default(),
        animal_type: form.fields.get("animal_type").cloned().unwrap_or_default(),
        age: form.fields.get("age").cloned().unwrap_or_default(),
        pet_photo,
        owner: email,
    };
    db.write().await.pets.insert(pet.id, pet.clone());
    tracing::debug!(id = %pet.id, "pet created");
    Json(pet).into_response()
}

async fn set_photo(State(db): State<Db>, Path(id): Path<Uuid>, request: Request) -> Response {
    let Some(email) = caller_email(&db, request.headers()).await else {
        return forbidden();
    };
    let form = match read_pet_form(request).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let Some((mime, bytes)) = form.photo else {
        return invalid("pet_photo is required");
    };
    let mut catalog = db.write().await;
    let Some(pet) = catalog.pets.get_mut(&id) else {
        return invalid("pet not found");
    };
    if pet.owner != email {
        return forbidden();
    }
    pet.pet_photo = photo_data_uri(&mime, &bytes);
    Json(pet.clone()).into_response()
}

async fn update_pet(State(db): State<Db>, Path(id): Path<Uuid>, request: Request) -> Response {
    let Some(email) = caller_email(&db, request.headers()).await else {
        return forbidden();
    };
    let form = match read_pet_form(request).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    if let Err(response) = validate_field_values(&form.fields) {
        return response;
    }
    let mut catalog = db.write().await;
    let Some(pet) = catalog.pets.get_mut(&id) else {
        return invalid("pet not found");
    };
    if pet.owner != email {
        return forbidden();
    }
    if let Some(name) = form.fields.get("name") {
        pet.name = name.clone();
    }
    if let Some(animal_type) = form.fields.get("animal_type") {
        pet.animal_type = animal_type.clone();
    }
    if let Some(age) = form.fields.get("age") {
        pet.age = age.clone();
    }
    Json(pet.clone()).into_response()
}

async fn delete_pet(State(db): State<Db>, Path(id): Path<Uuid>, headers: HeaderMap) -> Response {
    let Some(email) = caller_email(&db, &headers).await else {
        return forbidden();
    };
    let mut catalog = db.write().await;
    if catalog.pets.get(&id).is_some_and(|pet| pet.owner == email) {
        catalog.pets.remove(&id);
        tracing::debug!(%id, "pet deleted");
    }
    // Faithful to the live service: 200 with an empty body, deleted or not.
    StatusCode::OK.into_response()
}

/// Text fields plus at most one file part, collected from either form
/// encoding the clients use.
struct PetForm {
    fields: HashMap<String, String>,
    photo: Option<(String, Vec<u8>)>,
}

async fn read_pet_form(request: Request) -> Result<PetForm, Response> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut form = PetForm {
        fields: HashMap::new(),
        photo: None,
    };

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &()).await.map_err(bad_form)?;
        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();
            if field.file_name().is_some() {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                form.photo = Some((mime, bytes.to_vec()));
            } else {
                let value = field.text().await.map_err(bad_form)?;
                form.fields.insert(name, value);
            }
        }
    } else {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map_err(bad_form)?;
        form.fields.extend(pairs);
    }
    Ok(form)
}

/// The expected validation contract: `name` must hold at least one letter
/// or digit when non-empty, and `animal_type` must not be a bare number.
/// Empty values pass through; the service tolerates them.
fn validate_field_values(fields: &HashMap<String, String>) -> Result<(), Response> {
    if let Some(name) = fields.get("name") {
        if !name.is_empty() && !name.chars().any(char::is_alphanumeric) {
            return Err(invalid("name must contain at least one letter or digit"));
        }
    }
    if let Some(animal_type) = fields.get("animal_type") {
        if !animal_type.is_empty() && animal_type.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("animal_type must be a string, not a number"));
        }
    }
    Ok(())
}

async fn caller_email(db: &Db, headers: &HeaderMap) -> Option<String> {
    let key = headers.get(AUTH_KEY_HEADER)?.to_str().ok()?;
    db.read().await.keys.get(key).cloned()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn photo_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, FORBIDDEN_BODY).into_response()
}

fn invalid(reason: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, reason).into_response()
}

fn bad_form<E: std::fmt::Display>(err: E) -> Response {
    (StatusCode::BAD_REQUEST, format!("malformed form body: {err}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn pet_serializes_without_owner() {
        let pet = Pet {
            id: Uuid::nil(),
            name: "Дора".to_string(),
            animal_type: "такса".to_string(),
            age: "4".to_string(),
            pet_photo: String::new(),
            owner: "tester@petfriends.dev".to_string(),
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["name"], "Дора");
        assert!(json.get("owner").is_none());
    }

    #[test]
    fn ordinary_names_pass_validation() {
        assert!(validate_field_values(&fields(&[("name", "Дора"), ("animal_type", "такса")])).is_ok());
    }

    #[test]
    fn empty_values_are_tolerated() {
        assert!(validate_field_values(&fields(&[("name", ""), ("animal_type", ""), ("age", "")])).is_ok());
    }

    #[test]
    fn special_character_name_is_rejected() {
        let err = validate_field_values(&fields(&[("name", "@@@%%%$$$")])).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn numeric_animal_type_is_rejected() {
        let err = validate_field_values(&fields(&[("name", "Лапуля"), ("animal_type", "121212")]))
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_numeric_age_is_tolerated() {
        assert!(validate_field_values(&fields(&[("name", "Гена"), ("age", "Сто")])).is_ok());
    }

    #[test]
    fn photo_data_uri_encodes_bytes() {
        let uri = photo_data_uri("image/jpeg", &[0xFF, 0xD8]);
        assert_eq!(uri, "data:image/jpeg;base64,/9g=");
    }
}
