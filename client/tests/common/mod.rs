//! Shared harness: spawns an isolated service instance per test, resolves
//! credentials, and provisions fixtures.

#![allow(dead_code)]

use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;

use petfriends_client::{AuthKey, Credentials, Pet, PetFriends, PetList};
use tempfile::TempDir;

const DEFAULT_EMAIL: &str = "tester@petfriends.dev";
const DEFAULT_PASSWORD: &str = "P@ssw0rd!";

/// A tiny but well-formed JPEG, enough for an upload fixture.
const PHOTO_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

/// One service instance on an ephemeral port, owned by a single test.
pub struct TestService {
    pub base_url: String,
    pub credentials: Credentials,
}

impl TestService {
    /// Bind an ephemeral port, seed the account the credentials resolve
    /// to, and serve from a background thread for the rest of the process.
    pub fn spawn() -> Self {
        let credentials = Credentials::from_env()
            .unwrap_or_else(|| Credentials::new(DEFAULT_EMAIL, DEFAULT_PASSWORD));
        let account =
            mock_server::Account::new(credentials.email.clone(), credentials.password.clone());

        let std_listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = std_listener.local_addr().expect("listener address");
        std_listener.set_nonblocking(true).expect("nonblocking listener");

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("build runtime");
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener)
                    .expect("adopt listener");
                mock_server::run(listener, account).await
            })
            .expect("serve");
        });

        Self {
            base_url: format!("http://{addr}"),
            credentials,
        }
    }

    pub fn client(&self) -> PetFriends {
        PetFriends::new(&self.base_url).expect("construct client")
    }

    /// Fetch a valid auth key; a rejection here is a harness failure, not a
    /// scenario outcome.
    pub fn auth_key(&self, client: &PetFriends) -> AuthKey {
        let response = client
            .get_api_key(&self.credentials.email, &self.credentials.password)
            .expect("key round-trip");
        assert_eq!(response.status, 200, "valid credentials were rejected");
        response.body.decode().expect("key payload")
    }
}

/// Write a photo fixture into a temp dir. The dir guard must stay alive
/// while the path is in use.
pub fn photo_fixture() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("taksa.jpg");
    fs::write(&path, PHOTO_BYTES).expect("write photo fixture");
    (dir, path)
}

pub fn my_pets(client: &PetFriends, auth_key: &AuthKey) -> Vec<Pet> {
    let response = client
        .get_list_of_pets(auth_key, "my_pets")
        .expect("list round-trip");
    assert_eq!(response.status, 200);
    response.body.decode::<PetList>().expect("pets payload").pets
}

/// Guarantee the account owns at least one pet, creating one when the
/// listing comes back empty.
pub fn ensure_my_pet(client: &PetFriends, auth_key: &AuthKey) -> Pet {
    let mut pets = my_pets(client, auth_key);
    if pets.is_empty() {
        let created = client
            .add_new_pet_without_photo(auth_key, "Айси", "хаски", "3")
            .expect("create round-trip");
        assert_eq!(created.status, 200, "could not provision a pet");
        pets = my_pets(client, auth_key);
    }
    match pets.into_iter().next() {
        Some(pet) => pet,
        None => panic!("account owns no pets even after creating one"),
    }
}
