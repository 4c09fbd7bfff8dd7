//! Credentials and base-URL configuration, read from the environment.

use std::env;

/// Base URL of the live service, used when `PETFRIENDS_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://petfriends1.herokuapp.com";

/// Account credentials for the key endpoint. Supplied by configuration,
/// never hardcoded into scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Read `PETFRIENDS_EMAIL` / `PETFRIENDS_PASSWORD`, honoring a `.env`
    /// file. `None` unless both are set.
    pub fn from_env() -> Option<Self> {
        dotenvy::dotenv().ok();
        let email = env::var("PETFRIENDS_EMAIL").ok()?;
        let password = env::var("PETFRIENDS_PASSWORD").ok()?;
        Some(Self { email, password })
    }
}

/// Base URL override from `PETFRIENDS_BASE_URL`, falling back to the live
/// service.
pub fn base_url_from_env() -> String {
    dotenvy::dotenv().ok();
    env::var("PETFRIENDS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_construct() {
        let creds = Credentials::new("user@example.com", "hunter2");
        assert_eq!(creds.email, "user@example.com");
        assert_eq!(creds.password, "hunter2");
    }
}
