//! Common Test Infrastructure
//!
//! Shared across the suite binaries:
//! - Test data factories (unique names and emails)
//! - A wiremock stand-in for the user API with canned endpoint stubs

// Not every suite binary uses every helper.
#![allow(dead_code)]

use cartwright::api::{Gender, User, UserApi, UserDraft, UserStatus};
use chrono::Utc;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::distr::{Alphanumeric, SampleString};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bearer token the mock-backed clients send
pub const TEST_TOKEN: &str = "test-suite-token";

/// Random lowercase alphanumeric string
pub fn random_string(len: usize) -> String {
    Alphanumeric
        .sample_string(&mut rand::rng(), len)
        .to_lowercase()
}

/// Unique email, keyed by a random tag and the current timestamp
pub fn random_email() -> String {
    format!(
        "test_{}_{}@example.com",
        random_string(6),
        Utc::now().timestamp_millis()
    )
}

/// A valid user payload with a fresh name and email
pub fn user_draft() -> UserDraft {
    UserDraft {
        name: Name().fake(),
        email: random_email(),
        gender: Gender::Male,
        status: UserStatus::Active,
    }
}

/// The user the API would return after persisting `draft` under `id`
pub fn persisted(draft: &UserDraft, id: u64) -> User {
    User {
        id,
        name: draft.name.clone(),
        email: draft.email.clone(),
        gender: draft.gender,
        status: draft.status,
    }
}

/// Mock user API with a client wired to it
pub struct MockApi {
    pub server: MockServer,
    pub api: UserApi,
}

impl MockApi {
    /// Start a mock API and an authenticated client for it
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let api = UserApi::builder()
            .base_url(&server.uri())
            .token(TEST_TOKEN)
            .build()
            .expect("valid mock client config");
        Self { server, api }
    }

    /// Start a mock API and a client that sends no token
    pub async fn start_unauthenticated() -> Self {
        let server = MockServer::start().await;
        let api = UserApi::builder()
            .base_url(&server.uri())
            .build()
            .expect("valid mock client config");
        Self { server, api }
    }

    /// Stub POST /users to persist `user`
    pub async fn stub_create(&self, user: &User) {
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(user))
            .mount(&self.server)
            .await;
    }

    /// Stub GET /users/{id} to return `user`
    pub async fn stub_get(&self, user: &User) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{}", user.id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.server)
            .await;
    }

    /// Stub PUT /users/{id} to return `user` as the updated state
    pub async fn stub_update(&self, user: &User) {
        Mock::given(method("PUT"))
            .and(path(format!("/users/{}", user.id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.server)
            .await;
    }

    /// Stub DELETE /users/{id} with 204, expected exactly once
    pub async fn stub_delete(&self, id: u64) {
        Mock::given(method("DELETE"))
            .and(path(format!("/users/{}", id)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Stub GET /users to list `users`
    pub async fn stub_list(&self, users: &[User]) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users))
            .mount(&self.server)
            .await;
    }

    /// Stub `http_method` on an id the API does not know
    pub async fn stub_missing(&self, http_method: &str, id: u64) {
        Mock::given(method(http_method))
            .and(path(format!("/users/{}", id)))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Resource not found"})),
            )
            .mount(&self.server)
            .await;
    }

    /// Stub POST /users with a 422 validation failure
    pub async fn stub_create_invalid(&self, errors: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(422).set_body_json(errors))
            .mount(&self.server)
            .await;
    }

    /// Stub every /users request with the API's 401 body
    pub async fn stub_unauthorized(&self) {
        Mock::given(wiremock::matchers::path_regex("^/users"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"message": "Authentication failed"})),
            )
            .mount(&self.server)
            .await;
    }
}
