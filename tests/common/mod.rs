#![allow(dead_code)]

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};

use todo_api_rust::app::{app, AppState};
use todo_api_rust::auth::password::{Argon2PasswordHasher, PasswordHasher};
use todo_api_rust::config::config;
use todo_api_rust::database::models::Account;
use todo_api_rust::security::Role;

pub const ADMIN: (&str, &str) = ("admin", "admin-password");
pub const ALICE: (&str, &str) = ("alice", "alice-password");
pub const BOB: (&str, &str) = ("bob", "bob-password");

static SEED: OnceLock<Vec<Account>> = OnceLock::new();

/// Hashing is the slow part of startup, so hashes are computed once per test binary
fn seed_accounts() -> Vec<Account> {
    SEED.get_or_init(|| {
        let hasher = Argon2PasswordHasher::new();
        [(ADMIN, Role::Admin), (ALICE, Role::User), (BOB, Role::User)]
            .into_iter()
            .map(|((login, password), role)| Account {
                login: login.to_string(),
                password_hash: hasher.hash(password).expect("hash seed password"),
                role,
            })
            .collect()
    })
    .clone()
}

/// A router over fresh in-memory stores, served on an ephemeral port
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let config = config();
        let state = AppState::in_memory(seed_accounts(), config);
        let router = app(state, config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind ephemeral port")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: format!("http://{}", addr),
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /auth/login and return the raw response
    pub async fn login_response(&self, login: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "login": login, "password": password }))
            .send()
            .await?)
    }

    /// Logs in and returns the bearer token
    pub async fn token(&self, (login, password): (&str, &str)) -> Result<String> {
        let res = self.login_response(login, password).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login for {} failed: {}", login, res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token)
    }

    pub fn put(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(token)
    }

    pub fn patch(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.patch(self.url(path)).bearer_auth(token)
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }

    /// Creates a todo and returns its id
    pub async fn create_todo(&self, token: &str, todo: Value) -> Result<i64> {
        let res = self.post("/api/todos", token).json(&todo).send().await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["id"].as_i64().context("create response has no id")
    }
}

/// Names of the todos in a page response, in order
pub fn names(page: &Value) -> Vec<String> {
    page["data"]["content"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
