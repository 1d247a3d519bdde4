//! Common test utilities for gym admin API integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum_test::TestServer;
use gym_admin_api::seed::demo_repositories;
use gym_admin_api::state::Repositories;
use gym_admin_api::{create_router, AppState, Settings, SharedState};
use tempfile::TempDir;

pub const ADMIN_IDENTIFIER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Shared state, for inspecting collections directly.
    pub state: SharedState,
    /// Upload directory (kept alive for test duration).
    pub uploads: TempDir,
}

pub fn test_settings(uploads: &TempDir, auth_required: bool) -> Settings {
    let mut settings = Settings::default();
    settings.auth.bcrypt_cost = 4;
    settings.auth.required = auth_required;
    settings.auth.admin_identifier = ADMIN_IDENTIFIER.to_string();
    settings.auth.admin_password = ADMIN_PASSWORD.to_string();
    settings.storage.upload_dir = uploads.path().to_path_buf();
    settings.storage.seed_data = false;
    settings
}

impl TestHarness {
    fn build(repos: Repositories, auth_required: bool) -> Self {
        let uploads = TempDir::new().expect("Failed to create temp directory");
        let state = Arc::new(
            AppState::new(test_settings(&uploads, auth_required), repos)
                .expect("Failed to build state"),
        );
        let server = TestServer::new(create_router(state.clone())).expect("Failed to create test server");

        Self {
            server,
            state,
            uploads,
        }
    }

    /// Fresh, empty collections.
    pub fn new() -> Self {
        Self::build(Repositories::in_memory(), false)
    }

    /// Collections pre-filled with the demo data set.
    pub fn seeded() -> Self {
        Self::build(demo_repositories(), false)
    }

    /// Demo data with bearer tokens enforced on admin routes.
    pub fn secured() -> Self {
        Self::build(demo_repositories(), true)
    }

    /// Log in as the configured admin and return the access token.
    pub async fn login(&self) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&serde_json::json!({
                "username": ADMIN_IDENTIFIER,
                "password": ADMIN_PASSWORD,
            }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["data"]["access_token"]
            .as_str()
            .expect("login returned no token")
            .to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
