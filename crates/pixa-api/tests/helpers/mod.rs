//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixa-api --test images_test` or
//! `cargo test -p pixa-api`.

pub mod fixtures;

use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use pixa_api::setup::routes;
use pixa_api::state::AppState;
use pixa_core::Config;
use pixa_services::ImageService;
use pixa_storage::{LocalStorage, Storage};
use tempfile::TempDir;

/// Test application: server and the owned storage root.
pub struct TestApp {
    pub server: TestServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_root(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// Setup test app with isolated local storage and the registry disabled.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let config = create_test_config(&temp_dir.path().to_string_lossy());

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let image_service = ImageService::new(&config, storage.clone());

    let state = Arc::new(AppState {
        config: config.clone(),
        image_service,
        storage,
        registry: None,
    });

    let app = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, temp_dir }
}

/// Count regular files under `dir`, recursively.
pub fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += count_files(&path);
            } else {
                count += 1;
            }
        }
    }
    count
}

fn create_test_config(upload_dir: &str) -> Config {
    Config {
        server_port: 8082,
        upload_dir: upload_dir.to_string(),
        max_file_size_bytes: 5 * 1024 * 1024,
        allowed_extensions: vec![
            "jpg".to_string(),
            "jpeg".to_string(),
            "png".to_string(),
            "webp".to_string(),
        ],
        allowed_content_types: vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/webp".to_string(),
        ],
        cors_origins: vec!["*".to_string()],
        app_name: "image-service".to_string(),
        eureka_enabled: false,
        eureka_server: String::new(),
        instance_host: String::new(),
        heartbeat_interval_secs: 30,
    }
}
