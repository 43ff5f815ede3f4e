use std::{collections::HashMap, env, net::SocketAddr, path::PathBuf};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use recipe_api::{config::Settings, routes, test_utils::test_helpers, AppState};
use serial_test::serial;
use tower::ServiceExt;

const KEYS: &[&str] = &[
    "DATABASE_URL",
    "BIND_ADDRESS",
    "MEDIA_ROOT",
    "MEDIA_URL",
    "MAX_UPLOAD_BYTES",
    "CORS_PERMISSIVE",
];

#[derive(Default)]
struct EnvGuard {
    original: HashMap<String, Option<String>>,
}

impl EnvGuard {
    /// Starts from a clean slate for every settings variable.
    fn clean() -> Self {
        let mut guard = EnvGuard::default();
        for key in KEYS {
            guard.remove(key);
        }
        guard
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::set_var(key, value.into());
    }

    fn remove(&mut self, key: &str) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.original.drain() {
            match value {
                Some(v) => env::set_var(&key, v),
                None => env::remove_var(&key),
            }
        }
    }
}

#[test]
#[serial]
fn defaults_apply_without_environment() {
    let _guard = EnvGuard::clean();

    let settings = Settings::from_env();

    assert_eq!(settings.database_url, "sqlite://data/recipe.db");
    assert_eq!(settings.bind_address, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
    assert_eq!(settings.media_root, PathBuf::from("media"));
    assert_eq!(settings.media_url, "/media");
    assert_eq!(settings.max_upload_bytes, 10 * 1024 * 1024);
    assert!(!settings.cors_permissive);
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    let mut guard = EnvGuard::clean();
    guard.set("DATABASE_URL", "sqlite::memory:");
    guard.set("BIND_ADDRESS", "127.0.0.1:9000");
    guard.set("MEDIA_ROOT", "/var/lib/recipes");
    guard.set("MEDIA_URL", "static/");
    guard.set("MAX_UPLOAD_BYTES", "2048");
    guard.set("CORS_PERMISSIVE", "true");

    let settings = Settings::from_env();

    assert_eq!(settings.database_url, "sqlite::memory:");
    assert_eq!(settings.bind_address, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    assert_eq!(settings.media_root, PathBuf::from("/var/lib/recipes"));
    assert_eq!(settings.media_url, "/static");
    assert_eq!(settings.max_upload_bytes, 2048);
    assert!(settings.cors_permissive);
}

#[test]
#[serial]
fn invalid_values_fall_back_to_defaults() {
    let mut guard = EnvGuard::clean();
    guard.set("BIND_ADDRESS", "not-an-address");
    guard.set("MAX_UPLOAD_BYTES", "lots");
    guard.set("CORS_PERMISSIVE", "maybe");

    let settings = Settings::from_env();

    assert_eq!(settings.bind_address, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
    assert_eq!(settings.max_upload_bytes, 10 * 1024 * 1024);
    assert!(!settings.cors_permissive);
}

#[test]
#[serial]
fn root_media_url_falls_back_to_default() {
    let mut guard = EnvGuard::clean();
    guard.set("MEDIA_URL", "/");

    let settings = Settings::from_env();

    assert_eq!(settings.media_url, "/media");
}

#[tokio::test]
#[serial]
async fn router_builds_when_media_url_is_site_root() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let settings = Settings {
        media_url: "/".to_string(),
        ..Settings::default()
    };
    let app = routes::create_router(AppState::new(pool, settings));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request to build"),
        )
        .await
        .expect("router to respond");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn health_endpoint_and_permissive_cors() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let settings = Settings {
        cors_permissive: true,
        ..Settings::default()
    };
    let app = routes::create_router(AppState::new(pool, settings));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://frontend.example.com")
                .body(Body::empty())
                .expect("request to build"),
        )
        .await
        .expect("router to respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
