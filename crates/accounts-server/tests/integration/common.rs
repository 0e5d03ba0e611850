use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use accounts_core::AuthConfig;
use accounts_db::{Backend, DatabaseConfig};
use accounts_server::routes;
use accounts_server::settings::{ApiConfig, Settings};
use accounts_server::state::AppState;

/// Base64 of `!thequickfoxjumpsoverthelazydog!`.
pub const TEST_SEED: &str = "IXRoZXF1aWNrZm94anVtcHNvdmVydGhlbGF6eWRvZyE";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }
}

fn test_settings(prefix: &str) -> Settings {
    Settings {
        api: ApiConfig {
            protocol: "http".into(),
            base_url: "testing".into(),
            prefix: prefix.into(),
            ..Default::default()
        },
        database: DatabaseConfig {
            backend: Backend::Memory,
            ..Default::default()
        },
        auth: AuthConfig {
            base64_token_seed: TEST_SEED.into(),
            bcrypt_cost: 4,
            token_ttl_secs: 3600,
        },
    }
}

/// In-memory app with every route mounted at the root.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_prefix("").await
}

pub async fn setup_test_app_with_prefix(prefix: &str) -> TestApp {
    let state = Arc::new(
        AppState::from_settings(&test_settings(prefix))
            .await
            .expect("Failed to build app state"),
    );
    TestApp {
        router: routes::app(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn patch_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(
            Request::patch(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Create a user through the API and assert it succeeded.
    pub async fn create_user(&self, username: &str, email: &str, password: &str) -> i32 {
        let response = self
            .post_json(
                "/user",
                serde_json::json!({"username": username, "email": email, "password": password}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.json()["id"].as_i64().unwrap() as i32
    }
}
