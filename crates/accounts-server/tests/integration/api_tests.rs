use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::integration::common::{setup_test_app, setup_test_app_with_prefix};

#[tokio::test]
async fn ping_returns_pong() {
    let app = setup_test_app().await;

    let response = app.get("/ping").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(&response.body[..], b"Pong!");
}

#[tokio::test]
async fn create_user_returns_201_with_location() {
    let app = setup_test_app().await;

    let response = app
        .post_json(
            "/user",
            json!({"username": "diego", "email": "diego@mail.com", "password": "d1360@m41l.c0m"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.json(),
        json!({"id": 0, "username": "diego", "email": "diego@mail.com"})
    );
    assert_eq!(
        response.headers.get("location").unwrap(),
        "http://testing/user/0"
    );
}

#[tokio::test]
async fn list_users_in_creation_order_without_secrets() {
    let app = setup_test_app().await;
    app.create_user("diego", "diego@mail.com", "password1").await;
    app.create_user("alex", "alex@mail.com", "password2").await;
    app.create_user("R2D2", "r2d2@mail.com", "password3").await;

    let response = app.get("/users").await;

    assert_eq!(response.status, StatusCode::OK);
    let users = response.json();
    let users = users.as_array().unwrap();
    let names: Vec<&str> = users
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["diego", "alex", "R2D2"]);
    assert_eq!(users[2]["id"], 2);

    for user in users {
        let keys: Vec<&String> = user.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3, "unexpected fields in {user}");
        assert!(user.get("hash").is_none());
        assert!(user.get("password").is_none());
    }
}

#[tokio::test]
async fn list_users_empty() {
    let app = setup_test_app().await;

    let response = app.get("/users").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn get_user_by_id() {
    let app = setup_test_app().await;
    let id = app.create_user("diego", "diego@mail.com", "password1").await;

    let response = app.get(&format!("/user/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"id": id, "username": "diego", "email": "diego@mail.com"})
    );
}

#[tokio::test]
async fn get_missing_user_returns_bodyless_404() {
    let app = setup_test_app().await;

    let response = app.get("/user/7").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn non_integer_id_returns_400() {
    let app = setup_test_app().await;

    let response = app.get("/user/abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({"error": "The user ID in the path should be an integer, not 'abc'"})
    );

    let response = app.delete("/user/1.5").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "The user ID in the path should be an integer, not '1.5'"
    );

    let response = app
        .patch_json("/user/xyz", json!({"username": "dieguito"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Beyond i32 range.
    let response = app.get("/user/99999999999").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_returns_409() {
    let app = setup_test_app().await;
    app.create_user("diego", "diego@mail.com", "password1").await;

    let response = app
        .post_json(
            "/user",
            json!({"username": "alex", "email": "diego@mail.com", "password": "password2"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json(), json!({"error": "Email address already exist"}));

    let users = app.get("/users").await.json();
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_create_bodies_return_400() {
    let app = setup_test_app().await;

    for body in [
        json!({"username": "diego", "email": "diego@mail.com", "password": "short"}),
        json!({"username": "diego", "email": "not-an-email", "password": "password1"}),
        json!({"username": "di", "email": "diego@mail.com", "password": "password1"}),
        json!({"username": "die go", "email": "diego@mail.com", "password": "password1"}),
        json!({"username": "diego", "email": "diego@mail.com", "password": "p".repeat(73)}),
        json!({"username": "diego", "email": "diego@mail.com"}),
    ] {
        let response = app.post_json("/user", body.clone()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "accepted {body}");
        assert!(response.json()["error"].is_string());
    }

    let response = app
        .send(
            Request::post("/user")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.get("/users").await.json(), json!([]));
}

#[tokio::test]
async fn delete_user_twice() {
    let app = setup_test_app().await;
    let id = app.create_user("diego", "diego@mail.com", "password1").await;

    let response = app.delete(&format!("/user/{id}")).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());

    let response = app.delete(&format!("/user/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.is_empty());

    assert_eq!(app.get(&format!("/user/{id}")).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_username() {
    let app = setup_test_app().await;
    let id = app.create_user("diego", "diego@mail.com", "password1").await;

    let response = app
        .patch_json(&format!("/user/{id}"), json!({"username": "dieguito"}))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let user = app.get(&format!("/user/{id}")).await.json();
    assert_eq!(user["username"], "dieguito");
    assert_eq!(user["email"], "diego@mail.com");
}

#[tokio::test]
async fn patch_with_invalid_username_returns_400() {
    let app = setup_test_app().await;
    let id = app.create_user("diego", "diego@mail.com", "password1").await;

    let response = app
        .patch_json(&format!("/user/{id}"), json!({"username": "no spaces!"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let user = app.get(&format!("/user/{id}")).await.json();
    assert_eq!(user["username"], "diego");
}

#[tokio::test]
async fn patch_missing_user_returns_404() {
    let app = setup_test_app().await;

    let response = app
        .patch_json("/user/3", json!({"username": "dieguito"}))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn auth_issues_token_for_valid_credentials() {
    let app = setup_test_app().await;
    app.create_user("diego", "diego@mail.com", "password1").await;

    let response = app
        .post_json(
            "/auth",
            json!({"email": "diego@mail.com", "password": "password1"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let token = response.json()["token"].as_str().unwrap().to_string();
    assert!(app.state.service.verify_token(&token));

    let claims = app.state.service.authenticator().claims(&token).unwrap();
    assert_eq!(claims.id, 0);
    assert_eq!(claims.email, "diego@mail.com");
}

#[tokio::test]
async fn auth_rejects_bad_credentials() {
    let app = setup_test_app().await;
    app.create_user("diego", "diego@mail.com", "password1").await;

    for body in [
        json!({"email": "diego@mail.com", "password": "password2"}),
        json!({"email": "nobody@mail.com", "password": "password1"}),
    ] {
        let response = app.post_json("/auth", body).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.json(), json!({"error": "Invalid email or password"}));
    }

    let response = app
        .post_json("/auth", json!({"email": "diego@mail.com"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn prefixed_routes_build_prefixed_location() {
    let app = setup_test_app_with_prefix("/api/v1").await;

    let response = app
        .post_json(
            "/api/v1/user",
            json!({"username": "diego", "email": "diego@mail.com", "password": "password1"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.headers.get("location").unwrap(),
        "http://testing/api/v1/user/0"
    );
    assert_eq!(app.get("/api/v1/ping").await.status, StatusCode::OK);
    assert_eq!(app.get("/ping").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_lists_user_routes() {
    let app = setup_test_app().await;

    let response = app.get("/api/openapi.json").await;

    assert_eq!(response.status, StatusCode::OK);
    let doc = response.json();
    assert!(doc["paths"]["/user/{id}"].is_object());
    assert!(doc["paths"]["/users"].is_object());
    assert!(doc["paths"]["/auth"].is_object());
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let app = setup_test_app().await;

    let response = app
        .send(
            Request::options("/user/0")
                .header("origin", "http://example.com")
                .header("access-control-request-method", "PATCH")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get("access-control-allow-origin").unwrap(),
        "*"
    );
    let methods = response
        .headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    for method in ["GET", "POST", "PATCH", "DELETE"] {
        assert!(methods.contains(method), "{method} missing from {methods}");
    }
}

#[tokio::test]
async fn cross_origin_requests_get_allow_origin() {
    let app = setup_test_app().await;

    let response = app
        .send(
            Request::get("/users")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get("access-control-allow-origin").unwrap(),
        "*"
    );
}
