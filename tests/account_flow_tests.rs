use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use doorman::auth::tokens::TokenIssuer;
use doorman::db::UserStore;
use doorman::router::{DoormanState, doorman_router};

const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

struct TestApp {
    app: Router,
    store: UserStore,
    db_path: PathBuf,
}

impl TestApp {
    fn cleanup(self) {
        let _ = fs::remove_file(&self.db_path);
    }
}

async fn spawn_app(tag: &str) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "doorman-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", db_path.display());
    let store = doorman::db::spawn(&database_url)
        .await
        .expect("failed to open test store");

    let issuer = TokenIssuer::new(TEST_SECRET, 30);
    let state = DoormanState::new(store.clone(), issuer);

    TestApp {
        app: doorman_router(state),
        store,
        db_path,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn get_users(token: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method("GET").uri("/users");
    let builder = match token {
        Some(t) => builder.header(header::AUTHORIZATION, format!("Bearer {t}")),
        None => builder,
    };
    builder
        .body(Body::empty())
        .expect("failed to build request")
}

async fn body_json(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

fn registration_body(name: &str) -> Value {
    json!({
        "userName": name,
        "password": "s3cret-pw",
        "email": format!("{name}@example.com"),
        "isActive": 1
    })
}

async fn register(app: &Router, name: &str) {
    let resp = app
        .clone()
        .oneshot(post_json("/registration", registration_body(name)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn login(app: &Router, name: &str, password: &str) -> Response<Body> {
    app.clone()
        .oneshot(post_json(
            "/login",
            json!({ "userName": name, "password": password }),
        ))
        .await
        .expect("request failed")
}

#[tokio::test]
async fn registration_echoes_the_public_profile_only() {
    let t = spawn_app("register-echo").await;

    let resp = t
        .app
        .clone()
        .oneshot(post_json("/registration", registration_body("alice")))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let raw = std::str::from_utf8(&bytes).expect("response body was not utf-8");
    assert!(
        !raw.contains("$argon2"),
        "credential hash leaked into the response"
    );

    let body: Value = serde_json::from_str(raw).expect("response body was not JSON");
    assert_eq!(
        body,
        json!({ "userName": "alice", "email": "alice@example.com" })
    );

    t.cleanup();
}

#[tokio::test]
async fn registration_stores_a_hash_never_the_password() {
    let t = spawn_app("register-hash").await;
    register(&t.app, "alice").await;

    let row = t
        .store
        .fetch_by_user_name("alice")
        .await
        .expect("store query failed")
        .expect("row missing after registration");
    assert!(row.password_hash.starts_with("$argon2"));
    assert_ne!(row.password_hash, "s3cret-pw");

    t.cleanup();
}

#[tokio::test]
async fn duplicate_registration_conflicts_and_keeps_one_row() {
    let t = spawn_app("register-dup").await;
    register(&t.app, "alice").await;

    let resp = t
        .app
        .clone()
        .oneshot(post_json("/registration", registration_body("alice")))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(
        body["error"]["message"],
        "User already exists with this UserName"
    );

    let count = t
        .store
        .count_by_user_name("alice")
        .await
        .expect("store query failed");
    assert_eq!(count, 1);

    t.cleanup();
}

#[tokio::test]
async fn register_then_login_roundtrip_binds_the_identity() {
    let t = spawn_app("login-roundtrip").await;
    register(&t.app, "alice").await;

    let resp = login(&t.app, "alice", "s3cret-pw").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["userName"], "alice");
    assert_eq!(body["email"], "alice@example.com");

    let token = body["token"].as_str().expect("token missing from response");
    let claims = TokenIssuer::new(TEST_SECRET, 30)
        .verify(token)
        .expect("issued token failed verification");
    assert_eq!(claims.sub, "alice");
    assert_eq!(
        claims.extra.get("email"),
        Some(&Value::String("alice@example.com".to_string()))
    );

    t.cleanup();
}

#[tokio::test]
async fn wrong_password_and_unknown_user_answer_identically() {
    let t = spawn_app("login-indistinct").await;
    register(&t.app, "alice").await;

    let wrong_pw = login(&t.app, "alice", "not-the-password").await;
    let unknown = login(&t.app, "ghost", "whatever").await;
    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let a = to_bytes(wrong_pw.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let b = to_bytes(unknown.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    assert_eq!(a, b, "the two failures must be byte-identical");

    t.cleanup();
}

#[tokio::test]
async fn registration_reports_every_violation_at_once() {
    let t = spawn_app("register-validate").await;

    let resp = t
        .app
        .clone()
        .oneshot(post_json("/registration", json!({})))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .expect("fields missing from validation error")
        .iter()
        .map(|v| v["field"].as_str().expect("field name missing"))
        .collect();
    assert_eq!(fields, ["userName", "password", "email", "isActive"]);

    t.cleanup();
}

#[tokio::test]
async fn malformed_email_is_rejected_with_the_format_message() {
    let t = spawn_app("register-email").await;

    let mut body = registration_body("alice");
    body["email"] = json!("definitely-not-an-email");
    let resp = t
        .app
        .clone()
        .oneshot(post_json("/registration", body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    let fields = body["error"]["fields"]
        .as_array()
        .expect("fields missing from validation error");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["field"], "email");
    assert_eq!(fields[0]["message"], "Invalid email format");

    t.cleanup();
}

#[tokio::test]
async fn login_validation_reports_missing_fields() {
    let t = spawn_app("login-validate").await;

    let resp = t
        .app
        .clone()
        .oneshot(post_json("/login", json!({})))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .expect("fields missing from validation error")
        .iter()
        .map(|v| v["field"].as_str().expect("field name missing"))
        .collect();
    assert_eq!(fields, ["userName", "password"]);

    t.cleanup();
}

#[tokio::test]
async fn users_rejects_missing_bad_and_expired_tokens() {
    let t = spawn_app("users-reject").await;

    // No Authorization header at all.
    let resp = t
        .app
        .clone()
        .oneshot(get_users(None))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Structurally invalid token.
    let resp = t
        .app
        .clone()
        .oneshot(get_users(Some("garbage")))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Valid token with one signature character flipped.
    register(&t.app, "alice").await;
    let body = body_json(login(&t.app, "alice", "s3cret-pw").await).await;
    let token = body["token"].as_str().expect("token missing from response");
    let mut bytes = token.as_bytes().to_vec();
    let last = bytes.len() - 1;
    bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).expect("tampered token was not utf-8");
    let resp = t
        .app
        .clone()
        .oneshot(get_users(Some(tampered.as_str())))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Correctly signed but past its TTL.
    let expired = TokenIssuer::new(TEST_SECRET, 30)
        .mint_at(
            chrono::Utc::now() - chrono::Duration::days(31),
            "alice",
            Default::default(),
        )
        .expect("failed to mint expired token");
    let resp = t
        .app
        .clone()
        .oneshot(get_users(Some(expired.as_str())))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    t.cleanup();
}

#[tokio::test]
async fn users_lists_accounts_without_leaking_hashes() {
    let t = spawn_app("users-list").await;
    register(&t.app, "alice").await;
    register(&t.app, "bob").await;

    let body = body_json(login(&t.app, "alice", "s3cret-pw").await).await;
    let token = body["token"].as_str().expect("token missing from response");

    let resp = t
        .app
        .clone()
        .oneshot(get_users(Some(token)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let raw = std::str::from_utf8(&bytes).expect("response body was not utf-8");
    assert!(
        !raw.contains("$argon2") && !raw.contains("password"),
        "credential material leaked into the listing"
    );

    let users: Value = serde_json::from_str(raw).expect("response body was not JSON");
    let users = users.as_array().expect("listing was not an array");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["userName"], "alice");
    assert_eq!(users[0]["isActive"], 1);
    assert!(users[0]["id"].is_i64());
    assert_eq!(users[1]["userName"], "bob");

    t.cleanup();
}

#[tokio::test]
async fn edit_of_an_unknown_id_is_not_found() {
    let t = spawn_app("edit-missing").await;

    let resp = t
        .app
        .clone()
        .oneshot(put_json("/edit/9999", registration_body("alice")))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "User with ID 9999 not found");

    t.cleanup();
}

#[tokio::test]
async fn edit_rewrites_the_row_and_rehashes_the_password() {
    let t = spawn_app("edit-roundtrip").await;
    register(&t.app, "alice").await;

    let id = t
        .store
        .fetch_by_user_name("alice")
        .await
        .expect("store query failed")
        .expect("row missing after registration")
        .id;

    let resp = t
        .app
        .clone()
        .oneshot(put_json(
            &format!("/edit/{id}"),
            json!({
                "userName": "alice",
                "password": "brand-new-pw",
                "email": "alice@new.example.com",
                "isActive": 0
            }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(
        body["message"],
        format!("User with ID {id} updated successfully")
    );

    let row = t
        .store
        .fetch_by_id(id)
        .await
        .expect("store query failed")
        .expect("row missing after edit");
    assert_eq!(row.email, "alice@new.example.com");
    assert_eq!(row.is_active, 0);

    // The old password no longer works, the new one does.
    assert_eq!(
        login(&t.app, "alice", "s3cret-pw").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login(&t.app, "alice", "brand-new-pw").await.status(),
        StatusCode::OK
    );

    t.cleanup();
}

#[tokio::test]
async fn edit_renaming_onto_a_taken_name_conflicts() {
    let t = spawn_app("edit-rename").await;
    register(&t.app, "alice").await;
    register(&t.app, "bob").await;

    let bob_id = t
        .store
        .fetch_by_user_name("bob")
        .await
        .expect("store query failed")
        .expect("row missing after registration")
        .id;

    let resp = t
        .app
        .clone()
        .oneshot(put_json(
            &format!("/edit/{bob_id}"),
            registration_body("alice"),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    t.cleanup();
}

#[tokio::test]
async fn delete_succeeds_once_then_is_not_found() {
    let t = spawn_app("delete-twice").await;
    register(&t.app, "alice").await;

    let id = t
        .store
        .fetch_by_user_name("alice")
        .await
        .expect("store query failed")
        .expect("row missing after registration")
        .id;

    let delete_req = || {
        Request::builder()
            .method("DELETE")
            .uri(format!("/delete/{id}"))
            .body(Body::empty())
            .expect("failed to build request")
    };

    let resp = t
        .app
        .clone()
        .oneshot(delete_req())
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(
        body["message"],
        format!("User with ID {id} deleted successfully")
    );

    let resp = t
        .app
        .clone()
        .oneshot(delete_req())
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], format!("User with ID {id} not found"));

    t.cleanup();
}

#[tokio::test]
async fn add_user_by_params_inserts_and_conflicts_on_repeat() {
    let t = spawn_app("params-add").await;

    let uri = "/addUserByParamsData?userName=bob&password=pw&email=bob@example.com&isActive=1";
    let resp = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "User bob added successfully");

    let row = t
        .store
        .fetch_by_user_name("bob")
        .await
        .expect("store query failed")
        .expect("row missing after params insert");
    assert!(row.password_hash.starts_with("$argon2"));

    let resp = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    t.cleanup();
}

#[tokio::test]
async fn add_user_by_params_requires_all_fields() {
    let t = spawn_app("params-validate").await;

    let resp = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/addUserByParamsData")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .expect("fields missing from validation error")
        .iter()
        .map(|v| v["field"].as_str().expect("field name missing"))
        .collect();
    assert_eq!(fields, ["userName", "password", "email", "isActive"]);

    t.cleanup();
}
