// tests/auth_tests.rs

use skillend::config::Config;
use skillend::routes;
use skillend::state::AppState;
use skillend::store::{FileBackend, Store};
use tokio_util::sync::CancellationToken;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. Fresh store file in a temp directory (kept alive for the test run)
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store_path = dir.path().join("store.json");
    std::mem::forget(dir);

    let backend = FileBackend::open(&store_path)
        .await
        .expect("Failed to open test store");
    let store = Store::new(backend);

    // 2. Test configuration: placeholder API pointed at a dead port so no
    //    test ever reaches the real network.
    let config = Config {
        store_path: store_path.to_string_lossy().into_owned(),
        bind_addr: "127.0.0.1:0".to_string(),
        placeholder_api_base: "http://127.0.0.1:9/".parse().unwrap(),
        rust_log: "error".to_string(),
        chat_simulator: false,
    };

    // 3. Create state and seed the demo account
    let state = AppState::new(store, config, CancellationToken::new());
    state
        .sessions
        .seed_demo_user()
        .await
        .expect("Failed to seed demo user");

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn fetch_captcha(client: &reqwest::Client, address: &str) -> String {
    let body: serde_json::Value = client
        .get(format!("{}/api/auth/captcha", address))
        .send()
        .await
        .expect("Failed to fetch captcha")
        .json()
        .await
        .expect("Failed to parse captcha json");
    body["captcha"].as_str().expect("Captcha missing").to_string()
}

#[tokio::test]
async fn demo_login_succeeds_on_fresh_store() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "demo@example.com",
            "password": "demo123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["name"], "Demo User");
    // The password must never appear in a response.
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "demo@example.com",
            "password": "DEMO123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn register_works_and_activates_the_session() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let captcha = fetch_captcha(&client, &address).await;

    // Act
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Test User",
            "email": "test@example.com",
            "password": "password123",
            "captcha_challenge": captcha,
            "captcha_answer": captcha.to_lowercase()
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);

    // The new identity is logged in right away
    let me = client
        .get(format!("{}/api/auth/me", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(me.status().as_u16(), 200);
    let body: serde_json::Value = me.json().await.unwrap();
    assert_eq!(body["email"], "test@example.com");
}

#[tokio::test]
async fn duplicate_email_registration_is_409() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for expected_status in [201, 409] {
        let captcha = fetch_captcha(&client, &address).await;
        let response = client
            .post(format!("{}/api/auth/register", address))
            .json(&serde_json::json!({
                "name": "Twin",
                "email": "twin@example.com",
                "password": "password123",
                "captcha_challenge": captcha,
                "captcha_answer": captcha
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), expected_status);
    }

    // The first registration still works for login, so the store kept
    // exactly one identity for that email.
    let login = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "twin@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(login.status().as_u16(), 200);
}

#[tokio::test]
async fn register_fails_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let captcha = fetch_captcha(&client, &address).await;

    // Act: name too short, password too short, bad email
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "x",
            "email": "not-an-email",
            "password": "123",
            "captcha_challenge": captcha,
            "captcha_answer": captcha
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn captcha_mismatch_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let captcha = fetch_captcha(&client, &address).await;

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Careless",
            "email": "careless@example.com",
            "password": "password123",
            "captcha_challenge": captcha,
            "captcha_answer": "nope99"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);

    // And the account was never created
    let login = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "careless@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(login.status().as_u16(), 401);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "demo@example.com",
            "password": "demo123"
        }))
        .send()
        .await
        .expect("Login failed");

    let response = client
        .post(format!("{}/api/auth/logout", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let me = client
        .get(format!("{}/api/auth/me", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(me.status().as_u16(), 401);

    // Logging out twice is still a success
    let again = client
        .post(format!("{}/api/auth/logout", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(again.status().as_u16(), 200);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for path in [
        "/api/auth/me",
        "/api/assessment/questions",
        "/api/results",
        "/api/chat/messages",
        "/api/billing/plans",
        "/api/admin/assessments",
    ] {
        let response = client
            .get(format!("{}{}", address, path))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 401, "expected 401 for {}", path);
    }
}
