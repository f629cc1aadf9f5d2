//! API integration tests against a running server.
//!
//! They expect an admin account configured through `EMS_BOOTSTRAP__ADMIN_EMAIL`
//! and `EMS_BOOTSTRAP__ADMIN_PASSWORD` (defaults below).

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3001/api";

fn admin_credentials() -> (String, String) {
    (
        std::env::var("EMS_BOOTSTRAP__ADMIN_EMAIL").unwrap_or_else(|_| "admin@ems.local".into()),
        std::env::var("EMS_BOOTSTRAP__ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
    )
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success(), "login failed for {}", email);

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    login(client, &email, &password).await
}

/// Create a user with the given role and return its token
async fn user_token(client: &Client, admin: &str, role: &str) -> String {
    let email = format!("{}@example.com", unique(role));
    let response = client
        .post(format!("{}/users", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "name": format!("Test {}", role),
            "email": email,
            "password": "secret123",
            "role": role
        }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), StatusCode::CREATED);
    login(client, &email, "secret123").await
}

async fn equipment_count(client: &Client, token: &str, name: &str) -> usize {
    let list: Value = client
        .get(format!("{}/equipment", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to list equipment")
        .json()
        .await
        .expect("Failed to parse equipment list");
    list.as_array()
        .expect("array")
        .iter()
        .filter(|e| e["name"] == name)
        .count()
}

async fn new_equipment_request(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "is_new_equipment": true,
            "new_equipment_name": name,
            "new_equipment_description": "Requested in tests",
            "subject": "Need new equipment",
            "priority": "High"
        }))
        .send()
        .await
        .expect("Failed to create request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse request");
    assert_eq!(body["status"], "Pending");
    body["id"].as_i64().expect("request id")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();
    let (email, password) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().get("set-cookie").is_some());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_wrong_password() {
    let client = Client::new();
    let (email, _) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "definitely-wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_approval_creates_exactly_one_equipment() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let engineer = user_token(&client, &admin, "engineer").await;
    let manager = user_token(&client, &admin, "manager").await;

    let name = unique("Spectrometer");
    let id = new_equipment_request(&client, &engineer, &name).await;

    let response = client
        .patch(format!("{}/requests/{}", BASE_URL, id))
        .bearer_auth(&manager)
        .json(&json!({ "status": "Approved" }))
        .send()
        .await
        .expect("Failed to approve");
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.expect("Failed to parse outcome");
    assert_eq!(outcome["request"]["status"], "Approved");
    assert_eq!(outcome["equipment"]["name"], name.as_str());
    assert_eq!(outcome["request"]["equipment_id"], outcome["equipment"]["id"]);

    // A second decision is refused and creates nothing
    let response = client
        .patch(format!("{}/requests/{}", BASE_URL, id))
        .bearer_auth(&manager)
        .json(&json!({ "status": "Approved" }))
        .send()
        .await
        .expect("Failed to re-approve");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .patch(format!("{}/requests/{}", BASE_URL, id))
        .bearer_auth(&manager)
        .json(&json!({ "status": "Rejected" }))
        .send()
        .await
        .expect("Failed to reject");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    assert_eq!(equipment_count(&client, &admin, &name).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_rejection_creates_no_equipment() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let engineer = user_token(&client, &admin, "engineer").await;

    let name = unique("Centrifuge");
    let id = new_equipment_request(&client, &engineer, &name).await;

    let response = client
        .patch(format!("{}/requests/{}", BASE_URL, id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "Rejected" }))
        .send()
        .await
        .expect("Failed to reject");
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.expect("Failed to parse outcome");
    assert_eq!(outcome["request"]["status"], "Rejected");
    assert!(outcome["equipment"].is_null());

    assert_eq!(equipment_count(&client, &admin, &name).await, 0);
}

#[tokio::test]
#[ignore]
async fn test_failed_approval_rolls_back() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let engineer = user_token(&client, &admin, "engineer").await;
    let manager = user_token(&client, &admin, "manager").await;

    let name = unique("Autoclave");
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create equipment");
    assert_eq!(response.status(), StatusCode::CREATED);

    // The proposed name is already taken, so the equipment insert fails
    let id = new_equipment_request(&client, &engineer, &name).await;
    let response = client
        .patch(format!("{}/requests/{}", BASE_URL, id))
        .bearer_auth(&manager)
        .json(&json!({ "status": "Approved" }))
        .send()
        .await
        .expect("Failed to approve");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Duplicate");

    let request: Value = client
        .get(format!("{}/requests/{}", BASE_URL, id))
        .bearer_auth(&manager)
        .send()
        .await
        .expect("Failed to fetch request")
        .json()
        .await
        .expect("Failed to parse request");
    assert_eq!(request["status"], "Pending");
    assert!(request["equipment_id"].is_null());
    assert!(request["approved_by"].is_null());

    assert_eq!(equipment_count(&client, &admin, &name).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_engineer_reads_equipment() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let engineer = user_token(&client, &admin, "engineer").await;

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .bearer_auth(&engineer)
        .send()
        .await
        .expect("Failed to list equipment");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse equipment list");
    assert!(body.is_array());

    let response = client
        .get(format!("{}/equipment/stats", BASE_URL))
        .bearer_auth(&engineer)
        .send()
        .await
        .expect("Failed to fetch stats");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_partial_update_keeps_other_fields() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let name = unique("Microscope");

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "name": name, "description": "Optical", "location": "Lab 1" }))
        .send()
        .await
        .expect("Failed to create equipment");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.expect("Failed to parse equipment");
    assert_eq!(created["status"], "Operational");

    let response = client
        .put(format!("{}/equipment/{}", BASE_URL, created["id"]))
        .bearer_auth(&admin)
        .json(&json!({ "status": "Maintenance" }))
        .send()
        .await
        .expect("Failed to update equipment");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.expect("Failed to parse equipment");
    assert_eq!(updated["status"], "Maintenance");
    assert_eq!(updated["description"], "Optical");
    assert_eq!(updated["location"], "Lab 1");

    // Duplicate names are refused
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send duplicate");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_engineer_is_forbidden_from_admin_routes() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let engineer = user_token(&client, &admin, "engineer").await;

    let response = client
        .get(format!("{}/users", BASE_URL))
        .bearer_auth(&engineer)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(&engineer)
        .json(&json!({ "name": unique("Forbidden") }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
