use crate::helpers::{TestApp, TEST_PASSWORD};

#[actix_web::test]
async fn register_creates_customer_and_allows_login(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "name": "Ana García",
            "email": "  Ana@Example.com ",
            "password": "secret123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["role"], "user");
    assert!(body.get("passwordHash").is_none());

    let login = app.api_client.post(app.url("/auth/login"))
        .json(&serde_json::json!({ "email": "ana@example.com", "password": "secret123" }))
        .send()
        .await
        .unwrap();

    assert_eq!(login.status().as_u16(), 200);
    let body: serde_json::Value = login.json().await.unwrap();
    assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["name"], "Ana García");
}

#[actix_web::test]
async fn register_with_taken_email_is_conflict(){
    let app = TestApp::spawn_app().await;
    app.seed_user("taken@example.com", "user");

    let response = app.api_client.post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "name": "Ana García",
            "email": "taken@example.com",
            "password": "secret123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 409);
}

#[actix_web::test]
async fn register_rejects_invalid_payloads(){
    let app = TestApp::spawn_app().await;
    let cases = [
        (serde_json::json!({ "name": "Ana", "email": "not-an-email", "password": "secret123" }), "bad email"),
        (serde_json::json!({ "name": "A", "email": "a@example.com", "password": "secret123" }), "short name"),
        (serde_json::json!({ "name": "Ana", "email": "a@example.com", "password": "123" }), "short password"),
        (serde_json::json!({ "name": "Ana", "email": "a@example.com" }), "missing password"),
    ];

    for (body, case) in cases {
        let response = app.api_client.post(app.url("/auth/register"))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400, "case: {}", case);
    }
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized(){
    let app = TestApp::spawn_app().await;
    app.seed_user("ana@example.com", "user");

    let response = app.api_client.post(app.url("/auth/login"))
        .json(&serde_json::json!({ "email": "ana@example.com", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn login_with_unknown_email_is_not_found(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.post(app.url("/auth/login"))
        .json(&serde_json::json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn protected_routes_require_a_token(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.get(app.url("/profile/me"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = app.api_client.get(app.url("/profile/me"))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn tokens_are_scoped_to_their_owner_type(){
    let app = TestApp::spawn_app().await;
    let (_, driver_token) = app.driver("driver@example.com").await;
    let (_, customer_token) = app.customer("ana@example.com").await;

    let response = app.api_client.get(app.url("/profile/me"))
        .bearer_auth(&driver_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app.api_client.get(app.url("/admin/dashboard/metrics"))
        .bearer_auth(&customer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}
