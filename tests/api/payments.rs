use wiremock::{matchers::{body_string_contains, header, method, path}, Mock, ResponseTemplate};

use crate::helpers::TestApp;

fn intent_json(status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "pi_123",
        "client_secret": "pi_123_secret_abc",
        "amount": 1250,
        "currency": "eur",
        "status": status,
        "payment_method": "pm_card_visa"
    })
}

#[actix_web::test]
async fn create_intent_records_pending_payment(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(header("Authorization", "Bearer sk_test_placeholder"))
        .and(body_string_contains(format!("metadata%5BuserId%5D={}", user_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(intent_json("requires_payment_method")))
        .expect(1)
        .mount(&app.payment_api)
        .await;

    let response = app.api_client.post(app.url("/payments/create-intent"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "amount": 1250 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["paymentIntentId"], "pi_123");
    assert_eq!(body["clientSecret"], "pi_123_secret_abc");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["currency"], "EUR");
}

#[actix_web::test]
async fn small_amounts_never_reach_the_gateway(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(intent_json("requires_payment_method")))
        .expect(0)
        .mount(&app.payment_api)
        .await;

    let response = app.api_client.post(app.url("/payments/create-intent"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "amount": 49 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn gateway_failure_is_a_bad_request(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&app.payment_api)
        .await;

    let response = app.api_client.post(app.url("/payments/create-intent"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "amount": 1250 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Failed to create payment intent");
}

#[actix_web::test]
async fn status_lookup_syncs_gateway_state(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    app.seed_payment(user_id, "pi_123", "pending");

    Mock::given(method("GET"))
        .and(path("/v1/payment_intents/pi_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(intent_json("succeeded")))
        .expect(1)
        .mount(&app.payment_api)
        .await;

    let response = app.api_client.get(app.url("/payments/status/pi_123"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "succeeded");
    assert_eq!(body["paymentMethod"], "pm_card_visa");
}

#[actix_web::test]
async fn unknown_payment_is_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;

    let response = app.api_client.get(app.url("/payments/status/pi_unknown"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}
