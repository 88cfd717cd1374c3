use wiremock::{matchers::{method, path_regex}, Mock, ResponseTemplate};

use crate::helpers::{TestApp, TEST_PASSWORD};

#[actix_web::test]
async fn driver_registers_and_logs_in(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.post(app.url("/delivery/auth/register"))
        .json(&serde_json::json!({
            "email": "Pablo@Example.com",
            "password": "secret123",
            "name": "Pablo Ruiz",
            "phone": "600123456",
            "vehicleType": "motorcycle"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["email"], "pablo@example.com");
    assert_eq!(body["isAvailable"], false);

    let login = app.api_client.post(app.url("/delivery/auth/login"))
        .json(&serde_json::json!({ "email": "pablo@example.com", "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status().as_u16(), 200);
    let body: serde_json::Value = login.json().await.unwrap();
    assert_eq!(body["driver"]["name"], "Pablo Ruiz");
}

#[actix_web::test]
async fn driver_registration_validates_input(){
    let app = TestApp::spawn_app().await;
    app.seed_driver("taken@example.com", true);

    let taken = app.api_client.post(app.url("/delivery/auth/register"))
        .json(&serde_json::json!({
            "email": "taken@example.com",
            "password": "secret123",
            "name": "Pablo Ruiz",
            "phone": "600123456"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(taken.status().as_u16(), 409);

    let bad_vehicle = app.api_client.post(app.url("/delivery/auth/register"))
        .json(&serde_json::json!({
            "email": "new@example.com",
            "password": "secret123",
            "name": "Pablo Ruiz",
            "phone": "600123456",
            "vehicleType": "rocket"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_vehicle.status().as_u16(), 400);
}

#[actix_web::test]
async fn inactive_driver_can_not_log_in(){
    let app = TestApp::spawn_app().await;
    app.seed_driver("inactive@example.com", false);

    let response = app.api_client.post(app.url("/delivery/auth/login"))
        .json(&serde_json::json!({ "email": "inactive@example.com", "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn availability_is_toggled(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.driver("driver@example.com").await;

    let response = app.api_client.patch(app.url("/delivery/profile/availability"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "isAvailable": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let profile: serde_json::Value = app.api_client.get(app.url("/delivery/profile/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["isAvailable"], true);
}

#[actix_web::test]
async fn location_is_upserted_and_validated(){
    let app = TestApp::spawn_app().await;
    let (driver_id, token) = app.driver("driver@example.com").await;
    let path = format!("/delivery/location/{}", driver_id);

    let missing = app.api_client.get(app.url(&path)).bearer_auth(&token).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    for (lat, lng) in [(40.0, -3.0), (41.5, 2.1)] {
        let response = app.api_client.put(app.url("/delivery/location"))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "latitude": lat, "longitude": lng }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let latest: serde_json::Value = app.api_client.get(app.url(&path))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(latest["latitude"], 41.5);
    assert_eq!(latest["longitude"], 2.1);

    let out_of_range = app.api_client.put(app.url("/delivery/location"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "latitude": 91.0, "longitude": 0.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(out_of_range.status().as_u16(), 400);
}

#[actix_web::test]
async fn location_ignores_client_supplied_order(){
    let app = TestApp::spawn_app().await;
    let (driver_id, token) = app.driver("driver@example.com").await;

    let response = app.api_client.put(app.url("/delivery/location"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "latitude": 40.4, "longitude": -3.7, "orderId": 999999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["deliveryUserId"], driver_id);
    assert!(body["orderId"].is_null());
}

#[actix_web::test]
async fn avatar_upload_stores_object_and_saves_url(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.driver("driver@example.com").await;

    Mock::given(method("PUT"))
        .and(path_regex("^/user-avatar/.+"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.storage_api)
        .await;

    let response = app.api_client.post(app.url("/delivery/profile/avatar"))
        .bearer_auth(&token)
        .header("Content-Type", "image/png")
        .body(vec![0u8; 1024])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let url = body["avatarUrl"].as_str().unwrap();
    assert!(url.starts_with(&app.storage_api.uri()));
    assert!(url.ends_with(".png"));
}

#[actix_web::test]
async fn avatar_upload_rejects_bad_files(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.driver("driver@example.com").await;

    let wrong_type = app.api_client.post(app.url("/delivery/profile/avatar"))
        .bearer_auth(&token)
        .header("Content-Type", "application/pdf")
        .body(vec![0u8; 16])
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_type.status().as_u16(), 400);

    let too_large = app.api_client.post(app.url("/delivery/profile/avatar"))
        .bearer_auth(&token)
        .header("Content-Type", "image/jpeg")
        .body(vec![0u8; 5 * 1024 * 1024 + 1])
        .send()
        .await
        .unwrap();
    assert_eq!(too_large.status().as_u16(), 400);
}

#[actix_web::test]
async fn avatar_far_above_limit_is_a_bad_request(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.driver("driver@example.com").await;

    let response = app.api_client.post(app.url("/delivery/profile/avatar"))
        .bearer_auth(&token)
        .header("Content-Type", "image/png")
        .body(vec![0u8; 11 * 1024 * 1024])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], format!("Avatar must be at most {} bytes", 5 * 1024 * 1024));
}
