use crate::helpers::{TestApp, TEST_PASSWORD};

async fn confirmed_order(app: &TestApp, token: &str, delivery_type: &str) -> i64 {
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    let order: serde_json::Value = app.post_order(token, &serde_json::json!({
        "deliveryType": delivery_type,
        "addressLine1": "Calle Mayor 1",
        "city": "Madrid",
        "postalCode": "28013",
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 1, "unitPrice": 3.5 }]
    })).await.json().await.unwrap();
    let id = order["id"].as_i64().unwrap();

    app.patch_status(&format!("/orders/{}/status", id), token, "confirmed").await;
    id
}

#[actix_web::test]
async fn venue_login_rejects_wrong_password(){
    let app = TestApp::spawn_app().await;
    app.seed_venue("venue@example.com");

    let ok = app.api_client.post(app.url("/restaurant/auth/login"))
        .json(&serde_json::json!({ "email": "venue@example.com", "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    let body: serde_json::Value = ok.json().await.unwrap();
    assert_eq!(body["venue"]["code"], "centro");

    let wrong = app.api_client.post(app.url("/restaurant/auth/login"))
        .json(&serde_json::json!({ "email": "venue@example.com", "password": "nope-nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status().as_u16(), 401);
}

#[actix_web::test]
async fn venue_moves_pickup_orders_to_completion(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let (_, venue_token) = app.venue("venue@example.com").await;
    let order_id = confirmed_order(&app, &token, "pickup").await;
    let path = format!("/restaurant/orders/{}/status", order_id);

    let listed: Vec<serde_json::Value> = app.api_client.get(app.url("/restaurant/orders"))
        .bearer_auth(&venue_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let skip = app.patch_status(&path, &venue_token, "completed").await;
    assert_eq!(skip.status().as_u16(), 400);

    let prepared = app.patch_status(&path, &venue_token, "prepared").await;
    assert_eq!(prepared.status().as_u16(), 200);
    let body: serde_json::Value = prepared.json().await.unwrap();
    assert_eq!(body["message"], "Order status updated to prepared");

    assert_eq!(app.patch_status(&path, &venue_token, "completed").await.status().as_u16(), 200);

    let stats: serde_json::Value = app.api_client.get(app.url("/restaurant/orders/stats"))
        .bearer_auth(&venue_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["totalCompleted"], 1);
    assert_eq!(stats["todayCompleted"], 1);

    let account: serde_json::Value = app.api_client.get(app.url("/loyalty/account"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(account["purchasesCount"], 1);
}

#[actix_web::test]
async fn venue_can_not_touch_delivery_orders(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let (_, venue_token) = app.venue("venue@example.com").await;
    let order_id = confirmed_order(&app, &token, "delivery").await;

    let response = app.patch_status(&format!("/restaurant/orders/{}/status", order_id), &venue_token, "prepared").await;

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn restaurant_routes_need_a_venue_token(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;

    let response = app.api_client.get(app.url("/restaurant/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
}
