use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use ecobocado::schema::{loyalty_accounts, orders};

use crate::helpers::TestApp;

async fn pending_order(app: &TestApp, token: &str) -> i64 {
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    let order: serde_json::Value = app.post_order(token, &serde_json::json!({
        "deliveryType": "delivery",
        "addressLine1": "Calle Mayor 1",
        "city": "Madrid",
        "postalCode": "28013",
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 2, "unitPrice": 3.5 }]
    })).await.json().await.unwrap();

    order["id"].as_i64().unwrap()
}

#[actix_web::test]
async fn full_lifecycle_assigns_driver_and_counts_purchase(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    let (driver_id, driver_token) = app.driver("driver@example.com").await;
    let order_id = pending_order(&app, &token).await;
    let path = format!("/orders/{}/status", order_id);

    assert_eq!(app.patch_status(&path, &token, "confirmed").await.status().as_u16(), 200);
    assert_eq!(app.patch_status(&path, &driver_token, "delivered").await.status().as_u16(), 200);

    let response = app.patch_status(&path, &driver_token, "completed").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Status updated successfully");

    let mut conn = app.pool.get().unwrap();
    let (status, assigned, delivered_at, completed_at) = orders::table
        .filter(orders::id.eq(order_id as i32))
        .select((orders::status, orders::driver_id, orders::delivered_at, orders::completed_at))
        .first::<(String, Option<i32>, Option<chrono::DateTime<chrono::Utc>>, Option<chrono::DateTime<chrono::Utc>>)>(&mut conn)
        .unwrap();
    assert_eq!(status, "completed");
    assert_eq!(assigned, Some(driver_id));
    assert!(delivered_at.is_some());
    assert!(completed_at.is_some());

    let purchases: i32 = loyalty_accounts::table
        .filter(loyalty_accounts::user_id.eq(user_id))
        .select(loyalty_accounts::purchases_count)
        .first(&mut conn)
        .unwrap();
    assert_eq!(purchases, 1);
}

#[actix_web::test]
async fn only_the_assigned_driver_can_complete(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let (_, driver_token) = app.driver("driver@example.com").await;
    let (_, other_driver_token) = app.driver("other@example.com").await;
    let order_id = pending_order(&app, &token).await;
    let path = format!("/orders/{}/status", order_id);

    app.patch_status(&path, &token, "confirmed").await;
    app.patch_status(&path, &driver_token, "delivered").await;

    let response = app.patch_status(&path, &other_driver_token, "completed").await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.patch_status(&path, &token, "completed").await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn racing_completions_count_one_purchase(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    let (_, driver_token) = app.driver("driver@example.com").await;
    let order_id = pending_order(&app, &token).await;
    let path = format!("/orders/{}/status", order_id);

    app.patch_status(&path, &token, "confirmed").await;
    app.patch_status(&path, &driver_token, "delivered").await;

    let requests = (0..6).map(|_| app.patch_status(&path, &driver_token, "completed"));
    let mut statuses: Vec<u16> = futures_util::future::join_all(requests)
        .await
        .into_iter()
        .map(|response| response.status().as_u16())
        .collect();
    statuses.sort();

    assert_eq!(statuses, vec![200, 400, 400, 400, 400, 400]);

    let mut conn = app.pool.get().unwrap();
    let purchases: i32 = loyalty_accounts::table
        .filter(loyalty_accounts::user_id.eq(user_id))
        .select(loyalty_accounts::purchases_count)
        .first(&mut conn)
        .unwrap();
    assert_eq!(purchases, 1);
}

#[actix_web::test]
async fn invalid_transitions_are_rejected(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let order_id = pending_order(&app, &token).await;
    let path = format!("/orders/{}/status", order_id);

    let response = app.patch_status(&path, &token, "delivered").await;
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Cannot change status from 'pending_payment' to 'delivered'");

    assert_eq!(app.patch_status(&path, &token, "shipped").await.status().as_u16(), 400);

    assert_eq!(app.patch_status(&path, &token, "cancelled").await.status().as_u16(), 200);
    assert_eq!(app.patch_status(&path, &token, "confirmed").await.status().as_u16(), 400);
}

#[actix_web::test]
async fn unknown_order_status_update_is_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;

    let response = app.patch_status("/orders/999/status", &token, "confirmed").await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn customer_tracks_the_assigned_driver(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let (driver_id, driver_token) = app.driver("driver@example.com").await;
    let order_id = pending_order(&app, &token).await;
    let status_path = format!("/orders/{}/status", order_id);
    let location_path = format!("/orders/{}/location", order_id);

    let response = app.api_client.get(app.url(&location_path)).bearer_auth(&token).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    app.patch_status(&status_path, &token, "confirmed").await;
    app.patch_status(&status_path, &driver_token, "delivered").await;
    app.api_client.put(app.url("/delivery/location"))
        .bearer_auth(&driver_token)
        .json(&serde_json::json!({ "latitude": 40.4168, "longitude": -3.7038, "orderId": order_id }))
        .send()
        .await
        .unwrap();

    let response = app.api_client.get(app.url(&location_path)).bearer_auth(&token).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["deliveryUserId"], driver_id);
    assert_eq!(body["latitude"], 40.4168);
}

#[actix_web::test]
async fn monthly_ranking_marks_the_current_driver(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let (_, driver_token) = app.driver("driver@example.com").await;
    let order_id = pending_order(&app, &token).await;
    let path = format!("/orders/{}/status", order_id);

    app.patch_status(&path, &token, "confirmed").await;
    app.patch_status(&path, &driver_token, "delivered").await;
    app.patch_status(&path, &driver_token, "completed").await;

    let response = app.api_client.get(app.url("/orders/ranking/delivery"))
        .bearer_auth(&driver_token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["userPosition"], 1);
    assert_eq!(body["entries"][0]["monthlyDeliveries"], 1);
    assert_eq!(body["entries"][0]["isCurrentUser"], true);

    let stats: serde_json::Value = app.api_client.get(app.url("/orders/stats/delivery"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["totalCompleted"], 1);
    assert_eq!(stats["totalRevenue"], 7.0);
}
