use chrono::{Duration, Utc};
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use ecobocado::schema::{deliveries, payments, pickup_slots};

use crate::helpers::TestApp;

fn pickup_body(product_id: i32, slot_id: i32) -> serde_json::Value {
    serde_json::json!({
        "deliveryType": "pickup",
        "pickupSlotId": slot_id,
        "items": [
            { "itemType": "product", "itemId": product_id, "quantity": 2, "unitPrice": 3.5 }
        ]
    })
}

#[actix_web::test]
async fn pickup_order_books_a_slot_and_totals_items(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    let venue_id = app.seed_venue("venue@example.com");
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    let menu_id = app.seed_rescue_menu("Menú rescate", 4.0);
    let slot_id = app.seed_slot(venue_id, Utc::now().date_naive() + Duration::days(1), 10, 0);

    let response = app.post_order(&token, &serde_json::json!({
        "deliveryType": "pickup",
        "pickupSlotId": slot_id,
        "items": [
            { "itemType": "product", "itemId": product_id, "quantity": 2, "unitPrice": 3.5 },
            { "itemType": "menu", "itemId": menu_id, "quantity": 1, "unitPrice": 4.0 }
        ]
    })).await;

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["userId"], user_id);
    assert_eq!(body["status"], "pending_payment");
    assert_eq!(body["total"], 11.0);
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let mut conn = app.pool.get().unwrap();
    let booked: i32 = pickup_slots::table
        .filter(pickup_slots::id.eq(slot_id))
        .select(pickup_slots::booked_count)
        .first(&mut conn)
        .unwrap();
    assert_eq!(booked, 1);
}

#[actix_web::test]
async fn full_slot_is_rejected_without_side_effects(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let venue_id = app.seed_venue("venue@example.com");
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    let slot_id = app.seed_slot(venue_id, Utc::now().date_naive() + Duration::days(1), 1, 1);

    let response = app.post_order(&token, &pickup_body(product_id, slot_id)).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Pickup slot is full");

    let orders = app.api_client.get(app.url("/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json::<Vec<serde_json::Value>>()
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[actix_web::test]
async fn last_seat_goes_to_exactly_one_order(){
    let app = TestApp::spawn_app().await;
    let (_, first) = app.customer("ana@example.com").await;
    let (_, second) = app.customer("luis@example.com").await;
    let venue_id = app.seed_venue("venue@example.com");
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    let slot_id = app.seed_slot(venue_id, Utc::now().date_naive() + Duration::days(1), 1, 0);
    let body = pickup_body(product_id, slot_id);

    let (a, b) = futures_util::join!(app.post_order(&first, &body), app.post_order(&second, &body));
    let mut statuses = vec![a.status().as_u16(), b.status().as_u16()];
    statuses.sort();

    assert_eq!(statuses, vec![201, 400]);
}

#[actix_web::test]
async fn unknown_slot_is_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);

    let response = app.post_order(&token, &pickup_body(product_id, 4242)).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn pickup_window_creates_slot_for_default_venue(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    app.seed_venue("venue@example.com");
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    let date = (Utc::now().date_naive() + Duration::days(2)).format("%Y-%m-%d").to_string();
    let body = serde_json::json!({
        "deliveryType": "pickup",
        "pickupDate": date,
        "pickupStartTime": "13:00:00",
        "pickupEndTime": "13:30:00",
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 1, "unitPrice": 3.5 }]
    });

    let first: serde_json::Value = app.post_order(&token, &body).await.json().await.unwrap();
    let second: serde_json::Value = app.post_order(&token, &body).await.json().await.unwrap();

    assert!(first["pickupSlotId"].is_i64());
    assert_eq!(first["pickupSlotId"], second["pickupSlotId"]);

    let mut conn = app.pool.get().unwrap();
    let (capacity, booked): (i32, i32) = pickup_slots::table
        .select((pickup_slots::capacity, pickup_slots::booked_count))
        .first(&mut conn)
        .unwrap();
    assert_eq!(capacity, 100);
    assert_eq!(booked, 2);
}

#[actix_web::test]
async fn paid_order_is_confirmed_and_links_payment(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    let venue_id = app.seed_venue("venue@example.com");
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    let slot_id = app.seed_slot(venue_id, Utc::now().date_naive() + Duration::days(1), 10, 0);
    app.seed_payment(user_id, "pi_paid", "succeeded");

    let mut body = pickup_body(product_id, slot_id);
    body["paymentIntentId"] = serde_json::json!("pi_paid");
    let response = app.post_order(&token, &body).await;

    assert_eq!(response.status().as_u16(), 201);
    let order: serde_json::Value = response.json().await.unwrap();
    assert_eq!(order["status"], "confirmed");

    let mut conn = app.pool.get().unwrap();
    let linked: Option<i32> = payments::table
        .filter(payments::stripe_payment_intent_id.eq("pi_paid"))
        .select(payments::order_id)
        .first(&mut conn)
        .unwrap();
    assert_eq!(linked, order["id"].as_i64().map(|id| id as i32));
}

#[actix_web::test]
async fn payment_checks_reject_the_order(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    let other_id = app.seed_user("luis@example.com", "user");
    let venue_id = app.seed_venue("venue@example.com");
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    let slot_id = app.seed_slot(venue_id, Utc::now().date_naive() + Duration::days(1), 10, 0);
    app.seed_payment(user_id, "pi_pending", "pending");
    app.seed_payment(other_id, "pi_foreign", "succeeded");

    let cases = [
        ("pi_missing", "Payment intent not found"),
        ("pi_pending", "Payment is not completed. Current status: pending"),
        ("pi_foreign", "Payment does not belong to this user"),
    ];

    for (intent, message) in cases {
        let mut body = pickup_body(product_id, slot_id);
        body["paymentIntentId"] = serde_json::json!(intent);
        let response = app.post_order(&token, &body).await;

        assert_eq!(response.status().as_u16(), 400, "intent: {}", intent);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], message);
    }

    let mut conn = app.pool.get().unwrap();
    let booked: i32 = pickup_slots::table
        .filter(pickup_slots::id.eq(slot_id))
        .select(pickup_slots::booked_count)
        .first(&mut conn)
        .unwrap();
    assert_eq!(booked, 0);
}

#[actix_web::test]
async fn delivery_order_copies_inline_address(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);

    let response = app.post_order(&token, &serde_json::json!({
        "deliveryType": "delivery",
        "addressLine1": "Calle Mayor 1",
        "city": "Madrid",
        "postalCode": "28013",
        "deliveryPhone": "600111222",
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 1, "unitPrice": 3.5 }]
    })).await;

    assert_eq!(response.status().as_u16(), 201);
    let order: serde_json::Value = response.json().await.unwrap();
    assert_eq!(order["delivery"]["city"], "Madrid");
    assert_eq!(order["pickupSlotId"], serde_json::Value::Null);

    let mut conn = app.pool.get().unwrap();
    let country: String = deliveries::table
        .select(deliveries::country)
        .first(&mut conn)
        .unwrap();
    assert_eq!(country, "España");
}

#[actix_web::test]
async fn delivery_to_foreign_address_is_rejected(){
    let app = TestApp::spawn_app().await;
    let (_, owner_token) = app.customer("ana@example.com").await;
    let (_, token) = app.customer("luis@example.com").await;
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);

    let address: serde_json::Value = app.api_client.post(app.url("/profile/addresses"))
        .bearer_auth(&owner_token)
        .json(&serde_json::json!({
            "label": "Casa",
            "addressLine1": "Calle Mayor 1",
            "city": "Madrid",
            "postalCode": "28013"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = app.post_order(&token, &serde_json::json!({
        "deliveryType": "delivery",
        "userAddressId": address["id"],
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 1, "unitPrice": 3.5 }]
    })).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn orders_are_only_visible_to_their_owner(){
    let app = TestApp::spawn_app().await;
    let (_, owner_token) = app.customer("ana@example.com").await;
    let (_, other_token) = app.customer("luis@example.com").await;
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);

    let order: serde_json::Value = app.post_order(&owner_token, &serde_json::json!({
        "deliveryType": "pickup",
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 1, "unitPrice": 3.5 }]
    })).await.json().await.unwrap();
    let path = format!("/orders/{}", order["id"]);

    let own = app.api_client.get(app.url(&path)).bearer_auth(&owner_token).send().await.unwrap();
    assert_eq!(own.status().as_u16(), 200);

    let foreign = app.api_client.get(app.url(&path)).bearer_auth(&other_token).send().await.unwrap();
    assert_eq!(foreign.status().as_u16(), 404);

    let listed: Vec<serde_json::Value> = app.api_client.get(app.url("/orders"))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[actix_web::test]
async fn unknown_items_and_bad_payloads_are_rejected(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;

    let unknown = app.post_order(&token, &serde_json::json!({
        "deliveryType": "pickup",
        "items": [{ "itemType": "product", "itemId": 999, "quantity": 1, "unitPrice": 3.5 }]
    })).await;
    assert_eq!(unknown.status().as_u16(), 400);

    let bad_type = app.post_order(&token, &serde_json::json!({
        "deliveryType": "pickup",
        "items": [{ "itemType": "drink", "itemId": 1, "quantity": 1, "unitPrice": 3.5 }]
    })).await;
    assert_eq!(bad_type.status().as_u16(), 400);
}
