use std::time::Duration;

use crate::helpers::TestApp;

#[actix_web::test]
async fn dashboard_metrics_count_paid_orders(){
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.admin("admin@example.com").await;
    let (user_id, token) = app.customer("ana@example.com").await;
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    app.seed_payment(user_id, "pi_paid", "succeeded");

    app.post_order(&token, &serde_json::json!({
        "deliveryType": "pickup",
        "paymentIntentId": "pi_paid",
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 2, "unitPrice": 3.5 }]
    })).await;
    app.post_order(&token, &serde_json::json!({
        "deliveryType": "pickup",
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 1, "unitPrice": 3.5 }]
    })).await;

    let metrics: serde_json::Value = app.api_client.get(app.url("/admin/dashboard/metrics"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(metrics["totalOrders"], 2);
    assert_eq!(metrics["totalRevenue"], 7.0);
    assert_eq!(metrics["totalProducts"], 1);
    assert_eq!(metrics["totalUsers"], 2);
}

#[actix_web::test]
async fn recent_orders_and_top_products_respect_limit(){
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.admin("admin@example.com").await;
    let (user_id, token) = app.customer("ana@example.com").await;
    let first = app.seed_product("Bocadillo vegetal", 3.5);
    let second = app.seed_product("Ensalada", 5.0);

    // Only paid orders count towards sales
    for (index, (product_id, quantity)) in [(first, 1), (second, 3), (first, 1)].into_iter().enumerate() {
        let intent = format!("pi_{}", index);
        app.seed_payment(user_id, &intent, "succeeded");
        app.post_order(&token, &serde_json::json!({
            "deliveryType": "pickup",
            "paymentIntentId": intent,
            "items": [{ "itemType": "product", "itemId": product_id, "quantity": quantity, "unitPrice": 1.0 }]
        })).await;
    }

    let recent: Vec<serde_json::Value> = app.api_client.get(app.url("/admin/dashboard/recent-orders?limit=2"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["customerName"], "Lucía Martín");

    let top: Vec<serde_json::Value> = app.api_client.get(app.url("/admin/dashboard/top-products?limit=1"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["nameEs"], "Ensalada");
    assert_eq!(top[0]["totalSold"], 3);
}

#[actix_web::test]
async fn confirmed_orders_get_an_invoice(){
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.admin("admin@example.com").await;
    let (user_id, token) = app.customer("ana@example.com").await;
    let product_id = app.seed_product("Bocadillo vegetal", 3.5);
    app.seed_payment(user_id, "pi_paid", "succeeded");

    let order: serde_json::Value = app.post_order(&token, &serde_json::json!({
        "deliveryType": "pickup",
        "paymentIntentId": "pi_paid",
        "items": [{ "itemType": "product", "itemId": product_id, "quantity": 1, "unitPrice": 3.5 }]
    })).await.json().await.unwrap();

    // Invoices are issued in the background
    let mut records: Vec<serde_json::Value> = Vec::new();
    for _ in 0..50 {
        records = app.api_client.get(app.url("/admin/billing"))
            .bearer_auth(&admin_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if !records.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["orderId"], order["id"]);
    assert!(records[0]["number"].as_str().unwrap().starts_with("INV-"));
    assert_eq!(records[0]["customerEmail"], "ana@example.com");
}

#[actix_web::test]
async fn admin_routes_reject_customers(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;

    for path in ["/admin/billing", "/admin/dashboard/metrics", "/orders/stats/drivers"] {
        let response = app.api_client.get(app.url(path)).bearer_auth(&token).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 403, "path: {}", path);
    }
}
