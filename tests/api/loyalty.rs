use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use ecobocado::schema::{loyalty_accounts, loyalty_redemptions};

use crate::helpers::TestApp;

fn set_purchases(app: &TestApp, user_id: i32, count: i32) {
    let mut conn = app.pool.get().unwrap();
    diesel::update(loyalty_accounts::table.filter(loyalty_accounts::user_id.eq(user_id)))
        .set(loyalty_accounts::purchases_count.eq(count))
        .execute(&mut conn)
        .unwrap();
}

#[actix_web::test]
async fn account_is_created_on_first_read(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    app.seed_loyalty_rule(5);

    let response = app.api_client.get(app.url("/loyalty/account"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["userId"], user_id);
    assert_eq!(body["purchasesCount"], 0);
    assert_eq!(body["purchasesUntilReward"], 5);
    assert_eq!(body["hasAvailableReward"], false);
}

#[actix_web::test]
async fn redeeming_resets_the_purchase_counter(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    app.seed_loyalty_rule(3);
    let menu_id = app.seed_rescue_menu("Menú rescate", 4.0);

    app.api_client.get(app.url("/loyalty/account")).bearer_auth(&token).send().await.unwrap();
    set_purchases(&app, user_id, 3);

    let response = app.api_client.post(app.url("/loyalty/redeem"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "rescueMenuId": menu_id }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["rescueMenuId"], menu_id);
    assert_eq!(body["rescueMenuName"], "Menú rescate");

    let account: serde_json::Value = app.api_client.get(app.url("/loyalty/account"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(account["purchasesCount"], 0);
}

#[actix_web::test]
async fn redeeming_early_reports_missing_purchases(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    app.seed_loyalty_rule(5);
    let menu_id = app.seed_rescue_menu("Menú rescate", 4.0);

    app.api_client.get(app.url("/loyalty/account")).bearer_auth(&token).send().await.unwrap();
    set_purchases(&app, user_id, 3);

    let response = app.api_client.post(app.url("/loyalty/redeem"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "rescueMenuId": menu_id }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "You need 2 more purchases to get a reward");
}

#[actix_web::test]
async fn redeeming_without_account_is_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.customer("ana@example.com").await;
    app.seed_loyalty_rule(5);

    let response = app.api_client.post(app.url("/loyalty/redeem"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "rescueMenuId": 1 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn concurrent_redeems_spend_one_reward_once(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    app.seed_loyalty_rule(3);
    let menu_id = app.seed_rescue_menu("Menú rescate", 4.0);

    app.api_client.get(app.url("/loyalty/account")).bearer_auth(&token).send().await.unwrap();
    set_purchases(&app, user_id, 3);

    let body = serde_json::json!({ "rescueMenuId": menu_id });
    let requests = (0..6).map(|_| {
        app.api_client.post(app.url("/loyalty/redeem"))
            .bearer_auth(&token)
            .json(&body)
            .send()
    });
    let mut statuses: Vec<u16> = futures_util::future::join_all(requests)
        .await
        .into_iter()
        .map(|response| response.unwrap().status().as_u16())
        .collect();
    statuses.sort();

    assert_eq!(statuses, vec![201, 400, 400, 400, 400, 400]);

    let mut conn = app.pool.get().unwrap();
    let redemptions: i64 = loyalty_redemptions::table
        .filter(loyalty_redemptions::user_id.eq(user_id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(redemptions, 1);
}

#[actix_web::test]
async fn deactivated_account_is_not_found(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.customer("ana@example.com").await;
    app.seed_loyalty_rule(5);

    app.api_client.get(app.url("/loyalty/account")).bearer_auth(&token).send().await.unwrap();
    let mut conn = app.pool.get().unwrap();
    diesel::update(loyalty_accounts::table.filter(loyalty_accounts::user_id.eq(user_id)))
        .set(loyalty_accounts::is_active.eq(false))
        .execute(&mut conn)
        .unwrap();

    let response = app.api_client.get(app.url("/loyalty/account"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}
