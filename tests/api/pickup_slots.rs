use chrono::{Duration, Utc};

use crate::helpers::TestApp;

#[actix_web::test]
async fn only_slots_with_room_in_range_are_listed(){
    let app = TestApp::spawn_app().await;
    let venue_id = app.seed_venue("venue@example.com");
    let today = Utc::now().date_naive();
    let open = app.seed_slot(venue_id, today + Duration::days(1), 10, 3);
    app.seed_slot(venue_id, today + Duration::days(2), 5, 5);
    app.seed_slot(venue_id, today + Duration::days(30), 10, 0);

    let slots: Vec<serde_json::Value> = app.api_client.get(app.url("/pickup-slots/available"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["id"], open);
    assert_eq!(slots[0]["availableSpots"], 7);
}

#[actix_web::test]
async fn explicit_range_is_honoured(){
    let app = TestApp::spawn_app().await;
    let venue_id = app.seed_venue("venue@example.com");
    let today = Utc::now().date_naive();
    let later = app.seed_slot(venue_id, today + Duration::days(30), 10, 0);

    let start = (today + Duration::days(29)).format("%Y-%m-%d").to_string();
    let end = (today + Duration::days(31)).format("%Y-%m-%d").to_string();
    let slots: Vec<serde_json::Value> = app.api_client.get(app.url("/pickup-slots/available"))
        .query(&[("startDate", start.as_str()), ("endDate", end.as_str())])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["id"], later);
}

#[actix_web::test]
async fn malformed_dates_are_rejected(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.get(app.url("/pickup-slots/available?startDate=tomorrow"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}
