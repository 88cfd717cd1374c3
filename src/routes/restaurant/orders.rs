use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::{
    auth::extractors::IsVenue,
    db_interaction::orders::{apply_status_change, get_order, get_order_snapshots, get_restaurant_orders, SnapshotScope, StatusChange},
    domain::{
        order_status::{check_restaurant_transition, DeliveryType, OrderStatus},
        stats::restaurant_stats,
    },
    error::ApiError,
    routes::{stored_status, MessageResponse, OrderResponse, UpdateStatusJson},
    utils::{get_pooled_connection, DbPool},
};

#[tracing::instrument("Listing pickup orders for restaurant", skip(pool))]
pub async fn get_pickup_orders(
    pool: web::Data<DbPool>,
    _venue: IsVenue
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let orders: Vec<OrderResponse> = get_restaurant_orders(conn)
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(orders))
}

#[tracing::instrument("Computing restaurant order stats", skip(pool))]
pub async fn get_pickup_stats(
    pool: web::Data<DbPool>,
    _venue: IsVenue
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let snapshots = get_order_snapshots(conn, SnapshotScope::PickupOrders).await?;

    Ok(HttpResponse::Ok().json(restaurant_stats(&snapshots, Utc::now())))
}

#[tracing::instrument(
    "Updating pickup order status",
    skip(pool, json),
    fields(status = %json.status)
)]
pub async fn update_pickup_status(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    json: web::Json<UpdateStatusJson>,
    _venue: IsVenue
) -> Result<HttpResponse, ApiError> {
    let order_id = path.into_inner();
    let requested = OrderStatus::parse(json.status.trim()).map_err(ApiError::BadRequest)?;

    let order = get_order(get_pooled_connection(&pool).await?, order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {} not found", order_id)))?;

    if order.delivery_type != DeliveryType::Pickup.as_str() {
        return Err(ApiError::BadRequest("Only pickup orders can be managed by the restaurant".into()));
    }

    let current = stored_status(&order.status)?;
    check_restaurant_transition(current, requested).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let completed = requested == OrderStatus::Completed;
    let change = StatusChange{
        completed_at: completed.then(Utc::now),
        credit_purchase_to: completed.then_some(order.user_id),
        ..StatusChange::default()
    };
    apply_status_change(get_pooled_connection(&pool).await?, order_id, current, requested, change).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Order status updated to {}", requested))))
}
