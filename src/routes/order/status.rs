use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    auth::extractors::OrderActor,
    db_interaction::orders::{apply_status_change, get_order, StatusChange, UpdateOrderStatusError},
    domain::order_status::{check_transition, OrderStatus},
    error::ApiError,
    routes::MessageResponse,
    utils::{get_pooled_connection, DbPool},
};

#[derive(Deserialize, Debug)]
pub struct UpdateStatusJson{
    pub status: String
}

impl From<UpdateOrderStatusError> for ApiError {
    fn from(e: UpdateOrderStatusError) -> Self {
        match e {
            UpdateOrderStatusError::NoOrderIdError(_) => ApiError::NotFound(e.to_string()),
            UpdateOrderStatusError::StatusChangedError(_) => ApiError::BadRequest(e.to_string()),
            other => ApiError::Unexpected(anyhow::Error::new(other))
        }
    }
}

// Stored statuses are always written through `OrderStatus`, anything else is corrupt data
pub fn stored_status(raw: &str) -> Result<OrderStatus, ApiError> {
    OrderStatus::parse(raw).map_err(|e| ApiError::Unexpected(anyhow::anyhow!(e)))
}

// What gets written alongside the status for a given actor, completion credits the customer
pub fn status_change_for(actor: OrderActor, requested: OrderStatus, customer_id: i32) -> StatusChange {
    let now = Utc::now();
    StatusChange{
        assign_driver: match (actor, requested) {
            (OrderActor::Driver(driver_id), OrderStatus::Delivered) => Some(driver_id),
            _ => None
        },
        delivered_at: (requested == OrderStatus::Delivered).then_some(now),
        completed_at: (requested == OrderStatus::Completed).then_some(now),
        credit_purchase_to: (requested == OrderStatus::Completed).then_some(customer_id)
    }
}

#[tracing::instrument(
    "Updating order status",
    skip(pool, json),
    fields(status = %json.status)
)]
pub async fn update_order_status(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    json: web::Json<UpdateStatusJson>,
    actor: OrderActor
) -> Result<HttpResponse, ApiError> {
    let order_id = path.into_inner();
    let requested = OrderStatus::parse(json.status.trim()).map_err(ApiError::BadRequest)?;

    let order = get_order(get_pooled_connection(&pool).await?, order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {} not found", order_id)))?;

    let current = stored_status(&order.status)?;
    check_transition(current, requested, actor.driver_id(), order.driver_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    apply_status_change(
        get_pooled_connection(&pool).await?,
        order_id,
        current,
        requested,
        status_change_for(actor, requested, order.user_id)
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Status updated successfully")))
}
