use actix_web::{web, HttpResponse};

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::orders::{get_order_with_items, get_user_orders},
    error::ApiError,
    utils::{get_pooled_connection, DbPool},
};

use super::OrderResponse;

#[tracing::instrument(
    "Getting list of orders",
    skip(pool)
)]
pub async fn get_orders(
    pool: web::Data<DbPool>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;

    let orders: Vec<OrderResponse> = get_user_orders(conn, uid.0)
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(orders))
}

#[tracing::instrument(
    "Getting order by id",
    skip(pool)
)]
pub async fn get_order_by_id(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let order_id = path.into_inner();
    let conn = get_pooled_connection(&pool).await?;

    let details = get_order_with_items(conn, order_id)
        .await?
        .filter(|details| details.order.user_id == uid.0)
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {} not found", order_id)))?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(details)))
}
