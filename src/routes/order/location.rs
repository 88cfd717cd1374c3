use actix_web::{web, HttpResponse};

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::{locations::get_location, orders::get_order},
    error::ApiError,
    routes::LocationResponse,
    utils::{get_pooled_connection, DbPool},
};

#[tracing::instrument(
    "Getting driver location of order",
    skip(pool)
)]
pub async fn get_order_location(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let order_id = path.into_inner();

    let order = get_order(get_pooled_connection(&pool).await?, order_id)
        .await?
        .filter(|order| order.user_id == uid.0)
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {} not found", order_id)))?;

    let driver_id = order.driver_id
        .ok_or_else(|| ApiError::NotFound("Order has no delivery driver assigned".into()))?;

    let location = get_location(get_pooled_connection(&pool).await?, driver_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No location reported for this driver".into()))?;

    Ok(HttpResponse::Ok().json(LocationResponse::from(location)))
}
