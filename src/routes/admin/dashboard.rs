use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    auth::extractors::IsAdmin,
    db_interaction::admin::{get_dashboard_metrics, get_recent_orders, get_top_products},
    error::ApiError,
    utils::{get_pooled_connection, DbPool},
};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Deserialize, Debug)]
pub struct LimitQuery{
    pub limit: Option<i64>
}

impl LimitQuery {
    pub fn clamped(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

#[tracing::instrument("Computing admin dashboard metrics", skip(pool))]
pub async fn get_metrics(
    pool: web::Data<DbPool>,
    _admin: IsAdmin
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    Ok(HttpResponse::Ok().json(get_dashboard_metrics(conn).await?))
}

#[tracing::instrument("Listing recent orders for admin", skip(pool))]
pub async fn get_admin_recent_orders(
    pool: web::Data<DbPool>,
    query: web::Query<LimitQuery>,
    _admin: IsAdmin
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    Ok(HttpResponse::Ok().json(get_recent_orders(conn, query.clamped()).await?))
}

#[tracing::instrument("Listing top products for admin", skip(pool))]
pub async fn get_admin_top_products(
    pool: web::Data<DbPool>,
    query: web::Query<LimitQuery>,
    _admin: IsAdmin
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    Ok(HttpResponse::Ok().json(get_top_products(conn, query.clamped()).await?))
}
