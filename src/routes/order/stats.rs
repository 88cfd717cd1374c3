use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;

use crate::{
    auth::extractors::{IsAdmin, IsCustomer, IsDriver},
    db_interaction::orders::{get_fastest_drivers, get_monthly_driver_tallies, get_order_snapshots, DriverSpeed, SnapshotScope},
    domain::{
        ranking::{build_ranking, month_bounds, month_label},
        stats::delivery_stats,
    },
    error::ApiError,
    utils::{get_pooled_connection, DbPool},
};

#[tracing::instrument(
    "Computing delivery stats of logged in user",
    skip(pool)
)]
pub async fn get_delivery_stats(
    pool: web::Data<DbPool>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let snapshots = get_order_snapshots(conn, SnapshotScope::User(uid.0)).await?;

    Ok(HttpResponse::Ok().json(delivery_stats(&snapshots, Utc::now())))
}

#[tracing::instrument(
    "Computing monthly delivery ranking",
    skip(pool)
)]
pub async fn get_delivery_ranking(
    pool: web::Data<DbPool>,
    driver: IsDriver
) -> Result<HttpResponse, ApiError> {
    let now = Utc::now();
    let (month_start, month_end) = month_bounds(now);

    let conn = get_pooled_connection(&pool).await?;
    let tallies = get_monthly_driver_tallies(conn, month_start, month_end).await?;

    Ok(HttpResponse::Ok().json(build_ranking(tallies, driver.0, month_label(now))))
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DriverStatsResponse{
    pub top_drivers: Vec<DriverSpeed>
}

#[tracing::instrument(
    "Computing fastest drivers",
    skip(pool)
)]
pub async fn get_driver_stats(
    pool: web::Data<DbPool>,
    _admin: IsAdmin
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let top_drivers = get_fastest_drivers(conn).await?;

    Ok(HttpResponse::Ok().json(DriverStatsResponse{ top_drivers }))
}
