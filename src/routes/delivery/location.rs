use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    auth::extractors::IsDriver,
    db_interaction::locations::{get_location, upsert_location},
    error::ApiError,
    models::DeliveryLocation,
    utils::{get_pooled_connection, DbPool},
};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse{
    pub delivery_user_id: i32,
    pub order_id: Option<i32>,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>
}

impl From<DeliveryLocation> for LocationResponse {
    fn from(l: DeliveryLocation) -> Self {
        Self{
            delivery_user_id: l.delivery_user_id,
            order_id: l.order_id,
            latitude: l.latitude,
            longitude: l.longitude,
            updated_at: l.updated_at
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LocationJson{
    pub latitude: f64,
    pub longitude: f64
}

pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("latitude must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("longitude must be between -180 and 180".to_string());
    }
    Ok(())
}

#[tracing::instrument("Reporting location of logged in driver", skip(pool))]
pub async fn put_driver_location(
    pool: web::Data<DbPool>,
    json: web::Json<LocationJson>,
    driver: IsDriver
) -> Result<HttpResponse, ApiError> {
    check_coordinates(json.latitude, json.longitude).map_err(ApiError::BadRequest)?;

    let conn = get_pooled_connection(&pool).await?;
    let location = upsert_location(conn, driver.0, json.latitude, json.longitude).await?;

    Ok(HttpResponse::Ok().json(LocationResponse::from(location)))
}

#[tracing::instrument("Getting latest location of a driver", skip(pool))]
pub async fn get_driver_location(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    _driver: IsDriver
) -> Result<HttpResponse, ApiError> {
    let driver_id = path.into_inner();

    let conn = get_pooled_connection(&pool).await?;
    let location = get_location(conn, driver_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No location found for driver {}", driver_id)))?;

    Ok(HttpResponse::Ok().json(LocationResponse::from(location)))
}
