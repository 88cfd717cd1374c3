use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::{
    auth::extractors::IsDriver,
    db_interaction::drivers::{get_driver_by_id, set_driver_availability, set_driver_avatar},
    error::ApiError,
    routes::avatar::store_avatar,
    storage_client::StorageClient,
    utils::{get_pooled_connection, DbPool},
};

use super::PublicDriver;

fn driver_not_found() -> ApiError {
    ApiError::NotFound("Delivery driver not found".into())
}

#[tracing::instrument("Get profile of logged in driver", skip(pool))]
pub async fn get_driver_profile(
    pool: web::Data<DbPool>,
    driver: IsDriver
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let driver = get_driver_by_id(conn, driver.0)
        .await?
        .ok_or_else(driver_not_found)?;

    Ok(HttpResponse::Ok().json(PublicDriver::from(driver)))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityJson{
    pub is_available: bool
}

#[tracing::instrument("Updating availability of logged in driver", skip(pool))]
pub async fn update_driver_availability(
    pool: web::Data<DbPool>,
    json: web::Json<AvailabilityJson>,
    driver: IsDriver
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let driver = set_driver_availability(conn, driver.0, json.is_available)
        .await?
        .ok_or_else(driver_not_found)?;

    Ok(HttpResponse::Ok().json(PublicDriver::from(driver)))
}

#[tracing::instrument("Uploading avatar of logged in driver", skip(pool, storage, req, payload))]
pub async fn upload_driver_avatar(
    pool: web::Data<DbPool>,
    storage: web::Data<StorageClient>,
    req: HttpRequest,
    payload: web::Payload,
    driver: IsDriver
) -> Result<HttpResponse, ApiError> {
    let avatar_url = store_avatar(&storage, &req, payload).await?;

    let conn = get_pooled_connection(&pool).await?;
    let driver = set_driver_avatar(conn, driver.0, avatar_url)
        .await?
        .ok_or_else(driver_not_found)?;

    Ok(HttpResponse::Ok().json(PublicDriver::from(driver)))
}
