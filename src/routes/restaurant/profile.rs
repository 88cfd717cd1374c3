use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    auth::extractors::IsVenue,
    db_interaction::venues::{get_venue_by_id, set_venue_avatar},
    error::ApiError,
    routes::avatar::store_avatar,
    storage_client::StorageClient,
    utils::{get_pooled_connection, DbPool},
};

use super::PublicVenue;

#[tracing::instrument("Get profile of logged in restaurant", skip(pool))]
pub async fn get_restaurant_profile(
    pool: web::Data<DbPool>,
    venue: IsVenue
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let venue = get_venue_by_id(conn, venue.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".into()))?;

    Ok(HttpResponse::Ok().json(PublicVenue::from(venue)))
}

#[tracing::instrument("Uploading avatar of logged in restaurant", skip(pool, storage, req, payload))]
pub async fn upload_restaurant_avatar(
    pool: web::Data<DbPool>,
    storage: web::Data<StorageClient>,
    req: HttpRequest,
    payload: web::Payload,
    venue: IsVenue
) -> Result<HttpResponse, ApiError> {
    let avatar_url = store_avatar(&storage, &req, payload).await?;

    let conn = get_pooled_connection(&pool).await?;
    let venue = set_venue_avatar(conn, venue.0, avatar_url)
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".into()))?;

    Ok(HttpResponse::Ok().json(PublicVenue::from(venue)))
}
