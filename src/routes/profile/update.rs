use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::users::{set_user_avatar, update_user_profile},
    domain::field_rules::{check_length, check_optional_length},
    error::ApiError,
    routes::{avatar::store_avatar, PublicUser},
    storage_client::StorageClient,
    utils::{get_pooled_connection, non_empty, DbPool},
};

#[derive(Deserialize, Debug)]
pub struct UpdateProfileJson{
    pub name: Option<String>,
    pub phone: Option<String>
}

#[tracing::instrument(
    "Updating profile of logged in user",
    skip(pool)
)]
pub async fn update_profile(
    pool: web::Data<DbPool>,
    json: web::Json<UpdateProfileJson>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let UpdateProfileJson{ name, phone } = json.into_inner();
    let name = non_empty(name);
    let phone = non_empty(phone);

    if let Some(name) = &name {
        check_length("name", name, 2, 100).map_err(ApiError::BadRequest)?;
    }
    check_optional_length("phone", phone.as_deref(), 20).map_err(ApiError::BadRequest)?;

    let conn = get_pooled_connection(&pool).await?;
    let user = update_user_profile(conn, uid.0, name, phone)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

#[tracing::instrument(
    "Uploading avatar of logged in user",
    skip(pool, storage, req, payload)
)]
pub async fn upload_profile_avatar(
    pool: web::Data<DbPool>,
    storage: web::Data<StorageClient>,
    req: HttpRequest,
    payload: web::Payload,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let avatar_url = store_avatar(&storage, &req, payload).await?;

    let conn = get_pooled_connection(&pool).await?;
    let user = set_user_avatar(conn, uid.0, avatar_url)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}
