use actix_web::{web, HttpResponse};

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::users::get_user_by_id,
    error::ApiError,
    routes::PublicUser,
    utils::{get_pooled_connection, DbPool},
};

#[tracing::instrument(
    "Get profile data of logged in user",
    skip(pool)
)]
pub async fn get_profile(
    pool: web::Data<DbPool>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;

    let user = get_user_by_id(conn, uid.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}
