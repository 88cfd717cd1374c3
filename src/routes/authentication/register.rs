use actix_web::{web, HttpResponse};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    db_interaction::users::{insert_user, UserInsertError},
    domain::{account_email::AccountEmail, field_rules::check_length},
    error::ApiError,
    password::hash_password,
    utils::{get_pooled_connection, DbPool},
};

use super::PublicUser;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Deserialize, Debug)]
pub struct RegisterJson{
    pub name: String,
    pub email: String,
    pub password: SecretString
}

#[tracing::instrument(
    "Registering customer",
    skip(pool, json),
    fields(email = %json.email)
)]
pub async fn register(
    pool: web::Data<DbPool>,
    json: web::Json<RegisterJson>
) -> Result<HttpResponse, ApiError> {
    let RegisterJson{ name, email, password } = json.into_inner();

    let email = AccountEmail::parse(&email).map_err(ApiError::BadRequest)?;
    let name = name.trim().to_string();
    check_length("name", &name, MIN_NAME_LENGTH, 100).map_err(ApiError::BadRequest)?;
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!("password must be at least {} characters", MIN_PASSWORD_LENGTH)));
    }

    let password_hash = hash_password(password).await?;

    let conn = get_pooled_connection(&pool).await?;
    let user = insert_user(conn, name, email.into_inner(), password_hash)
        .await
        .map_err(|e| match e {
            UserInsertError::EmailNotUnique(_) => ApiError::Conflict(e.to_string()),
            UserInsertError::UnexpectedError(e) => ApiError::Unexpected(e)
        })?;

    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}
