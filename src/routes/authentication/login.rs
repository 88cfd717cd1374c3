use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{
    auth::jwt::{OwnerType, TokenSubject, Tokenizer, UserRole},
    db_interaction::users::get_user_by_email,
    domain::account_email::AccountEmail,
    error::ApiError,
    password::verify_password,
    utils::{get_pooled_connection, DbPool},
};

use super::PublicUser;

#[derive(Deserialize, Debug)]
pub struct LoginJson{
    pub email: String,
    pub password: SecretString
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginResponse{
    pub access_token: String,
    pub expires_in: u64,
    pub user: PublicUser
}

#[tracing::instrument(
    "Logging in customer",
    skip(pool, tokenizer, json),
    fields(email = %json.email)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    json: web::Json<LoginJson>
) -> Result<HttpResponse, ApiError> {
    let LoginJson{ email, password } = json.into_inner();
    let email = AccountEmail::normalize(&email);

    let conn = get_pooled_connection(&pool).await?;
    let user = get_user_by_email(conn, email)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if !verify_password(password, user.password_hash.clone()).await? {
        tracing::info!("Passwords did not match");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let issued = tokenizer.generate_key(&TokenSubject{
            id: user.id,
            email: user.email.clone(),
            owner_type: OwnerType::User,
            role: Some(UserRole::parse(&user.role))
        })
        .context("Failed to sign access token")?;

    Ok(HttpResponse::Ok().json(UserLoginResponse{
        access_token: issued.token,
        expires_in: issued.expires_in,
        user: PublicUser::from(user)
    }))
}
