use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Serialize;

use crate::{
    auth::jwt::{OwnerType, TokenSubject, Tokenizer},
    db_interaction::venues::get_venue_by_email,
    domain::account_email::AccountEmail,
    error::ApiError,
    password::verify_password,
    routes::LoginJson,
    utils::{get_pooled_connection, DbPool},
};

use super::PublicVenue;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VenueLoginResponse{
    pub access_token: String,
    pub expires_in: u64,
    pub venue: PublicVenue
}

#[tracing::instrument(
    "Logging in restaurant",
    skip(pool, tokenizer, json),
    fields(email = %json.email)
)]
pub async fn login_restaurant(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    json: web::Json<LoginJson>
) -> Result<HttpResponse, ApiError> {
    let LoginJson{ email, password } = json.into_inner();

    let conn = get_pooled_connection(&pool).await?;
    let venue = get_venue_by_email(conn, AccountEmail::normalize(&email))
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".into()))?;

    if !venue.is_active {
        return Err(ApiError::Unauthorized("Restaurant account is inactive".into()));
    }
    if !verify_password(password, venue.password_hash.clone()).await? {
        tracing::info!("Passwords did not match");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let issued = tokenizer.generate_key(&TokenSubject{
            id: venue.id,
            email: venue.email.clone(),
            owner_type: OwnerType::Restaurant,
            role: None
        })
        .context("Failed to sign access token")?;

    Ok(HttpResponse::Ok().json(VenueLoginResponse{
        access_token: issued.token,
        expires_in: issued.expires_in,
        venue: PublicVenue::from(venue)
    }))
}
