use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::jwt::{OwnerType, TokenSubject, Tokenizer},
    db_interaction::drivers::{get_driver_by_email, insert_driver, DriverInsertError},
    domain::{account_email::AccountEmail, field_rules::check_length, vehicle::VehicleType},
    error::ApiError,
    models::NewDeliveryDriver,
    password::{hash_password, verify_password},
    routes::LoginJson,
    utils::{get_pooled_connection, non_empty, DbPool},
};

use super::PublicDriver;

pub const MIN_PHONE_LENGTH: usize = 9;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DriverRegisterJson{
    pub email: String,
    pub password: SecretString,
    pub name: String,
    pub phone: String,
    pub vehicle_type: Option<String>,
    pub vehicle_plate: Option<String>
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DriverLoginResponse{
    pub access_token: String,
    pub expires_in: u64,
    pub driver: PublicDriver
}

#[derive(Debug)]
pub struct DriverProfile{
    pub email: AccountEmail,
    pub name: String,
    pub phone: String,
    pub vehicle_type: Option<VehicleType>,
    pub vehicle_plate: Option<String>
}

impl DriverProfile {
    pub fn parse(body: &DriverRegisterJson) -> Result<Self, String> {
        let email = AccountEmail::parse(&body.email)?;
        let name = body.name.trim().to_string();
        let phone = body.phone.trim().to_string();
        check_length("name", &name, 2, 100)?;
        check_length("phone", &phone, MIN_PHONE_LENGTH, 20)?;
        if body.password.expose_secret().chars().count() < 6 {
            return Err("password must be at least 6 characters".to_string());
        }

        let vehicle_type = non_empty(body.vehicle_type.clone())
            .map(|v| VehicleType::parse(&v))
            .transpose()?;

        Ok(Self{
            email,
            name,
            phone,
            vehicle_type,
            vehicle_plate: non_empty(body.vehicle_plate.clone())
        })
    }

    // New drivers can log in straight away but receive no orders until they go available
    pub fn into_new_driver(self, password_hash: String) -> NewDeliveryDriver {
        NewDeliveryDriver{
            uuid: Uuid::new_v4(),
            email: self.email.into_inner(),
            name: self.name,
            phone: self.phone,
            password_hash,
            is_active: true,
            is_available: false,
            vehicle_type: self.vehicle_type.map(|v| v.as_str().to_string()),
            vehicle_plate: self.vehicle_plate
        }
    }
}

#[tracing::instrument(
    "Registering delivery driver",
    skip(pool, json),
    fields(email = %json.email)
)]
pub async fn register_driver(
    pool: web::Data<DbPool>,
    json: web::Json<DriverRegisterJson>
) -> Result<HttpResponse, ApiError> {
    let body = json.into_inner();
    let profile = DriverProfile::parse(&body).map_err(ApiError::BadRequest)?;

    let password_hash = hash_password(body.password).await?;
    let driver = profile.into_new_driver(password_hash);

    let conn = get_pooled_connection(&pool).await?;
    let driver = insert_driver(conn, driver)
        .await
        .map_err(|e| match e {
            DriverInsertError::EmailTaken(_) => ApiError::Conflict(e.to_string()),
            DriverInsertError::UnexpectedError(e) => ApiError::Unexpected(e)
        })?;

    Ok(HttpResponse::Created().json(PublicDriver::from(driver)))
}

#[tracing::instrument(
    "Logging in delivery driver",
    skip(pool, tokenizer, json),
    fields(email = %json.email)
)]
pub async fn login_driver(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    json: web::Json<LoginJson>
) -> Result<HttpResponse, ApiError> {
    let LoginJson{ email, password } = json.into_inner();

    let conn = get_pooled_connection(&pool).await?;
    let driver = get_driver_by_email(conn, AccountEmail::normalize(&email))
        .await?
        .ok_or_else(|| ApiError::NotFound("Delivery driver not found".into()))?;

    if !driver.is_active {
        return Err(ApiError::Unauthorized("Delivery driver account is inactive".into()));
    }
    if !verify_password(password, driver.password_hash.clone()).await? {
        tracing::info!("Passwords did not match");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let issued = tokenizer.generate_key(&TokenSubject{
            id: driver.id,
            email: driver.email.clone(),
            owner_type: OwnerType::Delivery,
            role: None
        })
        .context("Failed to sign access token")?;

    Ok(HttpResponse::Ok().json(DriverLoginResponse{
        access_token: issued.token,
        expires_in: issued.expires_in,
        driver: PublicDriver::from(driver)
    }))
}
