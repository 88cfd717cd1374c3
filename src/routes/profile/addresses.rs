use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::{
        addresses::{create_address, deactivate_address, list_addresses, set_default_address, update_address, AddressError},
        orders::DEFAULT_COUNTRY,
    },
    domain::field_rules::{check_length, check_optional_length},
    error::ApiError,
    models::{NewUserAddress, UserAddress, UserAddressChangeset},
    utils::{get_pooled_connection, non_empty, DbPool},
};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse{
    pub id: i32,
    pub user_id: i32,
    pub label: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl From<UserAddress> for AddressResponse {
    fn from(a: UserAddress) -> Self {
        Self{
            id: a.id,
            user_id: a.user_id,
            label: a.label,
            address_line1: a.address_line1,
            address_line2: a.address_line2,
            city: a.city,
            state_province: a.state_province,
            postal_code: a.postal_code,
            country: a.country,
            phone: a.phone,
            is_default: a.is_default,
            is_active: a.is_active,
            created_at: a.created_at,
            updated_at: a.updated_at
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressJson{
    pub label: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: Option<String>,
    pub postal_code: String,
    pub country: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressJson{
    pub label: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub is_default: Option<bool>
}

fn check_required(label: &str, line1: &str, city: &str, postal_code: &str) -> Result<(), ApiError> {
    check_length("label", label, 1, 100)
        .and_then(|_| check_length("addressLine1", line1, 1, 255))
        .and_then(|_| check_length("city", city, 1, 100))
        .and_then(|_| check_length("postalCode", postal_code, 4, 20))
        .map_err(ApiError::BadRequest)
}

fn check_optional(line2: Option<&str>, state: Option<&str>, country: Option<&str>, phone: Option<&str>) -> Result<(), ApiError> {
    check_optional_length("addressLine2", line2, 255)
        .and_then(|_| check_optional_length("stateProvince", state, 100))
        .and_then(|_| check_optional_length("country", country, 100))
        .and_then(|_| check_optional_length("phone", phone, 20))
        .map_err(ApiError::BadRequest)
}

fn map_address_error(e: AddressError) -> ApiError {
    match e {
        AddressError::NotFound(_) => ApiError::NotFound("Address not found".into()),
        other => ApiError::Unexpected(anyhow::Error::new(other))
    }
}

#[tracing::instrument(
    "Creating address for logged in user",
    skip(pool, json)
)]
pub async fn post_address(
    pool: web::Data<DbPool>,
    json: web::Json<CreateAddressJson>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let body = json.into_inner();
    let address_line2 = non_empty(body.address_line2);
    let state_province = non_empty(body.state_province);
    let country = non_empty(body.country);
    let phone = non_empty(body.phone);

    check_required(&body.label, &body.address_line1, &body.city, &body.postal_code)?;
    check_optional(address_line2.as_deref(), state_province.as_deref(), country.as_deref(), phone.as_deref())?;

    let new_address = NewUserAddress{
        user_id: uid.0,
        label: body.label.trim().to_string(),
        address_line1: body.address_line1.trim().to_string(),
        address_line2,
        city: body.city.trim().to_string(),
        state_province,
        postal_code: body.postal_code.trim().to_string(),
        country: country.unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        phone,
        is_default: body.is_default
    };

    let conn = get_pooled_connection(&pool).await?;
    let address = create_address(conn, new_address).await.map_err(map_address_error)?;

    Ok(HttpResponse::Created().json(AddressResponse::from(address)))
}

#[tracing::instrument(
    "Listing addresses of logged in user",
    skip(pool)
)]
pub async fn get_addresses(
    pool: web::Data<DbPool>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let addresses: Vec<AddressResponse> = list_addresses(conn, uid.0)
        .await?
        .into_iter()
        .map(AddressResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(addresses))
}

#[tracing::instrument(
    "Updating address of logged in user",
    skip(pool, json)
)]
pub async fn put_address(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    json: web::Json<UpdateAddressJson>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let address_id = path.into_inner();
    let body = json.into_inner();

    let changes = UserAddressChangeset{
        label: non_empty(body.label),
        address_line1: non_empty(body.address_line1),
        address_line2: non_empty(body.address_line2),
        city: non_empty(body.city),
        state_province: non_empty(body.state_province),
        postal_code: non_empty(body.postal_code),
        country: non_empty(body.country),
        phone: non_empty(body.phone),
        is_default: body.is_default,
        updated_at: None
    };

    if let Some(label) = &changes.label {
        check_length("label", label, 1, 100).map_err(ApiError::BadRequest)?;
    }
    if let Some(postal_code) = &changes.postal_code {
        check_length("postalCode", postal_code, 4, 20).map_err(ApiError::BadRequest)?;
    }
    check_optional_length("addressLine1", changes.address_line1.as_deref(), 255)
        .and_then(|_| check_optional_length("city", changes.city.as_deref(), 100))
        .map_err(ApiError::BadRequest)?;
    check_optional(
        changes.address_line2.as_deref(),
        changes.state_province.as_deref(),
        changes.country.as_deref(),
        changes.phone.as_deref()
    )?;

    let conn = get_pooled_connection(&pool).await?;
    let address = update_address(conn, uid.0, address_id, changes).await.map_err(map_address_error)?;

    Ok(HttpResponse::Ok().json(AddressResponse::from(address)))
}

#[tracing::instrument(
    "Deleting address of logged in user",
    skip(pool)
)]
pub async fn delete_address(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    deactivate_address(conn, uid.0, path.into_inner()).await.map_err(map_address_error)?;

    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(
    "Setting default address of logged in user",
    skip(pool)
)]
pub async fn patch_default_address(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    set_default_address(conn, uid.0, path.into_inner()).await.map_err(map_address_error)?;

    Ok(HttpResponse::NoContent().finish())
}
