use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::ApiError;

use super::jwt::{Claims, OwnerType, Tokenizer, UserRole};

// Any customer token, admins included
#[derive(Debug)]
pub struct IsCustomer(pub i32);
#[derive(Debug)]
pub struct IsAdmin(pub i32);
#[derive(Debug)]
pub struct IsDriver(pub i32);
#[derive(Debug)]
pub struct IsVenue(pub i32);

// Order status changes can come from the customer app or the rider app
#[derive(Debug, Clone, Copy)]
pub enum OrderActor{
    Customer(i32),
    Driver(i32)
}

impl OrderActor {
    pub fn driver_id(&self) -> Option<i32> {
        match self {
            OrderActor::Driver(id) => Some(*id),
            OrderActor::Customer(_) => None
        }
    }
}

fn bearer_claims(req: &HttpRequest) -> Result<Claims, ApiError> {
    let tokenizer = req.app_data::<web::Data<Tokenizer>>()
        .ok_or_else(|| ApiError::Unexpected(anyhow::anyhow!("Tokenizer is not registered as app data")))?;

    let header = req.headers()
        .get("Authorization")
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".into()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid token".into()))?;

    let token = header.strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".into()))?;

    tokenizer.decode_key(token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".into()))
}

fn wrong_owner() -> ApiError {
    ApiError::Forbidden("Token is not valid for this resource".into())
}

impl FromRequest for IsCustomer {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| match claims.owner_type {
            OwnerType::User => Ok(IsCustomer(claims.sub)),
            _ => Err(wrong_owner())
        }))
    }
}

impl FromRequest for IsAdmin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| match (claims.owner_type, claims.role) {
            (OwnerType::User, Some(UserRole::Admin)) => Ok(IsAdmin(claims.sub)),
            _ => Err(ApiError::Forbidden("Admin role required".into()))
        }))
    }
}

impl FromRequest for IsDriver {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| match claims.owner_type {
            OwnerType::Delivery => Ok(IsDriver(claims.sub)),
            _ => Err(wrong_owner())
        }))
    }
}

impl FromRequest for IsVenue {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| match claims.owner_type {
            OwnerType::Restaurant => Ok(IsVenue(claims.sub)),
            _ => Err(wrong_owner())
        }))
    }
}

impl FromRequest for OrderActor {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| match claims.owner_type {
            OwnerType::User => Ok(OrderActor::Customer(claims.sub)),
            OwnerType::Delivery => Ok(OrderActor::Driver(claims.sub)),
            OwnerType::Restaurant => Err(wrong_owner())
        }))
    }
}
