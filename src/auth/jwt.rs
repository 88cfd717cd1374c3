use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::configuration::JWTSettings;

#[derive(Clone)]
pub struct Tokenizer{
    pub secret: SecretString,
    pub expiry_hours: u64,
    pub issuer: String,
    pub audience: String
}

// Who a token was issued to, carried by every login flow
#[derive(Debug, Clone)]
pub struct TokenSubject{
    pub id: i32,
    pub email: String,
    pub owner_type: OwnerType,
    pub role: Option<UserRole>
}

#[derive(Debug)]
pub struct IssuedToken{
    pub token: String,
    pub expires_in: u64
}

impl Tokenizer {
    pub fn new(settings: &JWTSettings) -> Self {
        Self{
            secret: settings.secret.clone(),
            expiry_hours: settings.expiry_hours,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone()
        }
    }

    pub fn generate_key(&self, subject: &TokenSubject) -> Result<IssuedToken, jsonwebtoken::errors::Error>{
        let expiry = Utc::now() + Duration::hours(self.expiry_hours as i64);

        let claims = Claims{
            sub: subject.id,
            exp: expiry.timestamp() as usize,
            email: subject.email.clone(),
            owner_type: subject.owner_type,
            role: subject.role,
            iss: self.issuer.clone(),
            aud: self.audience.clone()
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
        )?;

        Ok(IssuedToken{
            token,
            expires_in: self.expiry_hours * 3600
        })
    }

    // Expired, foreign-issuer and foreign-audience tokens all decode to `None`
    pub fn decode_key(&self, token: &str) -> Option<Claims>{
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);

        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation
        )
        .ok()
        .map(|decoded| decoded.claims)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims{
    pub sub: i32,
    pub exp: usize,
    pub email: String,
    pub owner_type: OwnerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    pub iss: String,
    pub aud: String
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType{
    User,
    Delivery,
    Restaurant
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole{
    Admin,
    User
}

impl UserRole {
    pub fn parse(role: &str) -> Self {
        match role {
            "admin" => UserRole::Admin,
            _ => UserRole::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user"
        }
    }
}
