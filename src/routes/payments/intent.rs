use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::payments::insert_payment,
    error::ApiError,
    models::NewPayment,
    payment_client::{CreateIntentRequest, PaymentClient},
    utils::{get_pooled_connection, DbPool},
};

// Smallest charge the gateway accepts, in cents
pub const MIN_AMOUNT_CENTS: i32 = 50;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentJson{
    pub amount: i32,
    pub currency: Option<String>,
    pub order_id: Option<i32>,
    pub metadata: Option<BTreeMap<String, String>>
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse{
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
    pub amount: i32,
    pub currency: String,
    pub status: String,
    pub order_id: Option<i32>
}

// Caller metadata first, so `userId` and `orderId` can not be spoofed
pub fn intent_metadata(
    user_id: i32,
    order_id: Option<i32>,
    extra: Option<BTreeMap<String, String>>
) -> BTreeMap<String, String> {
    let mut metadata = extra.unwrap_or_default();
    metadata.insert("userId".into(), user_id.to_string());
    match order_id {
        Some(id) => { metadata.insert("orderId".into(), id.to_string()); },
        None => { metadata.remove("orderId"); }
    }
    metadata
}

#[tracing::instrument(
    "Creating payment intent",
    skip(pool, payment_client)
)]
pub async fn create_payment_intent(
    pool: web::Data<DbPool>,
    payment_client: web::Data<PaymentClient>,
    json: web::Json<CreateIntentJson>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let CreateIntentJson{ amount, currency, order_id, metadata } = json.into_inner();

    if amount < MIN_AMOUNT_CENTS {
        return Err(ApiError::BadRequest(format!("amount must be at least {} cents", MIN_AMOUNT_CENTS)));
    }
    let currency = currency
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "eur".to_string());

    let intent = payment_client
        .create_payment_intent(CreateIntentRequest{
            amount: amount as i64,
            currency: &currency,
            metadata: intent_metadata(uid.0, order_id, metadata)
        })
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "Payment gateway rejected the intent");
            ApiError::BadRequest("Failed to create payment intent".into())
        })?;

    let conn = get_pooled_connection(&pool).await?;
    let payment = insert_payment(conn, NewPayment{
            stripe_payment_intent_id: intent.id.clone(),
            order_id,
            user_id: uid.0,
            amount,
            currency: currency.to_uppercase(),
            status: "pending".to_string()
        })
        .await?;

    Ok(HttpResponse::Created().json(CreateIntentResponse{
        client_secret: intent.client_secret,
        payment_intent_id: payment.stripe_payment_intent_id,
        amount: payment.amount,
        currency: payment.currency,
        status: payment.status,
        order_id: payment.order_id
    }))
}
