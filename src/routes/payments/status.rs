use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::payments::{get_payment_by_intent, update_payment_status},
    domain::payment_status::map_gateway_status,
    error::ApiError,
    models::Payment,
    payment_client::PaymentClient,
    utils::{get_pooled_connection, DbPool},
};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse{
    pub id: i32,
    pub payment_intent_id: String,
    pub order_id: Option<i32>,
    pub user_id: i32,
    pub amount: i32,
    pub currency: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self{
            id: p.id,
            payment_intent_id: p.stripe_payment_intent_id,
            order_id: p.order_id,
            user_id: p.user_id,
            amount: p.amount,
            currency: p.currency,
            status: p.status,
            payment_method: p.payment_method,
            receipt_url: p.receipt_url,
            created_at: p.created_at,
            updated_at: p.updated_at
        }
    }
}

#[tracing::instrument(
    "Refreshing payment status",
    skip(pool, payment_client)
)]
pub async fn get_payment_status(
    pool: web::Data<DbPool>,
    payment_client: web::Data<PaymentClient>,
    path: web::Path<String>,
    _uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let intent_id = path.into_inner();

    let payment = get_payment_by_intent(get_pooled_connection(&pool).await?, intent_id.clone())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {} not found", intent_id)))?;

    let intent = payment_client
        .retrieve_payment_intent(&intent_id)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "Payment gateway lookup failed");
            ApiError::BadRequest("Failed to retrieve payment intent".into())
        })?;

    let status = map_gateway_status(&intent.status);
    let payment = if status != payment.status {
        update_payment_status(
            get_pooled_connection(&pool).await?,
            payment.id,
            status.to_string(),
            intent.payment_method.or(payment.payment_method)
        )
        .await?
    } else {
        payment
    };

    Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}
