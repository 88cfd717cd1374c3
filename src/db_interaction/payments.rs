use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;

use crate::{
    models::{NewPayment, Payment},
    schema::payments,
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection,
};

#[tracing::instrument("Storing pending payment", skip(conn, new_payment), fields(intent = %new_payment.stripe_payment_intent_id))]
pub async fn insert_payment(mut conn: DbConnection, new_payment: NewPayment) -> Result<Payment, anyhow::Error> {
    let payment = spawn_blocking_with_tracing(move || {
        diesel::insert_into(payments::table)
            .values(&new_payment)
            .returning(Payment::as_returning())
            .get_result::<Payment>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to insert payment")?;

    Ok(payment)
}

#[tracing::instrument("Fetching payment by intent id", skip(conn))]
pub async fn get_payment_by_intent(mut conn: DbConnection, intent_id: String) -> Result<Option<Payment>, anyhow::Error> {
    let payment = spawn_blocking_with_tracing(move || {
        payments::table
            .filter(payments::stripe_payment_intent_id.eq(intent_id))
            .select(Payment::as_select())
            .first::<Payment>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query payment")?;

    Ok(payment)
}

#[tracing::instrument("Updating payment status", skip(conn))]
pub async fn update_payment_status(
    mut conn: DbConnection,
    payment_id: i32,
    status: String,
    payment_method: Option<String>
) -> Result<Payment, anyhow::Error> {
    let payment = spawn_blocking_with_tracing(move || {
        diesel::update(payments::table.find(payment_id))
            .set((
                payments::status.eq(status),
                payments::payment_method.eq(payment_method),
                payments::updated_at.eq(Utc::now())
            ))
            .returning(Payment::as_returning())
            .get_result::<Payment>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to update payment status")?;

    Ok(payment)
}
