use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::{DateTime, Datelike, Utc};
use diesel::prelude::*;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{NewInvoice, Order},
    schema::{invoices, orders, users},
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection},
};

pub fn invoice_number(year: i32, issued_so_far: i64) -> String {
    format!("INV-{}-{:03}", year, issued_so_far + 1)
}

#[derive(Error)]
pub enum CreateInvoiceError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Order with ID {0} not found")]
    OrderNotFound(i32)
}

impl Debug for CreateInvoiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Returns the number of the order's invoice, creating it on first call
#[tracing::instrument("Creating invoice for order", skip(conn))]
pub async fn create_invoice_for_order(mut conn: DbConnection, order_id: i32) -> Result<String, CreateInvoiceError> {
    let number = spawn_blocking_with_tracing(move || {
        conn.transaction::<String, CreateInvoiceError, _>(|conn| {
            let existing = invoices::table
                .filter(invoices::order_id.eq(order_id))
                .select(invoices::number)
                .first::<String>(conn)
                .optional()?;

            if let Some(number) = existing {
                return Ok(number);
            }

            let order = orders::table
                .find(order_id)
                .select(Order::as_select())
                .first::<Order>(conn)
                .optional()?
                .ok_or(CreateInvoiceError::OrderNotFound(order_id))?;

            let issued_so_far = invoices::table.count().get_result::<i64>(conn)?;
            let number = invoice_number(Utc::now().year(), issued_so_far);

            diesel::insert_into(invoices::table)
                .values(&NewInvoice{
                    uuid: Uuid::new_v4(),
                    number: number.clone(),
                    user_id: order.user_id,
                    order_id: order.id,
                    status: "requested".to_string(),
                    total: order.total
                })
                .on_conflict(invoices::order_id)
                .do_nothing()
                .execute(conn)?;

            Ok(number)
        })
    })
    .await??;

    Ok(number)
}

#[derive(Queryable, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BillingRecord{
    pub id: i32,
    pub uuid: Uuid,
    pub number: String,
    pub user_id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub order_id: i32,
    pub order_uuid: Uuid,
    pub status: String,
    pub total: f64,
    pub issued_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>
}

#[tracing::instrument("Listing invoices", skip(conn))]
pub async fn list_billing_records(mut conn: DbConnection) -> Result<Vec<BillingRecord>, anyhow::Error> {
    let records = spawn_blocking_with_tracing(move || {
        invoices::table
            .inner_join(users::table)
            .inner_join(orders::table)
            .order((invoices::created_at.desc(), invoices::id.desc()))
            .select((
                invoices::id,
                invoices::uuid,
                invoices::number,
                invoices::user_id,
                users::name,
                users::email,
                invoices::order_id,
                orders::uuid,
                invoices::status,
                invoices::total,
                invoices::issued_at,
                invoices::created_at
            ))
            .load::<BillingRecord>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to list invoices")?;

    Ok(records)
}
