use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{prelude::*, result::DatabaseErrorKind};
use thiserror::Error;

use crate::{
    models::{DeliveryDriver, NewDeliveryDriver},
    schema::delivery_drivers,
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection},
};

#[derive(Error)]
pub enum DriverInsertError{
    #[error("Delivery driver with email {0} already exists")]
    EmailTaken(String),
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for DriverInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting delivery driver into the database",
    skip(conn, new_driver),
    fields(email = %new_driver.email)
)]
pub async fn insert_driver(mut conn: DbConnection, new_driver: NewDeliveryDriver) -> Result<DeliveryDriver, DriverInsertError> {
    let email = new_driver.email.clone();

    let driver = spawn_blocking_with_tracing(move || {
        diesel::insert_into(delivery_drivers::table)
            .values(&new_driver)
            .returning(DeliveryDriver::as_returning())
            .get_result::<DeliveryDriver>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .map_err(|e| match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DriverInsertError::EmailTaken(email)
        },
        other => DriverInsertError::UnexpectedError(anyhow::Error::new(other).context("Failed to insert driver"))
    })?;

    Ok(driver)
}

#[tracing::instrument("Fetching delivery driver by email", skip(conn))]
pub async fn get_driver_by_email(mut conn: DbConnection, email: String) -> Result<Option<DeliveryDriver>, anyhow::Error> {
    let driver = spawn_blocking_with_tracing(move || {
        delivery_drivers::table
            .filter(delivery_drivers::email.eq(email))
            .select(DeliveryDriver::as_select())
            .first::<DeliveryDriver>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query driver by email")?;

    Ok(driver)
}

#[tracing::instrument("Fetching delivery driver by id", skip(conn))]
pub async fn get_driver_by_id(mut conn: DbConnection, driver_id: i32) -> Result<Option<DeliveryDriver>, anyhow::Error> {
    let driver = spawn_blocking_with_tracing(move || {
        delivery_drivers::table
            .find(driver_id)
            .select(DeliveryDriver::as_select())
            .first::<DeliveryDriver>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query driver by id")?;

    Ok(driver)
}

#[tracing::instrument("Updating driver availability", skip(conn))]
pub async fn set_driver_availability(
    mut conn: DbConnection,
    driver_id: i32,
    is_available: bool
) -> Result<Option<DeliveryDriver>, anyhow::Error> {
    let driver = spawn_blocking_with_tracing(move || {
        diesel::update(delivery_drivers::table.find(driver_id))
            .set((
                delivery_drivers::is_available.eq(is_available),
                delivery_drivers::updated_at.eq(Utc::now())
            ))
            .returning(DeliveryDriver::as_returning())
            .get_result::<DeliveryDriver>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to update driver availability")?;

    Ok(driver)
}

#[tracing::instrument("Storing driver avatar url", skip(conn))]
pub async fn set_driver_avatar(mut conn: DbConnection, driver_id: i32, avatar_url: String) -> Result<Option<DeliveryDriver>, anyhow::Error> {
    let driver = spawn_blocking_with_tracing(move || {
        diesel::update(delivery_drivers::table.find(driver_id))
            .set((
                delivery_drivers::avatar_url.eq(Some(avatar_url)),
                delivery_drivers::updated_at.eq(Utc::now())
            ))
            .returning(DeliveryDriver::as_returning())
            .get_result::<DeliveryDriver>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to update driver avatar")?;

    Ok(driver)
}
