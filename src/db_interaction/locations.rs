use anyhow::Context;
use chrono::Utc;
use diesel::{pg::upsert::excluded, prelude::*};

use crate::{
    models::DeliveryLocation,
    schema::delivery_locations,
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection,
};

// One row per driver, later reports overwrite the previous position. The row follows the
// driver rather than any order, so `order_id` is never written here
#[tracing::instrument("Upserting driver location", skip(conn))]
pub async fn upsert_location(
    mut conn: DbConnection,
    driver_id: i32,
    latitude: f64,
    longitude: f64
) -> Result<DeliveryLocation, anyhow::Error> {
    let location = spawn_blocking_with_tracing(move || {
        let now = Utc::now();
        diesel::insert_into(delivery_locations::table)
            .values((
                delivery_locations::delivery_user_id.eq(driver_id),
                delivery_locations::latitude.eq(latitude),
                delivery_locations::longitude.eq(longitude),
                delivery_locations::updated_at.eq(now)
            ))
            .on_conflict(delivery_locations::delivery_user_id)
            .do_update()
            .set((
                delivery_locations::latitude.eq(excluded(delivery_locations::latitude)),
                delivery_locations::longitude.eq(excluded(delivery_locations::longitude)),
                delivery_locations::updated_at.eq(now)
            ))
            .returning(DeliveryLocation::as_returning())
            .get_result::<DeliveryLocation>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to upsert driver location")?;

    Ok(location)
}

#[tracing::instrument("Fetching driver location", skip(conn))]
pub async fn get_location(mut conn: DbConnection, driver_id: i32) -> Result<Option<DeliveryLocation>, anyhow::Error> {
    let location = spawn_blocking_with_tracing(move || {
        delivery_locations::table
            .filter(delivery_locations::delivery_user_id.eq(driver_id))
            .select(DeliveryLocation::as_select())
            .first::<DeliveryLocation>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query driver location")?;

    Ok(location)
}
