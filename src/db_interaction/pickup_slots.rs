use anyhow::Context;
use diesel::prelude::*;

use crate::{
    domain::pickup_window::DateRange,
    models::PickupSlot,
    schema::pickup_slots,
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection,
};

#[tracing::instrument("Listing available pickup slots", skip(conn))]
pub async fn get_available_slots(mut conn: DbConnection, range: DateRange) -> Result<Vec<PickupSlot>, anyhow::Error> {
    let slots = spawn_blocking_with_tracing(move || {
        pickup_slots::table
            .filter(pickup_slots::is_active.eq(true))
            .filter(pickup_slots::booked_count.lt(pickup_slots::capacity))
            .filter(pickup_slots::slot_date.ge(range.start))
            .filter(pickup_slots::slot_date.le(range.end))
            .order((pickup_slots::slot_date.asc(), pickup_slots::start_time.asc()))
            .select(PickupSlot::as_select())
            .load::<PickupSlot>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to list pickup slots")?;

    Ok(slots)
}
