use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_interaction::pickup_slots::get_available_slots,
    domain::pickup_window::DateRange,
    error::ApiError,
    models::PickupSlot,
    utils::{get_pooled_connection, DbPool},
};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery{
    pub start_date: Option<String>,
    pub end_date: Option<String>
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot{
    pub id: i32,
    pub venue_id: i32,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub booked_count: i32,
    pub available_spots: i32
}

impl From<PickupSlot> for AvailableSlot {
    fn from(slot: PickupSlot) -> Self {
        Self{
            id: slot.id,
            venue_id: slot.venue_id,
            slot_date: slot.slot_date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            capacity: slot.capacity,
            booked_count: slot.booked_count,
            available_spots: slot.capacity - slot.booked_count
        }
    }
}

#[tracing::instrument("Listing available pickup slots", skip(pool))]
pub async fn get_pickup_slots(
    pool: web::Data<DbPool>,
    query: web::Query<SlotQuery>
) -> Result<HttpResponse, ApiError> {
    let range = DateRange::from_query(
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            Utc::now().date_naive()
        )
        .map_err(ApiError::BadRequest)?;

    let conn = get_pooled_connection(&pool).await?;
    let slots: Vec<AvailableSlot> = get_available_slots(conn, range)
        .await?
        .into_iter()
        .map(AvailableSlot::from)
        .collect();

    Ok(HttpResponse::Ok().json(slots))
}
