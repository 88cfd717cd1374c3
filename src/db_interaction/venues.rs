use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;

use crate::{
    models::Venue,
    schema::venues,
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection,
};

#[tracing::instrument("Fetching venue by email", skip(conn))]
pub async fn get_venue_by_email(mut conn: DbConnection, email: String) -> Result<Option<Venue>, anyhow::Error> {
    let venue = spawn_blocking_with_tracing(move || {
        venues::table
            .filter(venues::email.eq(email))
            .select(Venue::as_select())
            .first::<Venue>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query venue by email")?;

    Ok(venue)
}

#[tracing::instrument("Fetching venue by id", skip(conn))]
pub async fn get_venue_by_id(mut conn: DbConnection, venue_id: i32) -> Result<Option<Venue>, anyhow::Error> {
    let venue = spawn_blocking_with_tracing(move || {
        venues::table
            .find(venue_id)
            .select(Venue::as_select())
            .first::<Venue>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query venue by id")?;

    Ok(venue)
}

#[tracing::instrument("Storing venue avatar url", skip(conn))]
pub async fn set_venue_avatar(mut conn: DbConnection, venue_id: i32, avatar_url: String) -> Result<Option<Venue>, anyhow::Error> {
    let venue = spawn_blocking_with_tracing(move || {
        diesel::update(venues::table.find(venue_id))
            .set((venues::avatar_url.eq(Some(avatar_url)), venues::updated_at.eq(Utc::now())))
            .returning(Venue::as_returning())
            .get_result::<Venue>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to update venue avatar")?;

    Ok(venue)
}
