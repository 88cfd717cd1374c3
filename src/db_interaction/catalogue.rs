use anyhow::Context;
use diesel::prelude::*;
use serde::Serialize;

use crate::{
    models::RescueMenu,
    schema::{allergens, rescue_menus},
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection,
};

#[derive(Queryable, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AllergenEntry{
    pub code: String,
    pub name_es: String,
    pub name_en: Option<String>
}

#[tracing::instrument("Listing allergens", skip(conn))]
pub async fn list_allergens(mut conn: DbConnection) -> Result<Vec<AllergenEntry>, anyhow::Error> {
    let entries = spawn_blocking_with_tracing(move || {
        allergens::table
            .filter(allergens::is_active.eq(true))
            .order(allergens::name_es.asc())
            .select((allergens::code, allergens::name_es, allergens::name_en))
            .load::<AllergenEntry>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to list allergens")?;

    Ok(entries)
}

#[tracing::instrument("Listing rescue menus", skip(conn))]
pub async fn list_rescue_menus(mut conn: DbConnection) -> Result<Vec<RescueMenu>, anyhow::Error> {
    let menus = spawn_blocking_with_tracing(move || {
        rescue_menus::table
            .filter(rescue_menus::is_active.eq(true))
            .order(rescue_menus::id.asc())
            .select(RescueMenu::as_select())
            .load::<RescueMenu>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to list rescue menus")?;

    Ok(menus)
}

#[tracing::instrument("Fetching active rescue menu", skip(conn))]
pub async fn get_active_rescue_menu(mut conn: DbConnection, menu_id: i32) -> Result<Option<RescueMenu>, anyhow::Error> {
    let menu = spawn_blocking_with_tracing(move || {
        rescue_menus::table
            .find(menu_id)
            .filter(rescue_menus::is_active.eq(true))
            .select(RescueMenu::as_select())
            .first::<RescueMenu>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query rescue menu")?;

    Ok(menu)
}
