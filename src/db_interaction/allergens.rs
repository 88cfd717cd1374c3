use anyhow::Context;
use diesel::prelude::*;

use crate::{
    schema::user_allergens,
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection,
};

#[tracing::instrument("Listing user allergens", skip(conn))]
pub async fn list_user_allergens(mut conn: DbConnection, user_id: i32) -> Result<Vec<String>, anyhow::Error> {
    let codes = spawn_blocking_with_tracing(move || {
        user_allergens::table
            .filter(user_allergens::user_id.eq(user_id))
            .order(user_allergens::allergen_code.asc())
            .select(user_allergens::allergen_code)
            .load::<String>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to list user allergens")?;

    Ok(codes)
}

// Adding an allergen twice is a no-op
#[tracing::instrument("Adding user allergen", skip(conn))]
pub async fn add_user_allergen(mut conn: DbConnection, user_id: i32, code: String) -> Result<(), anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(user_allergens::table)
            .values((
                user_allergens::user_id.eq(user_id),
                user_allergens::allergen_code.eq(code)
            ))
            .on_conflict((user_allergens::user_id, user_allergens::allergen_code))
            .do_nothing()
            .execute(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to add user allergen")?;

    Ok(())
}

#[tracing::instrument("Removing user allergen", skip(conn))]
pub async fn remove_user_allergen(mut conn: DbConnection, user_id: i32, code: String) -> Result<(), anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        diesel::delete(
                user_allergens::table
                    .filter(user_allergens::user_id.eq(user_id))
                    .filter(user_allergens::allergen_code.eq(code))
            )
            .execute(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to remove user allergen")?;

    Ok(())
}
