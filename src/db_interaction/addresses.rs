use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;
use thiserror::Error;

use crate::{
    models::{NewUserAddress, UserAddress, UserAddressChangeset},
    schema::user_addresses,
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection},
};

#[derive(Error)]
pub enum AddressError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Address {0} not found")]
    NotFound(i32)
}

impl Debug for AddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// A user keeps at most one default address
fn clear_default(conn: &mut PgConnection, user_id: i32, keep: Option<i32>) -> QueryResult<usize> {
    let others = user_addresses::table
        .filter(user_addresses::user_id.eq(user_id))
        .filter(user_addresses::is_default.eq(true))
        .into_boxed();

    let others = match keep {
        Some(id) => others.filter(user_addresses::id.ne(id)),
        None => others
    };

    let ids = others.select(user_addresses::id).load::<i32>(conn)?;

    diesel::update(user_addresses::table.filter(user_addresses::id.eq_any(ids)))
        .set((
            user_addresses::is_default.eq(false),
            user_addresses::updated_at.eq(Utc::now())
        ))
        .execute(conn)
}

#[tracing::instrument("Creating user address", skip(conn, new_address), fields(user_id = new_address.user_id))]
pub async fn create_address(mut conn: DbConnection, new_address: NewUserAddress) -> Result<UserAddress, AddressError> {
    let address = spawn_blocking_with_tracing(move || {
        conn.transaction::<UserAddress, AddressError, _>(|conn| {
            if new_address.is_default {
                clear_default(conn, new_address.user_id, None)?;
            }

            let address = diesel::insert_into(user_addresses::table)
                .values(&new_address)
                .returning(UserAddress::as_returning())
                .get_result::<UserAddress>(conn)?;

            Ok(address)
        })
    })
    .await??;

    Ok(address)
}

#[tracing::instrument("Listing user addresses", skip(conn))]
pub async fn list_addresses(mut conn: DbConnection, user_id: i32) -> Result<Vec<UserAddress>, anyhow::Error> {
    let addresses = spawn_blocking_with_tracing(move || {
        user_addresses::table
            .filter(user_addresses::user_id.eq(user_id))
            .filter(user_addresses::is_active.eq(true))
            .order((user_addresses::is_default.desc(), user_addresses::created_at.desc(), user_addresses::id.desc()))
            .select(UserAddress::as_select())
            .load::<UserAddress>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to list addresses")?;

    Ok(addresses)
}

#[tracing::instrument("Updating user address", skip(conn, changes))]
pub async fn update_address(
    mut conn: DbConnection,
    user_id: i32,
    address_id: i32,
    mut changes: UserAddressChangeset
) -> Result<UserAddress, AddressError> {
    changes.updated_at = Some(Utc::now());

    let address = spawn_blocking_with_tracing(move || {
        conn.transaction::<UserAddress, AddressError, _>(|conn| {
            let target = user_addresses::table
                .filter(user_addresses::id.eq(address_id))
                .filter(user_addresses::user_id.eq(user_id))
                .filter(user_addresses::is_active.eq(true));

            if changes.is_default == Some(true) {
                clear_default(conn, user_id, Some(address_id))?;
            }

            diesel::update(target)
                .set(&changes)
                .returning(UserAddress::as_returning())
                .get_result::<UserAddress>(conn)
                .optional()?
                .ok_or(AddressError::NotFound(address_id))
        })
    })
    .await??;

    Ok(address)
}

#[tracing::instrument("Soft deleting user address", skip(conn))]
pub async fn deactivate_address(mut conn: DbConnection, user_id: i32, address_id: i32) -> Result<(), AddressError> {
    spawn_blocking_with_tracing(move || {
        let affected_rows = diesel::update(
                user_addresses::table
                    .filter(user_addresses::id.eq(address_id))
                    .filter(user_addresses::user_id.eq(user_id))
                    .filter(user_addresses::is_active.eq(true))
            )
            .set((
                user_addresses::is_active.eq(false),
                user_addresses::is_default.eq(false),
                user_addresses::updated_at.eq(Utc::now())
            ))
            .execute(&mut conn)?;

        if affected_rows == 0 {
            return Err(AddressError::NotFound(address_id));
        }
        Ok(())
    })
    .await??;

    Ok(())
}

#[tracing::instrument("Setting default user address", skip(conn))]
pub async fn set_default_address(mut conn: DbConnection, user_id: i32, address_id: i32) -> Result<(), AddressError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), AddressError, _>(|conn| {
            clear_default(conn, user_id, Some(address_id))?;

            let affected_rows = diesel::update(
                    user_addresses::table
                        .filter(user_addresses::id.eq(address_id))
                        .filter(user_addresses::user_id.eq(user_id))
                        .filter(user_addresses::is_active.eq(true))
                )
                .set((
                    user_addresses::is_default.eq(true),
                    user_addresses::updated_at.eq(Utc::now())
                ))
                .execute(conn)?;

            if affected_rows == 0 {
                return Err(AddressError::NotFound(address_id));
            }
            Ok(())
        })
    })
    .await??;

    Ok(())
}
