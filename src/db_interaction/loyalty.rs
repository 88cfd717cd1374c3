use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;
use thiserror::Error;

use crate::{
    models::{LoyaltyAccount, LoyaltyRedemption, LoyaltyRule},
    schema::{loyalty_accounts, loyalty_redemptions, loyalty_rules},
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection},
};

#[tracing::instrument("Fetching or opening loyalty account", skip(conn))]
pub async fn get_or_create_account(mut conn: DbConnection, user_id: i32) -> Result<Option<LoyaltyAccount>, anyhow::Error> {
    let account = spawn_blocking_with_tracing(move || -> QueryResult<Option<LoyaltyAccount>> {
        diesel::insert_into(loyalty_accounts::table)
            .values((
                loyalty_accounts::user_id.eq(user_id),
                loyalty_accounts::points.eq(0),
                loyalty_accounts::purchases_count.eq(0)
            ))
            .on_conflict(loyalty_accounts::user_id)
            .do_nothing()
            .execute(&mut conn)?;

        // A deactivated account is not reopened
        loyalty_accounts::table
            .filter(loyalty_accounts::user_id.eq(user_id))
            .filter(loyalty_accounts::is_active.eq(true))
            .select(LoyaltyAccount::as_select())
            .first::<LoyaltyAccount>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to load loyalty account")?;

    Ok(account)
}

#[tracing::instrument("Fetching loyalty account", skip(conn))]
pub async fn get_account(mut conn: DbConnection, user_id: i32) -> Result<Option<LoyaltyAccount>, anyhow::Error> {
    let account = spawn_blocking_with_tracing(move || {
        loyalty_accounts::table
            .filter(loyalty_accounts::user_id.eq(user_id))
            .filter(loyalty_accounts::is_active.eq(true))
            .select(LoyaltyAccount::as_select())
            .first::<LoyaltyAccount>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query loyalty account")?;

    Ok(account)
}

#[tracing::instrument("Fetching active loyalty rule", skip(conn))]
pub async fn get_active_rule(mut conn: DbConnection) -> Result<Option<LoyaltyRule>, anyhow::Error> {
    let rule = spawn_blocking_with_tracing(move || {
        loyalty_rules::table
            .filter(loyalty_rules::is_active.eq(true))
            .order((loyalty_rules::created_at.desc(), loyalty_rules::id.desc()))
            .select(LoyaltyRule::as_select())
            .first::<LoyaltyRule>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query loyalty rule")?;

    Ok(rule)
}

#[derive(Error)]
pub enum RedeemError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("No loyalty reward available to redeem")]
    NoRewardAvailable
}

impl Debug for RedeemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// `seen_purchases` is the count the reward was checked against. The reset only matches while
// the account still holds it, so concurrent redemptions of one reward leave a single winner
#[tracing::instrument("Redeeming loyalty reward", skip(conn))]
pub async fn redeem_reward(
    mut conn: DbConnection,
    user_id: i32,
    rule_id: i32,
    seen_purchases: i32,
    rescue_menu_id: i32
) -> Result<LoyaltyRedemption, RedeemError> {
    let redemption = spawn_blocking_with_tracing(move || {
        conn.transaction::<LoyaltyRedemption, RedeemError, _>(|conn| {
            let reset = diesel::update(
                loyalty_accounts::table
                    .filter(loyalty_accounts::user_id.eq(user_id))
                    .filter(loyalty_accounts::is_active.eq(true))
                    .filter(loyalty_accounts::purchases_count.eq(seen_purchases))
            )
            .set((
                loyalty_accounts::purchases_count.eq(0),
                loyalty_accounts::updated_at.eq(Utc::now())
            ))
            .execute(conn)?;

            if reset == 0 {
                return Err(RedeemError::NoRewardAvailable);
            }

            let redemption = diesel::insert_into(loyalty_redemptions::table)
                .values((
                    loyalty_redemptions::user_id.eq(user_id),
                    loyalty_redemptions::rule_id.eq(rule_id),
                    loyalty_redemptions::rescue_menu_id.eq(rescue_menu_id)
                ))
                .returning(LoyaltyRedemption::as_returning())
                .get_result::<LoyaltyRedemption>(conn)?;

            Ok(redemption)
        })
    })
    .await??;

    Ok(redemption)
}

// Opens the account on the first completed purchase
pub fn count_purchase(conn: &mut PgConnection, user_id: i32) -> QueryResult<usize> {
    diesel::insert_into(loyalty_accounts::table)
        .values((
            loyalty_accounts::user_id.eq(user_id),
            loyalty_accounts::points.eq(0),
            loyalty_accounts::purchases_count.eq(1)
        ))
        .on_conflict(loyalty_accounts::user_id)
        .do_update()
        .set((
            loyalty_accounts::purchases_count.eq(loyalty_accounts::purchases_count + 1),
            loyalty_accounts::updated_at.eq(Utc::now())
        ))
        .execute(conn)
}
