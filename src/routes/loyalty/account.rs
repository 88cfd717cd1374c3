use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::loyalty::{get_active_rule, get_or_create_account},
    domain::loyalty::RewardProgress,
    error::ApiError,
    models::LoyaltyAccount,
    utils::{get_pooled_connection, DbPool},
};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyAccountResponse{
    pub id: i32,
    pub user_id: i32,
    pub points: i32,
    pub purchases_count: i32,
    pub purchases_until_reward: i32,
    pub has_available_reward: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl LoyaltyAccountResponse {
    pub fn new(account: LoyaltyAccount, every_n_purchases: Option<i32>) -> Self {
        let progress = RewardProgress::new(account.purchases_count, every_n_purchases);
        Self{
            id: account.id,
            user_id: account.user_id,
            points: account.points,
            purchases_count: account.purchases_count,
            purchases_until_reward: progress.purchases_until_reward(),
            has_available_reward: progress.has_available_reward(),
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at
        }
    }
}

#[tracing::instrument("Getting loyalty account of logged in user", skip(pool))]
pub async fn get_loyalty_account(
    pool: web::Data<DbPool>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let account = get_or_create_account(get_pooled_connection(&pool).await?, uid.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("Loyalty account not found".into()))?;
    let rule = get_active_rule(get_pooled_connection(&pool).await?).await?;

    Ok(HttpResponse::Ok().json(LoyaltyAccountResponse::new(account, rule.map(|r| r.every_n_purchases))))
}
