use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::{
        catalogue::get_active_rescue_menu,
        loyalty::{get_account, get_active_rule, redeem_reward, RedeemError},
    },
    domain::loyalty::RewardProgress,
    error::ApiError,
    utils::{get_pooled_connection, DbPool},
};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RedeemJson{
    pub rescue_menu_id: i32
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionResponse{
    pub id: i32,
    pub user_id: i32,
    pub rule_id: i32,
    pub rescue_menu_id: i32,
    pub rescue_menu_name: String,
    pub order_id: Option<i32>,
    pub redeemed_at: DateTime<Utc>,
    pub is_active: bool
}

impl From<RedeemError> for ApiError {
    fn from(e: RedeemError) -> Self {
        match e {
            RedeemError::NoRewardAvailable => ApiError::BadRequest(e.to_string()),
            other => ApiError::Unexpected(anyhow::Error::new(other))
        }
    }
}

#[tracing::instrument("Redeeming loyalty reward", skip(pool))]
pub async fn redeem_loyalty_reward(
    pool: web::Data<DbPool>,
    json: web::Json<RedeemJson>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let account = get_account(get_pooled_connection(&pool).await?, uid.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("Loyalty account not found".into()))?;

    let rule = get_active_rule(get_pooled_connection(&pool).await?)
        .await?
        .ok_or_else(|| ApiError::NotFound("No active loyalty rule found".into()))?;

    let progress = RewardProgress::new(account.purchases_count, Some(rule.every_n_purchases));
    if !progress.has_available_reward() {
        return Err(ApiError::BadRequest(format!(
            "You need {} more purchases to get a reward",
            progress.missing_purchases()
        )));
    }

    let menu = get_active_rescue_menu(get_pooled_connection(&pool).await?, json.rescue_menu_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Rescue menu {} not found", json.rescue_menu_id)))?;

    let redemption = redeem_reward(
        get_pooled_connection(&pool).await?,
        uid.0,
        rule.id,
        account.purchases_count,
        menu.id
    )
    .await?;

    Ok(HttpResponse::Created().json(RedemptionResponse{
        id: redemption.id,
        user_id: redemption.user_id,
        rule_id: redemption.rule_id,
        rescue_menu_id: redemption.rescue_menu_id,
        rescue_menu_name: menu.name_es,
        order_id: redemption.order_id,
        redeemed_at: redemption.redeemed_at,
        is_active: redemption.is_active
    }))
}
