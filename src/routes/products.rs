use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::{
    db_interaction::catalogue::{list_allergens, list_rescue_menus},
    error::ApiError,
    models::RescueMenu,
    utils::{get_pooled_connection, DbPool},
};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RescueMenuResponse{
    pub id: i32,
    pub name_es: String,
    pub name_en: Option<String>,
    pub price: f64
}

impl From<RescueMenu> for RescueMenuResponse {
    fn from(menu: RescueMenu) -> Self {
        Self{ id: menu.id, name_es: menu.name_es, name_en: menu.name_en, price: menu.price }
    }
}

#[tracing::instrument("Listing allergens", skip(pool))]
pub async fn get_allergens(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    Ok(HttpResponse::Ok().json(list_allergens(conn).await?))
}

#[tracing::instrument("Listing rescue menus", skip(pool))]
pub async fn get_rescue_menus(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let menus: Vec<RescueMenuResponse> = list_rescue_menus(conn)
        .await?
        .into_iter()
        .map(RescueMenuResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(menus))
}
