use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::allergens::{add_user_allergen, list_user_allergens, remove_user_allergen},
    domain::field_rules::check_length,
    error::ApiError,
    utils::{get_pooled_connection, DbPool},
};

#[derive(Serialize, Debug)]
pub struct UserAllergens{
    pub allergens: Vec<String>
}

fn allergen_code(raw: String) -> Result<String, ApiError> {
    let code = raw.trim().to_string();
    check_length("allergen code", &code, 1, 50).map_err(ApiError::BadRequest)?;
    Ok(code)
}

#[tracing::instrument("Listing allergens of logged in user", skip(pool))]
pub async fn get_user_allergens(
    pool: web::Data<DbPool>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let allergens = list_user_allergens(conn, uid.0).await?;

    Ok(HttpResponse::Ok().json(UserAllergens{ allergens }))
}

#[tracing::instrument("Adding allergen to logged in user", skip(pool))]
pub async fn post_user_allergen(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let code = allergen_code(path.into_inner())?;

    let conn = get_pooled_connection(&pool).await?;
    add_user_allergen(conn, uid.0, code).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument("Removing allergen from logged in user", skip(pool))]
pub async fn delete_user_allergen(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let code = allergen_code(path.into_inner())?;

    let conn = get_pooled_connection(&pool).await?;
    remove_user_allergen(conn, uid.0, code).await?;

    Ok(HttpResponse::NoContent().finish())
}
