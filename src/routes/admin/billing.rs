use actix_web::{web, HttpResponse};

use crate::{
    auth::extractors::IsAdmin,
    db_interaction::invoices::list_billing_records,
    error::ApiError,
    utils::{get_pooled_connection, DbPool},
};

#[tracing::instrument("Listing invoices for admin", skip(pool))]
pub async fn get_billing(
    pool: web::Data<DbPool>,
    _admin: IsAdmin
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let records = list_billing_records(conn).await?;

    Ok(HttpResponse::Ok().json(records))
}
