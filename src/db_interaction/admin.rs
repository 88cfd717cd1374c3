use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{prelude::*, sql_types::{BigInt, Double, Integer, Nullable, Text}};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::order_status::OrderStatus,
    schema::{orders, products, users},
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection,
};

// Statuses whose totals count as revenue
pub const REVENUE_STATUSES: [OrderStatus; 3] = [
    OrderStatus::Confirmed,
    OrderStatus::Prepared,
    OrderStatus::Delivered,
];

fn revenue_statuses() -> Vec<&'static str> {
    REVENUE_STATUSES.iter().map(OrderStatus::as_str).collect()
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics{
    pub total_orders: i64,
    pub total_revenue: f64,
    pub total_products: i64,
    pub total_users: i64
}

#[tracing::instrument("Computing dashboard metrics", skip(conn))]
pub async fn get_dashboard_metrics(mut conn: DbConnection) -> Result<DashboardMetrics, anyhow::Error> {
    let metrics = spawn_blocking_with_tracing(move || -> QueryResult<DashboardMetrics> {
        let total_orders = orders::table.count().get_result::<i64>(&mut conn)?;

        let total_revenue = orders::table
            .filter(orders::status.eq_any(revenue_statuses()))
            .select(diesel::dsl::sum(orders::total))
            .first::<Option<f64>>(&mut conn)?
            .unwrap_or(0.0);

        let total_products = products::table
            .filter(products::is_active.eq(true))
            .count()
            .get_result::<i64>(&mut conn)?;

        let total_users = users::table.count().get_result::<i64>(&mut conn)?;

        Ok(DashboardMetrics{ total_orders, total_revenue, total_products, total_users })
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to compute dashboard metrics")?;

    Ok(metrics)
}

#[derive(Queryable, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder{
    pub id: i32,
    pub uuid: Uuid,
    pub customer_name: String,
    pub order_type: String,
    pub status: String,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>
}

#[tracing::instrument("Listing recent orders", skip(conn))]
pub async fn get_recent_orders(mut conn: DbConnection, limit: i64) -> Result<Vec<RecentOrder>, anyhow::Error> {
    let recent = spawn_blocking_with_tracing(move || {
        orders::table
            .inner_join(users::table)
            .order((orders::created_at.desc(), orders::id.desc()))
            .limit(limit)
            .select((
                orders::id,
                orders::uuid,
                users::name,
                orders::delivery_type,
                orders::status,
                orders::total,
                orders::created_at
            ))
            .load::<RecentOrder>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to list recent orders")?;

    Ok(recent)
}

#[derive(QueryableByName, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct{
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub name_es: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub name_en: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub total_sold: i64,
    #[diesel(sql_type = Double)]
    pub revenue: f64
}

#[tracing::instrument("Listing top products", skip(conn))]
pub async fn get_top_products(mut conn: DbConnection, limit: i64) -> Result<Vec<TopProduct>, anyhow::Error> {
    let top = spawn_blocking_with_tracing(move || {
        diesel::sql_query(
            "SELECT p.id, p.name_es, p.name_en, \
                    SUM(oi.quantity)::int8 AS total_sold, \
                    SUM(oi.line_total)::float8 AS revenue \
             FROM order_items oi \
             INNER JOIN orders o ON o.id = oi.order_id \
             INNER JOIN products p ON p.id = oi.product_id \
             WHERE o.status IN ('confirmed', 'prepared', 'delivered') \
             GROUP BY p.id, p.name_es, p.name_en \
             ORDER BY total_sold DESC, p.id ASC \
             LIMIT $1"
        )
        .bind::<BigInt, _>(limit)
        .load::<TopProduct>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to list top products")?;

    Ok(top)
}
