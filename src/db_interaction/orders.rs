use std::{collections::HashMap, error::Error, fmt::Debug};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::{prelude::*, result::DatabaseErrorKind, sql_types::{BigInt, Double, Integer, Text}};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    db_interaction::loyalty::count_purchase,
    domain::{order_status::{DeliveryType, OrderStatus}, ranking::DriverTally, stats::OrderSnapshot},
    models::{Delivery, NewDelivery, NewOrder, NewOrderItem, NewPickupSlot, Order, OrderItem, Payment, UserAddress},
    schema::{deliveries, delivery_drivers, order_items, orders, payments, pickup_slots, user_addresses},
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection},
};

pub const DEFAULT_VENUE_ID: i32 = 1;
pub const DEFAULT_SLOT_CAPACITY: i32 = 100;
pub const DEFAULT_COUNTRY: &str = "España";

#[derive(Debug, Clone)]
pub struct OrderDetails{
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub delivery: Option<Delivery>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind{
    Product,
    RescueMenu
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Product => "product",
            ItemKind::RescueMenu => "rescue_menu"
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannedItem{
    pub kind: ItemKind,
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: f64
}

impl PlannedItem {
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

#[derive(Debug, Clone)]
pub enum SlotRequest{
    None,
    Existing(i32),
    Window{ venue_id: i32, date: NaiveDate, start: NaiveTime, end: NaiveTime }
}

#[derive(Debug, Clone)]
pub struct InlineAddress{
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: Option<String>,
    pub postal_code: String,
    pub country: Option<String>
}

#[derive(Debug, Clone)]
pub enum DeliveryAddress{
    Saved(i32),
    Inline(InlineAddress)
}

#[derive(Debug, Clone)]
pub struct DeliveryPlan{
    pub address: DeliveryAddress,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub estimated_date: Option<NaiveDate>,
    pub estimated_time: Option<NaiveTime>
}

// Everything the order transaction needs, validated by the handler
#[derive(Debug, Clone)]
pub struct OrderPlan{
    pub user_id: i32,
    pub delivery_type: DeliveryType,
    pub items: Vec<PlannedItem>,
    pub slot: SlotRequest,
    pub payment_intent_id: Option<String>,
    pub notes: Option<String>,
    pub delivery: Option<DeliveryPlan>
}

impl OrderPlan {
    pub fn total(&self) -> f64 {
        self.items.iter().map(PlannedItem::line_total).sum()
    }

    // Paid orders skip the payment step
    pub fn initial_status(&self) -> OrderStatus {
        if self.payment_intent_id.is_some() {
            OrderStatus::Confirmed
        } else {
            OrderStatus::PendingPayment
        }
    }
}

#[derive(Error)]
pub enum CreateOrderError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Payment intent not found")]
    PaymentNotFound,
    #[error("Payment is not completed. Current status: {0}")]
    PaymentNotCompleted(String),
    #[error("Payment does not belong to this user")]
    PaymentOwnerMismatch,
    #[error("Address not found or does not belong to this user")]
    AddressNotFound(i32),
    #[error("Pickup slot not found")]
    SlotNotFound(i32),
    #[error("Pickup slot is full")]
    SlotFull(i32),
    #[error("Venue not found")]
    VenueNotFound(i32),
    #[error("One or more ordered items do not exist")]
    UnknownItem
}

impl Debug for CreateOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

fn check_payment(conn: &mut PgConnection, intent_id: &str, user_id: i32) -> Result<Payment, CreateOrderError> {
    let payment = payments::table
        .filter(payments::stripe_payment_intent_id.eq(intent_id))
        .select(Payment::as_select())
        .first::<Payment>(conn)
        .optional()?
        .ok_or(CreateOrderError::PaymentNotFound)?;

    if payment.status != "succeeded" {
        return Err(CreateOrderError::PaymentNotCompleted(payment.status));
    }
    if payment.user_id != user_id {
        return Err(CreateOrderError::PaymentOwnerMismatch);
    }

    Ok(payment)
}

fn owned_address(conn: &mut PgConnection, address_id: i32, user_id: i32) -> Result<UserAddress, CreateOrderError> {
    user_addresses::table
        .filter(user_addresses::id.eq(address_id))
        .filter(user_addresses::user_id.eq(user_id))
        .filter(user_addresses::is_active.eq(true))
        .select(UserAddress::as_select())
        .first::<UserAddress>(conn)
        .optional()?
        .ok_or(CreateOrderError::AddressNotFound(address_id))
}

fn slot_for_window(
    conn: &mut PgConnection,
    venue_id: i32,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime
) -> Result<i32, CreateOrderError> {
    let slot = NewPickupSlot{
        venue_id,
        slot_date: date,
        start_time: start,
        end_time: end,
        capacity: DEFAULT_SLOT_CAPACITY,
        booked_count: 0
    };

    diesel::insert_into(pickup_slots::table)
        .values(&slot)
        .on_conflict((
            pickup_slots::venue_id,
            pickup_slots::slot_date,
            pickup_slots::start_time,
            pickup_slots::end_time
        ))
        .do_nothing()
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                CreateOrderError::VenueNotFound(venue_id)
            },
            other => CreateOrderError::RunQueryError(other)
        })?;

    let id = pickup_slots::table
        .filter(pickup_slots::venue_id.eq(venue_id))
        .filter(pickup_slots::slot_date.eq(date))
        .filter(pickup_slots::start_time.eq(start))
        .filter(pickup_slots::end_time.eq(end))
        .select(pickup_slots::id)
        .first::<i32>(conn)?;

    Ok(id)
}

// Single conditional update, concurrent bookings can never push booked_count past capacity
pub fn book_slot(conn: &mut PgConnection, slot_id: i32) -> Result<(), CreateOrderError> {
    let booked = diesel::update(
            pickup_slots::table
                .filter(pickup_slots::id.eq(slot_id))
                .filter(pickup_slots::is_active.eq(true))
                .filter(pickup_slots::booked_count.lt(pickup_slots::capacity))
        )
        .set((
            pickup_slots::booked_count.eq(pickup_slots::booked_count + 1),
            pickup_slots::updated_at.eq(Utc::now())
        ))
        .execute(conn)?;

    if booked == 0 {
        let exists = pickup_slots::table
            .filter(pickup_slots::id.eq(slot_id))
            .filter(pickup_slots::is_active.eq(true))
            .select(pickup_slots::id)
            .first::<i32>(conn)
            .optional()?;

        return Err(match exists {
            Some(_) => CreateOrderError::SlotFull(slot_id),
            None => CreateOrderError::SlotNotFound(slot_id)
        });
    }

    Ok(())
}

fn delivery_row(conn: &mut PgConnection, order_id: i32, user_id: i32, plan: DeliveryPlan) -> Result<NewDelivery, CreateOrderError> {
    let mut row = NewDelivery{
        order_id,
        user_address_id: None,
        address_line1: String::new(),
        address_line2: None,
        city: String::new(),
        state_province: None,
        postal_code: String::new(),
        country: DEFAULT_COUNTRY.to_string(),
        phone: None,
        delivery_notes: plan.notes,
        estimated_delivery_date: plan.estimated_date,
        estimated_delivery_time_start: plan.estimated_time,
        estimated_delivery_time_end: plan.estimated_time,
        delivery_status: "pending".to_string()
    };

    match plan.address {
        DeliveryAddress::Saved(address_id) => {
            let address = owned_address(conn, address_id, user_id)?;
            row.user_address_id = Some(address.id);
            row.address_line1 = address.address_line1;
            row.address_line2 = address.address_line2;
            row.city = address.city;
            row.state_province = address.state_province;
            row.postal_code = address.postal_code;
            row.country = address.country;
            row.phone = Some(address.phone.or(plan.phone).unwrap_or_default());
        },
        DeliveryAddress::Inline(inline) => {
            row.address_line1 = inline.address_line1;
            row.address_line2 = inline.address_line2;
            row.city = inline.city;
            row.state_province = inline.state_province;
            row.postal_code = inline.postal_code;
            if let Some(country) = inline.country {
                row.country = country;
            }
            row.phone = Some(plan.phone.unwrap_or_default());
        }
    }

    Ok(row)
}

#[tracing::instrument(
    "Creating order with items, slot booking and delivery",
    skip_all,
    fields(user_id = plan.user_id)
)]
pub async fn create_order(
    mut conn: DbConnection,
    plan: OrderPlan
) -> Result<OrderDetails, CreateOrderError> {
    let details = spawn_blocking_with_tracing(move || {
        conn.transaction::<OrderDetails, CreateOrderError, _>(|conn| {
            let payment = match plan.payment_intent_id.as_deref() {
                Some(intent_id) => Some(check_payment(conn, intent_id, plan.user_id)?),
                None => None
            };

            // Addresses are checked before anything is written
            if let Some(DeliveryPlan{ address: DeliveryAddress::Saved(address_id), .. }) = &plan.delivery {
                owned_address(conn, *address_id, plan.user_id)?;
            }

            let pickup_slot_id = match (&plan.delivery_type, &plan.slot) {
                (DeliveryType::Pickup, SlotRequest::Existing(id)) => {
                    book_slot(conn, *id)?;
                    Some(*id)
                },
                (DeliveryType::Pickup, SlotRequest::Window{ venue_id, date, start, end }) => {
                    let id = slot_for_window(conn, *venue_id, *date, *start, *end)?;
                    book_slot(conn, id)?;
                    Some(id)
                },
                _ => None
            };

            let total = plan.total();
            let new_order = NewOrder{
                uuid: Uuid::new_v4(),
                user_id: plan.user_id,
                status: plan.initial_status().as_str().to_string(),
                delivery_type: plan.delivery_type.as_str().to_string(),
                pickup_slot_id,
                payment_intent_id: plan.payment_intent_id.clone(),
                subtotal: total,
                total,
                currency: "EUR".to_string(),
                notes: plan.notes.clone()
            };

            let order = diesel::insert_into(orders::table)
                .values(&new_order)
                .returning(Order::as_returning())
                .get_result::<Order>(conn)?;

            let new_items: Vec<NewOrderItem> = plan.items.iter()
                .map(|item| NewOrderItem{
                    order_id: order.id,
                    item_type: item.kind.as_str().to_string(),
                    product_id: (item.kind == ItemKind::Product).then_some(item.item_id),
                    rescue_menu_id: (item.kind == ItemKind::RescueMenu).then_some(item.item_id),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total()
                })
                .collect();

            let items = diesel::insert_into(order_items::table)
                .values(&new_items)
                .returning(OrderItem::as_returning())
                .get_results::<OrderItem>(conn)
                .map_err(|e| match e {
                    diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        CreateOrderError::UnknownItem
                    },
                    other => CreateOrderError::RunQueryError(other)
                })?;

            let delivery = match (plan.delivery_type, plan.delivery.clone()) {
                (DeliveryType::Delivery, Some(delivery_plan)) => {
                    let row = delivery_row(conn, order.id, plan.user_id, delivery_plan)?;
                    Some(
                        diesel::insert_into(deliveries::table)
                            .values(&row)
                            .returning(Delivery::as_returning())
                            .get_result::<Delivery>(conn)?
                    )
                },
                _ => None
            };

            if let Some(payment) = payment {
                diesel::update(payments::table.find(payment.id))
                    .set((
                        payments::order_id.eq(order.id),
                        payments::updated_at.eq(Utc::now())
                    ))
                    .execute(conn)?;
            }

            Ok(OrderDetails{ order, items, delivery })
        })
    })
    .await??;

    Ok(details)
}

fn attach_details(conn: &mut PgConnection, orders: Vec<Order>) -> QueryResult<Vec<OrderDetails>> {
    let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();

    let items = order_items::table
        .filter(order_items::order_id.eq_any(ids.clone()))
        .order(order_items::id.asc())
        .select(OrderItem::as_select())
        .load::<OrderItem>(conn)?;

    let delivery_rows = deliveries::table
        .filter(deliveries::order_id.eq_any(ids))
        .select(Delivery::as_select())
        .load::<Delivery>(conn)?;

    let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for item in items {
        items_by_order.entry(item.order_id).or_default().push(item);
    }
    let mut delivery_by_order: HashMap<i32, Delivery> = delivery_rows.into_iter()
        .map(|d| (d.order_id, d))
        .collect();

    Ok(orders.into_iter()
        .map(|order| OrderDetails{
            items: items_by_order.remove(&order.id).unwrap_or_default(),
            delivery: delivery_by_order.remove(&order.id),
            order
        })
        .collect())
}

#[tracing::instrument("Fetching order by id", skip(conn))]
pub async fn get_order(mut conn: DbConnection, order_id: i32) -> Result<Option<Order>, anyhow::Error> {
    let order = spawn_blocking_with_tracing(move || {
        orders::table
            .find(order_id)
            .select(Order::as_select())
            .first::<Order>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query order")?;

    Ok(order)
}

#[tracing::instrument("Fetching order with items", skip(conn))]
pub async fn get_order_with_items(mut conn: DbConnection, order_id: i32) -> Result<Option<OrderDetails>, anyhow::Error> {
    let details = spawn_blocking_with_tracing(move || -> QueryResult<Option<OrderDetails>> {
        let order = orders::table
            .find(order_id)
            .select(Order::as_select())
            .first::<Order>(&mut conn)
            .optional()?;

        match order {
            Some(order) => Ok(attach_details(&mut conn, vec![order])?.pop()),
            None => Ok(None)
        }
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query order with items")?;

    Ok(details)
}

#[tracing::instrument("Fetching orders of user", skip(conn))]
pub async fn get_user_orders(mut conn: DbConnection, user_id: i32) -> Result<Vec<OrderDetails>, anyhow::Error> {
    let details = spawn_blocking_with_tracing(move || -> QueryResult<Vec<OrderDetails>> {
        let user_orders = orders::table
            .filter(orders::user_id.eq(user_id))
            .filter(orders::is_active.eq(true))
            .order((orders::created_at.desc(), orders::id.desc()))
            .select(Order::as_select())
            .load::<Order>(&mut conn)?;

        attach_details(&mut conn, user_orders)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query orders of user")?;

    Ok(details)
}

#[tracing::instrument("Fetching pickup orders for the restaurant", skip(conn))]
pub async fn get_restaurant_orders(mut conn: DbConnection) -> Result<Vec<OrderDetails>, anyhow::Error> {
    let visible = [
        OrderStatus::Confirmed.as_str(),
        OrderStatus::Prepared.as_str(),
        OrderStatus::Delivered.as_str(),
        OrderStatus::Completed.as_str(),
    ];

    let details = spawn_blocking_with_tracing(move || -> QueryResult<Vec<OrderDetails>> {
        let pickup_orders = orders::table
            .filter(orders::delivery_type.eq(DeliveryType::Pickup.as_str()))
            .filter(orders::is_active.eq(true))
            .filter(orders::status.eq_any(visible))
            .order((orders::created_at.desc(), orders::id.desc()))
            .select(Order::as_select())
            .load::<Order>(&mut conn)?;

        attach_details(&mut conn, pickup_orders)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query restaurant orders")?;

    Ok(details)
}

#[derive(Debug, Clone, Copy)]
pub enum SnapshotScope{
    User(i32),
    PickupOrders
}

#[tracing::instrument("Loading order snapshots for stats", skip(conn))]
pub async fn get_order_snapshots(mut conn: DbConnection, scope: SnapshotScope) -> Result<Vec<OrderSnapshot>, anyhow::Error> {
    let rows = spawn_blocking_with_tracing(move || {
        let query = orders::table
            .filter(orders::is_active.eq(true))
            .select((orders::status, orders::total, orders::created_at))
            .into_boxed();

        let query = match scope {
            SnapshotScope::User(user_id) => query.filter(orders::user_id.eq(user_id)),
            SnapshotScope::PickupOrders => query.filter(orders::delivery_type.eq(DeliveryType::Pickup.as_str()))
        };

        query.load::<(String, f64, DateTime<Utc>)>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to load order snapshots")?;

    Ok(rows.into_iter()
        .map(|(status, total, created_at)| OrderSnapshot{ status, total, created_at })
        .collect())
}

// What a status change writes besides the status itself
#[derive(Debug, Clone, Default)]
pub struct StatusChange{
    pub assign_driver: Option<i32>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub credit_purchase_to: Option<i32>
}

#[derive(Error)]
pub enum UpdateOrderStatusError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Order with ID {0} not found")]
    NoOrderIdError(i32),
    #[error("Order with ID {0} was updated by another request")]
    StatusChangedError(i32)
}

impl Debug for UpdateOrderStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Only moves the order if it is still in `from`, so two racing transitions cannot both apply
fn update_status(
    conn: &mut PgConnection,
    order_id: i32,
    from: OrderStatus,
    to: OrderStatus
) -> Result<(), UpdateOrderStatusError> {
    let affected_rows = diesel::update(
        orders::table
            .find(order_id)
            .filter(orders::status.eq(from.as_str()))
    )
    .set((orders::status.eq(to.as_str()), orders::updated_at.eq(Utc::now())))
    .execute(conn)?;

    if affected_rows == 0 {
        let exists = diesel::select(diesel::dsl::exists(orders::table.find(order_id)))
            .get_result::<bool>(conn)?;
        return Err(match exists {
            true => UpdateOrderStatusError::StatusChangedError(order_id),
            false => UpdateOrderStatusError::NoOrderIdError(order_id)
        });
    }
    Ok(())
}

fn assign_driver(conn: &mut PgConnection, order_id: i32, driver_id: i32) -> QueryResult<()> {
    diesel::update(orders::table.find(order_id))
        .set(orders::driver_id.eq(Some(driver_id)))
        .execute(conn)?;

    diesel::update(deliveries::table.filter(deliveries::order_id.eq(order_id)))
        .set((
            deliveries::driver_id.eq(Some(driver_id)),
            deliveries::updated_at.eq(Utc::now())
        ))
        .execute(conn)?;

    Ok(())
}

#[tracing::instrument("Applying order status change", skip(conn))]
pub async fn apply_status_change(
    mut conn: DbConnection,
    order_id: i32,
    from: OrderStatus,
    to: OrderStatus,
    change: StatusChange
) -> Result<(), UpdateOrderStatusError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), UpdateOrderStatusError, _>(|conn| {
            update_status(conn, order_id, from, to)?;

            if let Some(driver_id) = change.assign_driver {
                assign_driver(conn, order_id, driver_id)?;
            }
            if let Some(at) = change.delivered_at {
                diesel::update(orders::table.find(order_id))
                    .set(orders::delivered_at.eq(Some(at)))
                    .execute(conn)?;
            }
            if let Some(at) = change.completed_at {
                diesel::update(orders::table.find(order_id))
                    .set(orders::completed_at.eq(Some(at)))
                    .execute(conn)?;
            }
            if let Some(user_id) = change.credit_purchase_to {
                count_purchase(conn, user_id)?;
            }

            Ok(())
        })
    })
    .await??;

    Ok(())
}

#[tracing::instrument("Counting completed deliveries per driver", skip(conn))]
pub async fn get_monthly_driver_tallies(
    mut conn: DbConnection,
    month_start: DateTime<Utc>,
    month_end: DateTime<Utc>
) -> Result<Vec<DriverTally>, anyhow::Error> {
    let rows = spawn_blocking_with_tracing(move || {
        orders::table
            .inner_join(delivery_drivers::table)
            .filter(orders::status.eq(OrderStatus::Completed.as_str()))
            .filter(orders::updated_at.ge(month_start))
            .filter(orders::updated_at.lt(month_end))
            .group_by((delivery_drivers::id, delivery_drivers::name))
            .select((
                delivery_drivers::id,
                delivery_drivers::name,
                diesel::dsl::count(orders::id)
            ))
            .order(diesel::dsl::count(orders::id).desc())
            .load::<(i32, String, i64)>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to count deliveries per driver")?;

    Ok(rows.into_iter()
        .map(|(driver_id, name, deliveries)| DriverTally{
            driver_id,
            driver_name: Some(name),
            deliveries
        })
        .collect())
}

#[derive(QueryableByName, Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSpeed{
    #[diesel(sql_type = Integer)]
    pub driver_id: i32,
    #[diesel(sql_type = Text)]
    pub driver_name: String,
    #[diesel(sql_type = BigInt)]
    pub completed_orders: i64,
    #[diesel(sql_type = Double)]
    pub average_delivery_time: f64
}

// Top 3 by lowest average minutes between pick-up by the driver and completion
#[tracing::instrument("Computing fastest drivers", skip(conn))]
pub async fn get_fastest_drivers(mut conn: DbConnection) -> Result<Vec<DriverSpeed>, anyhow::Error> {
    let rows = spawn_blocking_with_tracing(move || {
        diesel::sql_query(
            "SELECT d.id AS driver_id, \
                    d.name AS driver_name, \
                    COUNT(o.id) AS completed_orders, \
                    COALESCE(AVG(EXTRACT(EPOCH FROM (o.completed_at - o.delivered_at)) / 60.0), 0)::float8 AS average_delivery_time \
             FROM orders o \
             INNER JOIN delivery_drivers d ON d.id = o.driver_id \
             WHERE o.status = 'completed' \
               AND o.delivered_at IS NOT NULL \
               AND o.completed_at IS NOT NULL \
             GROUP BY d.id, d.name \
             ORDER BY average_delivery_time ASC \
             LIMIT 3"
        )
        .load::<DriverSpeed>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to compute driver speeds")?;

    Ok(rows)
}
