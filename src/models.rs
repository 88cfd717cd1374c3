use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{
    deliveries, delivery_drivers, delivery_locations, invoices, loyalty_accounts,
    loyalty_redemptions, loyalty_rules, order_items, orders, payments, pickup_slots,
    rescue_menus, user_addresses, users, venues,
};

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User{
    pub id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser{
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = venues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Venue{
    pub id: i32,
    pub uuid: Uuid,
    pub code: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub timezone: String,
    pub is_active: bool
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = delivery_drivers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryDriver{
    pub id: i32,
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub is_available: bool,
    pub vehicle_type: Option<String>,
    pub vehicle_plate: Option<String>
}

#[derive(Insertable)]
#[diesel(table_name = delivery_drivers)]
pub struct NewDeliveryDriver{
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_available: bool,
    pub vehicle_type: Option<String>,
    pub vehicle_plate: Option<String>
}

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = pickup_slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct PickupSlot{
    pub id: i32,
    pub venue_id: i32,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub booked_count: i32,
    pub is_active: bool
}

#[derive(Insertable)]
#[diesel(table_name = pickup_slots)]
pub struct NewPickupSlot{
    pub venue_id: i32,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub booked_count: i32
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order{
    pub id: i32,
    pub uuid: Uuid,
    pub user_id: i32,
    pub status: String,
    pub delivery_type: String,
    pub pickup_slot_id: Option<i32>,
    pub payment_intent_id: Option<String>,
    pub driver_id: Option<i32>,
    pub subtotal: f64,
    pub total: f64,
    pub currency: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder{
    pub uuid: Uuid,
    pub user_id: i32,
    pub status: String,
    pub delivery_type: String,
    pub pickup_slot_id: Option<i32>,
    pub payment_intent_id: Option<String>,
    pub subtotal: f64,
    pub total: f64,
    pub currency: String,
    pub notes: Option<String>
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItem{
    pub id: i32,
    pub order_id: i32,
    pub item_type: String,
    pub product_id: Option<i32>,
    pub rescue_menu_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem{
    pub order_id: i32,
    pub item_type: String,
    pub product_id: Option<i32>,
    pub rescue_menu_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Delivery{
    pub id: i32,
    pub order_id: i32,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub phone: Option<String>,
    pub delivery_status: String
}

#[derive(Insertable)]
#[diesel(table_name = deliveries)]
pub struct NewDelivery{
    pub order_id: i32,
    pub user_address_id: Option<i32>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub delivery_notes: Option<String>,
    pub estimated_delivery_date: Option<NaiveDate>,
    pub estimated_delivery_time_start: Option<NaiveTime>,
    pub estimated_delivery_time_end: Option<NaiveTime>,
    pub delivery_status: String
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = delivery_locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryLocation{
    pub delivery_user_id: i32,
    pub order_id: Option<i32>,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Payment{
    pub id: i32,
    pub stripe_payment_intent_id: String,
    pub order_id: Option<i32>,
    pub user_id: i32,
    pub amount: i32,
    pub currency: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub receipt_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment{
    pub stripe_payment_intent_id: String,
    pub order_id: Option<i32>,
    pub user_id: i32,
    pub amount: i32,
    pub currency: String,
    pub status: String
}

#[derive(Insertable)]
#[diesel(table_name = invoices)]
pub struct NewInvoice{
    pub uuid: Uuid,
    pub number: String,
    pub user_id: i32,
    pub order_id: i32,
    pub status: String,
    pub total: f64
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = user_addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserAddress{
    pub id: i32,
    pub user_id: i32,
    pub label: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = user_addresses)]
pub struct NewUserAddress{
    pub user_id: i32,
    pub label: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub is_default: bool
}

// `None` leaves the column untouched
#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = user_addresses)]
pub struct UserAddressChangeset{
    pub label: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub is_default: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = loyalty_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LoyaltyAccount{
    pub id: i32,
    pub user_id: i32,
    pub points: i32,
    pub purchases_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = loyalty_rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LoyaltyRule{
    pub id: i32,
    pub every_n_purchases: i32
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = loyalty_redemptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LoyaltyRedemption{
    pub id: i32,
    pub user_id: i32,
    pub rule_id: i32,
    pub rescue_menu_id: i32,
    pub order_id: Option<i32>,
    pub redeemed_at: DateTime<Utc>,
    pub is_active: bool
}

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = rescue_menus)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RescueMenu{
    pub id: i32,
    pub name_es: String,
    pub name_en: Option<String>,
    pub price: f64,
    pub is_active: bool
}

// `None` leaves the column untouched
#[derive(AsChangeset, Debug)]
#[diesel(table_name = users)]
pub struct UserProfileChangeset{
    pub name: Option<String>,
    pub phone: Option<String>,
    pub updated_at: DateTime<Utc>
}
