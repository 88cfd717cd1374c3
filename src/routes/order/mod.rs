mod get;
mod location;
mod post;
mod stats;
mod status;

pub use get::*;
pub use location::*;
pub use post::*;
pub use stats::*;
pub use status::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{db_interaction::orders::OrderDetails, models::{Delivery, OrderItem}};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse{
    pub id: i32,
    pub item_type: String,
    pub product_id: Option<i32>,
    pub rescue_menu_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self{
            id: item.id,
            item_type: item.item_type,
            product_id: item.product_id,
            rescue_menu_id: item.rescue_menu_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total,
            created_at: item.created_at,
            updated_at: item.updated_at
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo{
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub phone: Option<String>
}

impl From<Delivery> for DeliveryInfo {
    fn from(d: Delivery) -> Self {
        Self{
            address_line1: d.address_line1,
            address_line2: d.address_line2,
            city: d.city,
            postal_code: d.postal_code,
            phone: d.phone
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse{
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
    pub items: Vec<OrderItemResponse>,
    pub delivery: Option<DeliveryInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let OrderDetails{ order, items, delivery } = details;
        Self{
            id: order.id,
            uuid: order.uuid,
            user_id: order.user_id,
            status: order.status,
            delivery_type: order.delivery_type,
            pickup_slot_id: order.pickup_slot_id,
            payment_intent_id: order.payment_intent_id,
            driver_id: order.driver_id,
            subtotal: order.subtotal,
            total: order.total,
            currency: order.currency,
            notes: order.notes,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
            delivery: delivery.map(DeliveryInfo::from),
            created_at: order.created_at,
            updated_at: order.updated_at
        }
    }
}
