use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    auth::extractors::IsCustomer,
    db_interaction::orders::{
        create_order, CreateOrderError, DeliveryAddress, DeliveryPlan, InlineAddress, ItemKind,
        OrderPlan, PlannedItem, SlotRequest, DEFAULT_VENUE_ID,
    },
    domain::{
        order_status::{DeliveryType, OrderStatus},
        pickup_window::{parse_date, parse_time},
    },
    error::ApiError,
    invoicing::InvoiceIssuer,
    utils::{get_pooled_connection, non_empty, DbPool},
};

use super::OrderResponse;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemJson{
    pub item_type: String,
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: f64
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderJson{
    pub items: Vec<OrderItemJson>,
    pub delivery_type: String,
    pub pickup_slot_id: Option<i32>,
    pub pickup_date: Option<String>,
    pub pickup_start_time: Option<String>,
    pub pickup_end_time: Option<String>,
    pub venue_id: Option<i32>,
    pub user_address_id: Option<i32>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub delivery_phone: Option<String>,
    pub delivery_notes: Option<String>,
    pub estimated_delivery_date: Option<String>,
    pub estimated_delivery_time: Option<String>,
    pub notes: Option<String>,
    pub payment_intent_id: Option<String>
}

fn planned_item(item: OrderItemJson) -> Result<PlannedItem, String> {
    let kind = match item.item_type.as_str() {
        "product" => ItemKind::Product,
        "menu" | "rescue_menu" => ItemKind::RescueMenu,
        other => return Err(format!("Invalid item type: {}", other))
    };
    if item.quantity < 1 {
        return Err("quantity must be at least 1".to_string());
    }
    if !item.unit_price.is_finite() || item.unit_price < 0.0 {
        return Err("unitPrice must not be negative".to_string());
    }

    Ok(PlannedItem{ kind, item_id: item.item_id, quantity: item.quantity, unit_price: item.unit_price })
}

fn slot_request(body: &CreateOrderJson) -> Result<SlotRequest, String> {
    if let Some(id) = body.pickup_slot_id {
        return Ok(SlotRequest::Existing(id));
    }

    match (&body.pickup_date, &body.pickup_start_time, &body.pickup_end_time) {
        (Some(date), Some(start), Some(end)) => Ok(SlotRequest::Window{
            venue_id: body.venue_id.unwrap_or(DEFAULT_VENUE_ID),
            date: parse_date(date)?,
            start: parse_time(start)?,
            end: parse_time(end)?
        }),
        _ => Ok(SlotRequest::None)
    }
}

fn delivery_plan(body: &mut CreateOrderJson) -> Result<DeliveryPlan, String> {
    let address = match body.user_address_id {
        Some(id) => DeliveryAddress::Saved(id),
        None => {
            let address_line1 = non_empty(body.address_line1.take());
            let city = non_empty(body.city.take());
            let postal_code = non_empty(body.postal_code.take());
            match (address_line1, city, postal_code) {
                (Some(address_line1), Some(city), Some(postal_code)) => DeliveryAddress::Inline(InlineAddress{
                    address_line1,
                    address_line2: non_empty(body.address_line2.take()),
                    city,
                    state_province: non_empty(body.state_province.take()),
                    postal_code,
                    country: non_empty(body.country.take())
                }),
                _ => return Err("addressLine1, city and postalCode are required for delivery orders without userAddressId".to_string())
            }
        }
    };

    Ok(DeliveryPlan{
        address,
        phone: non_empty(body.delivery_phone.take()),
        notes: non_empty(body.delivery_notes.take()),
        estimated_date: body.estimated_delivery_date.as_deref().map(parse_date).transpose()?,
        estimated_time: body.estimated_delivery_time.as_deref().map(parse_time).transpose()?
    })
}

fn order_plan(user_id: i32, mut body: CreateOrderJson) -> Result<OrderPlan, String> {
    let delivery_type = DeliveryType::parse(&body.delivery_type)?;

    if body.items.is_empty() {
        return Err("Order must contain at least one item".to_string());
    }

    let (slot, delivery) = match delivery_type {
        DeliveryType::Pickup => (slot_request(&body)?, None),
        DeliveryType::Delivery => (SlotRequest::None, Some(delivery_plan(&mut body)?))
    };

    let items = std::mem::take(&mut body.items)
        .into_iter()
        .map(planned_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OrderPlan{
        user_id,
        delivery_type,
        items,
        slot,
        payment_intent_id: non_empty(body.payment_intent_id),
        notes: non_empty(body.notes),
        delivery
    })
}

impl From<CreateOrderError> for ApiError {
    fn from(e: CreateOrderError) -> Self {
        match e {
            CreateOrderError::PaymentNotFound
            | CreateOrderError::PaymentNotCompleted(_)
            | CreateOrderError::PaymentOwnerMismatch
            | CreateOrderError::AddressNotFound(_)
            | CreateOrderError::SlotFull(_)
            | CreateOrderError::UnknownItem => ApiError::BadRequest(e.to_string()),
            CreateOrderError::SlotNotFound(_)
            | CreateOrderError::VenueNotFound(_) => ApiError::NotFound(e.to_string()),
            CreateOrderError::ThreadpoolError(_)
            | CreateOrderError::RunQueryError(_) => ApiError::Unexpected(anyhow::Error::new(e))
        }
    }
}

#[tracing::instrument(
    "Posting order",
    skip(pool, invoices, json)
)]
pub async fn post_order(
    pool: web::Data<DbPool>,
    invoices: web::Data<InvoiceIssuer>,
    json: web::Json<CreateOrderJson>,
    uid: IsCustomer
) -> Result<HttpResponse, ApiError> {
    let plan = order_plan(uid.0, json.into_inner()).map_err(ApiError::BadRequest)?;

    let conn = get_pooled_connection(&pool).await?;
    let details = create_order(conn, plan).await?;

    let status = OrderStatus::parse(&details.order.status).map_err(|e| ApiError::Unexpected(anyhow::anyhow!(e)))?;
    if matches!(status, OrderStatus::Confirmed | OrderStatus::Delivered) {
        invoices.request(details.order.id);
    }

    Ok(HttpResponse::Created().json(OrderResponse::from(details)))
}
