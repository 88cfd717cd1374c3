use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus{
    Draft,
    PendingPayment,
    Confirmed,
    Prepared,
    Delivered,
    Cancelled,
    Completed
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Draft,
        OrderStatus::PendingPayment,
        OrderStatus::Confirmed,
        OrderStatus::Prepared,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Completed,
    ];

    pub fn parse(status: &str) -> Result<Self, String> {
        match status {
            "draft" => Ok(OrderStatus::Draft),
            "pending_payment" => Ok(OrderStatus::PendingPayment),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "prepared" => Ok(OrderStatus::Prepared),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(format!("Invalid status: {}", other))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Prepared => "prepared",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Completed => "completed"
        }
    }

    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Draft => &[PendingPayment, Cancelled],
            PendingPayment => &[Confirmed, Cancelled],
            Confirmed => &[Prepared, Delivered, Cancelled],
            Prepared => &[Delivered, Cancelled],
            Delivered => &[Completed, Cancelled],
            Cancelled | Completed => &[]
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum TransitionError{
    NotAllowed{ from: OrderStatus, to: OrderStatus },
    DriverMismatch
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::NotAllowed { from, to } => {
                write!(f, "Cannot change status from '{}' to '{}'", from, to)
            },
            TransitionError::DriverMismatch => {
                write!(f, "Only the assigned delivery driver can complete this order")
            }
        }
    }
}

// Completion is only accepted from the driver the order is assigned to
pub fn check_transition(
    current: OrderStatus,
    requested: OrderStatus,
    acting_driver: Option<i32>,
    assigned_driver: Option<i32>
) -> Result<(), TransitionError> {
    if !current.can_transition_to(requested) {
        return Err(TransitionError::NotAllowed { from: current, to: requested });
    }

    if requested == OrderStatus::Completed {
        match (acting_driver, assigned_driver) {
            (Some(actor), Some(assigned)) if actor == assigned => {},
            _ => return Err(TransitionError::DriverMismatch)
        }
    }

    Ok(())
}

// Restaurants only move pickup orders through preparation and hand-over
pub fn check_restaurant_transition(current: OrderStatus, requested: OrderStatus) -> Result<(), TransitionError> {
    match (current, requested) {
        (OrderStatus::Confirmed, OrderStatus::Prepared)
        | (OrderStatus::Prepared, OrderStatus::Completed) => Ok(()),
        _ => Err(TransitionError::NotAllowed { from: current, to: requested })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryType{
    Pickup,
    Delivery
}

impl DeliveryType {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "pickup" => Ok(DeliveryType::Pickup),
            "delivery" => Ok(DeliveryType::Delivery),
            other => Err(format!("Invalid delivery type: {}", other))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Pickup => "pickup",
            DeliveryType::Delivery => "delivery"
        }
    }
}
