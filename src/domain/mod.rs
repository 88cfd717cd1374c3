pub mod account_email;
pub mod avatar;
pub mod field_rules;
pub mod loyalty;
pub mod order_status;
pub mod payment_status;
pub mod pickup_window;
pub mod ranking;
pub mod stats;
pub mod vehicle;
