mod admin;
mod authentication;
mod avatar;
mod delivery;
mod health_check;
mod loyalty;
mod order;
mod payments;
mod pickup_slots;
mod products;
mod profile;
mod restaurant;

pub use admin::*;
pub use authentication::*;
pub use delivery::*;
pub use health_check::*;
pub use loyalty::*;
pub use order::*;
pub use payments::*;
pub use pickup_slots::*;
pub use products::*;
pub use profile::*;
pub use restaurant::*;

use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct MessageResponse{
    pub message: String
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self{ message: message.into() }
    }
}
