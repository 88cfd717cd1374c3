mod auth;
mod location;
mod profile;

pub use auth::*;
pub use location::*;
pub use profile::*;

use serde::Serialize;
use uuid::Uuid;

use crate::models::DeliveryDriver;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicDriver{
    pub id: i32,
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub avatar_url: Option<String>,
    pub is_available: bool,
    pub vehicle_type: Option<String>,
    pub vehicle_plate: Option<String>
}

impl From<DeliveryDriver> for PublicDriver {
    fn from(driver: DeliveryDriver) -> Self {
        Self{
            id: driver.id,
            uuid: driver.uuid,
            email: driver.email,
            name: driver.name,
            phone: driver.phone,
            avatar_url: driver.avatar_url,
            is_available: driver.is_available,
            vehicle_type: driver.vehicle_type,
            vehicle_plate: driver.vehicle_plate
        }
    }
}
