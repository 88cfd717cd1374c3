mod auth;
mod orders;
mod profile;

pub use auth::*;
pub use orders::*;
pub use profile::*;

use serde::Serialize;
use uuid::Uuid;

use crate::models::Venue;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicVenue{
    pub id: i32,
    pub uuid: Uuid,
    pub code: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub timezone: String
}

impl From<Venue> for PublicVenue {
    fn from(venue: Venue) -> Self {
        Self{
            id: venue.id,
            uuid: venue.uuid,
            code: venue.code,
            email: venue.email,
            name: venue.name,
            phone: venue.phone,
            avatar_url: venue.avatar_url,
            timezone: venue.timezone
        }
    }
}
