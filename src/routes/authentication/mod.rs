mod login;
mod register;

pub use login::*;
pub use register::*;

use serde::Serialize;
use uuid::Uuid;

use crate::models::User;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser{
    pub id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self{
            id: user.id,
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            avatar_url: user.avatar_url
        }
    }
}
