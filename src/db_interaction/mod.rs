pub mod addresses;
pub mod admin;
pub mod allergens;
pub mod catalogue;
pub mod drivers;
pub mod invoices;
pub mod locations;
pub mod loyalty;
pub mod orders;
pub mod payments;
pub mod pickup_slots;
pub mod users;
pub mod venues;
