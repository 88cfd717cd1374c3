pub mod auth;
pub mod configuration;
pub mod db_interaction;
pub mod domain;
pub mod error;
pub mod invoicing;
pub mod models;
pub mod password;
pub mod payment_client;
pub mod routes;
pub mod schema;
pub mod startup;
pub mod storage_client;
pub mod telemetry;
pub mod utils;
