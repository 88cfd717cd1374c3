use std::{net::TcpListener, time::Duration};

use actix_web::{dev::Server, web, App, HttpServer};
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use tracing_actix_web::TracingLogger;

use crate::{
    auth::jwt::Tokenizer,
    configuration::{DatabaseSettings, Settings},
    error::ApiError,
    invoicing::InvoiceIssuer,
    payment_client::PaymentClient,
    routes::*,
    storage_client::StorageClient,
    utils::DbPool,
};

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

pub fn get_connection_pool(settings: &DatabaseSettings) -> Result<DbPool, r2d2::Error> {
    Pool::builder()
        .connection_timeout(Duration::from_secs(5))
        .build(ConnectionManager::<PgConnection>::new(settings.get_database_table_url()))
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let pool = get_connection_pool(&settings.database)
            .context("Failed to build database connection pool")?;

        let payment_client = PaymentClient::new(
                settings.payment.api_uri.clone(),
                settings.payment.secret_key.clone(),
                Duration::from_millis(settings.payment.timeout_milliseconds)
            )
            .context("Failed to build payment client")?;

        let storage_client = StorageClient::new(
                settings.storage.endpoint.clone(),
                settings.storage.bucket.clone(),
                settings.storage.access_token.clone(),
                settings.storage.public_url.clone(),
                Duration::from_millis(settings.storage.timeout_milliseconds)
            )
            .context("Failed to build storage client")?;

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))
            .context("Failed to bind application address")?;
        let port = listener.local_addr()?.port();

        let server = run(
            listener,
            pool,
            Tokenizer::new(&settings.jwt),
            payment_client,
            storage_client
        )?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }
}

fn run(
    listener: TcpListener,
    pool: DbPool,
    tokenizer: Tokenizer,
    payment_client: PaymentClient,
    storage_client: StorageClient
) -> Result<Server, anyhow::Error> {
    let pool = web::Data::new(pool);
    let invoices = web::Data::new(InvoiceIssuer::start(pool.clone()));
    let tokenizer = web::Data::new(tokenizer);
    let payment_client = web::Data::new(payment_client);
    let storage_client = web::Data::new(storage_client);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(invoices.clone())
            .app_data(tokenizer.clone())
            .app_data(payment_client.clone())
            .app_data(storage_client.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                ApiError::BadRequest(err.to_string()).into()
            }))
            .service(web::scope("/api").configure(api_routes))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(register))
                .route("/login", web::post().to(login))
        )
        .service(
            web::scope("/orders")
                .route("", web::post().to(post_order))
                .route("", web::get().to(get_orders))
                .route("/stats/delivery", web::get().to(get_delivery_stats))
                .route("/stats/drivers", web::get().to(get_driver_stats))
                .route("/ranking/delivery", web::get().to(get_delivery_ranking))
                .route("/{id}", web::get().to(get_order_by_id))
                .route("/{id}/status", web::patch().to(update_order_status))
                .route("/{id}/location", web::get().to(get_order_location))
        )
        .service(
            web::scope("/delivery")
                .route("/auth/register", web::post().to(register_driver))
                .route("/auth/login", web::post().to(login_driver))
                .route("/profile/me", web::get().to(get_driver_profile))
                .route("/profile/availability", web::patch().to(update_driver_availability))
                .route("/profile/avatar", web::post().to(upload_driver_avatar))
                .route("/location", web::put().to(put_driver_location))
                .route("/location/{driver_id}", web::get().to(get_driver_location))
        )
        .service(
            web::scope("/restaurant")
                .route("/auth/login", web::post().to(login_restaurant))
                .route("/profile/me", web::get().to(get_restaurant_profile))
                .route("/profile/avatar", web::post().to(upload_restaurant_avatar))
                .route("/orders", web::get().to(get_pickup_orders))
                .route("/orders/stats", web::get().to(get_pickup_stats))
                .route("/orders/{id}/status", web::patch().to(update_pickup_status))
        )
        .service(
            web::scope("/payments")
                .route("/create-intent", web::post().to(create_payment_intent))
                .route("/status/{payment_intent_id}", web::get().to(get_payment_status))
        )
        .route("/pickup-slots/available", web::get().to(get_pickup_slots))
        .service(
            web::scope("/loyalty")
                .route("/account", web::get().to(get_loyalty_account))
                .route("/redeem", web::post().to(redeem_loyalty_reward))
        )
        .service(
            web::scope("/admin")
                .route("/billing", web::get().to(get_billing))
                .route("/dashboard/metrics", web::get().to(get_metrics))
                .route("/dashboard/recent-orders", web::get().to(get_admin_recent_orders))
                .route("/dashboard/top-products", web::get().to(get_admin_top_products))
        )
        .service(
            web::scope("/profile")
                .route("/me", web::get().to(get_profile))
                .route("/update", web::patch().to(update_profile))
                .route("/avatar", web::post().to(upload_profile_avatar))
                .route("/addresses", web::post().to(post_address))
                .route("/addresses", web::get().to(get_addresses))
                .route("/addresses/{id}", web::put().to(put_address))
                .route("/addresses/{id}", web::delete().to(delete_address))
                .route("/addresses/{id}/set-default", web::patch().to(patch_default_address))
                .route("/allergens", web::get().to(get_user_allergens))
                .route("/allergens/{code}", web::post().to(post_user_allergen))
                .route("/allergens/{code}", web::delete().to(delete_user_allergen))
        )
        .service(
            web::scope("/products")
                .route("/allergens", web::get().to(get_allergens))
                .route("/rescue-menus", web::get().to(get_rescue_menus))
        );
}
