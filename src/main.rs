use ecobocado::{configuration::Settings, startup::Application, telemetry::{get_subscriber, init_subscriber}};

#[actix_web::main]
async fn main() -> anyhow::Result<()>{
    let subscriber = get_subscriber("ecobocado".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let settings = Settings::get()?;

    let application = Application::new(settings).await?;
    tracing::info!(host = %application.host, port = application.port, "Server starting");
    application.server.await?;
    Ok(())
}
