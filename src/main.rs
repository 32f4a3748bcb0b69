use anyhow::Context;
use tokio::net::TcpListener;

use subscription_service::{configuration, startup, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::get_subscriber(
        "subscription-service".into(),
        "info".into(),
        std::io::stdout,
    );
    telemetry::initialize_subscriber(subscriber);

    let configuration =
        configuration::get_configuration().context("Failed to read configuration")?;
    let app_state = startup::get_app_state(&configuration).await;

    let listener = TcpListener::bind((
        configuration.application.host.as_str(),
        configuration.application.port,
    ))
    .await
    .context("Failed to bind a port for application")?;

    startup::run(listener, app_state).await;

    Ok(())
}
