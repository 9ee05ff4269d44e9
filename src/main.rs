use email_subscription_api::configuration::get_configuration;
use email_subscription_api::startup::Application;
use email_subscription_api::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = get_subscriber(
        "email_subscription_api".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(configuration).await?;
    tracing::info!(
        port = application.port(),
        "Starting the subscription service."
    );
    application.run_until_stopped().await?;

    Ok(())
}
