use waitlist::configuration::get_configuration;
use waitlist::startup::Application;
use waitlist::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("waitlist".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration");
    if let Err(missing) = configuration.email_client.credentials() {
        tracing::warn!(
            missing = %missing.keys(),
            "Email credentials are not configured, waitlist submissions will fail"
        );
    }

    let application = Application::build(configuration).await?;
    application.run_until_stopped().await
}
