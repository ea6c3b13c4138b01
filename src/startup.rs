use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{dev::Server, web, App, HttpServer};
use chrono_tz::Tz;
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::{EmailClientSettings, Settings},
    email_client::{EmailClient, SmtpEmailClient},
    routes::{health_check, join_waitlist},
};

/// Timezone the submission timestamp is rendered in.
pub struct SubmissionTimezone(pub Tz);

/// A running application
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Build an HTTP server running our app, relaying submissions through the
    /// SMTP relay described in `settings`.
    pub async fn build(settings: Settings) -> std::io::Result<Self> {
        let email_client = SmtpEmailClient::from_settings(&settings.email_client);
        Self::build_with_email_client(settings, Arc::new(email_client)).await
    }

    /// Same as [`Application::build`], but delivers email through `email_client`.
    /// Tests use this to observe or fail deliveries without a real relay.
    pub async fn build_with_email_client(
        settings: Settings,
        email_client: Arc<dyn EmailClient>,
    ) -> std::io::Result<Self> {
        let timezone = settings
            .email_client
            .timezone()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let app_config = settings.application;
        let app_address = format!("{}:{}", &app_config.host, app_config.port);
        let listener = TcpListener::bind(app_address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, settings.email_client, email_client, timezone)?;
        Ok(Self { port, server })
    }

    /// The port that the app is listening on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Listen and handle requests until we receive a stop signal
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

/// Starts a server, listening on `listener`, running in the background and returns it
fn run(
    listener: TcpListener,
    email_settings: EmailClientSettings,
    email_client: Arc<dyn EmailClient>,
    timezone: Tz,
) -> std::io::Result<Server> {
    let email_settings = web::Data::new(email_settings);
    let email_client: web::Data<dyn EmailClient> = web::Data::from(email_client);
    let timezone = web::Data::new(SubmissionTimezone(timezone));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(
                web::JsonConfig::default().error_handler(crate::routes::json_error_handler),
            )
            .service(health_check)
            .service(join_waitlist)
            .app_data(email_settings.clone())
            .app_data(email_client.clone())
            .app_data(timezone.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
