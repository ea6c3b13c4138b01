use std::time::Duration;

use chrono_tz::Tz;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// Process variable holding the mail account identity.
pub const EMAIL_USER: &str = "EMAIL_USER";
/// Process variable holding the mail account secret.
pub const EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
/// Process variable holding the inbox that receives waitlist notifications.
pub const RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

/// App-wide configuration
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

/// Everything needed to relay a waitlist submission to the operator inbox.
///
/// The account identity and secret are optional on purpose: a missing value is
/// reported per request rather than preventing the server from starting.
#[derive(Deserialize, Clone)]
pub struct EmailClientSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<Secret<String>>,
    #[serde(default)]
    pub recipient: Option<String>,
    pub sender_name: String,
    pub timeout_milliseconds: u64,
    pub timezone: String,
}

/// Account identity and secret used to authenticate against the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: Secret<String>,
}

/// Names the configuration keys that were absent when credentials were requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing mail configuration: {}", .0.join(", "))]
pub struct MissingCredentials(pub Vec<&'static str>);

impl MissingCredentials {
    /// Comma separated list of the missing keys.
    pub fn keys(&self) -> String {
        self.0.join(", ")
    }
}

impl EmailClientSettings {
    /// Returns the SMTP credentials, or the list of keys that are not configured.
    ///
    /// Blank values count as missing.
    pub fn credentials(&self) -> Result<SmtpCredentials, MissingCredentials> {
        let username = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret().trim())
            .filter(|p| !p.is_empty());

        match (username, password) {
            (Some(username), Some(password)) => Ok(SmtpCredentials {
                username: username.to_string(),
                password: Secret::new(password.to_string()),
            }),
            (username, password) => {
                let mut missing = Vec::new();
                if username.is_none() {
                    missing.push(EMAIL_USER);
                }
                if password.is_none() {
                    missing.push(EMAIL_PASSWORD);
                }
                Err(MissingCredentials(missing))
            }
        }
    }

    /// The inbox notifications are delivered to. Falls back to the account
    /// identity when no recipient is configured.
    pub fn recipient_or_identity(&self, credentials: &SmtpCredentials) -> String {
        self.recipient
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(&credentials.username)
            .to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// Timezone used to stamp each submission.
    pub fn timezone(&self) -> Result<Tz, String> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| format!("{} is not a valid timezone: {}", self.timezone, e))
    }

    /// Overrides credentials and recipient with the conventional process
    /// variables, when they hold a non-blank value.
    fn merge_process_env(&mut self) {
        if let Some(user) = process_value(EMAIL_USER) {
            self.username = Some(user);
        }
        if let Some(password) = process_value(EMAIL_PASSWORD) {
            self.password = Some(Secret::new(password));
        }
        if let Some(recipient) = process_value(RECIPIENT_EMAIL) {
            self.recipient = Some(recipient);
        }
    }
}

fn process_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The environment the app is running in.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Reads app configuration from the `configuration` directory.
///
/// `base.yaml` is always loaded, then the file named after `APP_ENVIRONMENT`
/// (`local` by default), then `APP_`-prefixed environment variables
/// (e.g. `APP_APPLICATION__PORT=5001`). Finally `EMAIL_USER`, `EMAIL_PASSWORD`
/// and `RECIPIENT_EMAIL` are picked up from the process environment.
///
/// Returns an error if a file is missing or malformed, or if the result does not
/// parse into a `Settings` struct.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let mut settings: Settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    settings.email_client.merge_process_env();
    Ok(settings)
}
