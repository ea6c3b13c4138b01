use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{post, web, HttpRequest, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Serialize;

use crate::configuration::{EmailClientSettings, MissingCredentials};
use crate::domain::{InvalidSubmission, WaitlistPayload, WaitlistSubmission};
use crate::email_client::{EmailClient, OutgoingEmail, SendEmailError};
use crate::notification::Notification;
use crate::startup::SubmissionTimezone;

pub const SUCCESS_MESSAGE: &str = "Email envoyé avec succès!";

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Registers interest in the waitlist by relaying the submission to the
/// operator inbox. Exactly one delivery attempt is made per valid request.
#[tracing::instrument(
    name = "Relaying a waitlist submission",
    skip(payload, settings, email_client, timezone),
    fields(user_type = tracing::field::Empty, city = tracing::field::Empty)
)]
#[post("/api/waitlist")]
pub async fn join_waitlist(
    payload: web::Json<WaitlistPayload>,
    settings: web::Data<EmailClientSettings>,
    email_client: web::Data<dyn EmailClient>,
    timezone: web::Data<SubmissionTimezone>,
) -> Result<HttpResponse, WaitlistError> {
    let submission: WaitlistSubmission = payload
        .into_inner()
        .try_into()
        .map_err(WaitlistError::Validation)?;
    let span = tracing::Span::current();
    span.record("user_type", submission.user_type.as_str());
    span.record("city", tracing::field::display(&submission.city));

    let credentials = settings.credentials().map_err(|missing| {
        tracing::error!(missing = %missing.keys(), "Email credentials are not configured");
        WaitlistError::Configuration(missing)
    })?;

    let notification = Notification::compose(&submission, Utc::now().with_timezone(&timezone.0))
        .map_err(WaitlistError::Composition)?;
    let email = OutgoingEmail {
        sender_name: settings.sender_name.clone(),
        sender_address: credentials.username.clone(),
        recipient: settings.recipient_or_identity(&credentials),
        subject: notification.subject,
        text_body: notification.text_body,
        html_body: notification.html_body,
    };

    email_client
        .send_email(&credentials, &email)
        .await
        .map_err(|e| {
            tracing::error!(error.cause_chain = ?e, "Failed to send the waitlist notification");
            WaitlistError::Delivery(e)
        })?;

    Ok(HttpResponse::Ok().json(MessageBody {
        message: SUCCESS_MESSAGE,
    }))
}

/// Turns an unreadable JSON body into the same answer as missing fields.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    WaitlistError::MalformedBody(err).into()
}

#[derive(thiserror::Error)]
pub enum WaitlistError {
    #[error("Tous les champs requis doivent être remplis.")]
    Validation(#[source] InvalidSubmission),

    #[error("Tous les champs requis doivent être remplis.")]
    MalformedBody(#[source] JsonPayloadError),

    #[error(
        "Configuration email manquante ({}). Vérifiez que l'environnement définit EMAIL_USER et EMAIL_PASSWORD, puis redémarrez le serveur.",
        .0.keys()
    )]
    Configuration(#[source] MissingCredentials),

    #[error("Erreur lors de l'envoi de l'email. Veuillez réessayer plus tard.")]
    Composition(#[source] askama::Error),

    #[error("Erreur lors de l'envoi de l'email. Veuillez réessayer plus tard.")]
    Delivery(#[source] SendEmailError),
}

impl std::fmt::Debug for WaitlistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for WaitlistError {
    fn status_code(&self) -> StatusCode {
        match self {
            WaitlistError::Validation(_) | WaitlistError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            WaitlistError::Configuration(_)
            | WaitlistError::Composition(_)
            | WaitlistError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
