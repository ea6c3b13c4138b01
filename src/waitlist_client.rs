use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::waitlist_form::FormFields;

/// Shown when the endpoint answers with an error but no usable text.
pub const GENERIC_ERROR: &str = "Une erreur est survenue";
/// Shown when no answer could be read at all.
pub const NETWORK_ERROR: &str = "Erreur lors de l'envoi. Veuillez réessayer.";

/// Talks to the waitlist endpoint on behalf of the sign-up form.
pub struct WaitlistClient {
    http_client: Client,
    endpoint: Url,
}

#[derive(Deserialize)]
struct EndpointReply {
    message: Option<String>,
    error: Option<String>,
}

impl WaitlistClient {
    /// `base_url` is where the service is reachable, e.g. `https://klypop.fr`.
    pub fn new(base_url: Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            http_client: Client::new(),
            endpoint: base_url.join("api/waitlist")?,
        })
    }

    /// Posts `fields` as JSON.
    ///
    /// Returns the confirmation text on a 2xx answer. Otherwise returns the text
    /// to display to the user: the endpoint's own error when it sent one, or a
    /// generic fallback.
    pub async fn submit(&self, fields: &FormFields) -> Result<String, String> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(fields)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Waitlist endpoint could not be reached");
                NETWORK_ERROR.to_string()
            })?;

        let succeeded = response.status().is_success();
        let reply = response.json::<EndpointReply>().await;

        match (succeeded, reply) {
            (true, Ok(reply)) => Ok(reply.message.unwrap_or_default()),
            (false, Ok(reply)) => Err(reply
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| GENERIC_ERROR.to_string())),
            (_, Err(e)) => {
                tracing::warn!(error = %e, "Waitlist endpoint sent an unreadable reply");
                Err(NETWORK_ERROR.to_string())
            }
        }
    }
}
