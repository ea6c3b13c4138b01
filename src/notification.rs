use askama::Template;
use chrono::{DateTime, Locale, TimeZone};

use crate::domain::WaitlistSubmission;

/// The operator-facing email announcing a new waitlist sign-up.
#[derive(Debug, Clone)]
pub struct Notification {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// One labelled line of contact information. `href` turns the value into a
/// link in the HTML rendering.
struct NotificationRow {
    label: &'static str,
    value: String,
    href: Option<String>,
}

#[derive(Template)]
#[template(path = "waitlist_notification.txt", escape = "none")]
struct TextTemplate<'a> {
    rows: &'a [NotificationRow],
    submitted_at: &'a str,
}

#[derive(Template)]
#[template(path = "waitlist_notification.html")]
struct HtmlTemplate<'a> {
    rows: &'a [NotificationRow],
    submitted_at: &'a str,
}

impl Notification {
    /// Renders `submission` as plain text and HTML, stamped with `submitted_at`.
    ///
    /// Both renderings share the same rows; company name and referral code only
    /// appear when they were provided.
    pub fn compose<Tz>(
        submission: &WaitlistSubmission,
        submitted_at: DateTime<Tz>,
    ) -> Result<Self, askama::Error>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let rows = contact_rows(submission);
        let submitted_at = format_timestamp(&submitted_at);

        let text_body = TextTemplate {
            rows: &rows,
            submitted_at: &submitted_at,
        }
        .render()?
        .trim()
        .to_string();
        let html_body = HtmlTemplate {
            rows: &rows,
            submitted_at: &submitted_at,
        }
        .render()?;

        Ok(Self {
            subject: format!(
                "Nouvelle inscription KLYPOP - {} {}",
                submission.first_name, submission.last_name
            ),
            text_body,
            html_body,
        })
    }
}

fn contact_rows(submission: &WaitlistSubmission) -> Vec<NotificationRow> {
    let row = |label, value: &str, href: Option<String>| NotificationRow {
        label,
        value: value.to_string(),
        href,
    };

    let mut rows = vec![
        row("Prénom", submission.first_name.as_ref(), None),
        row("Nom", submission.last_name.as_ref(), None),
        row(
            "Email",
            submission.email.as_ref(),
            Some(format!("mailto:{}", submission.email)),
        ),
        row(
            "Téléphone",
            submission.phone.as_ref(),
            Some(format!("tel:{}", submission.phone)),
        ),
        row("Type d'utilisateur", submission.user_type.label(), None),
        row("Ville", submission.city.as_ref(), None),
    ];
    if let Some(company_name) = &submission.company_name {
        rows.push(row("Entreprise", company_name, None));
    }
    if let Some(referral_code) = &submission.referral_code {
        rows.push(row("Code de parrainage", referral_code, None));
    }
    rows
}

/// Full French date followed by the short time, e.g. `lundi 19 octobre 2026 à 14:05`.
fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format_localized("%A %-d %B %Y à %H:%M", Locale::fr_FR)
        .to_string()
}
