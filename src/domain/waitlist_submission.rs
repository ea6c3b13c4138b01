use serde::Deserialize;

use super::{RequiredField, UserType};

/// The JSON body posted by the waitlist form. Every field is optional at this
/// stage so that a missing value surfaces as a validation failure rather than a
/// deserialization error.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WaitlistPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_type: Option<String>,
    pub city: Option<String>,
    pub referral_code: Option<String>,
}

/// A validated waitlist sign-up, ready to be turned into a notification.
#[derive(Debug, Clone)]
pub struct WaitlistSubmission {
    pub first_name: RequiredField,
    pub last_name: RequiredField,
    pub email: RequiredField,
    pub phone: RequiredField,
    pub user_type: UserType,
    pub city: RequiredField,
    pub company_name: Option<String>,
    pub referral_code: Option<String>,
}

/// Lists the payload fields that were missing or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid waitlist fields: {}", .missing.join(", "))]
pub struct InvalidSubmission {
    pub missing: Vec<&'static str>,
}

impl TryFrom<WaitlistPayload> for WaitlistSubmission {
    type Error = InvalidSubmission;

    fn try_from(payload: WaitlistPayload) -> Result<Self, Self::Error> {
        let mut invalid = Vec::new();
        let mut required = |name: &'static str, value: Option<String>| {
            let parsed = RequiredField::parse(value.unwrap_or_default()).ok();
            if parsed.is_none() {
                invalid.push(name);
            }
            parsed
        };

        let first_name = required("firstName", payload.first_name);
        let last_name = required("lastName", payload.last_name);
        let email = required("email", payload.email);
        let phone = required("phone", payload.phone);
        let city = required("city", payload.city);
        let user_type = payload
            .user_type
            .as_deref()
            .and_then(|u| UserType::parse(u).ok());
        if user_type.is_none() {
            invalid.push("userType");
        }

        match (first_name, last_name, email, phone, user_type, city) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(phone),
                Some(user_type),
                Some(city),
            ) => Ok(Self {
                first_name,
                last_name,
                email,
                phone,
                user_type,
                city,
                company_name: optional(payload.company_name),
                referral_code: optional(payload.referral_code),
            }),
            _ => Err(InvalidSubmission { missing: invalid }),
        }
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
