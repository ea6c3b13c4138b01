//! State behind the waitlist sign-up form.
//!
//! The form moves between four states:
//!
//! | State        | Entered on                  | Left on                      |
//! |--------------|-----------------------------|------------------------------|
//! | `Idle`       | start, back from success    | submit with required fields  |
//! | `Submitting` | submit with required fields | endpoint answer              |
//! | `Success`    | 2xx answer                  | navigating back              |
//! | `Error`      | non-2xx answer, no answer   | next submit                  |
//!
//! Fields are cleared on success and kept on error so the user can retry.

use serde::Serialize;

use crate::waitlist_client::WaitlistClient;

/// The values typed into the form, serialized as the endpoint expects them.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
    pub city: String,
    pub referral_code: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            company_name: String::new(),
            email: String::new(),
            phone: String::new(),
            user_type: "client".to_string(),
            city: String::new(),
            referral_code: String::new(),
        }
    }
}

/// An input of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    CompanyName,
    Email,
    Phone,
    UserType,
    City,
    ReferralCode,
}

impl Field {
    pub const REQUIRED: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::UserType,
        Field::City,
    ];
}

impl FormFields {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::CompanyName => &self.company_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::UserType => &self.user_type,
            Field::City => &self.city,
            Field::ReferralCode => &self.referral_code,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::CompanyName => &mut self.company_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::UserType => &mut self.user_type,
            Field::City => &mut self.city,
            Field::ReferralCode => &mut self.referral_code,
        }
    }

    /// Required fields that are still empty, in form order.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .into_iter()
            .filter(|f| self.value(*f).is_empty())
            .collect()
    }
}

/// Why a submission was not started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRefused {
    /// Required fields that are still empty, in form order.
    MissingFields(Vec<Field>),
    /// A previous submission has not been answered yet.
    AlreadySubmitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    /// Carries the text shown in the inline error banner.
    Error(String),
}

#[derive(Debug, Clone)]
pub struct WaitlistForm {
    fields: FormFields,
    status: FormStatus,
    show_referral: bool,
}

impl Default for WaitlistForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitlistForm {
    pub fn new() -> Self {
        Self {
            fields: FormFields::default(),
            status: FormStatus::Idle,
            show_referral: false,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Whether the referral code input is revealed.
    pub fn shows_referral(&self) -> bool {
        self.show_referral
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.fields.value_mut(field) = value.into();
    }

    pub fn toggle_referral(&mut self) {
        self.show_referral = !self.show_referral;
    }

    /// The submit control is disabled while a request is in flight.
    pub fn is_submit_disabled(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    /// Starts a submission if every required field has a value.
    ///
    /// Returns the values to send and moves to `Submitting`. When fields are
    /// missing, or a submission is already in flight, the status is left untouched.
    pub fn begin_submit(&mut self) -> Result<FormFields, SubmitRefused> {
        if self.is_submit_disabled() {
            return Err(SubmitRefused::AlreadySubmitting);
        }
        let missing = self.fields.missing_required();
        if !missing.is_empty() {
            return Err(SubmitRefused::MissingFields(missing));
        }
        self.status = FormStatus::Submitting;
        Ok(self.fields.clone())
    }

    /// Applies the endpoint's answer to a submission started by `begin_submit`.
    pub fn finish_submit(&mut self, outcome: Result<String, String>) {
        match outcome {
            Ok(_) => {
                self.fields = FormFields::default();
                self.show_referral = false;
                self.status = FormStatus::Success;
            }
            Err(message) => {
                self.status = FormStatus::Error(message);
            }
        }
    }

    /// Leaves the confirmation screen.
    pub fn back_to_idle(&mut self) {
        self.status = FormStatus::Idle;
    }

    /// Runs a full submission against `client`.
    pub async fn submit(&mut self, client: &WaitlistClient) -> Result<(), SubmitRefused> {
        let fields = self.begin_submit()?;
        let outcome = client.submit(&fields).await;
        self.finish_submit(outcome);
        Ok(())
    }
}
