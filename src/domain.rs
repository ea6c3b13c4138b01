mod required_field;
mod user_type;
mod waitlist_submission;

pub use required_field::RequiredField;
pub use user_type::UserType;
pub use waitlist_submission::{InvalidSubmission, WaitlistPayload, WaitlistSubmission};
