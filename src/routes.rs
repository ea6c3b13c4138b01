mod health;
mod waitlist;

pub use health::health_check;
pub use waitlist::{join_waitlist, json_error_handler, WaitlistError, SUCCESS_MESSAGE};
