pub mod digest;
pub mod handlers;
pub mod resend;
