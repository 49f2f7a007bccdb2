pub mod blog;
pub mod job;
pub mod subscriber;
