//! Batch jobs, triggerable over HTTP (bearer-protected) and by the
//! in-process scheduler. Both paths run the same functions in `tasks`.

pub mod auth;
pub mod handlers;
pub mod scheduler;
pub mod tasks;
