pub mod cleanup;
pub mod dedup;
pub mod filters;
pub mod handlers;
pub mod normalize;
pub mod repository;
pub mod sync;
