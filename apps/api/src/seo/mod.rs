pub mod cache;
pub mod handlers;
pub mod landing;
pub mod sitemap;
