pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod slug;

pub use config::Config;
pub use db::create_pool;
pub use error::ListingError;
