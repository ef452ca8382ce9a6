pub mod auth;
pub mod client;
pub mod errors;
pub mod models;
pub mod requests;

pub use client::KickAPIClient;
pub use errors::ApiError;
