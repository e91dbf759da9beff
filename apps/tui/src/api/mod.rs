pub mod client;
pub mod models;
pub use client::{validate_parameters, ApiClient, ClientError};
