pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod telemetry;

pub use client::{Credential, HttpCollectionClient};
pub use config::AppConfig;
pub use error::AppError;
