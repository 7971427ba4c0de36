pub mod client;
pub mod error;

pub use client::AdvisorClient;
pub use error::ClientError;
