pub mod client;
pub mod models;

pub use client::HistoryClient;
pub use models::LoadError;
