//! Client for the hosted assistants conversation service.
pub mod client;
pub mod config;

pub use client::{AssistantsApi, AssistantsClient};
pub use config::AssistantsConfig;
