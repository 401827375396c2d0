pub mod app;
pub mod card;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod i18n;
pub mod loader;
pub mod manifest;
pub mod model;
pub mod progress;
pub mod render;
pub mod share;

pub use error::{HubError, Result};
