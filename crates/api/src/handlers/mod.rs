//! HTTP request handlers, grouped by resource.

pub mod achievements;
pub mod auth;
pub mod progress;
pub mod sessions;
pub mod settings;
