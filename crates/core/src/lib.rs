//! Domain logic for the speakcoach practice backend.
//!
//! Everything in this crate is pure computation: no I/O, no database, no
//! HTTP. The `speakcoach-api` crate wires these pieces to axum and sqlx.

pub mod achievements;
pub mod analysis;
pub mod audio;
pub mod error;
pub mod progression;
pub mod scoring;
pub mod session;
pub mod types;
