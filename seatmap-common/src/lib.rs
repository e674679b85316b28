//! # Seatmap Common Library
//!
//! Shared code for the seatmap services including:
//! - Event, guest and table document models
//! - Error taxonomy
//! - Configuration loading and root folder resolution
//! - SQLite pool initialization
//! - Identifier and timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{Event, Guest, Position, Table, TableShape};
