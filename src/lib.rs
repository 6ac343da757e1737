//! Historia Lite: a turn-based geopolitical simulation served over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod simulation;

pub use error::{HistoriaError, Result};
