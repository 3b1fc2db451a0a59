//! carbonlens: carbon-footprint analytics over per-user activity logs.
//!
//! The [`analytics`] engines turn raw daily emission events, action progress
//! and appliance energy logs from a [`data::DataStore`] into
//! presentation-ready metrics. The [`cli`] module is a thin terminal
//! consumer of those engines.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;

pub use error::{AnalyticsError, Result};
