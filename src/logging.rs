// ABOUTME: Tracing subscriber setup for hosts embedding the engine
// ABOUTME: Env-filtered, optionally JSON-formatted structured logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Logging initialization
//!
//! The engine itself only emits `tracing` events; initializing a subscriber
//! is the embedding service's call. This helper covers the common case: an
//! `EnvFilter` honoring `RUST_LOG` with a configured default, and a compact
//! or JSON formatter.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g., "info")
    pub default_level: String,
    /// Emit JSON lines instead of the human-readable format
    pub json_format: bool,
    /// Include the emitting module path in each event
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_owned(),
            json_format: false,
            include_target: true,
        }
    }
}

/// Install a global tracing subscriber.
///
/// # Errors
///
/// Returns `ConfigInvalid` when a subscriber is already installed or the
/// filter directive cannot be parsed.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_level))
        .map_err(|e| AppError::config(format!("invalid log filter: {e}")))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(config.include_target);

    let result = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| AppError::config(format!("logging already initialized: {e}")))
}
