// ABOUTME: Unified error handling for the nutrition resolution and grading engine
// ABOUTME: Defines ErrorCode taxonomy, AppError with source chaining, and AppResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! # Unified Error Handling
//!
//! Centralized error types for the engine. Resolution failures map onto a
//! small, closed set of error codes so the embedding service can react to
//! them without string matching:
//!
//! - network failures against a reference database are `ExternalServiceError`
//!   (the cascade advances past them, they only surface when nothing else
//!   matched),
//! - an exhausted adapter cascade on the single-item path is
//!   `AllSourcesExhausted`,
//! - cache storage errors are `StorageError` but are swallowed and logged by
//!   the cache facade; they never reach callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Malformed or out-of-range input (descriptor, query, configuration value)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A requested entity (food, cache entry) does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// A reference database call failed at the network or protocol level
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// A reference database rejected the call due to rate limiting
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited,
    /// Every adapter in the routing cascade was exhausted without an
    /// acceptable candidate (single-item resolution path only)
    #[serde(rename = "ALL_SOURCES_EXHAUSTED")]
    AllSourcesExhausted,
    /// Data serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
    /// Key-value store operation failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError,
    /// Configuration is invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid,
    /// Unexpected internal error
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "An external nutrition database encountered an error",
            Self::ExternalRateLimited => "External nutrition database rate limit exceeded",
            Self::AllSourcesExhausted => "No nutrition source produced an acceptable match",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::StorageError => "Key-value store operation failed",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal engine error occurred",
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// External reference database error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External rate limit hit
    pub fn rate_limited(service: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalRateLimited,
            format!("{}: rate limit exceeded", service.into()),
        )
    }

    /// Every adapter in the cascade failed or matched below threshold
    pub fn all_sources_exhausted(query: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::AllSourcesExhausted,
            format!("no source resolved '{}'", query.into()),
        )
    }

    /// Key-value store failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal engine error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
