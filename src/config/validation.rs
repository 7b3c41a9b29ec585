//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacity > 0, compression levels, timeouts)
//! - Check that addresses, header values and palette tokens parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AvatarConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::Path;

use axum::http::HeaderValue;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AvatarConfig;
use crate::palette::{Palette, PaletteError};

/// A single semantic problem in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("cache.capacity must be greater than zero")]
    ZeroCapacity,

    #[error("palette: {0}")]
    Palette(PaletteError),

    #[error("model.template_path {0:?} does not exist")]
    MissingTemplate(String),

    #[error("{field} must be at most {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("http.cache_control is not a valid header value")]
    InvalidCacheControl,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_level {0:?} is not a valid filter")]
    InvalidLogLevel(String),
}

fn check_range(field: &'static str, value: u32, max: u32, errors: &mut Vec<ValidationError>) {
    if value > max {
        errors.push(ValidationError::OutOfRange {
            field,
            value: value as u64,
            max: max as u64,
        });
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AvatarConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.cache.capacity == 0 {
        errors.push(ValidationError::ZeroCapacity);
    }

    if let Err(e) = Palette::from_tokens(&config.palette.colors) {
        errors.push(ValidationError::Palette(e));
    }

    if let Some(path) = &config.model.template_path {
        if !Path::new(path).is_file() {
            errors.push(ValidationError::MissingTemplate(path.clone()));
        }
    }

    check_range("conversion.compression_level", config.conversion.compression_level, 10, &mut errors);
    check_range("http.compression_level", config.http.compression_level, 11, &mut errors);

    if HeaderValue::from_str(&config.http.cache_control).is_err() {
        errors.push(ValidationError::InvalidCacheControl);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
