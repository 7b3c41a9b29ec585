//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build palette, template and pipeline in dependency order
//! - Refuse to start when the converters cannot honour the conversion options
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binding is left to the caller, so tests can bind port 0

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{validate_config, AvatarConfig, ValidationError};
use crate::convert::ModelFormat;
use crate::http::HttpServer;
use crate::model::{ModelError, ModelTemplate};
use crate::palette::{Palette, PaletteError};
use crate::pipeline::{AvatarPipeline, PipelineBuilder};

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join(.0))]
    Config(Vec<ValidationError>),

    #[error(transparent)]
    Palette(#[from] PaletteError),

    #[error("failed to load model template: {0}")]
    Model(#[from] ModelError),

    #[error("mesh compression requested but unsupported for: {}", join(.0))]
    UnsupportedCompression(Vec<ModelFormat>),
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; ")
}

/// Load the configured template, or the bundled avatar.
pub fn load_template(config: &AvatarConfig) -> Result<ModelTemplate, ModelError> {
    match &config.model.template_path {
        Some(path) => ModelTemplate::from_path(Path::new(path)),
        None => ModelTemplate::bundled(),
    }
}

/// Validate the config and prepare a pipeline builder with the default converters.
pub fn pipeline_builder(config: &AvatarConfig) -> Result<PipelineBuilder, StartupError> {
    validate_config(config).map_err(StartupError::Config)?;

    let palette = Palette::from_tokens(&config.palette.colors)?;
    let template = load_template(config)?;

    tracing::info!(
        colors = palette.len(),
        slots = ?template.slots(),
        capacity = config.cache.capacity,
        coalesce = config.cache.coalesce_in_flight,
        "Pipeline configured"
    );

    let capacity = NonZeroUsize::new(config.cache.capacity)
        .ok_or_else(|| StartupError::Config(vec![ValidationError::ZeroCapacity]))?;

    Ok(AvatarPipeline::builder(Arc::new(palette), Arc::new(template))
        .capacity(capacity)
        .options(config.conversion.encode_options())
        .coalesce_in_flight(config.cache.coalesce_in_flight))
}

/// Finish a prepared builder into a server.
pub fn assemble(config: AvatarConfig, builder: PipelineBuilder) -> Result<HttpServer, StartupError> {
    let pipeline = builder.build();

    if config.conversion.compression {
        let lacking = pipeline.formats_lacking_compression();
        if !lacking.is_empty() {
            return Err(StartupError::UnsupportedCompression(lacking));
        }
    }

    Ok(HttpServer::new(config, pipeline))
}

/// Build a ready-to-run server from configuration.
pub fn bootstrap(config: AvatarConfig) -> Result<HttpServer, StartupError> {
    let builder = pipeline_builder(&config)?;
    assemble(config, builder)
}
