//! `GET /avatar.{glb,gltf}` handler.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::convert::ModelFormat;
use crate::http::request::RequestIdExt;
use crate::http::response::AppError;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Reports whether the body came from the cache.
pub const X_AVATAR_CACHE: HeaderName = HeaderName::from_static("x-avatar-cache");

/// Map `avatar.<ext>` to an output format. Matching is case-insensitive.
pub fn parse_avatar_path(file: &str) -> Option<ModelFormat> {
    let (stem, ext) = file.rsplit_once('.')?;
    if !stem.eq_ignore_ascii_case("avatar") {
        return None;
    }
    ModelFormat::from_extension(ext)
}

/// Serve a customized avatar.
pub async fn avatar_handler(
    State(state): State<AppState>,
    Path(file): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(format) = parse_avatar_path(&file) else {
        return Err(AppError::NotFound);
    };

    let params = match Query::<Vec<(String, String)>>::try_from_uri(&uri) {
        Ok(Query(params)) => params,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let start = Instant::now();
    let request_id = headers.request_id();

    let generated = match state.pipeline.generate(format, params).await {
        Ok(generated) => generated,
        Err(e) => {
            metrics::record_request(format.as_str(), 500, start);
            tracing::warn!(request_id = %request_id, format = %format, "Avatar generation failed");
            return Err(e.into());
        }
    };

    tracing::info!(
        request_id = %request_id,
        format = %format,
        key = %generated.key,
        cache = generated.status.as_str(),
        "Serving avatar"
    );
    metrics::record_request(format.as_str(), 200, start);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (header::CACHE_CONTROL, state.cache_control.clone()),
            (X_AVATAR_CACHE, HeaderValue::from_static(generated.status.as_str())),
        ],
        generated.bytes,
    )
        .into_response())
}
