use actix_web::{http::header::CONTENT_TYPE, web, HttpRequest};
use anyhow::Context;
use futures_util::StreamExt;

use crate::{
    domain::avatar::{AvatarUpload, ImageKind, MAX_AVATAR_BYTES},
    error::ApiError,
    storage_client::StorageClient,
};

// Buffers at most `limit` bytes, the rest of an oversized body is drained and dropped
pub async fn read_body_limited(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, ApiError> {
    let mut body = web::BytesMut::new();
    let mut oversized = false;
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if oversized || body.len() + chunk.len() > limit {
            oversized = true;
            continue;
        }
        body.extend_from_slice(&chunk);
    }

    if oversized {
        return Err(ApiError::BadRequest(format!("Avatar must be at most {} bytes", limit)));
    }
    Ok(body)
}

// Validates the raw image body and stores it, returning the public url
#[tracing::instrument("Storing avatar image", skip(storage, req, payload))]
pub async fn store_avatar(
    storage: &StorageClient,
    req: &HttpRequest,
    payload: web::Payload
) -> Result<String, ApiError> {
    let content_type = req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    ImageKind::from_content_type(content_type.unwrap_or("")).map_err(ApiError::BadRequest)?;
    let body = read_body_limited(payload, MAX_AVATAR_BYTES).await?;
    let upload = AvatarUpload::new(content_type, body.len()).map_err(ApiError::BadRequest)?;

    let path = storage.upload(&upload.object_name, upload.kind.mime(), body.to_vec())
        .await
        .context("Failed to upload avatar to storage")?;

    Ok(storage.public_url_for(&path))
}
