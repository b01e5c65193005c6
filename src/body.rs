//! HTTP request body handling utilities.
//!
//! The authenticator never reads a request body itself; it is handed a payload hash. These helpers produce that
//! hash the way S3 clients declare it.
use {
    crate::{
        canonical::decode_query,
        constants::*,
        context::{first_value, is_presigned_query},
        crypto::sha256_hex,
        SignatureError,
    },
    bytes::Bytes,
    http::request::Parts,
    std::future::Future,
    tower::BoxError,
};

/// A trait for converting various body types into a [`Bytes`] object.
///
/// This requires reading the entire body into memory.
pub trait IntoRequestBytes {
    /// Convert this object into a [`Bytes`] object.
    fn into_request_bytes(self) -> impl Future<Output = Result<Bytes, BoxError>> + Send + Sync;
}

/// Convert the unit type `()` into an empty [`Bytes`] object.
impl IntoRequestBytes for () {
    /// This is infalliable.
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(Bytes::new())
    }
}

/// Convert a `Vec<u8>` into a [`Bytes`] object.
impl IntoRequestBytes for Vec<u8> {
    /// This is infalliable.
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(Bytes::from(self))
    }
}

/// Convert a `String` into a [`Bytes`] object holding its UTF-8 encoding.
impl IntoRequestBytes for String {
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(Bytes::from(self))
    }
}

/// Identity transformation: return the [`Bytes`] object as-is.
impl IntoRequestBytes for Bytes {
    /// This is infalliable.
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(self)
    }
}

/// Read the whole body and return it along with its hex-encoded SHA-256 digest.
pub async fn sha256_body<B: IntoRequestBytes>(body: B) -> Result<(Bytes, String), BoxError> {
    let body = body.into_request_bytes().await?;
    let digest = sha256_hex(&body);
    Ok((body, digest))
}

/// Select the payload hash a client declared for this request.
///
/// Presigned requests (those carrying `X-Amz-Algorithm` in the query, the same test the authenticator uses to
/// pick the presigned flow) use the `X-Amz-Content-Sha256` query parameter, defaulting to `UNSIGNED-PAYLOAD`.
/// All other requests use the `x-amz-content-sha256` header, defaulting to the hash of an empty body.
pub fn content_sha256_for_request(parts: &Parts) -> Result<String, SignatureError> {
    let query = decode_query(parts.uri.query().unwrap_or_default())?;

    if is_presigned_query(&query) {
        return Ok(first_value(&query, QP_X_AMZ_CONTENT_SHA256).unwrap_or(UNSIGNED_PAYLOAD).to_string());
    }

    match parts.headers.get(HDR_X_AMZ_CONTENT_SHA256) {
        Some(value) => match std::str::from_utf8(value.as_bytes()) {
            Ok(value) => Ok(value.to_string()),
            Err(_) => Err(SignatureError::ContentSha256Mismatch(
                "The x-amz-content-sha256 header is not valid UTF-8.".to_string(),
            )),
        },
        None => Ok(SHA256_EMPTY.to_string()),
    }
}
