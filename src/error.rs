use {
    crate::constants::*,
    http::status::StatusCode,
    scratchstack_errors::ServiceError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Error returned when an attempt at authenticating a gateway request fails.
///
/// Every variant is terminal for the request. Messages never contain secrets or the expected signature.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignatureError {
    /// The payload hash declared in a presigned query does not match the hash supplied for the body.
    ContentSha256Mismatch(/* message */ String),

    /// The presigned URL is older than its declared `X-Amz-Expires` window.
    ExpiredPresignRequest(/* message */ String),

    /// The access key is too short, unknown to the credential store, or differs from the one the store resolved.
    InvalidAccessKeyId(/* message */ String),

    /// The credential scope names a region other than the one this gateway serves.
    InvalidRegion(/* message */ String),

    /// The credential scope names a service other than the one this gateway serves.
    InvalidService(/* message */ String),

    /// The URI path contains an invalid percent-encoding, e.g. `%0J`.
    InvalidUriPath(/* message */ String),

    /// The credential does not have the form `keyid/date/region/service/aws4_request`.
    MalformedCredential(/* message */ String),

    /// A date in the credential scope, `X-Amz-Date`, `x-amz-date`, or `Date` could not be parsed.
    MalformedDate(/* message */ String),

    /// `X-Amz-Expires` is not a number, is negative, or exceeds seven days.
    MalformedExpires(/* message */ String),

    /// The query string contains an invalid percent-encoding.
    MalformedQueryString(/* message */ String),

    /// The request carries no authentication at all.
    MissingAuthenticationToken(/* message */ String),

    /// Neither `x-amz-date` nor `Date` is present on a header-signed request.
    MissingDateHeader(/* message */ String),

    /// A required authentication field or query parameter is absent or empty.
    MissingFields(/* message */ String),

    /// The presigned request's signing time is further in the future than the allowed clock skew.
    RequestNotReadyYet(/* message */ String),

    /// The header-signed request's timestamp is outside the allowed clock skew.
    RequestTimeTooSkewed(/* message */ String),

    /// Signature did not match the calculated signature value, or a signed component was altered.
    /// Example messages:
    /// `The request signature we calculated does not match the signature you provided. Check your key and signing method.`
    /// `Only one auth mechanism allowed; ...`
    SignatureDoesNotMatch(Option</* message */ String>),

    /// A signed header was declared but is not present on the request, or `host` was not signed.
    UnsignedHeaders(/* message */ String),

    /// The signing algorithm is not `AWS4-HMAC-SHA256`.
    UnsupportedAlgorithm(/* message */ String),
}

impl SignatureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ContentSha256Mismatch(_) => ERR_CODE_X_AMZ_CONTENT_SHA256_MISMATCH,
            Self::ExpiredPresignRequest(_) | Self::RequestNotReadyYet(_) => ERR_CODE_ACCESS_DENIED,
            Self::InvalidAccessKeyId(_) => ERR_CODE_INVALID_ACCESS_KEY_ID,
            Self::InvalidRegion(_) => ERR_CODE_INVALID_REGION,
            Self::InvalidService(_) | Self::UnsupportedAlgorithm(_) => ERR_CODE_INVALID_REQUEST,
            Self::InvalidUriPath(_) => ERR_CODE_INVALID_URI,
            Self::MalformedCredential(_) => ERR_CODE_AUTHORIZATION_HEADER_MALFORMED,
            Self::MalformedDate(_) => ERR_CODE_MALFORMED_DATE,
            Self::MalformedExpires(_) => ERR_CODE_AUTHORIZATION_QUERY_PARAMETERS_ERROR,
            Self::MalformedQueryString(_) => ERR_CODE_MALFORMED_QUERY_STRING,
            Self::MissingAuthenticationToken(_) => ERR_CODE_MISSING_AUTHENTICATION_TOKEN,
            Self::MissingDateHeader(_) | Self::UnsignedHeaders(_) => ERR_CODE_ACCESS_DENIED,
            Self::MissingFields(_) => ERR_CODE_MISSING_FIELDS,
            Self::RequestTimeTooSkewed(_) => ERR_CODE_REQUEST_TIME_TOO_SKEWED,
            Self::SignatureDoesNotMatch(_) => ERR_CODE_SIGNATURE_DOES_NOT_MATCH,
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            Self::ExpiredPresignRequest(_)
            | Self::InvalidAccessKeyId(_)
            | Self::RequestNotReadyYet(_)
            | Self::RequestTimeTooSkewed(_)
            | Self::SignatureDoesNotMatch(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl ServiceError for SignatureError {
    fn error_code(&self) -> &'static str {
        SignatureError::error_code(self)
    }

    fn http_status(&self) -> StatusCode {
        SignatureError::http_status(self)
    }
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::ContentSha256Mismatch(msg)
            | Self::ExpiredPresignRequest(msg)
            | Self::InvalidAccessKeyId(msg)
            | Self::InvalidRegion(msg)
            | Self::InvalidService(msg)
            | Self::InvalidUriPath(msg)
            | Self::MalformedCredential(msg)
            | Self::MalformedDate(msg)
            | Self::MalformedExpires(msg)
            | Self::MalformedQueryString(msg)
            | Self::MissingAuthenticationToken(msg)
            | Self::MissingDateHeader(msg)
            | Self::MissingFields(msg)
            | Self::RequestNotReadyYet(msg)
            | Self::RequestTimeTooSkewed(msg)
            | Self::UnsignedHeaders(msg)
            | Self::UnsupportedAlgorithm(msg) => f.write_str(msg),
            Self::SignatureDoesNotMatch(msg) => {
                if let Some(msg) = msg {
                    f.write_str(msg)
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Error for SignatureError {}

impl From<Box<dyn Error + Send + Sync>> for SignatureError {
    /// Credential-store failures that are not already a [`SignatureError`] are reported as an unknown access key so
    /// the caller learns nothing about the store.
    fn from(e: Box<dyn Error + Send + Sync>) -> SignatureError {
        match e.downcast::<SignatureError>() {
            Ok(sig_err) => *sig_err,
            Err(_) => SignatureError::InvalidAccessKeyId(MSG_ACCESS_KEY_NOT_FOUND.to_string()),
        }
    }
}
