//! Common constants used throughout the crate.
//!
//! Keeping these in one place ensures the header, presigned, and POST policy flows agree on the
//! spelling of every header, query parameter, and error code.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically.

/// Algorithm for AWS SigV4
pub(crate) const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";

/// Prefix applied to the secret key before deriving `kDate`.
pub(crate) const AWS4_KEY_PREFIX: &[u8] = b"AWS4";

/// String included at the end of the AWS SigV4 credential scope
pub(crate) const AWS4_REQUEST: &str = "aws4_request";

/// Tag preceding the credential in the `Authorization` header.
pub(crate) const CREDENTIAL_TAG: &str = "Credential";

/// Default region when none is configured.
pub(crate) const DEFAULT_REGION: &str = "us-east-1";

/// Default service name used in the credential scope.
pub(crate) const DEFAULT_SERVICE: &str = "s3";

/// Error code: AccessDenied
pub(crate) const ERR_CODE_ACCESS_DENIED: &str = "AccessDenied";

/// Error code: AuthorizationHeaderMalformed
pub(crate) const ERR_CODE_AUTHORIZATION_HEADER_MALFORMED: &str = "AuthorizationHeaderMalformed";

/// Error code: AuthorizationQueryParametersError
pub(crate) const ERR_CODE_AUTHORIZATION_QUERY_PARAMETERS_ERROR: &str = "AuthorizationQueryParametersError";

/// Error code: InvalidAccessKeyId
pub(crate) const ERR_CODE_INVALID_ACCESS_KEY_ID: &str = "InvalidAccessKeyId";

/// Error code: InvalidRegion
pub(crate) const ERR_CODE_INVALID_REGION: &str = "InvalidRegion";

/// Error code: InvalidRequest
pub(crate) const ERR_CODE_INVALID_REQUEST: &str = "InvalidRequest";

/// Error code: InvalidURI
pub(crate) const ERR_CODE_INVALID_URI: &str = "InvalidURI";

/// Error code: MalformedDate
pub(crate) const ERR_CODE_MALFORMED_DATE: &str = "MalformedDate";

/// Error code: MalformedQueryString
pub(crate) const ERR_CODE_MALFORMED_QUERY_STRING: &str = "MalformedQueryString";

/// Error code: MissingAuthenticationToken
pub(crate) const ERR_CODE_MISSING_AUTHENTICATION_TOKEN: &str = "MissingAuthenticationToken";

/// Error code: MissingFields
pub(crate) const ERR_CODE_MISSING_FIELDS: &str = "MissingFields";

/// Error code: RequestTimeTooSkewed
pub(crate) const ERR_CODE_REQUEST_TIME_TOO_SKEWED: &str = "RequestTimeTooSkewed";

/// Error code: SignatureDoesNotMatch
pub(crate) const ERR_CODE_SIGNATURE_DOES_NOT_MATCH: &str = "SignatureDoesNotMatch";

/// Error code: XAmzContentSHA256Mismatch
pub(crate) const ERR_CODE_X_AMZ_CONTENT_SHA256_MISMATCH: &str = "XAmzContentSHA256Mismatch";

/// Form field: base64-encoded POST policy document
pub(crate) const FORM_POLICY: &str = "policy";

/// Form field: legacy SigV2 policy signature
pub(crate) const FORM_SIGNATURE: &str = "signature";

/// Form field: credential scope of a SigV4 POST policy
pub(crate) const FORM_X_AMZ_CREDENTIAL: &str = "x-amz-credential";

/// Form field: SigV4 POST policy signature
pub(crate) const FORM_X_AMZ_SIGNATURE: &str = "x-amz-signature";

/// Header: date
pub(crate) const HDR_DATE: &str = "date";

/// Header: expect
pub(crate) const HDR_EXPECT: &str = "expect";

/// Header: host
pub(crate) const HDR_HOST: &str = "host";

/// Header: x-amz-content-sha256
pub(crate) const HDR_X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

/// Header: x-amz-date
pub(crate) const HDR_X_AMZ_DATE: &str = "x-amz-date";

/// Uppercase hex digits.
pub(crate) const HEX_DIGITS_UPPER: [u8; 16] =
    [b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'A', b'B', b'C', b'D', b'E', b'F'];

/// Compact ISO8601 format used for the string to sign.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Date format used in the credential scope.
pub(crate) const ISO8601_DATE_FORMAT: &str = "%Y%m%d";

/// Default allowed timestamp mismatch in minutes.
pub(crate) const MAX_CLOCK_SKEW_MINUTES: i64 = 15;

/// Largest presigned URL lifetime accepted, in seconds (seven days).
pub(crate) const MAX_PRESIGN_EXPIRES_SECS: i64 = 604_800;

/// Minimum length of an access key.
pub(crate) const MIN_ACCESS_KEY_LENGTH: usize = 3;

/// Error message: `"The AWS access key Id you provided does not exist in our records."`
pub(crate) const MSG_ACCESS_KEY_NOT_FOUND: &str = "The AWS access key Id you provided does not exist in our records.";

/// Error message: `"The provided 'x-amz-content-sha256' header does not match what was computed."`
pub(crate) const MSG_CONTENT_SHA256_MISMATCH: &str =
    "The provided 'x-amz-content-sha256' header does not match what was computed.";

/// Error message: `"Request is missing Authentication Token"`
pub(crate) const MSG_MISSING_AUTHENTICATION_TOKEN: &str = "Request is missing Authentication Token";

/// Error message: `"AWS authentication requires a valid Date or x-amz-date header"`
pub(crate) const MSG_MISSING_DATE_HEADER: &str = "AWS authentication requires a valid Date or x-amz-date header";

/// Error message: `"Request has expired"`
pub(crate) const MSG_PRESIGN_EXPIRED: &str = "Request has expired";

/// Error message: `"Only one auth mechanism allowed; only the X-Amz-Algorithm query parameter, Signature query string parameter or the Authorization header should be specified"`
pub(crate) const MSG_MULTIPLE_AUTH_MECHANISMS: &str = "Only one auth mechanism allowed; only the X-Amz-Algorithm query parameter, Signature query string parameter or the Authorization header should be specified";

/// Error message: `"The request signature we calculated does not match the signature you provided. Check your key and signing method."`
pub(crate) const MSG_REQUEST_SIGNATURE_MISMATCH: &str =
    "The request signature we calculated does not match the signature you provided. Check your key and signing method.";

/// Query parameter: X-Amz-Algorithm
pub(crate) const QP_X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";

/// Query parameter: X-Amz-Content-Sha256
pub(crate) const QP_X_AMZ_CONTENT_SHA256: &str = "X-Amz-Content-Sha256";

/// Query parameter: X-Amz-Credential
pub(crate) const QP_X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";

/// Query parameter: X-Amz-Date
pub(crate) const QP_X_AMZ_DATE: &str = "X-Amz-Date";

/// Query parameter: X-Amz-Expires
pub(crate) const QP_X_AMZ_EXPIRES: &str = "X-Amz-Expires";

/// Query parameter: X-Amz-Signature
pub(crate) const QP_X_AMZ_SIGNATURE: &str = "X-Amz-Signature";

/// Query parameter: X-Amz-SignedHeaders
pub(crate) const QP_X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";

/// Lowercase prefix shared by all SigV4 query parameters.
pub(crate) const QP_X_AMZ_PREFIX: &str = "x-amz";

/// Hex SHA-256 of an empty payload.
pub(crate) const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Tag preceding the signature in the `Authorization` header.
pub(crate) const SIGNATURE_TAG: &str = "Signature";

/// Tag preceding the signed headers in the `Authorization` header.
pub(crate) const SIGNED_HEADERS_TAG: &str = "SignedHeaders";

/// Payload hash sentinel for requests whose body is not signed.
pub(crate) const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";
