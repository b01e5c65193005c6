//! SigV4 signature computation and verification routines.
//!
//! This implements the string-to-sign assembly, signature computation, and constant-time comparison
//! shared by the header, presigned, and POST policy flows.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions. This is exposed for
//! testing purposes only.

use {
    crate::{
        constants::*,
        crypto::{hmac_sha256, sha256, SHA256_OUTPUT_LEN},
        derive_signing_key, Credential, KSecretKey, KSigningKey, Scope, SignatureError,
    },
    chrono::{DateTime, Utc},
    derive_builder::Builder,
    log::trace,
    qualifier_attr::qualifiers,
    std::fmt::{Debug, Formatter, Result as FmtResult},
    subtle::ConstantTimeEq,
};

/// Length of an ISO8601 date string in the UTC time zone.
const ISO8601_UTC_LENGTH: usize = 16;

/// Length of a SHA-256 hex string.
const SHA256_HEX_LENGTH: usize = SHA256_OUTPUT_LEN * 2;

/// Build the string to sign from the hash of a canonical request.
fn string_to_sign_for_digest(
    timestamp: DateTime<Utc>,
    scope: &Scope,
    canonical_request_sha256: &[u8; SHA256_OUTPUT_LEN],
) -> String {
    let scope = scope.to_string();
    let mut result =
        String::with_capacity(AWS4_HMAC_SHA256.len() + 1 + ISO8601_UTC_LENGTH + 1 + scope.len() + 1 + SHA256_HEX_LENGTH);
    result.push_str(AWS4_HMAC_SHA256);
    result.push('\n');
    result.push_str(&timestamp.format(ISO8601_COMPACT_FORMAT).to_string());
    result.push('\n');
    result.push_str(&scope);
    result.push('\n');
    result.push_str(&hex::encode(canonical_request_sha256));
    result
}

/// Build the string to sign:
/// `AWS4-HMAC-SHA256\n<timestamp>\n<date>/<region>/<service>/aws4_request\n<hex(sha256(canonical_request))>`.
pub fn string_to_sign(timestamp: DateTime<Utc>, scope: &Scope, canonical_request: &[u8]) -> String {
    string_to_sign_for_digest(timestamp, scope, &sha256(canonical_request))
}

/// Compute the hex-encoded signature of `data` under `signing_key`.
pub fn compute_signature(signing_key: &KSigningKey, data: &[u8]) -> String {
    hex::encode(hmac_sha256(signing_key.as_ref(), data))
}

/// Compare a caller-supplied signature against the expected one in constant time.
///
/// Neither value is logged.
pub fn signatures_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Low-level structure for performing SigV4 verification after a canonical request has been generated.
#[derive(Builder, Clone)]
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub struct SigV4Authenticator {
    /// The SHA-256 hash of the canonical request.
    canonical_request_sha256: [u8; SHA256_OUTPUT_LEN],

    /// The parsed credential passed into the request. Its scope binds the signing key and string to sign.
    credential: Credential,

    /// The signature passed into the request.
    signature: String,

    /// The timestamp of the request, from either the `X-Amz-Date` query parameter or the `x-amz-date`/`Date`
    /// header.
    request_timestamp: DateTime<Utc>,
}

impl SigV4Authenticator {
    /// Create a builder for `SigV4Authenticator`.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn builder() -> SigV4AuthenticatorBuilder {
        SigV4AuthenticatorBuilder::default()
    }

    /// Retrieve the parsed credential passed into the request.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Retrieve the timestamp of the request.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn request_timestamp(&self) -> DateTime<Utc> {
        self.request_timestamp
    }

    /// Return the string to sign for the request.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn get_string_to_sign(&self) -> String {
        string_to_sign_for_digest(self.request_timestamp, self.credential.scope(), &self.canonical_request_sha256)
    }

    /// Validate the request signature using the secret key resolved for the credential's access key.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn validate_signature(&self, secret_key: &KSecretKey) -> Result<(), SignatureError> {
        let string_to_sign = self.get_string_to_sign();
        trace!("String to sign:\n{}", string_to_sign);

        let signing_key = derive_signing_key(secret_key, self.credential.scope());
        let expected_signature = compute_signature(&signing_key, string_to_sign.as_bytes());
        if signatures_match(&self.signature, &expected_signature) {
            Ok(())
        } else {
            trace!("validate_signature: signature mismatch for access key {}", self.credential.access_key());
            Err(SignatureError::SignatureDoesNotMatch(Some(MSG_REQUEST_SIGNATURE_MISMATCH.to_string())))
        }
    }
}

impl Debug for SigV4Authenticator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SigV4Authenticator")
            .field("canonical_request_sha256", &hex::encode(self.canonical_request_sha256))
            .field("credential", &self.credential)
            .field("request_timestamp", &self.request_timestamp)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{crypto::SHA256_OUTPUT_LEN, parse_credential_tag, KSecretKey, SignatureError},
        chrono::{DateTime, NaiveDate, Utc},
        lazy_static::lazy_static,
    };

    lazy_static! {
        static ref TEST_TIMESTAMP: DateTime<Utc> = DateTime::from_naive_utc_and_offset(
            NaiveDate::from_ymd_opt(2015, 8, 30).unwrap().and_hms_opt(12, 36, 0).unwrap(),
            Utc
        );
    }

    fn test_secret() -> KSecretKey {
        KSecretKey::from("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
    }

    fn authenticator(signature: &str) -> SigV4Authenticator {
        SigV4Authenticator::builder()
            .canonical_request_sha256([0; SHA256_OUTPUT_LEN])
            .credential(parse_credential_tag("Credential=AKIDEXAMPLE/20150830/us-east-1/example/aws4_request").unwrap())
            .signature(signature.to_string())
            .request_timestamp(*TEST_TIMESTAMP)
            .build()
            .expect("failed to build SigV4Authenticator")
    }

    #[test_log::test]
    fn test_string_to_sign() {
        let auth = authenticator("");
        assert_eq!(
            auth.get_string_to_sign(),
            "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/example/aws4_request\n\
             0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(auth.credential().access_key(), "AKIDEXAMPLE");
        assert_eq!(auth.request_timestamp(), *TEST_TIMESTAMP);

        let scope = Scope::new(NaiveDate::from_ymd_opt(2015, 8, 30).unwrap(), "us-east-1", "service");
        assert_eq!(
            string_to_sign(*TEST_TIMESTAMP, &scope, b""),
            "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/service/aws4_request\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test_log::test]
    fn test_validate_signature() {
        let auth = authenticator("88bf1ccb1e3e4df7bb2ed6d89bcd8558d6770845007e1a5c392ac9edce0d5deb");
        auth.validate_signature(&test_secret()).unwrap();

        let auth = authenticator("88bf1ccb1e3e4df7bb2ed6d89bcd8558d6770845007e1a5c392ac9edce0d5dea");
        let e = auth.validate_signature(&test_secret()).unwrap_err();
        assert!(matches!(e, SignatureError::SignatureDoesNotMatch(_)));
        assert_eq!(
            e.to_string(),
            "The request signature we calculated does not match the signature you provided. Check your key and signing method."
        );

        let auth = authenticator("88bf1ccb1e3e4df7bb2ed6d89bcd8558d6770845007e1a5c392ac9edce0d5deb");
        let e = auth.validate_signature(&KSecretKey::from("wrong")).unwrap_err();
        assert!(matches!(e, SignatureError::SignatureDoesNotMatch(_)));

        // The signature is not part of the debug representation.
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("88bf1ccb"), "{}", debug);
    }

    #[test_log::test]
    fn test_signatures_match() {
        assert!(signatures_match("abcdef", "abcdef"));
        assert!(!signatures_match("abcdef", "abcdee"));
        assert!(!signatures_match("abcdef", "ABCDEF"));
        assert!(!signatures_match("abcdef", "abcdef0"));
        assert!(!signatures_match("", "abcdef"));
        assert!(signatures_match("", ""));
    }
}
