//! The `scratchstack_gateway_auth` crate verifies AWS SigV4 signatures on requests arriving at an S3-compatible
//! storage gateway. It does not sign requests; use an AWS SDK for that.
//!
//! Three request flavors are supported:
//! * Requests signed via the `Authorization` header.
//! * Presigned URLs, where the signature and its parameters travel in the query string.
//! * Browser-based POST uploads, where the signature covers a base64 policy document in the form.
//!
//! You need the caller's secret key, so this only works with credentials you issue yourself. Secrets are supplied
//! by a credential store: any [`tower::Service`] that maps a [`GetCredentialsRequest`] to a
//! [`GetCredentialsResponse`].
//!
//! # Workflow
//! The authenticator only needs the request head and a payload hash; it never reads the body itself.
//!
//! 1. Build a [`RequestAuthenticator`] from a [`SignatureConfig`] and a credential store.
//! 2. Obtain the payload hash the client declared with [`content_sha256_for_request`], or hash a fully buffered body
//!    with [`sha256_body`].
//! 3. Call [`RequestAuthenticator::authenticate_request`] (or
//!    [`authenticate_post_policy`][RequestAuthenticator::authenticate_post_policy] for POST uploads).
//!
//! ## Example
//! ```rust
//! use chrono::NaiveDate;
//! use http::Request;
//! use scratchstack_gateway_auth::{
//!     content_sha256_for_request, RequestAuthenticator, SignatureConfig, StaticCredentialStore,
//! };
//!
//! const ACCESS_KEY: &str = "AKIDEXAMPLE";
//! const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
//!
//! # tokio_test::block_on(async {
//! let config = SignatureConfig::builder().region("us-east-1").service("service").build().unwrap();
//! let store = StaticCredentialStore::new([(ACCESS_KEY, "example-user", SECRET_KEY)]);
//! let authenticator = RequestAuthenticator::new(config, store);
//!
//! // Normally this would come from your web framework.
//! let req = Request::get("/")
//!     .header("Host", "example.amazonaws.com")
//!     .header("X-Amz-Date", "20150830T123600Z")
//!     .header("Authorization", "AWS4-HMAC-SHA256 \
//! Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
//! SignedHeaders=host;x-amz-date, \
//! Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31")
//!     .body(())
//!     .unwrap();
//! let parts = req.into_parts().0;
//!
//! // Normally you would pass `Utc::now()`. We're pinning this to the signing time for testing purposes.
//! let now = NaiveDate::from_ymd_opt(2015, 8, 30).unwrap().and_hms_opt(12, 36, 0).unwrap().and_utc();
//!
//! let payload_hash = content_sha256_for_request(&parts).unwrap();
//! let identity = authenticator.authenticate_request(&parts, &payload_hash, now).await.unwrap();
//! assert_eq!(identity.identity(), "example-user");
//! # });
//! ```
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
mod body;
pub mod canonical;
mod chronoutil;
mod config;
mod constants;
mod context;
mod credential;
mod crypto;
mod error;
mod signature;
mod signing_key;
mod store;

pub use {
    auth::{compute_signature, signatures_match, string_to_sign},
    body::{content_sha256_for_request, sha256_body, IntoRequestBytes},
    config::{SignatureConfig, SignatureConfigBuilder, SignatureConfigBuilderError},
    context::{AuthContext, PolicyContext, PresignContext, SignatureContext},
    credential::{
        parse_credential_tag, parse_signature_tag, parse_signed_headers_tag, Credential, Scope, SignedHeaderSet,
    },
    error::SignatureError,
    signature::{
        AuthenticatedIdentity, AuthenticatedIdentityBuilder, AuthenticatedIdentityBuilderError, RequestAuthenticator,
    },
    signing_key::{derive_signing_key, KDateKey, KRegionKey, KSecretKey, KServiceKey, KSigningKey},
    store::{
        service_for_credentials_fn, GetCredentialsRequest, GetCredentialsRequestBuilder,
        GetCredentialsRequestBuilderError, GetCredentialsResponse, GetCredentialsResponseBuilder,
        GetCredentialsResponseBuilderError, StaticCredentialStore,
    },
};

pub use {scratchstack_aws_principal as principal, scratchstack_errors as errors};
