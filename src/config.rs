use {
    crate::constants::*,
    chrono::Duration,
    derive_builder::Builder,
};

/// Gateway-wide settings consulted while authenticating requests.
///
/// A `SignatureConfig` is immutable once built and is handed to the
/// [`RequestAuthenticator`][crate::RequestAuthenticator] at construction. Use [`SignatureConfig::builder`] to
/// override the defaults.
#[derive(Builder, Clone, Debug)]
#[builder(default)]
pub struct SignatureConfig {
    /// The region this gateway serves. Credential scopes naming any other region are rejected. An empty region
    /// accepts any region. Defaults to `us-east-1`.
    #[builder(setter(into))]
    region: String,

    /// The service name expected in credential scopes. Defaults to `s3`.
    #[builder(setter(into))]
    service: String,

    /// How far into the future a presigned request's signing time may be, and how far a header-signed request's
    /// timestamp may drift from the server clock. Defaults to 15 minutes.
    max_clock_skew: Duration,

    /// Upper bound accepted for `X-Amz-Expires`. Defaults to seven days.
    max_presign_expires: Duration,

    /// Whether header-signed requests outside `max_clock_skew` are rejected with `RequestTimeTooSkewed`.
    /// Defaults to `false`: a header-signed request is accepted whenever its signature matches.
    enforce_header_clock_skew: bool,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            service: DEFAULT_SERVICE.to_string(),
            max_clock_skew: Duration::minutes(MAX_CLOCK_SKEW_MINUTES),
            max_presign_expires: Duration::seconds(MAX_PRESIGN_EXPIRES_SECS),
            enforce_header_clock_skew: false,
        }
    }
}

impl SignatureConfig {
    /// Create a [SignatureConfigBuilder] to construct a [SignatureConfig].
    #[inline]
    pub fn builder() -> SignatureConfigBuilder {
        SignatureConfigBuilder::default()
    }

    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[inline]
    pub fn max_clock_skew(&self) -> Duration {
        self.max_clock_skew
    }

    #[inline]
    pub fn max_presign_expires(&self) -> Duration {
        self.max_presign_expires
    }

    #[inline]
    pub fn enforce_header_clock_skew(&self) -> bool {
        self.enforce_header_clock_skew
    }
}
