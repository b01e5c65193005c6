//! Parsed authentication material for each of the three SigV4 flows.
//!
//! A [`SignatureContext`] is produced by classifying a request: an `Authorization` header selects the header flow,
//! an `X-Amz-Algorithm` query parameter selects the presigned flow, and a POST form carrying `X-Amz-Signature`
//! selects the policy flow.

use {
    crate::{
        canonical::{decode_query, QueryParams},
        chronoutil::ParseISO8601,
        constants::*,
        parse_credential_tag, parse_signature_tag, parse_signed_headers_tag, Credential, SignatureError,
        SignedHeaderSet,
    },
    chrono::{DateTime, Duration, Utc},
    http::{header::AUTHORIZATION, request::Parts},
    log::trace,
    std::{collections::HashMap, str::FromStr},
};

/// The fields of an `Authorization: AWS4-HMAC-SHA256 Credential=..., SignedHeaders=..., Signature=...` header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthContext {
    credential: Credential,
    signed_headers: SignedHeaderSet,
    signature: String,
}

impl AuthContext {
    /// Parse an `Authorization` header value.
    ///
    /// Spaces are removed before parsing. The value must start with `AWS4-HMAC-SHA256` and carry exactly three
    /// comma-separated fields in the order `Credential`, `SignedHeaders`, `Signature`.
    pub fn from_authorization_header(value: &str) -> Result<Self, SignatureError> {
        let value = value.replace(' ', "");
        if value.is_empty() {
            return Err(SignatureError::MissingFields("Authorization header is empty.".to_string()));
        }

        let Some(fields) = value.strip_prefix(AWS4_HMAC_SHA256) else {
            trace!("from_authorization_header: unsupported algorithm");
            return Err(SignatureError::UnsupportedAlgorithm(
                "The authorization mechanism you have provided is not supported. Please use AWS4-HMAC-SHA256."
                    .to_string(),
            ));
        };

        let fields: Vec<&str> = fields.trim().split(',').collect();
        let [credential, signed_headers, signature] = fields.as_slice() else {
            trace!("from_authorization_header: expected 3 fields, got {}", fields.len());
            return Err(SignatureError::MissingFields(format!(
                "Authorization header requires exactly 3 fields (Credential, SignedHeaders, Signature); got {}.",
                fields.len()
            )));
        };

        Ok(Self {
            credential: parse_credential_tag(credential)?,
            signed_headers: parse_signed_headers_tag(signed_headers)?,
            signature: parse_signature_tag(signature)?,
        })
    }

    #[inline]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    #[inline]
    pub fn signed_headers(&self) -> &SignedHeaderSet {
        &self.signed_headers
    }

    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// The `X-Amz-*` parameters of a presigned URL, along with the full decoded query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PresignContext {
    query: QueryParams,
    credential: Credential,
    date: DateTime<Utc>,
    expires: Duration,
    signed_headers: SignedHeaderSet,
    signature: String,
}

/// Whether a decoded query carries presigned authentication, i.e. an `X-Amz-Algorithm` parameter.
pub(crate) fn is_presigned_query(query: &QueryParams) -> bool {
    query.contains_key(QP_X_AMZ_ALGORITHM)
}

/// The first value received for `key`, if any.
pub(crate) fn first_value<'a>(query: &'a QueryParams, key: &str) -> Option<&'a str> {
    query.get(key).and_then(|values| values.first()).map(String::as_str)
}

impl PresignContext {
    /// Validate and parse the presigned parameters of a decoded query.
    pub fn from_query(query: QueryParams) -> Result<Self, SignatureError> {
        for key in [
            QP_X_AMZ_ALGORITHM,
            QP_X_AMZ_CREDENTIAL,
            QP_X_AMZ_SIGNATURE,
            QP_X_AMZ_DATE,
            QP_X_AMZ_SIGNED_HEADERS,
            QP_X_AMZ_EXPIRES,
        ] {
            if first_value(&query, key).unwrap_or_default().is_empty() {
                trace!("from_query: missing query parameter {}", key);
                return Err(SignatureError::MissingFields(format!(
                    "Query-string authentication requires the {} parameter.",
                    key
                )));
            }
        }

        let value = |key| first_value(&query, key).unwrap_or_default();

        let algorithm = value(QP_X_AMZ_ALGORITHM);
        if algorithm != AWS4_HMAC_SHA256 {
            return Err(SignatureError::UnsupportedAlgorithm(format!(
                "X-Amz-Algorithm only supports \"AWS4-HMAC-SHA256\"; got \"{}\".",
                algorithm
            )));
        }

        let credential = parse_credential_tag(&format!("{}={}", CREDENTIAL_TAG, value(QP_X_AMZ_CREDENTIAL)))?;

        let date_str = value(QP_X_AMZ_DATE);
        let Some(date) = DateTime::<Utc>::parse_from_iso8601(date_str) else {
            return Err(SignatureError::MalformedDate(format!(
                "X-Amz-Date must be in the ISO8601 Long Format \"yyyyMMdd'T'HHmmss'Z'\"; got \"{}\".",
                date_str
            )));
        };

        let expires_str = value(QP_X_AMZ_EXPIRES);
        let Ok(expires) = i64::from_str(expires_str) else {
            return Err(SignatureError::MalformedExpires(format!(
                "X-Amz-Expires should be a number; got \"{}\".",
                expires_str
            )));
        };

        if expires < 0 {
            return Err(SignatureError::MalformedExpires("X-Amz-Expires must be non-negative.".to_string()));
        }

        if expires > MAX_PRESIGN_EXPIRES_SECS {
            return Err(SignatureError::MalformedExpires(
                "X-Amz-Expires must be less than a week (in seconds) that is 604800.".to_string(),
            ));
        }

        let signed_headers = SignedHeaderSet::parse(value(QP_X_AMZ_SIGNED_HEADERS))?;
        let signature = value(QP_X_AMZ_SIGNATURE).to_string();

        Ok(Self {
            credential,
            date,
            expires: Duration::seconds(expires),
            signed_headers,
            signature,
            query,
        })
    }

    /// The full decoded query, including the `X-Amz-*` parameters.
    #[inline]
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    #[inline]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The signing time from `X-Amz-Date`.
    #[inline]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// The validity window from `X-Amz-Expires`.
    #[inline]
    pub fn expires(&self) -> Duration {
        self.expires
    }

    #[inline]
    pub fn signed_headers(&self) -> &SignedHeaderSet {
        &self.signed_headers
    }

    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// The signature-bearing fields of a browser-based POST upload form.
///
/// Form field names are matched case-insensitively.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyContext {
    credential: Credential,
    policy: String,
    signature: String,
}

impl PolicyContext {
    /// Parse the `X-Amz-Credential`, `Policy`, and `X-Amz-Signature` form fields.
    ///
    /// A form carrying a `Signature` field is a legacy SigV2 upload and is rejected with
    /// [`SignatureError::UnsupportedAlgorithm`]. A missing `Policy` is treated as empty, and a missing
    /// `X-Amz-Signature` never matches.
    pub fn from_form_fields<I, K, V>(fields: I) -> Result<Self, SignatureError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form: HashMap<String, String> = HashMap::new();
        for (key, value) in fields {
            form.entry(key.as_ref().to_ascii_lowercase()).or_insert_with(|| value.into());
        }

        if form.contains_key(FORM_SIGNATURE) {
            trace!("from_form_fields: form carries a SigV2 Signature field");
            return Err(SignatureError::UnsupportedAlgorithm(
                "POST policy signature version 2 is not supported. Please use AWS4-HMAC-SHA256.".to_string(),
            ));
        }

        let credential_field = form.get(FORM_X_AMZ_CREDENTIAL).map(String::as_str).unwrap_or_default();
        let credential = parse_credential_tag(&format!("{}={}", CREDENTIAL_TAG, credential_field)).map_err(|e| {
            trace!("from_form_fields: malformed credential: {}", e);
            SignatureError::MissingFields(format!("POST form X-Amz-Credential is missing or malformed: {}", e))
        })?;

        Ok(Self {
            credential,
            policy: form.remove(FORM_POLICY).unwrap_or_default(),
            signature: form.remove(FORM_X_AMZ_SIGNATURE).unwrap_or_default(),
        })
    }

    #[inline]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The base64 policy document, exactly as received.
    #[inline]
    pub fn policy(&self) -> &str {
        &self.policy
    }

    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// The authentication flow a request uses, with its parsed material.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignatureContext {
    /// Signed via the `Authorization` header.
    Header(AuthContext),

    /// Signed via presigned URL query parameters.
    Presigned(PresignContext),

    /// Signed via a POST policy form.
    PostPolicy(PolicyContext),
}

impl SignatureContext {
    /// Classify a request by where its signature lives, and parse it.
    ///
    /// Supplying both an `Authorization` header and an `X-Amz-Algorithm` query parameter fails with
    /// [`SignatureError::SignatureDoesNotMatch`]; supplying neither fails with
    /// [`SignatureError::MissingAuthenticationToken`].
    pub fn from_request_parts(parts: &Parts) -> Result<Self, SignatureError> {
        let query = decode_query(parts.uri.query().unwrap_or_default())?;
        let authorization = parts.headers.get(AUTHORIZATION);
        let presigned = is_presigned_query(&query);

        match (authorization, presigned) {
            (Some(_), true) => {
                trace!("from_request_parts: both Authorization header and X-Amz-Algorithm present");
                Err(SignatureError::SignatureDoesNotMatch(Some(MSG_MULTIPLE_AUTH_MECHANISMS.to_string())))
            }
            (Some(value), false) => {
                let value = std::str::from_utf8(value.as_bytes()).map_err(|_| {
                    trace!("from_request_parts: Authorization header is not valid UTF-8");
                    SignatureError::MissingFields("The Authorization header is not valid UTF-8.".to_string())
                })?;
                Ok(Self::Header(AuthContext::from_authorization_header(value)?))
            }
            (None, true) => Ok(Self::Presigned(PresignContext::from_query(query)?)),
            (None, false) => {
                Err(SignatureError::MissingAuthenticationToken(MSG_MISSING_AUTHENTICATION_TOKEN.to_string()))
            }
        }
    }

    /// Parse the fields of a POST upload form.
    pub fn from_post_form<I, K, V>(fields: I) -> Result<Self, SignatureError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Ok(Self::PostPolicy(PolicyContext::from_form_fields(fields)?))
    }

    /// The credential claimed by the request, whichever flow it uses.
    pub fn credential(&self) -> &Credential {
        match self {
            Self::Header(ctx) => ctx.credential(),
            Self::Presigned(ctx) => ctx.credential(),
            Self::PostPolicy(ctx) => ctx.credential(),
        }
    }
}
