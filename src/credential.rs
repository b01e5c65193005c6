//! Parsing of the credential scope and the tagged fields of a SigV4 `Authorization` header.
//!
//! The same parsers serve the header flow (`Credential=...` inside `Authorization`), the presigned
//! flow (`X-Amz-Credential` in the query string), and the POST policy flow (`X-Amz-Credential` form
//! field). Region and service are checked against the gateway's configuration separately, by
//! [`Credential::check_scope`].

use {
    crate::{constants::*, SignatureError},
    chrono::NaiveDate,
    log::trace,
    std::{
        collections::BTreeSet,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// The scope a signing key and string to sign are bound to: `date/region/service/aws4_request`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Scope {
    date: NaiveDate,
    region: String,
    service: String,
}

impl Scope {
    /// Create a new scope.
    pub fn new(date: NaiveDate, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            date,
            region: region.into(),
            service: service.into(),
        }
    }

    /// The calendar date of the scope.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Display for Scope {
    /// Formats the scope as it appears in the string to sign, e.g. `20150830/us-east-1/s3/aws4_request`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}/{}/{}", self.date.format(ISO8601_DATE_FORMAT), self.region, self.service, AWS4_REQUEST)
    }
}

/// A parsed credential: the claimed access key and the scope it was signed under.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credential {
    access_key: String,
    scope: Scope,
}

impl Credential {
    /// Create a credential from its parts.
    pub fn new(access_key: impl Into<String>, scope: Scope) -> Self {
        Self {
            access_key: access_key.into(),
            scope,
        }
    }

    /// The access key claimed by the caller.
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The scope the request was signed under.
    #[inline]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Verify the scope names the region and service this gateway serves.
    ///
    /// An empty `region` accepts any region.
    pub fn check_scope(&self, region: &str, service: &str) -> Result<(), SignatureError> {
        if !region.is_empty() && self.scope.region != region {
            trace!("check_scope: credential region '{}' does not match '{}'", self.scope.region, region);
            return Err(SignatureError::InvalidRegion(format!(
                "The authorization header is malformed; the region '{}' is wrong; expecting '{}'",
                self.scope.region, region
            )));
        }

        if self.scope.service != service {
            trace!("check_scope: credential service '{}' does not match '{}'", self.scope.service, service);
            return Err(SignatureError::InvalidService(format!(
                "Credential should be scoped to correct service: '{}'.",
                service
            )));
        }

        Ok(())
    }
}

impl Display for Credential {
    /// Formats the credential as `accessKey/date/region/service/aws4_request`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.access_key, self.scope)
    }
}

/// The lower-cased, de-duplicated, alphabetically ordered set of header names covered by a signature.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SignedHeaderSet {
    names: BTreeSet<String>,
}

impl SignedHeaderSet {
    /// Parse a semicolon-separated list such as `host;x-amz-date`.
    pub fn parse(value: &str) -> Result<Self, SignatureError> {
        let names: BTreeSet<String> =
            value.split(';').map(|name| name.trim().to_ascii_lowercase()).filter(|name| !name.is_empty()).collect();

        if names.is_empty() {
            return Err(SignatureError::MissingFields("Signed headers are empty.".to_string()));
        }

        Ok(Self {
            names,
        })
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterate over the header names in canonical (sorted) order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Display for SignedHeaderSet {
    /// Formats the set in its canonical form, e.g. `host;x-amz-date`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for name in &self.names {
            if !first {
                f.write_str(";")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// Split `Tag=value`, requiring the expected tag and exactly one `=`.
fn split_tag<'a>(element: &'a str, tag: &str) -> Result<&'a str, SignatureError> {
    let mut parts = element.split('=');
    let (Some(found_tag), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(SignatureError::MissingFields(format!("Authorization field '{}' is missing its value.", tag)));
    };

    if found_tag != tag {
        return Err(SignatureError::MissingFields(format!(
            "Authorization header requires '{}' parameter. Got '{}'.",
            tag, found_tag
        )));
    }

    Ok(value)
}

/// Parse `Credential=<accessKey>/<YYYYMMDD>/<region>/<service>/aws4_request`.
pub fn parse_credential_tag(element: &str) -> Result<Credential, SignatureError> {
    let mut parts = element.split('=');
    let (Some(tag), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(SignatureError::MissingFields(format!("Credential is missing or malformed: '{}'", element)));
    };

    if tag != CREDENTIAL_TAG {
        return Err(SignatureError::MalformedCredential(format!(
            "Authorization header requires 'Credential' parameter. Got '{}'.",
            tag
        )));
    }

    let elements: Vec<&str> = value.trim().split('/').collect();
    let [access_key, date, region, service, terminator] = elements.as_slice() else {
        trace!("parse_credential_tag: credential has {} parts, expected 5", elements.len());
        return Err(SignatureError::MalformedCredential(format!(
            "Credential must have exactly 5 slash-delimited elements, e.g. keyid/date/region/service/term, got '{}'",
            value
        )));
    };

    if *terminator != AWS4_REQUEST {
        return Err(SignatureError::MalformedCredential(format!(
            "Credential should be scoped with a valid terminator: 'aws4_request', not '{}'.",
            terminator
        )));
    }

    if access_key.len() < MIN_ACCESS_KEY_LENGTH {
        return Err(SignatureError::InvalidAccessKeyId(MSG_ACCESS_KEY_NOT_FOUND.to_string()));
    }

    let date = parse_scope_date(date)?;
    Ok(Credential::new(*access_key, Scope::new(date, *region, *service)))
}

/// Parse `SignedHeaders=host;x-amz-date`.
pub fn parse_signed_headers_tag(element: &str) -> Result<SignedHeaderSet, SignatureError> {
    SignedHeaderSet::parse(split_tag(element, SIGNED_HEADERS_TAG)?)
}

/// Parse `Signature=<hex>`, requiring a non-empty value.
pub fn parse_signature_tag(element: &str) -> Result<String, SignatureError> {
    let value = split_tag(element, SIGNATURE_TAG)?;
    if value.is_empty() {
        return Err(SignatureError::MissingFields("Authorization header requires 'Signature' parameter.".to_string()));
    }

    Ok(value.to_string())
}

/// Parse the fixed 8-digit `YYYYMMDD` date of a credential scope.
fn parse_scope_date(date: &str) -> Result<NaiveDate, SignatureError> {
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SignatureError::MalformedDate(format!("Invalid credential date '{}'.", date)));
    }

    NaiveDate::parse_from_str(date, ISO8601_DATE_FORMAT)
        .map_err(|_| SignatureError::MalformedDate(format!("Invalid credential date '{}'.", date)))
}
