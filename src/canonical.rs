//! Canonicalization functionality for signature validation.
//!
//! This includes URL path and query encoding, header value trimming, signed-header extraction, and
//! the assembly of the SigV4 canonical request itself.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions. This is exposed for
//! testing purposes only.

use {
    crate::{constants::*, SignatureError, SignedHeaderSet},
    http::request::Parts,
    lazy_static::lazy_static,
    log::trace,
    qualifier_attr::qualifiers,
    regex::bytes::Regex,
    std::collections::BTreeMap,
};

/// Decoded query parameters: keys in byte order, values in the order received.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// Signed header names mapped to the raw bytes of every value the request carries for that header, in the order
/// received.
pub type SignedHeaderValues = BTreeMap<String, Vec<Vec<u8>>>;

/// Error message: `"Illegal hex character in escape % pattern: %"`
const MSG_ILLEGAL_HEX_CHAR: &str = "Illegal hex character in escape % pattern: %";

/// Error message: `"Incomplete trailing escape % sequence"`
const MSG_INCOMPLETE_TRAILING_ESCAPE: &str = "Incomplete trailing escape % sequence";

lazy_static! {
    /// Runs of whitespace to be collapsed in canonical header values.
    static ref MULTISPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Indicates whether the specified byte is RFC3986 unreserved -- i.e., can be represented without being
/// percent-encoded, e.g. '?' -> '%3F'.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
fn is_rfc3986_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// Convert a byte to uppercase hex representation.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
const fn u8_to_upper_hex(b: u8) -> [u8; 2] {
    [HEX_DIGITS_UPPER[((b >> 4) & 0xf) as usize], HEX_DIGITS_UPPER[(b & 0xf) as usize]]
}

/// Push `%XX` for the byte onto `result`.
#[inline(always)]
fn push_escaped(result: &mut String, b: u8) {
    let hex = u8_to_upper_hex(b);
    result.push('%');
    result.push(hex[0] as char);
    result.push(hex[1] as char);
}

/// Percent-decode `s` into raw bytes. When `plus_as_space` is set, `+` decodes to a space, as in HTML forms and
/// query strings.
///
/// On failure, the error message describing the bad escape is returned.
fn percent_decode(s: &str, plus_as_space: bool) -> Result<Vec<u8>, String> {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if i + 2 >= bytes.len() {
                    return Err(MSG_INCOMPLETE_TRAILING_ESCAPE.to_string());
                }

                let hi = (bytes[i + 1] as char).to_digit(16);
                let lo = (bytes[i + 2] as char).to_digit(16);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => result.push((hi * 16 + lo) as u8),
                    _ => {
                        return Err(format!(
                            "{}{}{}",
                            MSG_ILLEGAL_HEX_CHAR,
                            bytes[i + 1] as char,
                            bytes[i + 2] as char
                        ))
                    }
                }
                i += 3;
            }
            b'+' if plus_as_space => {
                result.push(b' ');
                i += 1;
            }
            c => {
                result.push(c);
                i += 1;
            }
        }
    }

    Ok(result)
}

/// Decode a raw query string into its parameters.
///
/// Pairs are separated by `&`; a pair without `=` is a key with an empty value. Keys and values are
/// form-decoded (`+` is a space).
pub fn decode_query(query: &str) -> Result<QueryParams, SignatureError> {
    let mut result = QueryParams::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_query_element(key)?;
        let value = decode_query_element(value)?;
        result.entry(key).or_default().push(value);
    }

    Ok(result)
}

fn decode_query_element(element: &str) -> Result<String, SignatureError> {
    let bytes = percent_decode(element, true).map_err(SignatureError::MalformedQueryString)?;
    String::from_utf8(bytes).map_err(|_| {
        SignatureError::MalformedQueryString(format!("Query parameter could not be decoded as UTF-8: '{}'", element))
    })
}

/// Escape a query key or value using form-encoding rules: unreserved bytes are kept, a space becomes `+`, and
/// everything else becomes `%XX`.
pub fn query_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for b in s.bytes() {
        if is_rfc3986_unreserved(b) {
            result.push(b as char);
        } else if b == b' ' {
            result.push('+');
        } else {
            push_escaped(&mut result, b);
        }
    }
    result
}

/// Encode query parameters as `key=value` pairs joined by `&`, keys sorted and values kept in the order received.
pub fn encode_query(params: &QueryParams) -> String {
    let mut result = String::new();
    for (key, values) in params {
        let key = query_escape(key);
        for value in values {
            if !result.is_empty() {
                result.push('&');
            }
            result.push_str(&key);
            result.push('=');
            result.push_str(&query_escape(value));
        }
    }
    result
}

/// Decode the percent-encoded URI path into raw bytes. `+` is left as-is.
pub fn decode_path(path: &str) -> Result<Vec<u8>, SignatureError> {
    percent_decode(path, false).map_err(SignatureError::InvalidUriPath)
}

/// Encode a decoded URI path: unreserved bytes and `/` are kept; every other byte becomes uppercase `%XX`.
pub fn encode_path(path: &[u8]) -> String {
    let mut result = String::with_capacity(path.len());
    for b in path {
        if is_rfc3986_unreserved(*b) || *b == b'/' {
            result.push(*b as char);
        } else {
            push_escaped(&mut result, *b);
        }
    }
    result
}

/// Trim leading and trailing whitespace and collapse each internal whitespace run into a single space.
///
/// Works on raw bytes: anything that is not whitespace, including bytes that are not valid UTF-8, is kept as-is.
pub fn trim_all(value: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(value.len());
    for word in MULTISPACE.split(value).filter(|word| !word.is_empty()) {
        if !result.is_empty() {
            result.push(b' ');
        }
        result.extend_from_slice(word);
    }
    result
}

/// Collect the values of every signed header from the request.
///
/// `host` must be signed; when the request has no `Host` header, the URI authority is used. A signed `expect`
/// header absent from the request is taken to be `100-continue`, since some proxies strip it. Any other signed
/// header missing from the request fails with [`SignatureError::UnsignedHeaders`].
pub fn extract_signed_headers(
    signed_headers: &SignedHeaderSet,
    parts: &Parts,
) -> Result<SignedHeaderValues, SignatureError> {
    if !signed_headers.contains(HDR_HOST) {
        trace!("extract_signed_headers: host is not a signed header");
        return Err(SignatureError::UnsignedHeaders(
            "'Host' must be a 'SignedHeader' in the AWS Authorization.".to_string(),
        ));
    }

    let mut result = SignedHeaderValues::new();
    for name in signed_headers.iter() {
        let values: Vec<Vec<u8>> = parts.headers.get_all(name).iter().map(|value| value.as_bytes().to_vec()).collect();

        let values = if !values.is_empty() {
            values
        } else if name == HDR_HOST {
            match parts.uri.authority() {
                Some(authority) => vec![authority.as_str().as_bytes().to_vec()],
                None => {
                    return Err(SignatureError::UnsignedHeaders(
                        "The request has no Host header and no URI authority.".to_string(),
                    ))
                }
            }
        } else if name == HDR_EXPECT {
            vec![b"100-continue".to_vec()]
        } else {
            trace!("extract_signed_headers: signed header '{}' is not present", name);
            return Err(SignatureError::UnsignedHeaders(format!(
                "Header '{}' is declared as signed but is not present in the request.",
                name
            )));
        };

        result.insert(name.to_string(), values);
    }

    Ok(result)
}

/// The canonical header block: `name:value\n` per header in sorted order, multiple values comma-joined after
/// trimming. Header values are emitted byte for byte.
pub fn canonical_headers(headers: &SignedHeaderValues) -> Vec<u8> {
    let mut result = Vec::new();
    for (name, values) in headers {
        result.extend_from_slice(name.to_ascii_lowercase().as_bytes());
        result.push(b':');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                result.push(b',');
            }
            result.extend_from_slice(&trim_all(value));
        }
        result.push(b'\n');
    }
    result
}

/// The sorted, semicolon-joined list of signed header names.
pub fn signed_headers_string(headers: &SignedHeaderValues) -> String {
    let mut names: Vec<String> = headers.keys().map(|name| name.to_ascii_lowercase()).collect();
    names.sort();
    names.join(";")
}

/// Build the SigV4 canonical request.
///
/// `path` is the decoded URI path and `query` the already-encoded query string (see [`encode_query`]); any `+`
/// in the query is emitted as `%20`. The result is raw bytes since signed header values need not be UTF-8.
pub fn canonical_request(
    method: &str,
    path: &[u8],
    query: &str,
    headers: &SignedHeaderValues,
    payload_hash: &str,
) -> Vec<u8> {
    let result = [
        method.as_bytes().to_vec(),
        encode_path(path).into_bytes(),
        query.replace('+', "%20").into_bytes(),
        canonical_headers(headers),
        signed_headers_string(headers).into_bytes(),
        payload_hash.as_bytes().to_vec(),
    ]
    .join(&b'\n');
    trace!("canonical_request:\n{}", String::from_utf8_lossy(&result));
    result
}
