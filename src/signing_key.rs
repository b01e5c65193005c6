use {
    crate::{
        constants::*,
        crypto::{hmac_sha256, SHA256_OUTPUT_LEN},
        Scope,
    },
    chrono::NaiveDate,
    std::{
        convert::Infallible,
        fmt::{Debug, Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// A raw secret key (`kSecret`) as returned by the credential store.
#[derive(Clone, PartialEq, Eq)]
pub struct KSecretKey {
    /// The secret key, prefixed with "AWS4".
    prefixed_key: Vec<u8>,
}

/// The `kDate` key: `HMAC_SHA256("AWS4" + KSecretKey, "YYYYMMDD")`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KDateKey {
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kRegion` key: a `kDate` key, HMAC-SHA256 hashed with the region.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KRegionKey {
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kService` key: a `kRegion` key, HMAC-SHA256 hashed with the service.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KServiceKey {
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kSigning` key: a `kService` key, HMAC-SHA256 hashed with the "aws4_request" string.
///
/// Signing keys are derived per request and never cached across scopes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KSigningKey {
    key: [u8; SHA256_OUTPUT_LEN],
}

impl AsRef<[u8]> for KSecretKey {
    fn as_ref(&self) -> &[u8] {
        // Remove the "AWS4" prefix.
        &self.prefixed_key[AWS4_KEY_PREFIX.len()..]
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KDateKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KRegionKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KServiceKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KSigningKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

/// Key material is never printed; `Debug` and `Display` show only the key's kind.
macro_rules! redacted_fmt {
    ($($ty:ident),+) => {
        $(
            impl Debug for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                    f.write_str(stringify!($ty))
                }
            }

            impl Display for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                    f.write_str(stringify!($ty))
                }
            }
        )+
    };
}

redacted_fmt!(KSecretKey, KDateKey, KRegionKey, KServiceKey, KSigningKey);

impl FromStr for KSecretKey {
    type Err = Infallible;

    /// Create a new `KSecretKey` from a raw secret key.
    fn from_str(raw: &str) -> Result<Self, Infallible> {
        Ok(Self::from(raw))
    }
}

impl From<&str> for KSecretKey {
    fn from(raw: &str) -> Self {
        let mut prefixed_key = Vec::with_capacity(AWS4_KEY_PREFIX.len() + raw.len());
        prefixed_key.extend_from_slice(AWS4_KEY_PREFIX);
        prefixed_key.extend_from_slice(raw.as_bytes());
        Self {
            prefixed_key,
        }
    }
}

impl From<String> for KSecretKey {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl KSecretKey {
    /// Create a new `KDateKey` from this `KSecretKey` and a date.
    pub fn to_kdate(&self, date: NaiveDate) -> KDateKey {
        let date = date.format(ISO8601_DATE_FORMAT).to_string();
        KDateKey {
            key: hmac_sha256(self.prefixed_key.as_slice(), date.as_bytes()),
        }
    }

    /// Create a new `KSigningKey` from this `KSecretKey`, a date, a region, and a service.
    pub fn to_ksigning(&self, date: NaiveDate, region: &str, service: &str) -> KSigningKey {
        self.to_kdate(date).to_kregion(region).to_kservice(service).to_ksigning()
    }
}

impl KDateKey {
    /// Create a new `KRegionKey` from this `KDateKey` and a region.
    pub fn to_kregion(&self, region: &str) -> KRegionKey {
        KRegionKey {
            key: hmac_sha256(self.key.as_slice(), region.as_bytes()),
        }
    }
}

impl KRegionKey {
    /// Create a new `KServiceKey` from this `KRegionKey` and a service.
    pub fn to_kservice(&self, service: &str) -> KServiceKey {
        KServiceKey {
            key: hmac_sha256(self.key.as_slice(), service.as_bytes()),
        }
    }
}

impl KServiceKey {
    /// Create a new `KSigningKey` from this `KServiceKey`.
    pub fn to_ksigning(&self) -> KSigningKey {
        KSigningKey {
            key: hmac_sha256(self.key.as_slice(), AWS4_REQUEST.as_bytes()),
        }
    }
}

/// Derive the signing key for `scope`:
/// `HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`.
pub fn derive_signing_key(secret_key: &KSecretKey, scope: &Scope) -> KSigningKey {
    secret_key.to_ksigning(scope.date(), scope.region(), scope.service())
}

#[cfg(test)]
mod tests {
    use {
        crate::{derive_signing_key, KSecretKey, Scope},
        chrono::NaiveDate,
        std::str::FromStr,
    };

    #[test_log::test]
    fn test_signing_key_derived() {
        let date = NaiveDate::from_ymd_opt(2015, 8, 30).unwrap();

        let ksecret1a = KSecretKey::from_str("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY").unwrap();
        let ksecret1b = KSecretKey::from("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string());
        let ksecret2 = KSecretKey::from("wJalrXUtnFEMI/K7MDENG+bPxRfiCZEXAMPLEKEY");

        assert_eq!(ksecret1a, ksecret1b);
        assert_ne!(ksecret1a, ksecret2);
        assert_eq!(format!("{:?}", ksecret1a).as_str(), "KSecretKey");
        assert_eq!(format!("{}", ksecret1a).as_str(), "KSecretKey");
        assert_eq!(ksecret1a.as_ref(), b"wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");

        let kdate = ksecret1a.to_kdate(date);
        assert_eq!(hex::encode(kdate.as_ref()), "0138c7a6cbd60aa727b2f653a522567439dfb9f3e72b21f9b25941a42f04a7cd");
        assert_ne!(kdate, ksecret2.to_kdate(date));
        assert_eq!(format!("{:?}", kdate).as_str(), "KDateKey");

        let kregion = kdate.to_kregion("us-east-1");
        assert_eq!(hex::encode(kregion.as_ref()), "f33d5808504bf34812e5fade63308b424b244c59189be2a591dd2282c7cb563f");
        assert_eq!(format!("{}", kregion).as_str(), "KRegionKey");

        let kservice = kregion.to_kservice("example");
        assert_eq!(hex::encode(kservice.as_ref()), "c60cc4b1d034c757348f2c673004c18908bba9a46fa1db87a98350f27e7b2df6");
        assert_eq!(format!("{:?}", kservice).as_str(), "KServiceKey");

        let ksigning = kservice.to_ksigning();
        assert_eq!(hex::encode(ksigning.as_ref()), "431cc9ef5876287dbb925d4ba4629f459002ad1d26b7c751601bb204e11718b8");
        assert_eq!(format!("{:?}", ksigning).as_str(), "KSigningKey");
        assert_eq!(ksecret1a.to_ksigning(date, "us-east-1", "example"), ksigning);
    }

    #[test_log::test]
    fn test_derive_signing_key_iam_vector() {
        let secret = KSecretKey::from("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
        let scope = Scope::new(NaiveDate::from_ymd_opt(2015, 8, 30).unwrap(), "us-east-1", "iam");
        let key = hex::encode(derive_signing_key(&secret, &scope).as_ref());
        assert_eq!(key, "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9");

        // A single changed character in the secret yields an unrelated key.
        let other = KSecretKey::from("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY");
        let key = hex::encode(derive_signing_key(&other, &scope).as_ref());
        assert_eq!(key, "2c94c0cf5378ada6887f09bb697df8fc0affdb34ba1cdd5bda32b664bd55b73c");
    }

    #[test_log::test]
    fn test_scope_binding() {
        let secret = KSecretKey::from("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY");
        let date = NaiveDate::from_ymd_opt(2015, 8, 30).unwrap();
        let base = derive_signing_key(&secret, &Scope::new(date, "us-east-1", "s3"));

        assert_ne!(base, derive_signing_key(&secret, &Scope::new(date.succ_opt().unwrap(), "us-east-1", "s3")));
        assert_ne!(base, derive_signing_key(&secret, &Scope::new(date, "us-west-2", "s3")));
        assert_ne!(base, derive_signing_key(&secret, &Scope::new(date, "us-east-1", "iam")));
    }
}
