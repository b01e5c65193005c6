//! The credential store seam: how the authenticator turns an access key into a secret key and an identity.
//!
//! A store is any [`tower::Service`] accepting a [`GetCredentialsRequest`]. Wrap an async function with
//! [`service_for_credentials_fn`], or use [`StaticCredentialStore`] for fixed key sets.

use {
    crate::{constants::*, KSecretKey, SignatureError},
    derive_builder::Builder,
    scratchstack_aws_principal::Principal,
    std::{
        collections::HashMap,
        future::{ready, Future, Ready},
        sync::Arc,
        task::{Context, Poll},
    },
    tower::{service_fn, util::ServiceFn, BoxError, Service},
};

/// A request to resolve the credentials behind an access key.
#[derive(Builder, Clone, Debug)]
#[non_exhaustive]
pub struct GetCredentialsRequest {
    /// The access key claimed by the request.
    #[builder(setter(into))]
    access_key: String,
}

impl GetCredentialsRequest {
    /// Create a request for the given access key.
    #[inline]
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
        }
    }

    /// Create a [GetCredentialsRequestBuilder] to construct a [GetCredentialsRequest].
    #[inline]
    pub fn builder() -> GetCredentialsRequestBuilder {
        GetCredentialsRequestBuilder::default()
    }

    /// Retrieve the access key claimed by the request.
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

/// A response from the credential store.
///
/// GetCredentialsResponse structs are immutable. Use [GetCredentialsResponseBuilder] to programmatically construct a
/// response.
#[derive(Builder, Clone, Debug)]
pub struct GetCredentialsResponse {
    /// The access key the store resolved. The POST policy flow requires it to equal the claimed key.
    #[builder(setter(into))]
    pub(crate) access_key: String,

    /// The identity (user id) owning the access key.
    #[builder(setter(into))]
    pub(crate) identity: String,

    /// The secret key paired with the access key.
    #[builder(setter(into))]
    pub(crate) secret_key: KSecretKey,

    /// The principal actors of the request, if the store tracks them.
    #[builder(setter(into), default)]
    pub(crate) principal: Principal,
}

impl GetCredentialsResponse {
    /// Create a [GetCredentialsResponseBuilder] to construct a [GetCredentialsResponse].
    #[inline]
    pub fn builder() -> GetCredentialsResponseBuilder {
        GetCredentialsResponseBuilder::default()
    }

    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    #[inline]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    #[inline]
    pub fn secret_key(&self) -> &KSecretKey {
        &self.secret_key
    }

    #[inline]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

/// Create a Service that wraps a function that can resolve credentials.
pub fn service_for_credentials_fn<F, Fut>(f: F) -> ServiceFn<F>
where
    F: FnMut(GetCredentialsRequest) -> Fut + Send + 'static,
    Fut: Future<Output = Result<GetCredentialsResponse, BoxError>> + Send + 'static,
{
    service_fn(f)
}

/// An in-memory credential store backed by a fixed map of access keys.
///
/// Cloning is cheap; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentialStore {
    entries: Arc<HashMap<String, GetCredentialsResponse>>,
}

impl StaticCredentialStore {
    /// Create a store from `(access_key, identity, secret_key)` triples.
    pub fn new<I, A, U, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, U, S)>,
        A: Into<String>,
        U: Into<String>,
        S: Into<KSecretKey>,
    {
        let entries = entries
            .into_iter()
            .map(|(access_key, identity, secret_key)| {
                let access_key = access_key.into();
                let response = GetCredentialsResponse {
                    access_key: access_key.clone(),
                    identity: identity.into(),
                    secret_key: secret_key.into(),
                    principal: Principal::new(vec![]),
                };
                (access_key, response)
            })
            .collect();

        Self {
            entries: Arc::new(entries),
        }
    }

    /// Create a store from prebuilt responses, keyed by their access key.
    pub fn from_responses(responses: impl IntoIterator<Item = GetCredentialsResponse>) -> Self {
        Self {
            entries: Arc::new(responses.into_iter().map(|r| (r.access_key.clone(), r)).collect()),
        }
    }

    /// Look up an access key.
    pub fn get(&self, access_key: &str) -> Option<&GetCredentialsResponse> {
        self.entries.get(access_key)
    }
}

impl Service<GetCredentialsRequest> for StaticCredentialStore {
    type Response = GetCredentialsResponse;
    type Error = BoxError;
    type Future = Ready<Result<GetCredentialsResponse, BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), BoxError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: GetCredentialsRequest) -> Self::Future {
        ready(match self.entries.get(req.access_key()) {
            Some(response) => Ok(response.clone()),
            None => Err(Box::new(SignatureError::InvalidAccessKeyId(MSG_ACCESS_KEY_NOT_FOUND.to_string())) as BoxError),
        })
    }
}
