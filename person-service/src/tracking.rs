//! Request ids and request-header hygiene
//!
//! Every inbound request gets a TypeID request id (`req_<uuidv7>`, sortable by
//! time) in the configured header unless the caller already sent one. The id
//! is echoed on the response. Credential-carrying headers are marked
//! sensitive so trace spans do not print them.

use std::fmt;
use std::str::FromStr;

use axum::Router;
use http::{
    header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    HeaderName, HeaderValue, Request,
};
use mti::prelude::*;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId as TowerRequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::config::RequestTrackingConfig;

/// Headers whose values never appear in logs
pub const SENSITIVE_HEADERS: [HeaderName; 4] = [
    AUTHORIZATION,
    COOKIE,
    SET_COOKIE,
    HeaderName::from_static("x-api-key"),
];

/// Time-ordered request identifier with the `req` prefix
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    pub const PREFIX: &'static str = "req";

    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestId {
    type Err = RequestIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = MagicTypeId::from_str(s).map_err(RequestIdError::Parse)?;
        let prefix = id.prefix().as_str();
        if prefix != Self::PREFIX {
            return Err(RequestIdError::InvalidPrefix(prefix.to_string()));
        }
        Ok(Self(id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestIdError {
    #[error("failed to parse request id: {0}")]
    Parse(#[from] MagicTypeIdError),

    #[error("request id prefix must be 'req', got '{0}'")]
    InvalidPrefix(String),
}

/// [`MakeRequestId`] that issues [`RequestId`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let value = HeaderValue::from_str(RequestId::new().as_str()).ok()?;
        Some(TowerRequestId::new(value))
    }
}

/// Wrap `router` in the request-tracking layers `config` enables
///
/// Falls back to `x-request-id` when the configured header name is invalid.
pub fn apply<S>(router: Router<S>, config: &RequestTrackingConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let header = HeaderName::from_str(&config.request_id_header).unwrap_or_else(|_| {
        tracing::warn!(
            header = %config.request_id_header,
            "invalid request id header, using x-request-id"
        );
        HeaderName::from_static("x-request-id")
    });

    let mut router = router;
    if config.mask_sensitive_headers {
        router = router.layer(SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS));
    }
    if config.request_id_enabled {
        // Outer layer runs first, so the id is set before propagation reads it
        if config.propagate_headers {
            router = router.layer(PropagateRequestIdLayer::new(header.clone()));
        }
        router = router.layer(SetRequestIdLayer::new(header, MakeTypedRequestId));
    }
    router
}
