use axum::async_trait;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{Map, Value};

/// Header carrying the claims object the upstream gateway attaches after it
/// has validated the caller's token. The gateway is the trust boundary; the
/// claims are never re-verified in this process.
pub const VERIFIED_CLAIMS_HEADER: &str = "x-verified-claims";

#[derive(Clone, Debug)]
pub struct VerifiedIdentity {
    claims: Map<String, Value>,
}

impl VerifiedIdentity {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Decode the base64-encoded JSON claims object forwarded by the gateway.
    pub fn from_gateway_header(header: &HeaderValue) -> Result<Self, ClaimsDecodeError> {
        let encoded = header
            .to_str()
            .map_err(|_| ClaimsDecodeError::NotVisibleAscii)?;
        let decoded = BASE64.decode(encoded)?;
        let claims = serde_json::from_slice(&decoded)?;

        Ok(Self { claims })
    }

    /// The authenticated caller, taken from the `sub` claim. An absent,
    /// non-string, or empty subject counts as no subject at all.
    pub fn subject(&self) -> Option<&str> {
        self.claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|subject| !subject.is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClaimsDecodeError {
    #[error("claims header is not visible ASCII")]
    NotVisibleAscii,
    #[error("claims header is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("decoded claims are not a JSON object")]
    Json(#[from] serde_json::Error),
}

/// Middleware lifting the gateway claims header into a request extension. A
/// missing or undecodable header leaves no identity behind; handlers that
/// require one reject the request when they extract it.
pub async fn attach_verified_identity(mut request: Request, next: Next) -> Response {
    if let Some(header) = request.headers().get(VERIFIED_CLAIMS_HEADER) {
        match VerifiedIdentity::from_gateway_header(header) {
            Ok(identity) => {
                request.extensions_mut().insert(identity);
            }
            Err(error) => {
                tracing::warn!("Failed to decode the verified claims header: {:?}", error);
            }
        }
    }

    next.run(request).await
}

pub struct MissingIdentityContext;

#[async_trait]
impl<S> FromRequestParts<S> for VerifiedIdentity
where
    S: Send + Sync,
{
    type Rejection = MissingIdentityContext;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .ok_or(MissingIdentityContext)
    }
}

impl IntoResponse for MissingIdentityContext {
    fn into_response(self) -> Response {
        tracing::error!("Request reached an authenticated handler without a verified identity");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error creating subscription: no verified identity attached to the request",
        )
            .into_response()
    }
}
