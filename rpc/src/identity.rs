//! Caller identity extraction.

use agora_types::Principal;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::RpcError;

/// Header carrying the acting identity, set by whatever authenticates the
/// caller in front of this server.
pub const PRINCIPAL_HEADER: &str = "x-agora-principal";

/// The authenticated actor behind a request.
#[derive(Clone, Debug)]
pub struct Caller(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = RpcError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .ok_or(RpcError::MissingPrincipal)?;
        let text = raw
            .to_str()
            .map_err(|_| RpcError::InvalidPrincipal("header is not visible ASCII".into()))?;
        Principal::parse(text)
            .map(Caller)
            .map_err(|e| RpcError::InvalidPrincipal(e.to_string()))
    }
}
