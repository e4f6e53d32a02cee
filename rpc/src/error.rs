//! RPC error types and their HTTP mapping.

use agora_governance::GovernanceError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error("missing x-agora-principal header")]
    MissingPrincipal,

    #[error("invalid principal: {0}")]
    InvalidPrincipal(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<PathRejection> for RpcError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl RpcError {
    /// Stable error category shown to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Governance(e) => e.kind(),
            Self::MissingPrincipal => "MissingPrincipal",
            Self::InvalidPrincipal(_) => "InvalidPrincipal",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::Server(_) => "Server",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Governance(e) => match e {
                GovernanceError::NotFound(_) => StatusCode::NOT_FOUND,
                GovernanceError::NotOwner(_) => StatusCode::FORBIDDEN,
                GovernanceError::ProposalEnded(_)
                | GovernanceError::AlreadyEnded(_)
                | GovernanceError::AlreadyVoted { .. }
                | GovernanceError::DuplicateId(_) => StatusCode::CONFLICT,
                GovernanceError::InvalidVoteKind(_)
                | GovernanceError::DescriptionTooLong { .. } => StatusCode::BAD_REQUEST,
                GovernanceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                GovernanceError::IdExhausted
                | GovernanceError::TallyOverflow(_)
                | GovernanceError::Codec(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MissingPrincipal => StatusCode::UNAUTHORIZED,
            Self::InvalidPrincipal(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub kind: &'static str,
    pub message: String,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(kind = self.kind(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                kind: self.kind(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_store::StoreError;
    use agora_types::{Principal, ProposalId};

    #[test]
    fn lifecycle_rejections_map_to_client_errors() {
        let id = ProposalId::new(1);
        let cases = [
            (GovernanceError::NotFound(id), StatusCode::NOT_FOUND),
            (GovernanceError::NotOwner(id), StatusCode::FORBIDDEN),
            (GovernanceError::ProposalEnded(id), StatusCode::CONFLICT),
            (GovernanceError::AlreadyEnded(id), StatusCode::CONFLICT),
            (GovernanceError::DuplicateId(id), StatusCode::CONFLICT),
            (
                GovernanceError::AlreadyVoted {
                    proposal: id,
                    voter: Principal::parse("a").unwrap(),
                },
                StatusCode::CONFLICT,
            ),
            (
                GovernanceError::InvalidVoteKind("Veto".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(RpcError::from(err).status(), status);
        }
    }

    #[test]
    fn invalid_request_is_bad_request() {
        let err = RpcError::InvalidRequest("missing field `description`".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "InvalidRequest");
    }

    #[test]
    fn store_failure_is_unavailable() {
        let err = RpcError::from(GovernanceError::Store(StoreError::Unavailable("down".into())));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind(), "Store");
    }

    #[test]
    fn kind_passes_through_governance_kind() {
        let err = RpcError::from(GovernanceError::AlreadyEnded(ProposalId::new(3)));
        assert_eq!(err.kind(), "AlreadyEnded");
        assert_eq!(RpcError::MissingPrincipal.status(), StatusCode::UNAUTHORIZED);
    }
}
