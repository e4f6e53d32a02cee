//! RPC request handlers.
//!
//! Every handler forwards its inputs unmodified to the proposal engine and
//! returns the resulting record. Engine calls touch storage synchronously, so
//! they run on the blocking pool.

use std::sync::Arc;

use agora_governance::{Proposal, ProposalDraft, ProposalEngine, Tally, VoteKind};
use agora_types::ProposalId;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::identity::Caller;
use crate::server::AppState;

async fn run_blocking<T, F>(engine: &Arc<ProposalEngine>, f: F) -> Result<T, RpcError>
where
    T: Send + 'static,
    F: FnOnce(&ProposalEngine) -> Result<T, agora_governance::GovernanceError> + Send + 'static,
{
    let engine = Arc::clone(engine);
    let result = tokio::task::spawn_blocking(move || f(&engine))
        .await
        .map_err(|e| RpcError::Server(format!("engine task failed: {e}")))?;
    Ok(result?)
}

// ── Proposals ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProposalResponse {
    pub id: u64,
    pub description: String,
    pub is_active: bool,
    pub owner: String,
    pub approve: u32,
    pub reject: u32,
    pub pass: u32,
    pub voted: Vec<String>,
    pub ended: bool,
}

impl From<Proposal> for ProposalResponse {
    fn from(p: Proposal) -> Self {
        Self {
            id: p.id.as_u64(),
            description: p.description,
            is_active: p.is_active,
            owner: p.owner.to_string(),
            approve: p.approve,
            reject: p.reject,
            pass: p.pass,
            voted: p.voted.into_iter().map(String::from).collect(),
            ended: p.ended,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProposalsResponse {
    pub proposals: Vec<ProposalResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProposalRequest {
    /// Caller-chosen id; the next free id when omitted.
    #[serde(default)]
    pub id: Option<u64>,
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct EditProposalRequest {
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// One of "Approve", "Reject", "Pass".
    pub vote: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TallyResponse {
    pub approve: u32,
    pub reject: u32,
    pub pass: u32,
    pub total: u64,
    /// Per-kind shares in basis points, rounded down.
    pub approve_bps: u32,
    pub reject_bps: u32,
    pub pass_bps: u32,
    pub leading: Option<String>,
}

impl From<Tally> for TallyResponse {
    fn from(t: Tally) -> Self {
        Self {
            approve: t.approve,
            reject: t.reject,
            pass: t.pass,
            total: t.total(),
            approve_bps: t.share_bps(VoteKind::Approve),
            reject_bps: t.share_bps(VoteKind::Reject),
            pass_bps: t.share_bps(VoteKind::Pass),
            leading: t.leading().map(|k| k.to_string()),
        }
    }
}

pub async fn list_proposals(
    State(state): State<AppState>,
) -> Result<Json<ListProposalsResponse>, RpcError> {
    let proposals = run_blocking(&state.engine, |engine| engine.get_all_proposals()).await?;
    Ok(Json(ListProposalsResponse {
        proposals: proposals.into_iter().map(|(_, p)| p.into()).collect(),
    }))
}

pub async fn get_proposal(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<ProposalResponse>, RpcError> {
    let Path(id) = path?;
    let id = ProposalId::new(id);
    let proposal = run_blocking(&state.engine, move |engine| engine.get_proposal(id)).await?;
    Ok(Json(proposal.into()))
}

pub async fn get_tally(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<TallyResponse>, RpcError> {
    let Path(id) = path?;
    let id = ProposalId::new(id);
    let tally = run_blocking(&state.engine, move |engine| engine.tally(id)).await?;
    Ok(Json(tally.into()))
}

pub async fn create_proposal(
    State(state): State<AppState>,
    Caller(actor): Caller,
    body: Result<Json<CreateProposalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProposalResponse>), RpcError> {
    let Json(req) = body?;
    let draft = ProposalDraft::new(req.description, req.is_active);
    let proposal = run_blocking(&state.engine, move |engine| match req.id {
        Some(id) => engine.create_proposal(ProposalId::new(id), &actor, draft),
        None => engine.create_next(&actor, draft),
    })
    .await?;
    Ok((StatusCode::CREATED, Json(proposal.into())))
}

pub async fn edit_proposal(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    Caller(actor): Caller,
    body: Result<Json<EditProposalRequest>, JsonRejection>,
) -> Result<Json<ProposalResponse>, RpcError> {
    let Path(id) = path?;
    let Json(req) = body?;
    let id = ProposalId::new(id);
    let draft = ProposalDraft::new(req.description, req.is_active);
    let proposal = run_blocking(&state.engine, move |engine| {
        engine.edit_proposal(id, &actor, draft)
    })
    .await?;
    Ok(Json(proposal.into()))
}

pub async fn vote(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    Caller(actor): Caller,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<ProposalResponse>, RpcError> {
    let Path(id) = path?;
    let Json(req) = body?;
    let id = ProposalId::new(id);
    let kind: VoteKind = req.vote.parse()?;
    let proposal =
        run_blocking(&state.engine, move |engine| engine.vote(id, &actor, kind)).await?;
    Ok(Json(proposal.into()))
}

pub async fn end_proposal(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    Caller(actor): Caller,
) -> Result<Json<ProposalResponse>, RpcError> {
    let Path(id) = path?;
    let id = ProposalId::new(id);
    let proposal =
        run_blocking(&state.engine, move |engine| engine.end_proposal(id, &actor)).await?;
    Ok(Json(proposal.into()))
}
