use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] agora_store_lmdb::LmdbError),

    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("governance error: {0}")]
    Governance(#[from] agora_governance::GovernanceError),

    #[error("RPC server error: {0}")]
    Rpc(#[from] agora_rpc::RpcError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}
