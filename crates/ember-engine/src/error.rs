use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Registry call failed: {0}")]
    Registry(String),

    #[error("Unknown deployment status word: {0}")]
    Status(u8),

    #[error("No deployment in progress for this configuration")]
    NothingToMonitor,

    #[error("Unknown contract reference: {0}")]
    UnknownReference(String),

    #[error("Contract '{0}' has no deployable bytecode. Is it an interface or abstract contract?")]
    NotDeployable(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Resolution(#[from] ember_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
