//! The deployment task boundary: context, options, and the engine trait.

use std::fmt;
use std::io::Write;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use ember_core::{ArtifactPathTable, ProjectConfig, ProjectPaths};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Everything a task needs to know about the invocation that spawned it.
///
/// Built once per command from the parsed config, the resolved artifact
/// table, and the connected signer; read-only for the task's lifetime.
pub struct TaskContext {
    pub config: ProjectConfig,
    pub artifact_paths: ArtifactPathTable,
    pub paths: ProjectPaths,
    /// Named network deployments are recorded under; `None` for a local node
    pub network: Option<String>,
    /// Address of the signing account
    pub signer: Address,
}

impl TaskContext {
    /// Label used for network-scoped records and logs.
    pub fn network_label(&self) -> &str {
        self.network.as_deref().unwrap_or("localhost")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProposeOptions {
    /// Skip the pre-flight check that every configured contract has
    /// deployable bytecode
    pub skip_validation: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApproveOptions {
    /// Return leftover escrow funds once execution settles
    pub withdraw_funds: bool,
    /// Return right after approving instead of waiting for execution
    pub skip_monitor: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeployOptions {
    pub withdraw_funds: bool,
    /// Transfer project ownership here once deployed; defaults to the signer
    pub new_owner: Option<Address>,
    pub skip_validation: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorOptions {
    pub withdraw_funds: bool,
    pub new_owner: Option<Address>,
}

/// One deployed contract in a completed deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedContract {
    pub reference_name: String,
    pub contract_name: String,
    pub contract_address: Address,
}

/// Lifecycle of a proposed configuration on the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Idle,
    Proposed,
    Approved,
    Executing,
    Completed,
    Cancelled,
}

impl DeploymentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Completed | DeploymentStatus::Cancelled
        )
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Idle => write!(f, "idle"),
            DeploymentStatus::Proposed => write!(f, "proposed"),
            DeploymentStatus::Approved => write!(f, "approved"),
            DeploymentStatus::Executing => write!(f, "executing"),
            DeploymentStatus::Completed => write!(f, "completed"),
            DeploymentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl TryFrom<u8> for DeploymentStatus {
    type Error = EngineError;

    fn try_from(word: u8) -> EngineResult<Self> {
        match word {
            0 => Ok(DeploymentStatus::Idle),
            1 => Ok(DeploymentStatus::Proposed),
            2 => Ok(DeploymentStatus::Approved),
            3 => Ok(DeploymentStatus::Executing),
            4 => Ok(DeploymentStatus::Completed),
            5 => Ok(DeploymentStatus::Cancelled),
            other => Err(EngineError::Status(other)),
        }
    }
}

/// Capability interface over the deployment workflows.
///
/// Progress intended for the user goes to `out`, which may be a terminal,
/// a log file, or a sink; implementations only assume it is appendable
/// text.
#[async_trait]
pub trait DeploymentEngine: Send + Sync {
    /// Register the project with the given owner.
    async fn register(
        &self,
        ctx: &TaskContext,
        owner: Address,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()>;

    /// Pin the canonical config and propose it for deployment.
    async fn propose(
        &self,
        ctx: &TaskContext,
        opts: ProposeOptions,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()>;

    /// Move `amount` wei into the project's deployment escrow.
    async fn fund(
        &self,
        ctx: &TaskContext,
        amount: U256,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()>;

    /// Approve the proposed configuration and optionally wait for it to
    /// execute.
    async fn approve(
        &self,
        ctx: &TaskContext,
        opts: ApproveOptions,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()>;

    /// Run the full pipeline (propose, approve, execute) and wait for
    /// completion, returning the deployed contracts.
    async fn deploy(
        &self,
        ctx: &TaskContext,
        opts: DeployOptions,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<Vec<DeployedContract>>;

    /// Watch an in-flight deployment until it settles.
    async fn monitor(
        &self,
        ctx: &TaskContext,
        opts: MonitorOptions,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<DeploymentStatus>;

    /// Cancel the active deployment.
    async fn cancel(&self, ctx: &TaskContext, out: &mut (dyn Write + Send)) -> EngineResult<()>;

    /// Withdraw remaining funds from the project escrow.
    async fn withdraw(&self, ctx: &TaskContext, out: &mut (dyn Write + Send)) -> EngineResult<()>;

    /// Names of the projects owned by `owner`.
    async fn list_projects(&self, owner: Address) -> EngineResult<Vec<String>>;

    /// Addresses allowed to propose for the project.
    async fn list_proposers(&self, ctx: &TaskContext) -> EngineResult<Vec<Address>>;

    /// Allow `proposer` to propose for the project.
    async fn add_proposer(
        &self,
        ctx: &TaskContext,
        proposer: Address,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()>;

    /// Claim ownership of the proxy behind a configured reference.
    async fn claim_proxy(
        &self,
        ctx: &TaskContext,
        reference: &str,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()>;

    /// Hand an externally owned proxy over to the project.
    async fn transfer_proxy(
        &self,
        ctx: &TaskContext,
        proxy: Address,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()>;

    /// Proxy address behind a configured reference.
    async fn proxy_address(&self, ctx: &TaskContext, reference: &str) -> EngineResult<Address>;
}
