//! Registry-backed implementation of the deployment engine.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use alloy::primitives::{address, keccak256, Address, B256, U256};
use alloy::providers::Provider;
use alloy::sol;
use async_trait::async_trait;
use ember_core::{load_artifact, ProjectConfig};

use crate::error::{EngineError, EngineResult};
use crate::task::{
    ApproveOptions, DeployOptions, DeployedContract, DeploymentEngine, DeploymentStatus,
    MonitorOptions, ProposeOptions, TaskContext,
};

sol! {
    #[sol(rpc)]
    interface IProjectRegistry {
        function register(bytes32 projectId, string name, address owner) external;
        function propose(bytes32 projectId, bytes32 configHash) external;
        function fund(bytes32 projectId) external payable;
        function approve(bytes32 projectId, bytes32 configHash) external;
        function execute(bytes32 projectId, bytes32 configHash) external;
        function cancel(bytes32 projectId) external;
        function withdraw(bytes32 projectId) external;
        function transferOwnership(bytes32 projectId, address newOwner) external;
        function addProposer(bytes32 projectId, address proposer) external;
        function claimProxy(bytes32 projectId, bytes32 reference) external;
        function transferProxyOwnership(bytes32 projectId, address proxy) external;
        function status(bytes32 projectId, bytes32 configHash) external view returns (uint8);
        function projectsOf(address owner) external view returns (string[] memory);
        function proposersOf(bytes32 projectId) external view returns (address[] memory);
        function proxyOf(bytes32 projectId, bytes32 reference) external view returns (address);
    }
}

/// The registry is deployed at the same address on every supported chain.
pub const DEFAULT_REGISTRY: Address = address!("7e83f2a3cbd4bd8b4b4b37a3c93a9f1578dba438");

/// How often an in-flight deployment is polled for status changes.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Deployment engine that drives the on-chain project registry.
///
/// Every workflow is one transaction or view call against the registry;
/// project and reference ids are `keccak256` of their names.
#[derive(Debug, Clone)]
pub struct RegistryEngine<P> {
    provider: P,
    registry: Address,
}

impl<P: Provider> RegistryEngine<P> {
    pub fn new(provider: P, registry: Address) -> Self {
        Self { provider, registry }
    }

    fn contract(&self) -> IProjectRegistry::IProjectRegistryInstance<&P> {
        IProjectRegistry::new(self.registry, &self.provider)
    }

    fn project_id(&self, ctx: &TaskContext) -> B256 {
        id_of(&ctx.config.project)
    }

    /// Every configured contract must have deployable bytecode; interfaces
    /// and abstract contracts produce artifacts without any.
    fn validate_artifacts(&self, ctx: &TaskContext) -> EngineResult<()> {
        for (reference, contract) in &ctx.config.contracts {
            let artifact = load_artifact(&ctx.paths.artifact_dir, &contract.contract)?;
            if !artifact.bytecode.is_valid() {
                return Err(EngineError::NotDeployable(reference.clone()));
            }
        }
        Ok(())
    }

    /// Serialize the config deterministically, write it to the
    /// canonical-config directory, and return the hash committed on-chain.
    fn pin_canonical_config(
        &self,
        ctx: &TaskContext,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<B256> {
        let bytes = canonical_config_bytes(&ctx.config)?;
        let hash = keccak256(&bytes);

        std::fs::create_dir_all(&ctx.paths.canonical_config_dir)?;
        let pinned = ctx
            .paths
            .canonical_config_dir
            .join(format!("{}.json", ctx.config.project));
        std::fs::write(&pinned, &bytes)?;
        writeln!(out, "Pinned canonical config to {}", pinned.display())?;

        Ok(hash)
    }

    async fn poll_status(
        &self,
        project: B256,
        config_hash: B256,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<DeploymentStatus> {
        let registry = self.contract();
        let mut last = None;

        loop {
            let word = registry
                .status(project, config_hash)
                .call()
                .await
                .map_err(|e| EngineError::Rpc(e.to_string()))?;
            let status = DeploymentStatus::try_from(word)?;

            if status == DeploymentStatus::Idle {
                return Err(EngineError::NothingToMonitor);
            }
            if last != Some(status) {
                writeln!(out, "Deployment status: {status}")?;
                last = Some(status);
            }
            if status.is_terminal() {
                return Ok(status);
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn collect_deployed(&self, ctx: &TaskContext) -> EngineResult<Vec<DeployedContract>> {
        let registry = self.contract();
        let project = self.project_id(ctx);

        let mut deployed = Vec::with_capacity(ctx.config.contracts.len());
        for (reference, contract) in &ctx.config.contracts {
            let proxy = registry
                .proxyOf(project, id_of(reference))
                .call()
                .await
                .map_err(|e| EngineError::Rpc(e.to_string()))?;
            deployed.push(DeployedContract {
                reference_name: reference.clone(),
                contract_name: contract.contract.clone(),
                contract_address: proxy,
            });
        }
        Ok(deployed)
    }

    /// Post-completion bookkeeping shared by `deploy` and `monitor`:
    /// record what landed where, then settle funds and ownership.
    async fn finalize(
        &self,
        ctx: &TaskContext,
        withdraw_funds: bool,
        new_owner: Option<Address>,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<Vec<DeployedContract>> {
        let deployed = self.collect_deployed(ctx).await?;
        write_deployment_records(&ctx.paths.deployment_dir, ctx.network_label(), &deployed)?;
        writeln!(
            out,
            "Wrote {} deployment record(s) under {}",
            deployed.len(),
            ctx.paths.deployment_dir.display()
        )?;

        let registry = self.contract();
        let project = self.project_id(ctx);

        if withdraw_funds {
            let pending = registry
                .withdraw(project)
                .send()
                .await
                .map_err(|e| EngineError::Registry(e.to_string()))?;
            pending
                .watch()
                .await
                .map_err(|e| EngineError::Rpc(e.to_string()))?;
            writeln!(out, "Withdrew remaining escrow funds")?;
        }

        if let Some(owner) = new_owner {
            if owner != ctx.signer {
                let pending = registry
                    .transferOwnership(project, owner)
                    .send()
                    .await
                    .map_err(|e| EngineError::Registry(e.to_string()))?;
                pending
                    .watch()
                    .await
                    .map_err(|e| EngineError::Rpc(e.to_string()))?;
                writeln!(out, "Transferred project ownership to {owner}")?;
            }
        }

        Ok(deployed)
    }
}

#[async_trait]
impl<P: Provider> DeploymentEngine for RegistryEngine<P> {
    async fn register(
        &self,
        ctx: &TaskContext,
        owner: Address,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()> {
        let project = self.project_id(ctx);

        let pending = self
            .contract()
            .register(project, ctx.config.project.clone(), owner)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        let tx = pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;

        writeln!(
            out,
            "Registered project '{}' with owner {owner} ({tx})",
            ctx.config.project
        )?;
        Ok(())
    }

    async fn propose(
        &self,
        ctx: &TaskContext,
        opts: ProposeOptions,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()> {
        if !opts.skip_validation {
            self.validate_artifacts(ctx)?;
        }

        let project = self.project_id(ctx);
        let config_hash = self.pin_canonical_config(ctx, out)?;

        let pending = self
            .contract()
            .propose(project, config_hash)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;

        writeln!(out, "Proposed config {config_hash}")?;
        Ok(())
    }

    async fn fund(
        &self,
        ctx: &TaskContext,
        amount: U256,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()> {
        let project = self.project_id(ctx);

        let pending = self
            .contract()
            .fund(project)
            .value(amount)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;

        writeln!(out, "Funded project escrow with {amount} wei")?;
        Ok(())
    }

    async fn approve(
        &self,
        ctx: &TaskContext,
        opts: ApproveOptions,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()> {
        let project = self.project_id(ctx);
        let config_hash = config_hash(&ctx.config)?;

        let pending = self
            .contract()
            .approve(project, config_hash)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;
        writeln!(out, "Approved config {config_hash}")?;

        if opts.skip_monitor {
            return Ok(());
        }

        let status = self.poll_status(project, config_hash, out).await?;
        if status == DeploymentStatus::Completed && opts.withdraw_funds {
            let pending = self
                .contract()
                .withdraw(project)
                .send()
                .await
                .map_err(|e| EngineError::Registry(e.to_string()))?;
            pending
                .watch()
                .await
                .map_err(|e| EngineError::Rpc(e.to_string()))?;
            writeln!(out, "Withdrew remaining escrow funds")?;
        }
        Ok(())
    }

    async fn deploy(
        &self,
        ctx: &TaskContext,
        opts: DeployOptions,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<Vec<DeployedContract>> {
        if !opts.skip_validation {
            self.validate_artifacts(ctx)?;
        }

        let project = self.project_id(ctx);
        let config_hash = self.pin_canonical_config(ctx, out)?;
        let registry = self.contract();

        let pending = registry
            .propose(project, config_hash)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;
        writeln!(out, "Proposed config {config_hash}")?;

        let pending = registry
            .approve(project, config_hash)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;
        writeln!(out, "Approved config {config_hash}")?;

        let pending = registry
            .execute(project, config_hash)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;
        writeln!(out, "Execution started for config {config_hash}")?;

        let status = self.poll_status(project, config_hash, out).await?;
        if status != DeploymentStatus::Completed {
            return Err(EngineError::Registry(format!(
                "deployment ended as {status}"
            )));
        }

        self.finalize(ctx, opts.withdraw_funds, opts.new_owner, out)
            .await
    }

    async fn monitor(
        &self,
        ctx: &TaskContext,
        opts: MonitorOptions,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<DeploymentStatus> {
        let project = self.project_id(ctx);
        let config_hash = config_hash(&ctx.config)?;

        let status = self.poll_status(project, config_hash, out).await?;
        if status == DeploymentStatus::Completed {
            self.finalize(ctx, opts.withdraw_funds, opts.new_owner, out)
                .await?;
        }
        Ok(status)
    }

    async fn cancel(&self, ctx: &TaskContext, out: &mut (dyn Write + Send)) -> EngineResult<()> {
        let project = self.project_id(ctx);

        let pending = self
            .contract()
            .cancel(project)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;

        writeln!(out, "Cancelled the active deployment")?;
        Ok(())
    }

    async fn withdraw(&self, ctx: &TaskContext, out: &mut (dyn Write + Send)) -> EngineResult<()> {
        let project = self.project_id(ctx);

        let pending = self
            .contract()
            .withdraw(project)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;

        writeln!(out, "Withdrew remaining escrow funds")?;
        Ok(())
    }

    async fn list_projects(&self, owner: Address) -> EngineResult<Vec<String>> {
        self.contract()
            .projectsOf(owner)
            .call()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))
    }

    async fn list_proposers(&self, ctx: &TaskContext) -> EngineResult<Vec<Address>> {
        self.contract()
            .proposersOf(self.project_id(ctx))
            .call()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))
    }

    async fn add_proposer(
        &self,
        ctx: &TaskContext,
        proposer: Address,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()> {
        let project = self.project_id(ctx);

        let pending = self
            .contract()
            .addProposer(project, proposer)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;

        writeln!(out, "Added proposer {proposer}")?;
        Ok(())
    }

    async fn claim_proxy(
        &self,
        ctx: &TaskContext,
        reference: &str,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()> {
        if !ctx.config.contracts.contains_key(reference) {
            return Err(EngineError::UnknownReference(reference.to_string()));
        }
        let project = self.project_id(ctx);

        let pending = self
            .contract()
            .claimProxy(project, id_of(reference))
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;

        writeln!(out, "Claimed proxy for '{reference}'")?;
        Ok(())
    }

    async fn transfer_proxy(
        &self,
        ctx: &TaskContext,
        proxy: Address,
        out: &mut (dyn Write + Send),
    ) -> EngineResult<()> {
        let project = self.project_id(ctx);

        let pending = self
            .contract()
            .transferProxyOwnership(project, proxy)
            .send()
            .await
            .map_err(|e| EngineError::Registry(e.to_string()))?;
        pending
            .watch()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))?;

        writeln!(out, "Transferred proxy {proxy} to the project")?;
        Ok(())
    }

    async fn proxy_address(&self, ctx: &TaskContext, reference: &str) -> EngineResult<Address> {
        let Some(contract) = ctx.config.contracts.get(reference) else {
            return Err(EngineError::UnknownReference(reference.to_string()));
        };

        // An external proxy overrides whatever the registry would deploy.
        if let Some(external) = &contract.external_proxy {
            return external
                .parse()
                .map_err(|_| EngineError::InvalidAddress(external.clone()));
        }

        self.contract()
            .proxyOf(self.project_id(ctx), id_of(reference))
            .call()
            .await
            .map_err(|e| EngineError::Rpc(e.to_string()))
    }
}

/// Projects and references are addressed on-chain by the hash of their
/// names.
fn id_of(name: &str) -> B256 {
    keccak256(name.as_bytes())
}

/// Deterministic serialization of the parsed config; the contracts map is
/// ordered, so equal configs hash equal.
fn canonical_config_bytes(config: &ProjectConfig) -> EngineResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(config)?)
}

fn config_hash(config: &ProjectConfig) -> EngineResult<B256> {
    Ok(keccak256(canonical_config_bytes(config)?))
}

/// Write one record per deployed contract under `<dir>/<network>/`.
fn write_deployment_records(
    dir: &Path,
    network: &str,
    deployed: &[DeployedContract],
) -> EngineResult<()> {
    let network_dir = dir.join(network);
    std::fs::create_dir_all(&network_dir)?;

    for contract in deployed {
        let path = network_dir.join(format!("{}.json", contract.reference_name));
        std::fs::write(&path, serde_json::to_vec_pretty(contract)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn demo_config(json: &str) -> ProjectConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ids_differ_per_name() {
        assert_ne!(id_of("my-defi"), id_of("my-defi-2"));
        assert_eq!(id_of("my-defi"), id_of("my-defi"));
    }

    #[test]
    fn test_config_hash_is_deterministic() {
        // Key order in the source JSON must not matter.
        let a = demo_config(
            r#"{"project": "demo", "contracts": {"B": {"contract": "Beta"}, "A": {"contract": "Alpha"}}}"#,
        );
        let b = demo_config(
            r#"{"project": "demo", "contracts": {"A": {"contract": "Alpha"}, "B": {"contract": "Beta"}}}"#,
        );

        assert_eq!(config_hash(&a).unwrap(), config_hash(&b).unwrap());
    }

    #[test]
    fn test_config_hash_tracks_content() {
        let a = demo_config(r#"{"project": "demo", "contracts": {"A": {"contract": "Alpha"}}}"#);
        let b = demo_config(r#"{"project": "demo", "contracts": {"A": {"contract": "Beta"}}}"#);

        assert_ne!(config_hash(&a).unwrap(), config_hash(&b).unwrap());
    }

    #[test]
    fn test_write_deployment_records() {
        let tmp = TempDir::new().unwrap();
        let deployed = vec![
            DeployedContract {
                reference_name: "Token".to_string(),
                contract_name: "ERC20".to_string(),
                contract_address: Address::ZERO,
            },
            DeployedContract {
                reference_name: "Vault".to_string(),
                contract_name: "Vault".to_string(),
                contract_address: Address::ZERO,
            },
        ];

        write_deployment_records(tmp.path(), "sepolia", &deployed).unwrap();

        let token = tmp.path().join("sepolia/Token.json");
        assert!(token.exists());
        assert!(tmp.path().join("sepolia/Vault.json").exists());

        let record: DeployedContract =
            serde_json::from_str(&std::fs::read_to_string(token).unwrap()).unwrap();
        assert_eq!(record, deployed[0]);
    }
}
