//! Print the proxy address of a configured contract

use alloy::primitives::Address;
use clap::Args;
use color_eyre::eyre::Result;
use ember_core::{resolve_artifact_paths, ProjectConfig, ProjectPaths};
use ember_engine::{DeploymentEngine, RegistryEngine, TaskContext, DEFAULT_REGISTRY};

use super::{BuildArgs, ConfigArgs};
use crate::rpc;

/// Print the proxy address of a configured contract
#[derive(Args)]
pub struct GetAddressCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// JSON-RPC endpoint URL
    #[arg(long)]
    pub rpc_url: String,

    /// Reference name of the contract to look up
    #[arg(long)]
    pub reference: String,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Registry address, if not the canonical deployment
    #[arg(long)]
    pub registry: Option<Address>,
}

impl GetAddressCommand {
    pub async fn run(self) -> Result<()> {
        let project = ProjectConfig::load(&self.config.config)?;
        let paths = ProjectPaths::resolve(&self.build.out, &self.build.build_info);
        let artifact_paths =
            resolve_artifact_paths(&project.contracts, &paths.artifact_dir, &paths.build_info_dir)?;

        // Lookups don't sign anything; connect without a key.
        let provider = rpc::connect_readonly(&self.rpc_url)?;
        let engine = RegistryEngine::new(provider, self.registry.unwrap_or(DEFAULT_REGISTRY));

        let ctx = TaskContext {
            config: project,
            artifact_paths,
            paths,
            network: None,
            signer: Address::ZERO,
        };

        let address = engine.proxy_address(&ctx, &self.reference).await?;
        // Just the address, for easy scripting: $(ember get-address --reference Token ...)
        println!("{address}");
        Ok(())
    }
}
