//! Run the full deployment pipeline and wait for completion

use std::fs::{self, File};

use alloy::primitives::Address;
use chrono::Utc;
use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_core::EmberDir;
use ember_engine::{DeployOptions, DeploymentEngine};

use super::{open_session, BuildArgs, ConfigArgs, RpcArgs};

/// Run the full deployment pipeline and wait for completion
#[derive(Args)]
pub struct DeployCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Return leftover escrow funds once the deployment settles
    #[arg(long)]
    pub withdraw_funds: bool,

    /// Transfer project ownership here afterwards; defaults to the signer
    #[arg(long)]
    pub new_owner: Option<Address>,

    /// Skip the deployable-bytecode pre-flight check
    #[arg(long)]
    pub skip_validation: bool,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl DeployCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        // Engine progress is kept on disk, one log per run.
        let log_dir = EmberDir::new().join("logs").join(ctx.network_label());
        fs::create_dir_all(&log_dir)?;
        let log_path = log_dir.join(format!("{}.log", Utc::now().format("%Y-%m-%dT%H-%M-%SZ")));
        let mut log = File::create(&log_path)?;

        if !self.silent {
            println!(
                "{} Deploying {} (progress in {})",
                style("→").blue(),
                style(&ctx.config.project).cyan(),
                log_path.display()
            );
        }

        let opts = DeployOptions {
            withdraw_funds: self.withdraw_funds,
            new_owner: self.new_owner,
            skip_validation: self.skip_validation,
        };
        let artifacts = engine.deploy(&ctx, opts, &mut log).await?;

        if !self.silent {
            for contract in &artifacts {
                println!(
                    "{} {} deployed at {}",
                    style("✓").green(),
                    style(&contract.reference_name).cyan(),
                    style(contract.contract_address).yellow()
                );
            }
            println!(
                "{} {} contract(s) deployed",
                style("✓").green().bold(),
                artifacts.len()
            );
        }

        // Machine-readable result envelope on stdout; failures exit
        // nonzero without writing one.
        let envelope = serde_json::json!({ "status": "ok", "artifacts": artifacts });
        println!("{}", serde_json::to_string(&envelope)?);

        Ok(())
    }
}
