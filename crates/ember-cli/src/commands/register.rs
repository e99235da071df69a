//! Register the project with the on-chain registry

use alloy::primitives::Address;
use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::DeploymentEngine;

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// Register the project with the on-chain registry
#[derive(Args)]
pub struct RegisterCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Project owner; defaults to the signing account
    #[arg(long)]
    pub owner: Option<Address>,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl RegisterCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;
        let owner = self.owner.unwrap_or(ctx.signer);

        if !self.silent {
            println!(
                "{} Registering {}",
                style("→").blue(),
                style(&ctx.config.project).cyan()
            );
        }

        let mut out = progress_stream(self.silent);
        engine.register(&ctx, owner, &mut *out).await?;

        if !self.silent {
            println!("{} Project registered", style("✓").green().bold());
        }
        Ok(())
    }
}
