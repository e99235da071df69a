//! Withdraw remaining funds from the project escrow

use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::DeploymentEngine;

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// Withdraw remaining funds from the project escrow
#[derive(Args)]
pub struct WithdrawCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl WithdrawCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        let mut out = progress_stream(self.silent);
        engine.withdraw(&ctx, &mut *out).await?;

        if !self.silent {
            println!(
                "{} Withdrew escrow funds for {}",
                style("✓").green().bold(),
                style(&ctx.config.project).cyan()
            );
        }
        Ok(())
    }
}
