//! Approve the proposed configuration

use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::{ApproveOptions, DeploymentEngine};

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// Approve the proposed configuration
#[derive(Args)]
pub struct ApproveCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Return leftover escrow funds once execution settles
    #[arg(long)]
    pub withdraw_funds: bool,

    /// Return right after approving instead of waiting for execution
    #[arg(long)]
    pub skip_monitor: bool,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl ApproveCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        if !self.silent {
            println!(
                "{} Approving the active proposal for {}",
                style("→").blue(),
                style(&ctx.config.project).cyan()
            );
        }

        let opts = ApproveOptions {
            withdraw_funds: self.withdraw_funds,
            skip_monitor: self.skip_monitor,
        };
        let mut out = progress_stream(self.silent);
        engine.approve(&ctx, opts, &mut *out).await?;

        if !self.silent {
            println!("{} Approved", style("✓").green().bold());
        }
        Ok(())
    }
}
