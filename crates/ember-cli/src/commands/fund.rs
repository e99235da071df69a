//! Move funds into the project's deployment escrow

use alloy::primitives::U256;
use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::DeploymentEngine;

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// Move funds into the project's deployment escrow
#[derive(Args)]
pub struct FundCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Amount to deposit, in wei
    #[arg(long)]
    pub amount: U256,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl FundCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        if !self.silent {
            println!(
                "{} Funding {} with {} wei",
                style("→").blue(),
                style(&ctx.config.project).cyan(),
                self.amount
            );
        }

        let mut out = progress_stream(self.silent);
        engine.fund(&ctx, self.amount, &mut *out).await?;

        if !self.silent {
            println!("{} Escrow funded", style("✓").green().bold());
        }
        Ok(())
    }
}
