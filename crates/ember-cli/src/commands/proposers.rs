//! Proposer management for a project

use alloy::primitives::Address;
use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::DeploymentEngine;

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// List addresses allowed to propose for the project
#[derive(Args)]
pub struct ListProposersCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,
}

impl ListProposersCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;
        let proposers = engine.list_proposers(&ctx).await?;

        if proposers.is_empty() {
            println!(
                "{} No proposers registered for {}",
                style("!").yellow(),
                style(&ctx.config.project).cyan()
            );
            return Ok(());
        }

        println!(
            "{} {} proposer(s) for {}",
            style("✓").green(),
            proposers.len(),
            style(&ctx.config.project).cyan()
        );
        for proposer in proposers {
            println!("   {}", style(proposer).yellow());
        }
        Ok(())
    }
}

/// Allow another address to propose for the project
#[derive(Args)]
pub struct AddProposerCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Address to grant proposal rights to
    #[arg(long)]
    pub proposer: Address,
}

impl AddProposerCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        let mut out = progress_stream(false);
        engine.add_proposer(&ctx, self.proposer, &mut *out).await?;

        println!(
            "{} {} can now propose for {}",
            style("✓").green().bold(),
            style(self.proposer).yellow(),
            style(&ctx.config.project).cyan()
        );
        Ok(())
    }
}
