//! Proxy ownership management

use alloy::primitives::Address;
use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::DeploymentEngine;

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// Claim ownership of a contract's proxy
#[derive(Args)]
pub struct ClaimProxyCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Reference name of the contract whose proxy to claim
    #[arg(long)]
    pub reference: String,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl ClaimProxyCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        let mut out = progress_stream(self.silent);
        engine.claim_proxy(&ctx, &self.reference, &mut *out).await?;

        if !self.silent {
            println!(
                "{} Claimed the proxy behind {}",
                style("✓").green().bold(),
                style(&self.reference).cyan()
            );
        }
        Ok(())
    }
}

/// Hand an externally owned proxy over to the project
#[derive(Args)]
pub struct TransferProxyCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Address of the proxy to transfer
    #[arg(long)]
    pub proxy: Address,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl TransferProxyCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        let mut out = progress_stream(self.silent);
        engine.transfer_proxy(&ctx, self.proxy, &mut *out).await?;

        if !self.silent {
            println!(
                "{} Proxy {} transferred to {}",
                style("✓").green().bold(),
                style(self.proxy).yellow(),
                style(&ctx.config.project).cyan()
            );
        }
        Ok(())
    }
}
