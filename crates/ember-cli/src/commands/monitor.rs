//! Watch an in-flight deployment until it settles

use alloy::primitives::Address;
use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::{DeploymentEngine, DeploymentStatus, MonitorOptions};

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// Watch an in-flight deployment until it settles
#[derive(Args)]
pub struct MonitorCommand {
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

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl MonitorCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        if !self.silent {
            println!(
                "{} Monitoring the active deployment of {}",
                style("→").blue(),
                style(&ctx.config.project).cyan()
            );
        }

        let opts = MonitorOptions {
            withdraw_funds: self.withdraw_funds,
            new_owner: self.new_owner,
        };
        let mut out = progress_stream(self.silent);
        let status = engine.monitor(&ctx, opts, &mut *out).await?;

        if !self.silent {
            let glyph = if status == DeploymentStatus::Completed {
                style("✓").green().bold()
            } else {
                style("!").yellow().bold()
            };
            println!("{glyph} Deployment {status}");
        }
        Ok(())
    }
}
