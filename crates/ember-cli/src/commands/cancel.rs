//! Cancel the active deployment

use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::DeploymentEngine;

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// Cancel the active deployment
#[derive(Args)]
pub struct CancelCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,
}

impl CancelCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        let mut out = progress_stream(false);
        engine.cancel(&ctx, &mut *out).await?;

        println!(
            "{} Cancelled the active deployment of {}",
            style("✓").green().bold(),
            style(&ctx.config.project).cyan()
        );
        Ok(())
    }
}
