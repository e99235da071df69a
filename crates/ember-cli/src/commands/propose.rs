//! Pin the canonical config and propose it for deployment

use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::{DeploymentEngine, ProposeOptions};

use super::{open_session, progress_stream, BuildArgs, ConfigArgs, RpcArgs};

/// Pin the canonical config and propose it for deployment
#[derive(Args)]
pub struct ProposeCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Skip the deployable-bytecode pre-flight check
    #[arg(long)]
    pub skip_validation: bool,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl ProposeCommand {
    pub async fn run(self) -> Result<()> {
        let (ctx, engine) = open_session(&self.config, &self.rpc, &self.build).await?;

        if !self.silent {
            println!(
                "{} Proposing {} ({} contract(s))",
                style("→").blue(),
                style(&ctx.config.project).cyan(),
                ctx.config.contracts.len()
            );
        }

        let opts = ProposeOptions {
            skip_validation: self.skip_validation,
        };
        let mut out = progress_stream(self.silent);
        engine.propose(&ctx, opts, &mut *out).await?;

        if !self.silent {
            println!("{} Proposal submitted", style("✓").green().bold());
        }
        Ok(())
    }
}
