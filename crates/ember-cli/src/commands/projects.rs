//! List projects owned by the signing account

use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use ember_engine::DeploymentEngine;

use super::{open_engine, RpcArgs};

/// List projects owned by the signing account
#[derive(Args)]
pub struct ListProjectsCommand {
    #[command(flatten)]
    pub rpc: RpcArgs,
}

impl ListProjectsCommand {
    pub async fn run(self) -> Result<()> {
        let (conn, engine) = open_engine(&self.rpc).await?;
        let projects = engine.list_projects(conn.signer).await?;

        if projects.is_empty() {
            println!(
                "{} No projects registered for {}",
                style("!").yellow(),
                style(conn.signer).yellow()
            );
            return Ok(());
        }

        println!(
            "{} {} project(s) owned by {}",
            style("✓").green(),
            projects.len(),
            style(conn.signer).yellow()
        );
        for project in projects {
            println!("   {}", style(project).cyan());
        }
        Ok(())
    }
}
