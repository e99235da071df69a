mod commands;
mod rpc;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Command;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Deployment orchestration for Foundry projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Err(report) = cli.command.run().await {
        eprintln!("Error: {report:#}");
        std::process::exit(exit_code(&report));
    }
    Ok(())
}

/// Resolution failures get their own exit codes so automation around the
/// tool can tell failure modes apart; everything else is 1.
fn exit_code(report: &color_eyre::eyre::Report) -> i32 {
    report
        .downcast_ref::<ember_core::Error>()
        .map_or(1, ember_core::Error::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::{eyre, Report};

    #[test]
    fn test_exit_code_defaults_to_one() {
        assert_eq!(exit_code(&eyre!("boom")), 1);
    }

    #[test]
    fn test_exit_code_maps_resolution_errors() {
        let report = Report::new(ember_core::Error::ArtifactNotFound {
            path: "out/Token.sol/Token.json".into(),
        });
        assert_eq!(exit_code(&report), 66);

        let report = Report::new(ember_core::Error::BuildInfoNotFound {
            source_name: "contracts/Token.sol".to_string(),
            dir: "out/build-info".into(),
        });
        assert_eq!(exit_code(&report), 67);
    }
}
