//! CLI commands for ember

use std::io;
use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Subcommand};
use color_eyre::eyre::Result;
use ember_core::{resolve_artifact_paths, ProjectConfig, ProjectPaths};
use ember_engine::{RegistryEngine, TaskContext, DEFAULT_REGISTRY};

use crate::rpc::{self, Connection};

pub mod approve;
pub mod cancel;
pub mod deploy;
pub mod fund;
pub mod get_address;
pub mod monitor;
pub mod projects;
pub mod proposers;
pub mod propose;
pub mod proxy;
pub mod register;
pub mod withdraw;

/// All available CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Register the project with the on-chain registry
    Register(register::RegisterCommand),

    /// Pin the canonical config and propose it for deployment
    Propose(propose::ProposeCommand),

    /// Move funds into the project's deployment escrow
    Fund(fund::FundCommand),

    /// Approve the proposed configuration
    Approve(approve::ApproveCommand),

    /// Run the full deployment pipeline and wait for completion
    Deploy(deploy::DeployCommand),

    /// Watch an in-flight deployment until it settles
    Monitor(monitor::MonitorCommand),

    /// Cancel the active deployment
    Cancel(cancel::CancelCommand),

    /// Withdraw remaining funds from the project escrow
    Withdraw(withdraw::WithdrawCommand),

    /// List projects owned by the signing account
    ListProjects(projects::ListProjectsCommand),

    /// List addresses allowed to propose for the project
    ListProposers(proposers::ListProposersCommand),

    /// Allow another address to propose for the project
    AddProposer(proposers::AddProposerCommand),

    /// Claim ownership of a contract's proxy
    ClaimProxy(proxy::ClaimProxyCommand),

    /// Hand an externally owned proxy over to the project
    TransferProxy(proxy::TransferProxyCommand),

    /// Print the proxy address of a configured contract
    GetAddress(get_address::GetAddressCommand),
}

impl Command {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Command::Register(cmd) => cmd.run().await,
            Command::Propose(cmd) => cmd.run().await,
            Command::Fund(cmd) => cmd.run().await,
            Command::Approve(cmd) => cmd.run().await,
            Command::Deploy(cmd) => cmd.run().await,
            Command::Monitor(cmd) => cmd.run().await,
            Command::Cancel(cmd) => cmd.run().await,
            Command::Withdraw(cmd) => cmd.run().await,
            Command::ListProjects(cmd) => cmd.run().await,
            Command::ListProposers(cmd) => cmd.run().await,
            Command::AddProposer(cmd) => cmd.run().await,
            Command::ClaimProxy(cmd) => cmd.run().await,
            Command::TransferProxy(cmd) => cmd.run().await,
            Command::GetAddress(cmd) => cmd.run().await,
        }
    }
}

/// Where the project configuration lives
#[derive(Args)]
pub struct ConfigArgs {
    /// Path to the project deployment config (JSON)
    #[arg(long, short = 'c')]
    pub config: PathBuf,
}

/// How to reach the chain and who signs
#[derive(Args)]
pub struct RpcArgs {
    /// JSON-RPC endpoint URL
    #[arg(long)]
    pub rpc_url: String,

    /// Network name deployments are recorded under; omit for a local node
    #[arg(long)]
    pub network: Option<String>,

    /// Private key of the signing account
    #[arg(long, env = "EMBER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Registry address, if not the canonical deployment
    #[arg(long)]
    pub registry: Option<Address>,
}

/// Where the build toolchain put its output
#[derive(Args)]
pub struct BuildArgs {
    /// Compiled artifact directory
    #[arg(long, default_value = "out")]
    pub out: PathBuf,

    /// Compiler build-info directory
    #[arg(long, default_value = "out/build-info")]
    pub build_info: PathBuf,
}

pub(crate) type Engine = RegistryEngine<alloy::providers::DynProvider>;

/// Connect and wrap the registry engine; for commands that don't need a
/// project config.
pub(crate) async fn open_engine(rpc: &RpcArgs) -> Result<(Connection, Engine)> {
    let conn = rpc::connect(&rpc.rpc_url, &rpc.private_key).await?;
    let engine = RegistryEngine::new(
        conn.provider.clone(),
        rpc.registry.unwrap_or(DEFAULT_REGISTRY),
    );
    Ok((conn, engine))
}

/// Load the config, resolve every artifact path, connect, and assemble the
/// task context most commands share.
pub(crate) async fn open_session(
    config: &ConfigArgs,
    rpc: &RpcArgs,
    build: &BuildArgs,
) -> Result<(TaskContext, Engine)> {
    let project = ProjectConfig::load(&config.config)?;
    let paths = ProjectPaths::resolve(&build.out, &build.build_info);
    let artifact_paths =
        resolve_artifact_paths(&project.contracts, &paths.artifact_dir, &paths.build_info_dir)?;

    let (conn, engine) = open_engine(rpc).await?;

    let ctx = TaskContext {
        config: project,
        artifact_paths,
        paths,
        network: rpc.network.clone(),
        signer: conn.signer,
    };
    Ok((ctx, engine))
}

/// Engine progress goes to stderr so stdout stays parseable.
pub(crate) fn progress_stream(silent: bool) -> Box<dyn io::Write + Send> {
    if silent {
        Box::new(io::sink())
    } else {
        Box::new(io::stderr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    const KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_register_parses_with_named_flags() {
        let cli = TestCli::try_parse_from([
            "ember",
            "register",
            "--config",
            "ember.json",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            KEY,
            "--owner",
            "0x1111111111111111111111111111111111111111",
        ])
        .unwrap();

        match cli.command {
            Command::Register(cmd) => {
                assert_eq!(cmd.config.config, PathBuf::from("ember.json"));
                assert_eq!(cmd.rpc.rpc_url, "http://localhost:8545");
                assert!(cmd.rpc.network.is_none());
                assert!(cmd.owner.is_some());
                assert!(!cmd.silent);
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_network_is_explicitly_optional() {
        let cli = TestCli::try_parse_from([
            "ember",
            "deploy",
            "--config",
            "ember.json",
            "--rpc-url",
            "http://localhost:8545",
            "--network",
            "sepolia",
            "--private-key",
            KEY,
            "--withdraw-funds",
        ])
        .unwrap();

        match cli.command {
            Command::Deploy(cmd) => {
                assert_eq!(cmd.rpc.network.as_deref(), Some("sepolia"));
                assert!(cmd.withdraw_funds);
                assert!(cmd.new_owner.is_none());
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_build_directories_have_toolchain_defaults() {
        let cli = TestCli::try_parse_from([
            "ember",
            "propose",
            "--config",
            "ember.json",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            KEY,
        ])
        .unwrap();

        match cli.command {
            Command::Propose(cmd) => {
                assert_eq!(cmd.build.out, PathBuf::from("out"));
                assert_eq!(cmd.build.build_info, PathBuf::from("out/build-info"));
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_fund_amount_parses_as_wei() {
        let cli = TestCli::try_parse_from([
            "ember",
            "fund",
            "--config",
            "ember.json",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            KEY,
            "--amount",
            "1000000000000000000",
        ])
        .unwrap();

        match cli.command {
            Command::Fund(cmd) => {
                assert_eq!(cmd.amount, U256::from(10).pow(U256::from(18)));
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_get_address_needs_no_private_key() {
        let cli = TestCli::try_parse_from([
            "ember",
            "get-address",
            "--config",
            "ember.json",
            "--rpc-url",
            "http://localhost:8545",
            "--reference",
            "Token",
        ])
        .unwrap();

        match cli.command {
            Command::GetAddress(cmd) => assert_eq!(cmd.reference, "Token"),
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(TestCli::try_parse_from(["ember", "frobnicate"]).is_err());
    }

    #[test]
    fn test_missing_required_flags_are_rejected() {
        assert!(TestCli::try_parse_from(["ember", "register"]).is_err());
        assert!(TestCli::try_parse_from(["ember", "cancel", "--config", "ember.json"]).is_err());
    }

    #[test]
    fn test_bad_address_flag_is_rejected() {
        let result = TestCli::try_parse_from([
            "ember",
            "add-proposer",
            "--config",
            "ember.json",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            KEY,
            "--proposer",
            "not-an-address",
        ]);
        assert!(result.is_err());
    }
}
