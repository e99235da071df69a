//! User project configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A project's deployment configuration file.
///
/// Reference names key the contracts map. They are user-chosen aliases and
/// may differ from the compiled contract's own name; two references may
/// even point at the same contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, unique per owner on the registry
    pub project: String,
    pub contracts: BTreeMap<String, ContractConfig>,
}

/// One contract entry in the project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractConfig {
    /// Name of the compiled contract backing this reference
    pub contract: String,
    /// Constructor and state inputs, forwarded to the engine untouched
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub variables: serde_json::Value,
    /// Use an existing proxy instead of having the engine deploy one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_proxy: Option<String>,
}

impl ProjectConfig {
    /// Load a project configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_project_config() {
        let json = r#"{
            "project": "my-defi",
            "contracts": {
                "Token": {
                    "contract": "ERC20",
                    "variables": { "name": "My Token", "symbol": "MTK" }
                },
                "Vault": {
                    "contract": "Vault",
                    "externalProxy": "0x1111111111111111111111111111111111111111"
                }
            }
        }"#;

        let config: ProjectConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.project, "my-defi");
        assert_eq!(config.contracts.len(), 2);

        let token = &config.contracts["Token"];
        assert_eq!(token.contract, "ERC20");
        assert_eq!(token.variables["symbol"], "MTK");
        assert!(token.external_proxy.is_none());

        let vault = &config.contracts["Vault"];
        assert_eq!(
            vault.external_proxy.as_deref(),
            Some("0x1111111111111111111111111111111111111111")
        );
        assert!(vault.variables.is_null());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ember.json");
        std::fs::write(
            &path,
            r#"{"project": "demo", "contracts": {"Token": {"contract": "ERC20"}}}"#,
        )
        .unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.project, "demo");
        assert_eq!(config.contracts["Token"].contract, "ERC20");
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = ProjectConfig::load(&PathBuf::from("/nope/ember.json")).unwrap_err();

        match err {
            Error::Config { path, .. } => assert_eq!(path, PathBuf::from("/nope/ember.json")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn test_serialization_is_stable() {
        let json = r#"{
            "project": "demo",
            "contracts": {
                "B": {"contract": "Beta"},
                "A": {"contract": "Alpha"}
            }
        }"#;

        let config: ProjectConfig = serde_json::from_str(json).unwrap();
        let first = serde_json::to_string(&config).unwrap();
        let second = serde_json::to_string(&config).unwrap();

        assert_eq!(first, second);
        // BTreeMap ordering, not insertion ordering
        assert!(first.find("Alpha").unwrap() < first.find("Beta").unwrap());
    }
}
