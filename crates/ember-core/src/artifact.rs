//! Loading of compiled contract artifacts.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// A compiled contract artifact from the toolchain's output directory.
///
/// Only the fields the resolver relies on are required; the ABI is kept
/// opaque and forwarded as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// Source file that defines the contract, e.g. `contracts/ERC20.sol`
    pub source_name: String,
    /// The compiled contract's own name, which may differ from the
    /// reference name the user configured
    pub contract_name: String,
    pub abi: serde_json::Value,
    #[serde(default)]
    pub bytecode: BytecodeObject,
    #[serde(default)]
    pub deployed_bytecode: BytecodeObject,
}

/// Bytecode object within an artifact
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BytecodeObject {
    #[serde(default)]
    pub object: String,
}

impl BytecodeObject {
    /// Check if this bytecode is valid (non-empty)
    pub fn is_valid(&self) -> bool {
        !self.object.is_empty() && self.object != "0x"
    }

    /// Get the bytecode without 0x prefix
    pub fn without_prefix(&self) -> &str {
        self.object.trim_start_matches("0x")
    }
}

/// Conventional artifact location: `<dir>/<Name>.sol/<Name>.json`, the
/// per-contract subfolder layout the build toolchain emits.
pub fn artifact_path(artifact_dir: &Path, contract_name: &str) -> PathBuf {
    artifact_dir
        .join(format!("{contract_name}.sol"))
        .join(format!("{contract_name}.json"))
}

/// Load and parse the artifact for `contract_name` from `artifact_dir`.
pub fn load_artifact(artifact_dir: &Path, contract_name: &str) -> Result<ContractArtifact> {
    let path = artifact_path(artifact_dir, contract_name);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::ArtifactNotFound { path })
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content).map_err(|e| Error::ArtifactParse {
        path,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ERC20_ARTIFACT: &str = r#"{
        "sourceName": "contracts/ERC20.sol",
        "contractName": "ERC20",
        "abi": [
            {
                "type": "function",
                "name": "transfer",
                "inputs": [
                    {"name": "to", "type": "address"},
                    {"name": "amount", "type": "uint256"}
                ],
                "outputs": [{"type": "bool"}]
            }
        ],
        "bytecode": {
            "object": "0x6080604052348015600f57600080fd5b50"
        },
        "deployedBytecode": {
            "object": "0x6080604052"
        }
    }"#;

    fn write_artifact(dir: &Path, name: &str, content: &str) {
        let folder = dir.join(format!("{name}.sol"));
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join(format!("{name}.json")), content).unwrap();
    }

    #[test]
    fn test_artifact_path_convention() {
        let path = artifact_path(Path::new("/project/out"), "ERC20");
        assert_eq!(path, PathBuf::from("/project/out/ERC20.sol/ERC20.json"));
    }

    #[test]
    fn test_load_artifact() {
        let tmp = TempDir::new().unwrap();
        write_artifact(tmp.path(), "ERC20", ERC20_ARTIFACT);

        let artifact = load_artifact(tmp.path(), "ERC20").unwrap();

        assert_eq!(artifact.source_name, "contracts/ERC20.sol");
        assert_eq!(artifact.contract_name, "ERC20");
        assert!(artifact.abi.is_array());
        assert!(artifact.bytecode.is_valid());
        assert_eq!(
            artifact.bytecode.without_prefix(),
            "6080604052348015600f57600080fd5b50"
        );
    }

    #[test]
    fn test_missing_artifact_names_expected_path() {
        let tmp = TempDir::new().unwrap();

        let err = load_artifact(tmp.path(), "Missing").unwrap_err();

        match err {
            Error::ArtifactNotFound { path } => {
                assert_eq!(path, artifact_path(tmp.path(), "Missing"));
            }
            other => panic!("expected ArtifactNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_artifact_without_source_name_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        write_artifact(
            tmp.path(),
            "Broken",
            r#"{"contractName": "Broken", "abi": []}"#,
        );

        let err = load_artifact(tmp.path(), "Broken").unwrap_err();
        assert!(matches!(err, Error::ArtifactParse { .. }));
        assert!(err.to_string().contains("sourceName"));
    }

    #[test]
    fn test_artifact_with_invalid_json_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        write_artifact(tmp.path(), "Broken", "not json at all");

        let err = load_artifact(tmp.path(), "Broken").unwrap_err();
        assert!(matches!(err, Error::ArtifactParse { .. }));
    }

    #[test]
    fn test_bytecode_object_is_valid() {
        let valid = BytecodeObject {
            object: "0x6080604052".to_string(),
        };
        assert!(valid.is_valid());

        let empty = BytecodeObject {
            object: "".to_string(),
        };
        assert!(!empty.is_valid());

        let just_prefix = BytecodeObject {
            object: "0x".to_string(),
        };
        assert!(!just_prefix.is_valid());
    }
}
