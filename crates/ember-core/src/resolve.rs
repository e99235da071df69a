//! Aggregation of per-contract artifact and build-info paths.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::artifact::{artifact_path, load_artifact};
use crate::build_info::BuildInfoIndex;
use crate::config::ContractConfig;
use crate::error::{Error, Result};

/// Resolved file locations for one configured contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactPathEntry {
    pub build_info_path: PathBuf,
    pub contract_artifact_path: PathBuf,
}

/// Map from reference name to resolved artifact locations, one entry per
/// configured contract. Handed to the engine and never mutated afterwards.
pub type ArtifactPathTable = BTreeMap<String, ArtifactPathEntry>;

/// Resolve every configured contract to its artifact file and the unique
/// build-info document that compiled its source.
///
/// The build-info directory is scanned once and the resulting index shared
/// across all contracts. The first failing contract aborts the whole
/// resolution; the engine requires a complete table, so there is no
/// partial result to hand back.
pub fn resolve_artifact_paths(
    contracts: &BTreeMap<String, ContractConfig>,
    artifact_dir: &Path,
    build_info_dir: &Path,
) -> Result<ArtifactPathTable> {
    let index = BuildInfoIndex::scan(build_info_dir)?;

    let mut table = ArtifactPathTable::new();
    for (reference, config) in contracts {
        let entry =
            resolve_contract(config, artifact_dir, &index).map_err(|e| Error::Contract {
                name: reference.clone(),
                source: Box::new(e),
            })?;
        table.insert(reference.clone(), entry);
    }

    Ok(table)
}

fn resolve_contract(
    config: &ContractConfig,
    artifact_dir: &Path,
    index: &BuildInfoIndex,
) -> Result<ArtifactPathEntry> {
    let artifact = load_artifact(artifact_dir, &config.contract)?;
    let build_info_path = index.find(&artifact.source_name)?;

    // Rebuild the artifact path from the artifact's own contract name; the
    // identifier the config used to reach it is not authoritative.
    Ok(ArtifactPathEntry {
        build_info_path,
        contract_artifact_path: artifact_path(artifact_dir, &artifact.contract_name),
    })
}
