//! Locating compiler build-info documents by source file.
//!
//! An incremental compilation can leave any number of build-info files
//! behind, and nothing in their names ties them to a source file. The only
//! reliable association is membership of the source in a document's
//! `output.sources` map, so the locator matches on content.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// A compiler build-info document, as far as the resolver needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    /// Identifier the toolchain also uses to name the file on disk
    pub id: String,
    pub output: BuildInfoOutput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfoOutput {
    /// Compiler output per source file compiled in this invocation
    pub sources: BTreeMap<String, serde_json::Value>,
}

/// Index over every build-info document in a directory, keyed by the
/// source files each one compiled.
///
/// Built with a single directory scan and shared across every contract in
/// a resolution pass. A well-formed incremental build puts each source in
/// exactly one document; the index keeps all matches so a violated
/// invariant is reported instead of silently resolved by listing order.
#[derive(Debug)]
pub struct BuildInfoIndex {
    dir: PathBuf,
    by_source: BTreeMap<String, Vec<String>>,
}

impl BuildInfoIndex {
    /// Parse every `*.json` file in `dir` and index its compiled sources.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut by_source: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            let info: BuildInfo =
                serde_json::from_str(&content).map_err(|e| Error::BuildInfoParse {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

            for source in info.output.sources.keys() {
                by_source
                    .entry(source.clone())
                    .or_default()
                    .push(info.id.clone());
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            by_source,
        })
    }

    /// Find the unique build-info document that compiled `source_name`.
    ///
    /// Returns the path the document is addressed by, `<dir>/<id>.json`,
    /// rebuilt from the document's own `id` field rather than the file it
    /// happened to be read from.
    pub fn find(&self, source_name: &str) -> Result<PathBuf> {
        match self.by_source.get(source_name).map(Vec::as_slice) {
            None | Some([]) => Err(Error::BuildInfoNotFound {
                source_name: source_name.to_string(),
                dir: self.dir.clone(),
            }),
            Some([id]) => Ok(self.dir.join(format!("{id}.json"))),
            Some(ids) => Err(Error::BuildInfoAmbiguous {
                source_name: source_name.to_string(),
                ids: ids.to_vec(),
            }),
        }
    }
}
