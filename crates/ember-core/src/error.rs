use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No artifact found at {path}. Make sure the contracts were compiled.")]
    ArtifactNotFound { path: PathBuf },

    #[error("Failed to parse artifact at {path}: {reason}")]
    ArtifactParse { path: PathBuf, reason: String },

    #[error("Failed to parse build info file {path}: {reason}")]
    BuildInfoParse { path: PathBuf, reason: String },

    #[error(
        "Failed to find build info for {source_name}. Are you sure your contracts were compiled \
         and {dir} is the correct build info directory?"
    )]
    BuildInfoNotFound { source_name: String, dir: PathBuf },

    #[error(
        "{source_name} appears in more than one build info file ({}). \
         Clean the build info directory and recompile.",
        .ids.join(", ")
    )]
    BuildInfoAmbiguous { source_name: String, ids: Vec<String> },

    #[error("Failed to read project config at {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Failed to resolve contract '{name}': {source}")]
    Contract {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for this error category (sysexits values), so
    /// automation around the tool can tell failure modes apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ArtifactParse { .. } | Error::BuildInfoParse { .. } => 65,
            Error::ArtifactNotFound { .. } => 66,
            Error::BuildInfoNotFound { .. } => 67,
            Error::BuildInfoAmbiguous { .. } => 68,
            Error::Io(_) => 74,
            Error::Config { .. } => 78,
            Error::Contract { source, .. } => source.exit_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_stable() {
        let not_found = Error::ArtifactNotFound {
            path: PathBuf::from("out/Token.sol/Token.json"),
        };
        assert_eq!(not_found.exit_code(), 66);

        let ambiguous = Error::BuildInfoAmbiguous {
            source_name: "contracts/Token.sol".to_string(),
            ids: vec!["0xabc".to_string(), "0xdef".to_string()],
        };
        assert_eq!(ambiguous.exit_code(), 68);
    }

    #[test]
    fn test_contract_wrapper_keeps_inner_code() {
        let inner = Error::BuildInfoNotFound {
            source_name: "contracts/Token.sol".to_string(),
            dir: PathBuf::from("out/build-info"),
        };
        let wrapped = Error::Contract {
            name: "Token".to_string(),
            source: Box::new(inner),
        };

        assert_eq!(wrapped.exit_code(), 67);
        assert!(wrapped.to_string().contains("Token"));
        assert!(wrapped.to_string().contains("contracts/Token.sol"));
    }

    #[test]
    fn test_ambiguous_message_names_every_candidate() {
        let err = Error::BuildInfoAmbiguous {
            source_name: "contracts/Token.sol".to_string(),
            ids: vec!["0xabc".to_string(), "0xdef".to_string()],
        };

        let message = err.to_string();
        assert!(message.contains("0xabc"));
        assert!(message.contains("0xdef"));
    }
}
