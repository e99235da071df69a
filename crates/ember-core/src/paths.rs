//! Resolution of the filesystem locations ember works against.

use std::path::{Path, PathBuf};

/// Manages the `ember/` directory for project-local deployment data.
///
/// Deployment records, pinned canonical configs, and deploy logs all live
/// under this directory, keeping the project root to a single entry.
#[derive(Debug, Clone)]
pub struct EmberDir {
    path: PathBuf,
}

impl EmberDir {
    /// The directory name used for ember data
    pub const NAME: &str = "ember";

    /// Create an `EmberDir` pointing to `ember/` in the current directory.
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(Self::NAME),
        }
    }

    /// Create an `EmberDir` at a custom location.
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Join a relative path to the ember directory.
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.path.join(path)
    }

    /// Create the ember directory if it doesn't exist.
    pub fn create(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.path)
    }
}

impl Default for EmberDir {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Path> for EmberDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Canonical locations derived from the user-supplied artifact output and
/// build-info directories.
///
/// Computed once per invocation and read-only afterwards. Nothing is
/// validated here; a path that turns out not to exist surfaces at the I/O
/// that dereferences it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Compiled artifact output directory (the toolchain's `out`)
    pub artifact_dir: PathBuf,
    /// Compiler build-info directory
    pub build_info_dir: PathBuf,
    /// Where deployment records are written
    pub deployment_dir: PathBuf,
    /// Where pinned canonical configs are written
    pub canonical_config_dir: PathBuf,
}

impl ProjectPaths {
    /// Resolve all working directories from the two user-supplied roots.
    pub fn resolve(out_dir: &Path, build_info_dir: &Path) -> Self {
        let ember = EmberDir::new();
        Self {
            artifact_dir: absolute(out_dir),
            build_info_dir: absolute(build_info_dir),
            deployment_dir: absolute(&ember.join("deployments")),
            canonical_config_dir: absolute(&ember.join(".canonical-configs")),
        }
    }
}

/// Absolutize without dereferencing; `canonicalize` would reject directories
/// that are only created later in the run.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ember_dir_join() {
        let dir = EmberDir::new();
        assert_eq!(dir.path(), Path::new("ember"));
        assert_eq!(dir.join("deployments"), PathBuf::from("ember/deployments"));
        assert_eq!(
            dir.join("logs/mainnet"),
            PathBuf::from("ember/logs/mainnet")
        );
    }

    #[test]
    fn test_ember_dir_at() {
        let dir = EmberDir::at("/somewhere/else/ember");
        assert_eq!(dir.path(), Path::new("/somewhere/else/ember"));
    }

    #[test]
    fn test_resolve_absolutizes_inputs() {
        let paths = ProjectPaths::resolve(Path::new("out"), Path::new("out/build-info"));

        assert!(paths.artifact_dir.is_absolute());
        assert!(paths.build_info_dir.is_absolute());
        assert!(paths.artifact_dir.ends_with("out"));
        assert!(paths.build_info_dir.ends_with("out/build-info"));
    }

    #[test]
    fn test_resolve_fixes_tool_directories() {
        let paths = ProjectPaths::resolve(Path::new("/project/out"), Path::new("/project/bi"));

        assert_eq!(paths.artifact_dir, PathBuf::from("/project/out"));
        assert_eq!(paths.build_info_dir, PathBuf::from("/project/bi"));
        assert!(paths.deployment_dir.ends_with("ember/deployments"));
        assert!(paths
            .canonical_config_dir
            .ends_with("ember/.canonical-configs"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let a = ProjectPaths::resolve(Path::new("out"), Path::new("out/build-info"));
        let b = ProjectPaths::resolve(Path::new("out"), Path::new("out/build-info"));
        assert_eq!(a, b);
    }
}
