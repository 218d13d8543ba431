use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use log::debug;

use crate::util::{absolute_path, normalize_path};

/// Default extensions of FunC sources that `#include` may name
pub const DEFAULT_EXTENSIONS: &[&str] = &[".fc", ".func"];

/// Resolves `#include` targets and maps sources to their mirrored output paths
///
/// All paths handed out are absolute and lexically normalized, so the same
/// file reached through different spellings (`lib/../op.fc`, `op.fc`) is seen
/// as one file.
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    /// Project root; every processed file must live under it
    root: PathBuf,
    /// Directory that receives the restyled tree
    output_root: PathBuf,
    /// Recognized source extensions, with leading dot
    extensions: Vec<String>,
}

impl IncludeResolver {
    /// Create a resolver for a project rooted at `root`
    ///
    /// A relative `output` is placed under the project root.
    pub fn new(root: &Path, output: &Path, extensions: Vec<String>) -> Result<Self> {
        let root = absolute_path(root)?;
        let output_root = normalize_path(&root.join(output));
        debug!(
            "Include resolver: root {}, output {}",
            root.display(),
            output_root.display()
        );
        Ok(Self {
            root,
            output_root,
            extensions,
        })
    }

    /// Create a resolver rooted at the directory of `entry_file`
    pub fn for_entry_file(entry_file: &Path, output: &Path, extensions: Vec<String>) -> Result<Self> {
        let entry = absolute_path(entry_file)?;
        let root = entry
            .parent()
            .ok_or_else(|| anyhow!("Cannot get parent directory of {}", entry.display()))?;
        Self::new(root, output, extensions)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Does the quoted include argument name a FunC source file?
    pub fn is_source_file(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Resolve an include argument relative to the directory of the including file
    pub fn resolve_include(&self, target: &str, including_file: &Path) -> Result<PathBuf> {
        let base_dir = including_file.parent().ok_or_else(|| {
            anyhow!(
                "Cannot get parent directory of {}",
                including_file.display()
            )
        })?;
        let resolved = absolute_path(&base_dir.join(target))?;
        if !resolved.starts_with(&self.root) {
            bail!(
                "'{target}' included from {} resolves to {}, outside the project root {} \
                 (set `root` to a common ancestor)",
                including_file.display(),
                resolved.display(),
                self.root.display()
            );
        }
        Ok(resolved)
    }

    /// Path of `source` relative to the project root
    pub fn relative_path(&self, source: &Path) -> Result<PathBuf> {
        let source = absolute_path(source)?;
        source
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                anyhow!(
                    "{} is outside the project root {}",
                    source.display(),
                    self.root.display()
                )
            })
    }

    /// Where the restyled copy of `source` is written
    pub fn output_path(&self, source: &Path) -> Result<PathBuf> {
        Ok(self.output_root.join(self.relative_path(source)?))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn create_test_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn default_extensions() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect()
    }

    #[test]
    fn test_include_resolves_against_including_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        let entry = root.join("contracts/wallet.fc");
        create_test_file(&entry, "")?;
        create_test_file(&root.join("contracts/imports/stdlib.fc"), "")?;

        let resolver =
            IncludeResolver::for_entry_file(&entry, Path::new("result"), default_extensions())?;
        let resolved = resolver.resolve_include("imports/stdlib.fc", &absolute_path(&entry)?)?;

        assert_eq!(resolved, absolute_path(&root.join("contracts/imports/stdlib.fc"))?);
        assert_eq!(
            resolver.relative_path(&resolved)?,
            PathBuf::from("imports/stdlib.fc")
        );
        assert_eq!(
            resolver.output_path(&resolved)?,
            absolute_path(&root.join("contracts/result/imports/stdlib.fc"))?
        );
        Ok(())
    }

    #[test]
    fn test_equivalent_spellings_resolve_to_one_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let entry = temp_dir.path().join("main.fc");
        let resolver =
            IncludeResolver::for_entry_file(&entry, Path::new("result"), default_extensions())?;
        let entry = absolute_path(&entry)?;

        assert_eq!(
            resolver.resolve_include("lib/../op.fc", &entry)?,
            resolver.resolve_include("./op.fc", &entry)?
        );
        Ok(())
    }

    #[test]
    fn test_include_outside_root_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let entry = temp_dir.path().join("contracts/main.fc");
        let resolver =
            IncludeResolver::for_entry_file(&entry, Path::new("result"), default_extensions())?;

        let err = resolver
            .resolve_include("../imports/stdlib.fc", &absolute_path(&entry)?)
            .unwrap_err();
        assert!(err.to_string().contains("outside the project root"));

        // A wider root accepts the same include
        let resolver = IncludeResolver::new(
            temp_dir.path(),
            Path::new("result"),
            default_extensions(),
        )?;
        let resolved = resolver.resolve_include("../imports/stdlib.fc", &absolute_path(&entry)?)?;
        assert_eq!(
            resolver.relative_path(&resolved)?,
            PathBuf::from("imports/stdlib.fc")
        );
        Ok(())
    }

    #[test]
    fn test_absolute_output_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let out_dir = TempDir::new()?;
        let resolver =
            IncludeResolver::new(temp_dir.path(), out_dir.path(), default_extensions())?;
        assert_eq!(resolver.output_root(), out_dir.path());
        Ok(())
    }

    #[test]
    fn test_source_extensions() {
        let resolver = IncludeResolver {
            root: PathBuf::from("/project"),
            output_root: PathBuf::from("/project/result"),
            extensions: default_extensions(),
        };
        assert!(resolver.is_source_file("imports/stdlib.fc"));
        assert!(resolver.is_source_file("op-codes.func"));
        assert!(!resolver.is_source_file("README.md"));
        assert!(!resolver.is_source_file("stdlib.fc.bak"));
    }
}
