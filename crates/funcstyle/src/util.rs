//! Path helpers shared by the resolver and the orchestrator

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component where there is one. The filesystem is not consulted,
/// so symlinks are taken at face value.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !matches!(
                    normalized.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Absolute, normalized form of `path`, resolved against the working directory
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve absolute path for {}", path.display()))?;
    Ok(normalize_path(&absolute))
}
