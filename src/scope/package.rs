//! Locating the package under evaluation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ScopeError;
use crate::scope::RepoPath;

/// The package whose commits are being collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Name declared in the manifest.
    pub name: String,
    /// Package directory relative to the repository root.
    pub root: RepoPath,
    /// Absolute location of the manifest file.
    pub manifest: PathBuf,
}

impl PackageInfo {
    /// Resolves the package containing `start_dir` inside `repo_root`.
    pub fn resolve(start_dir: &Path, repo_root: &Path, manifest_file: &str) -> Result<Self> {
        let manifest = find_manifest(start_dir, manifest_file)?;
        let name = read_package_name(&manifest)?;
        let root = package_root(repo_root, &manifest)?;

        Ok(Self {
            name,
            root,
            manifest,
        })
    }
}

#[derive(Deserialize)]
struct ManifestName {
    #[serde(default)]
    name: Option<String>,
}

/// Walks up from `start_dir` to the nearest directory holding `file_name`.
pub fn find_manifest(start_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let start = start_dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve directory {}", start_dir.display()))?;

    let found = start
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file());

    match found {
        Some(manifest) => Ok(manifest),
        None => Err(ScopeError::ManifestNotFound {
            start,
            file_name: file_name.to_string(),
        }
        .into()),
    }
}

/// Reads the `name` field of a JSON package manifest.
pub fn read_package_name(manifest: &Path) -> Result<String> {
    let read_error = |message: String| ScopeError::ManifestRead {
        path: manifest.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(manifest).map_err(|e| read_error(e.to_string()))?;
    let parsed: ManifestName =
        serde_json::from_str(&content).map_err(|e| read_error(e.to_string()))?;

    match parsed.name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ScopeError::ManifestName {
            path: manifest.to_path_buf(),
        }
        .into()),
    }
}

/// Returns the manifest's directory relative to `repo_root`.
pub fn package_root(repo_root: &Path, manifest: &Path) -> Result<RepoPath> {
    let repo_root = repo_root
        .canonicalize()
        .with_context(|| format!("Failed to resolve repository root {}", repo_root.display()))?;
    let package_dir = manifest.parent().unwrap_or(manifest);

    let relative = package_dir
        .strip_prefix(&repo_root)
        .map_err(|_| ScopeError::NotInWorkTree {
            path: package_dir.to_path_buf(),
        })?;

    Ok(RepoPath::from_relative(relative)?)
}
