//! Resolve the concrete manifest files behind a target path or a role directory.
use crate::errors::GraphError;
use std::path::{Path, PathBuf};

/// File names tried, in order, inside `meta/` and `tasks/`.
pub const MANIFEST_NAMES: [&str; 3] = ["main.yml", "main.yaml", "main"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A directory whose immediate children are role directories.
    RolesDir(PathBuf),
    Playbook(PathBuf),
}

/// Manifests found for one role. Both are optional: a role with neither is a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleManifests {
    pub meta: Option<PathBuf>,
    pub tasks: Option<PathBuf>,
}

impl RoleManifests {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.meta.is_none() && self.tasks.is_none()
    }
}

/// Classify a caller-supplied path.
///
/// # Errors
/// Returns `GraphError::NotFound` when `path` is neither an existing directory nor an existing file.
pub fn locate_target(path: &Path) -> Result<Target, GraphError> {
    if path.is_dir() {
        Ok(Target::RolesDir(path.to_path_buf()))
    } else if path.is_file() {
        Ok(Target::Playbook(path.to_path_buf()))
    } else {
        Err(GraphError::NotFound { path: path.to_path_buf() })
    }
}

/// # Errors
/// Returns `GraphError::NotFound` when `path` is not an existing file.
pub fn locate_playbook(path: &Path) -> Result<PathBuf, GraphError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(GraphError::NotFound { path: path.to_path_buf() })
    }
}

/// Find `meta/main.*` and `tasks/main.*` under `role_dir`. A missing role
/// directory simply yields no manifests.
#[must_use]
pub fn locate_role_manifests(role_dir: &Path) -> RoleManifests {
    RoleManifests {
        meta: find_manifest(&role_dir.join("meta")),
        tasks: find_manifest(&role_dir.join("tasks")),
    }
}

fn find_manifest(dir: &Path) -> Option<PathBuf> {
    MANIFEST_NAMES.iter().map(|name| dir.join(name)).find(|p| p.is_file())
}
