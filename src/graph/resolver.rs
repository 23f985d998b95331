use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};

use crate::errors::GraphError;
use crate::graph::{EdgeKind, ExclusionFilter, RolesGraph};
use crate::locator::{self, Target};
use crate::parser;
use crate::utils::file_walker;

/// Walks role directories and playbooks, following every discovered reference
/// and filling a `RolesGraph` owned for the duration of one run.
#[derive(Debug, Default)]
pub struct Resolver {
    graph: RolesGraph,
    // Roles and playbooks already expanded; guards cycles and diamonds.
    visited: HashSet<String>,
}

/// Node name for a role directory or playbook file: its final path segment.
fn node_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

impl Resolver {
    #[must_use]
    pub fn new(filter: ExclusionFilter) -> Self {
        Self { graph: RolesGraph::new(filter), visited: HashSet::new() }
    }

    #[must_use]
    pub fn into_graph(self) -> RolesGraph {
        self.graph
    }

    /// Resolve every target in order. The first failure aborts the run.
    ///
    /// # Errors
    /// `GraphError::NotFound` for a target that is neither a file nor a directory
    /// (or a missing imported playbook), `GraphError::ManifestFormat` for a malformed manifest.
    pub fn resolve_targets<P: AsRef<Path>>(&mut self, targets: &[P]) -> Result<(), GraphError> {
        for target in targets {
            self.resolve_target(target.as_ref())?;
        }
        info!(
            nodes = self.graph.nodes().len(),
            edges = self.graph.edges().len(),
            "graph resolved"
        );
        Ok(())
    }

    /// # Errors
    /// See [`Resolver::resolve_targets`].
    pub fn resolve_target(&mut self, path: &Path) -> Result<(), GraphError> {
        match locator::locate_target(path)? {
            Target::RolesDir(dir) => self.resolve_role_dir(&dir),
            Target::Playbook(file) => self.resolve_playbook(&file).map(|_| ()),
        }
    }

    /// Resolve each immediate child directory of `dir` as a role.
    ///
    /// # Errors
    /// `GraphError::Io` if `dir` cannot be listed, otherwise propagates manifest
    /// errors from any role below `dir`.
    pub fn resolve_role_dir(&mut self, dir: &Path) -> Result<(), GraphError> {
        debug!(dir = %dir.display(), "scanning roles directory");
        for child in file_walker::child_dirs(dir)? {
            self.resolve_role(&child)?;
        }
        Ok(())
    }

    /// Resolve the role living at `path`, named after its final segment.
    ///
    /// # Errors
    /// Propagates manifest errors from this role or any role it reaches.
    pub fn resolve_role(&mut self, path: &Path) -> Result<String, GraphError> {
        let name = node_name(path);
        self.resolve_role_named(&name, path)?;
        Ok(name)
    }

    // Excluded names are still expanded; the graph drops them and their edges on insertion.
    fn resolve_role_named(&mut self, name: &str, path: &Path) -> Result<(), GraphError> {
        if self.visited.contains(name) {
            trace!(role = name, "already visited");
            return Ok(());
        }
        self.graph.add_role(name);
        if !path.is_dir() {
            // Not marked visited: the same role may still be found at a real path later.
            debug!(role = name, path = %path.display(), "role directory not found, kept as leaf");
            return Ok(());
        }
        self.visited.insert(name.to_string());

        let roles_root = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let manifests = locator::locate_role_manifests(path);
        debug!(
            role = name,
            path = %path.display(),
            leaf = manifests.is_leaf(),
            excluded = self.graph.filter().contains(name),
            "resolving role"
        );

        if let Some(meta) = manifests.meta {
            let data = parser::load_manifest(&meta)?;
            for dependency in parser::extract_role_dependencies(&data, &meta)? {
                self.follow_role(name, &dependency, &roles_root, EdgeKind::Dependency)?;
            }
        }
        if let Some(tasks) = manifests.tasks {
            let data = parser::load_manifest(&tasks)?;
            for included in parser::extract_included_roles(&data, &tasks)? {
                self.follow_role(name, &included, &roles_root, EdgeKind::Include)?;
            }
        }
        Ok(())
    }

    // Referenced roles are expected as siblings under the same roles root.
    fn follow_role(
        &mut self,
        from: &str,
        to: &str,
        roles_root: &Path,
        kind: EdgeKind,
    ) -> Result<(), GraphError> {
        self.graph.add_role(to);
        if self.graph.link_roles(from, to, kind)? {
            trace!(from, to, kind = kind.as_str(), "linked");
        }
        self.resolve_role_named(to, &roles_root.join(to))
    }

    /// Resolve a playbook file, its imported playbooks and the roles its plays use.
    /// Returns the playbook's node name.
    ///
    /// # Errors
    /// `GraphError::NotFound` if the playbook (or an imported one) does not exist,
    /// `GraphError::ManifestFormat` for a malformed playbook or role manifest.
    pub fn resolve_playbook(&mut self, path: &Path) -> Result<String, GraphError> {
        let path = locator::locate_playbook(path)?;
        let name = node_name(&path);
        if !self.visited.insert(name.clone()) {
            trace!(playbook = %name, "already visited");
            return Ok(name);
        }
        self.graph.add_playbook(&name);
        debug!(playbook = %name, path = %path.display(), "resolving playbook");

        let dir = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let data = parser::load_manifest(&path)?;
        let relations = parser::extract_playbook_relations(&data, &path)?;

        for import in &relations.imports {
            let target = self.resolve_playbook(&dir.join(import))?;
            self.graph.link_roles(&name, &target, EdgeKind::Import)?;
        }
        let roles_root = dir.join("roles");
        for role in &relations.roles {
            self.resolve_role_named(role, &roles_root.join(role))?;
            self.graph.link_roles(&name, role, EdgeKind::Dependency)?;
        }
        Ok(name)
    }
}
