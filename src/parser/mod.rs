//! Extract relation candidates from decoded role and playbook manifests.
//!
//! The `extract_*` functions are pure: they take already-decoded YAML and
//! return role names. `load_manifest` is the only function here doing I/O.
use crate::errors::GraphError;
use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

/// A role reference as written in `dependencies` or a play's `roles` list:
/// either `- common` or `- { role: common, ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRef {
    BareName(String),
    Named { role: String },
}

impl<'de> Deserialize<'de> for RoleRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoleRefVisitor;

        impl<'de> Visitor<'de> for RoleRefVisitor {
            type Value = RoleRef;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a role name or a mapping with a `role` key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RoleRef, E> {
                Ok(RoleRef::BareName(v.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RoleRef, A::Error> {
                let mut role = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "role" {
                        role = Some(map.next_value::<String>()?);
                    } else {
                        map.next_value::<de::IgnoredAny>()?;
                    }
                }
                role.map(|role| RoleRef::Named { role }).ok_or_else(|| de::Error::missing_field("role"))
            }
        }

        deserializer.deserialize_any(RoleRefVisitor)
    }
}

impl RoleRef {
    #[must_use]
    pub fn into_name(self) -> String {
        match self {
            RoleRef::BareName(name) | RoleRef::Named { role: name } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybookRelations {
    /// Roles referenced by any play, deduplicated, in first-declaration order.
    pub roles: Vec<String>,
    /// `import_playbook` targets, relative to the playbook's directory.
    pub imports: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RoleMeta {
    #[serde(default)]
    dependencies: Option<Vec<RoleRef>>,
}

#[derive(Debug, Deserialize)]
struct IncludeRole {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Task {
    #[serde(default, alias = "ansible.builtin.include_role")]
    include_role: Option<IncludeRole>,
    #[serde(default, alias = "ansible.builtin.import_role")]
    import_role: Option<IncludeRole>,
    #[serde(default)]
    block: Option<Vec<Task>>,
    #[serde(default)]
    rescue: Option<Vec<Task>>,
    #[serde(default)]
    always: Option<Vec<Task>>,
}

#[derive(Debug, Deserialize)]
struct Play {
    #[serde(default)]
    roles: Option<Vec<RoleRef>>,
    #[serde(default, alias = "ansible.builtin.import_playbook")]
    import_playbook: Option<String>,
}

fn decode<T: DeserializeOwned + Default>(data: &Value, file: &Path) -> Result<T, GraphError> {
    if data.is_null() {
        return Ok(T::default());
    }
    serde_yaml::from_value(data.clone()).map_err(|e| GraphError::format(file, e))
}

/// Read and decode a YAML manifest.
///
/// # Errors
/// `GraphError::NotFound` if the file does not exist, `GraphError::Io` on other read
/// failures and `GraphError::ManifestFormat` if the content is not valid YAML.
pub fn load_manifest(path: &Path) -> Result<Value, GraphError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => GraphError::NotFound { path: path.to_path_buf() },
        _ => GraphError::Io(e),
    })?;
    serde_yaml::from_str(&content).map_err(|e| GraphError::format(path, e))
}

/// Role names listed under `dependencies` in a role's `meta/main` manifest.
///
/// # Errors
/// `GraphError::ManifestFormat` if the manifest is not a mapping or an entry is
/// neither a name nor a mapping with a `role` key.
pub fn extract_role_dependencies(data: &Value, file: &Path) -> Result<Vec<String>, GraphError> {
    let meta: RoleMeta = decode(data, file)?;
    Ok(meta.dependencies.unwrap_or_default().into_iter().map(RoleRef::into_name).collect())
}

/// Role names pulled in by `include_role` / `import_role` tasks of a role's
/// `tasks/main` manifest. Other tasks are skipped.
///
/// # Errors
/// `GraphError::ManifestFormat` if the manifest is not a list of task mappings or an
/// inclusion has no `name`.
pub fn extract_included_roles(data: &Value, file: &Path) -> Result<Vec<String>, GraphError> {
    let tasks: Vec<Task> = decode(data, file)?;
    let mut out = Vec::new();
    collect_included(tasks, &mut out);
    Ok(out)
}

fn collect_included(tasks: Vec<Task>, out: &mut Vec<String>) {
    for task in tasks {
        for incl in [task.include_role, task.import_role].into_iter().flatten() {
            out.push(incl.name);
        }
        for nested in [task.block, task.rescue, task.always].into_iter().flatten() {
            collect_included(nested, out);
        }
    }
}

/// Roles and imported playbooks referenced by the plays of a playbook.
///
/// # Errors
/// `GraphError::ManifestFormat` if the playbook is not a list of play mappings or a
/// `roles` entry has an unexpected shape.
pub fn extract_playbook_relations(
    data: &Value,
    file: &Path,
) -> Result<PlaybookRelations, GraphError> {
    let plays: Vec<Play> = decode(data, file)?;
    let mut rel = PlaybookRelations::default();
    for play in plays {
        for role in play.roles.unwrap_or_default() {
            let name = role.into_name();
            if !rel.roles.contains(&name) {
                rel.roles.push(name);
            }
        }
        if let Some(target) = play.import_playbook {
            rel.imports.push(target);
        }
    }
    Ok(rel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn file() -> &'static Path {
        Path::new("roles/web/meta/main.yml")
    }

    #[test]
    fn dependencies_accept_bare_and_mapping_forms_in_order() {
        let data = yaml(
            "galaxy_info: {author: me}\ndependencies:\n  - common\n  - role: ntp\n    vars: {x: 1}\n  - logging\n",
        );
        let deps = extract_role_dependencies(&data, file()).unwrap();
        assert_eq!(deps, vec!["common", "ntp", "logging"]);
    }

    #[test]
    fn absent_or_empty_dependencies_yield_nothing() {
        assert!(extract_role_dependencies(&yaml("galaxy_info: {}"), file()).unwrap().is_empty());
        assert!(extract_role_dependencies(&yaml("dependencies:"), file()).unwrap().is_empty());
        assert!(extract_role_dependencies(&Value::Null, file()).unwrap().is_empty());
    }

    #[test]
    fn malformed_dependency_names_the_manifest() {
        let err = extract_role_dependencies(&yaml("dependencies: [42.5]"), file()).unwrap_err();
        match err {
            GraphError::ManifestFormat { file: f, .. } => assert_eq!(f, file()),
            other => panic!("unexpected error: {other}"),
        }
        assert!(extract_role_dependencies(&yaml("dependencies: [{vars: {}}]"), file()).is_err());
        assert!(extract_role_dependencies(&yaml("dependencies: [[common]]"), file()).is_err());
        assert!(extract_role_dependencies(&yaml("- common"), file()).is_err());
    }

    #[test]
    fn only_role_inclusions_are_extracted_from_tasks() {
        let data = yaml(
            r"
- name: install
  apt: {name: nginx}
- include_role:
    name: logging
- name: nested
  block:
    - ansible.builtin.import_role:
        name: firewall
  rescue:
    - include_role: {name: alerts}
",
        );
        let roles = extract_included_roles(&data, Path::new("tasks/main.yml")).unwrap();
        assert_eq!(roles, vec!["logging", "firewall", "alerts"]);
    }

    #[test]
    fn include_role_without_name_is_malformed() {
        let data = yaml("- include_role: {tasks_from: x}");
        assert!(matches!(
            extract_included_roles(&data, Path::new("tasks/main.yml")),
            Err(GraphError::ManifestFormat { .. })
        ));
    }

    #[test]
    fn playbook_roles_and_imports() {
        let data = yaml(
            r"
- hosts: all
  roles:
    - web
    - role: db
    - web
- import_playbook: extra.yml
- ansible.builtin.import_playbook: sub/more.yml
",
        );
        let rel = extract_playbook_relations(&data, Path::new("site.yml")).unwrap();
        assert_eq!(rel.roles, vec!["web", "db"]);
        assert_eq!(rel.imports, vec!["extra.yml", "sub/more.yml"]);
    }

    #[test]
    fn playbook_must_be_a_list_of_plays() {
        let data = yaml("hosts: all\nroles: [web]\n");
        assert!(extract_playbook_relations(&data, Path::new("site.yml")).is_err());
    }

    #[test]
    fn role_ref_into_name() {
        assert_eq!(RoleRef::BareName("a".into()).into_name(), "a");
        assert_eq!(RoleRef::Named { role: "b".into() }.into_name(), "b");
    }
}
