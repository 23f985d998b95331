//! ansible-roles-graph — dependency graphs of Ansible roles and playbooks
//!
//! Walk role directories and playbook files, collect the relations they declare
//! and build a deduplicated node/edge graph ready for layout.
//!
//! # Relations
//! - `meta/main.yml` `dependencies` of a role (edge kind `dependency`)
//! - `include_role` / `import_role` tasks in `tasks/main.yml` (edge kind `include`)
//! - `import_playbook` and play `roles` in playbooks (`import` / `dependency`)
//!
//! Cycles are legal: every role and playbook is expanded at most once per run.
//!
//! # Quickstart (Library)
//! ```no_run
//! use ansible_roles_graph::graph::{ExclusionFilter, RolesGraph};
//! use ansible_roles_graph::visualization::DotGenerator;
//!
//! let graph = RolesGraph::build_from_targets(&["roles", "site.yml"], ExclusionFilter::parse("common"))
//!     .expect("build graph");
//! println!("{}", DotGenerator::new().generate_dot(&graph));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! ansible-roles-graph -o roles.svg -x common:ntp roles/ site.yml
//! ansible-roles-graph -o graph.dot roles/
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod locator;
pub mod parser;
pub mod utils;
pub mod visualization;
