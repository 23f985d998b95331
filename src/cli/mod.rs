use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankDirArg {
    #[value(name = "LR")]
    LR,
    #[value(name = "TB")]
    TB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnOffArg {
    On,
    Off,
}

#[derive(Debug, Parser)]
#[command(
    name = "ansible-roles-graph",
    version,
    about = "Generate a picture of an Ansible roles graph",
    long_about = "Walk role directories and playbooks, follow role dependencies (meta/main.yml), role inclusions (tasks/main.yml) and playbook imports, and render the resulting graph. DOT and JSON are written directly; any other format is rendered by Graphviz."
)]
pub struct Cli {
    /// Directories containing Ansible roles, or playbook files
    #[arg(value_name = "ROLES_DIR|PLAYBOOK")]
    pub targets: Vec<PathBuf>,

    /// Output file [default: ansible-roles.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (png, svg, pdf, dot, json, ...); inferred from the output extension when omitted
    #[arg(short, long)]
    pub format: Option<String>,

    /// Colon or comma separated list of roles/playbooks that should not be displayed
    #[arg(short = 'x', long, default_value = "")]
    pub exclude: String,

    /// Path to a TOML configuration file (default: ./ansible-roles-graph.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Graph rank direction
    #[arg(long, value_enum)]
    pub rankdir: Option<RankDirArg>,

    /// Node color theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Include a legend of node shapes
    #[arg(long, value_enum)]
    pub legend: Option<OnOffArg>,

    /// Graphviz executable used for image formats
    #[arg(long, env = "ANSIBLE_ROLES_GRAPH_DOT", default_value = "dot")]
    pub dot_bin: PathBuf,

    /// Print shell completions for the given shell and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
