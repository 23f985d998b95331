use crate::cli::{Cli, OnOffArg, RankDirArg, ThemeArg};
use crate::errors::GraphError;
use crate::graph::{ExclusionFilter, RolesGraph};
use crate::utils::config::{self, Config};
use crate::visualization::{DotOptions, DotTheme, OutputFormat, RankDir, Renderer};
use clap::CommandFactory;
use clap_complete::generate;
use std::io;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "ansible-roles.png";
pub const DEFAULT_TARGET: &str = "roles";

/// Effective run parameters after merging the command line, the config file and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub targets: Vec<PathBuf>,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub filter: ExclusionFilter,
    pub dot: DotOptions,
}

/// Merge `cli` over `config` over built-in defaults. Exclusion lists are unioned.
///
/// # Errors
/// Returns `GraphError::Render` when no output format can be determined.
pub fn resolve_settings(cli: &Cli, config: Option<&Config>) -> Result<Settings, GraphError> {
    let targets = if cli.targets.is_empty() {
        config
            .and_then(|c| c.targets.clone())
            .filter(|t| !t.is_empty())
            .map_or_else(|| vec![PathBuf::from(DEFAULT_TARGET)], |t| {
                t.into_iter().map(PathBuf::from).collect()
            })
    } else {
        cli.targets.clone()
    };

    let output = cli
        .output
        .clone()
        .or_else(|| config.and_then(|c| c.output.clone()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let explicit_format = cli.format.clone().or_else(|| config.and_then(|c| c.format.clone()));
    let format = OutputFormat::resolve(explicit_format.as_deref(), &output)?;

    let mut filter = ExclusionFilter::parse(&cli.exclude);
    if let Some(names) = config.and_then(|c| c.exclude.clone()) {
        filter.extend(names);
    }

    let mut dot = DotOptions::default();
    if let Some(cfg) = config.and_then(|c| c.dot.as_ref()) {
        if let Some(v) = cfg.rankdir.as_deref() {
            dot.rankdir = if v.eq_ignore_ascii_case("LR") { RankDir::LR } else { RankDir::TB };
        }
        if let Some(v) = cfg.theme.as_deref() {
            dot.theme = if v == "dark" { DotTheme::Dark } else { DotTheme::Light };
        }
        if let Some(v) = cfg.legend {
            dot.legend = v;
        }
    }
    if let Some(v) = cli.rankdir {
        dot.rankdir = match v {
            RankDirArg::LR => RankDir::LR,
            RankDirArg::TB => RankDir::TB,
        };
    }
    if let Some(v) = cli.theme {
        dot.theme = match v {
            ThemeArg::Dark => DotTheme::Dark,
            ThemeArg::Light => DotTheme::Light,
        };
    }
    if let Some(v) = cli.legend {
        dot.legend = matches!(v, OnOffArg::On);
    }

    Ok(Settings { targets, output, format, filter, dot })
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the verbosity flags.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

/// Run the CLI logic in-process.
///
/// Returns an exit code: 0 on success, 1 when building or rendering the graph
/// fails, 2 for unusable configuration.
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let bin_name = env!("CARGO_PKG_NAME");
        generate(shell, &mut cmd, bin_name, &mut io::stdout());
        return 0;
    }

    let config = match cli.config.as_ref() {
        Some(path) => match config::load_config_at(path) {
            Some(cfg) => Some(cfg),
            None => {
                eprintln!("Failed to load config {}", path.display());
                return 2;
            }
        },
        None => std::env::current_dir().ok().and_then(|dir| config::load_config_near(&dir)),
    };

    let settings = match resolve_settings(&cli, config.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return 2;
        }
    };
    let Settings { targets, output, format, filter, dot } = settings;

    let graph = match RolesGraph::build_from_targets(&targets, filter) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Build failed: {e}");
            return 1;
        }
    };

    let renderer = Renderer::new(cli.dot_bin.clone(), dot);
    if let Err(e) = renderer.render(&graph, &format, &output) {
        eprintln!("Render failed: {e}");
        return 1;
    }

    if !cli.quiet {
        println!(
            "Graph with {} nodes and {} edges written to {}",
            graph.nodes().len(),
            graph.edges().len(),
            output.display()
        );
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["ansible-roles-graph"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_without_config() {
        let s = resolve_settings(&cli(&[]), None).unwrap();
        assert_eq!(s.targets, vec![PathBuf::from("roles")]);
        assert_eq!(s.output, PathBuf::from("ansible-roles.png"));
        assert_eq!(s.format, OutputFormat::Graphviz("png".into()));
        assert!(s.filter.is_empty());
    }

    #[test]
    fn command_line_beats_config_and_exclusions_merge() {
        let cfg: Config = toml::from_str(
            "output = 'from-config.svg'\nformat = 'svg'\nexclude = ['ntp']\ntargets = ['site.yml']\n[dot]\nrankdir = 'LR'\nlegend = true\n",
        )
        .unwrap();

        let s = resolve_settings(&cli(&[]), Some(&cfg)).unwrap();
        assert_eq!(s.targets, vec![PathBuf::from("site.yml")]);
        assert_eq!(s.output, PathBuf::from("from-config.svg"));
        assert_eq!(s.format, OutputFormat::Graphviz("svg".into()));
        assert_eq!(s.dot.rankdir, RankDir::LR);
        assert!(s.dot.legend);

        let s = resolve_settings(
            &cli(&["-o", "g.dot", "-f", "dot", "-x", "common", "--rankdir", "TB", "roles"]),
            Some(&cfg),
        )
        .unwrap();
        assert_eq!(s.targets, vec![PathBuf::from("roles")]);
        assert_eq!(s.output, PathBuf::from("g.dot"));
        assert_eq!(s.format, OutputFormat::Dot);
        assert!(s.filter.contains("common") && s.filter.contains("ntp"));
        assert_eq!(s.dot.rankdir, RankDir::TB);
    }

    #[test]
    fn output_without_extension_needs_a_format() {
        assert!(resolve_settings(&cli(&["-o", "graph"]), None).is_err());
        let s = resolve_settings(&cli(&["-o", "graph", "-f", "json"]), None).unwrap();
        assert_eq!(s.format, OutputFormat::Json);
    }
}
