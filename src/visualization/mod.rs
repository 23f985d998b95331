use crate::errors::GraphError;
use crate::graph::{EdgeKind, NodeKind, RolesGraph};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotTheme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir {
    LR,
    TB,
}

#[derive(Debug, Clone, Copy)]
pub struct DotOptions {
    pub rankdir: RankDir,
    pub theme: DotTheme,
    pub legend: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self { rankdir: RankDir::TB, theme: DotTheme::Light, legend: false }
    }
}

#[derive(Debug, Default)]
pub struct DotGenerator;

impl DotGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    #[must_use]
    pub fn generate_dot(&self, graph: &RolesGraph) -> String {
        self.generate_dot_with_options(graph, DotOptions::default())
    }

    /// Serialise `graph` to Graphviz DOT. Nodes and edges keep discovery order.
    #[must_use]
    pub fn generate_dot_with_options(&self, graph: &RolesGraph, opts: DotOptions) -> String {
        let mut s = String::new();
        s.push_str("digraph roles\n{\n");
        let rank = match opts.rankdir {
            RankDir::LR => "LR",
            RankDir::TB => "TB",
        };
        let _ = write!(
            s,
            "  rankdir={rank};\n  graph [fontname=Helvetica] ;\n  node [fontname=Helvetica, fontsize=10, style=filled] ;\n  edge [fontname=Helvetica, fontsize=9];\n"
        );

        for node in graph.nodes() {
            let (fill, shape) = style_for_kind(node.kind, opts.theme);
            let id = escape_label(&node.name);
            let _ = writeln!(s, "  \"{id}\" [label=\"{id}\", fillcolor=\"{fill}\", shape=\"{shape}\"];");
        }

        for edge in graph.edges() {
            let (color, style) = style_for_edge(edge.kind);
            let _ = writeln!(
                s,
                "  \"{}\" -> \"{}\" [color=\"{color}\", style=\"{style}\", tooltip=\"{}\"];",
                escape_label(&edge.from),
                escape_label(&edge.to),
                edge.kind.as_str()
            );
        }

        if opts.legend {
            s.push_str("  subgraph cluster_legend {\n    label=\"Legend\";\n    color=grey;\n");
            for (label, kind) in [("Role", NodeKind::Role), ("Playbook", NodeKind::Playbook)] {
                let (fill, shape) = style_for_kind(kind, opts.theme);
                let _ = writeln!(
                    s,
                    "    \"__legend_{label}\" [label=\"{label}\", fillcolor=\"{fill}\", shape=\"{shape}\"];"
                );
            }
            s.push_str("  }\n");
        }

        s.push_str("}\n");
        s
    }
}

/// Target artifact kind, usually inferred from the output file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// DOT source, written as-is.
    Dot,
    /// Node/edge description as JSON.
    Json,
    /// Any other format is laid out and rendered by Graphviz (`dot -T<format>`).
    Graphviz(String),
}

impl OutputFormat {
    #[must_use]
    pub fn parse(format: &str) -> Self {
        let format = format.trim().to_ascii_lowercase();
        match format.as_str() {
            "dot" | "gv" => OutputFormat::Dot,
            "json" => OutputFormat::Json,
            _ => OutputFormat::Graphviz(format),
        }
    }

    /// Use `explicit` when given, otherwise the extension of `output`.
    ///
    /// # Errors
    /// Returns `GraphError::Render` when neither yields a format.
    pub fn resolve(explicit: Option<&str>, output: &Path) -> Result<Self, GraphError> {
        let format = explicit
            .filter(|f| !f.trim().is_empty())
            .map(str::to_string)
            .or_else(|| output.extension().map(|e| e.to_string_lossy().into_owned()))
            .filter(|f| !f.is_empty());
        match format {
            Some(f) => Ok(Self::parse(&f)),
            None => Err(GraphError::Render(format!(
                "cannot infer output format from '{}'; pass --format",
                output.display()
            ))),
        }
    }
}

/// Writes the finished graph to disk, delegating layout to Graphviz when needed.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub dot_binary: PathBuf,
    pub options: DotOptions,
}

impl Default for Renderer {
    fn default() -> Self {
        Self { dot_binary: PathBuf::from("dot"), options: DotOptions::default() }
    }
}

impl Renderer {
    #[must_use]
    pub fn new(dot_binary: impl Into<PathBuf>, options: DotOptions) -> Self {
        Self { dot_binary: dot_binary.into(), options }
    }

    /// # Errors
    /// `GraphError::Io` if the output cannot be written, `GraphError::Render` if
    /// Graphviz cannot be run or exits unsuccessfully.
    pub fn render(
        &self,
        graph: &RolesGraph,
        format: &OutputFormat,
        output: &Path,
    ) -> Result<(), GraphError> {
        match format {
            OutputFormat::Json => graph.save_json(output),
            OutputFormat::Dot => {
                let dot = DotGenerator::new().generate_dot_with_options(graph, self.options);
                std::fs::write(output, dot)?;
                Ok(())
            }
            OutputFormat::Graphviz(fmt) => self.run_graphviz(graph, fmt, output),
        }
    }

    fn run_graphviz(&self, graph: &RolesGraph, fmt: &str, output: &Path) -> Result<(), GraphError> {
        let dot = DotGenerator::new().generate_dot_with_options(graph, self.options);
        tracing::debug!(binary = %self.dot_binary.display(), format = fmt, "invoking graphviz");
        let mut child = std::process::Command::new(&self.dot_binary)
            .arg(format!("-T{fmt}"))
            .arg("-o")
            .arg(output)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| {
                GraphError::Render(format!(
                    "Failed to run graphviz '{}': {e}",
                    self.dot_binary.display()
                ))
            })?;
        // Graphviz may exit before reading all input; its stderr explains why.
        let write_result = match child.stdin.take() {
            Some(mut stdin) => {
                use std::io::Write;
                stdin.write_all(dot.as_bytes())
            }
            None => Ok(()),
        };
        let result = child.wait_with_output().map_err(|e| {
            GraphError::Render(format!("Failed to wait for graphviz: {e}"))
        })?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(GraphError::Render(format!(
                "Graphviz exited with code {:?}: {}",
                result.status.code(),
                stderr.trim()
            )));
        }
        if let Err(e) = write_result {
            return Err(GraphError::Render(format!("Failed to send graph to graphviz: {e}")));
        }
        Ok(())
    }
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn style_for_kind(kind: NodeKind, theme: DotTheme) -> (&'static str, &'static str) {
    match (theme, kind) {
        (DotTheme::Light, NodeKind::Role) => ("#e0f3ff", "ellipse"),
        (DotTheme::Light, NodeKind::Playbook) => ("#fff4e0", "parallelogram"),
        (DotTheme::Dark, NodeKind::Role) => ("#124559", "ellipse"),
        (DotTheme::Dark, NodeKind::Playbook) => ("#7a4c00", "parallelogram"),
    }
}

fn style_for_edge(kind: EdgeKind) -> (&'static str, &'static str) {
    match kind {
        EdgeKind::Dependency => ("#1f77b4", "solid"),
        EdgeKind::Include => ("#2ca02c", "dashed"),
        EdgeKind::Import => ("#7f7f7f", "bold"),
    }
}
