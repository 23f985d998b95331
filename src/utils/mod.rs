pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const DEFAULT_CONFIG_NAME: &str = "ansible-roles-graph.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct DotConfig {
        pub rankdir: Option<String>, // "LR" | "TB"
        pub theme: Option<String>,   // "light" | "dark"
        pub legend: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub targets: Option<Vec<String>>,
        pub output: Option<String>,
        pub format: Option<String>,
        pub exclude: Option<Vec<String>>,
        pub dot: Option<DotConfig>,
    }

    fn default_config_path(root: &Path) -> PathBuf {
        root.join(DEFAULT_CONFIG_NAME)
    }

    /// Load a TOML config file. Missing or unparsable files yield `None`.
    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = fs::read_to_string(path).ok()?;
        match toml::from_str::<Config>(&data) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    #[must_use]
    pub fn load_config_near(root: &Path) -> Option<Config> {
        let p = default_config_path(root);
        if p.exists() {
            load_config_at(&p)
        } else {
            None
        }
    }
}

pub mod file_walker {
    use crate::errors::GraphError;
    use std::path::{Path, PathBuf};

    /// Immediate, non-hidden child directories of `root`, sorted by name.
    /// Symlinked role directories are followed.
    ///
    /// # Errors
    /// `GraphError::Io` if `root` or one of its entries cannot be read.
    pub fn child_dirs(root: &Path) -> Result<Vec<PathBuf>, GraphError> {
        let mut dirs = Vec::new();
        let walker =
            walkdir::WalkDir::new(root).min_depth(1).max_depth(1).follow_links(true).sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_dir() && !entry.file_name().to_string_lossy().starts_with('.') {
                dirs.push(entry.into_path());
            }
        }
        Ok(dirs)
    }

}
