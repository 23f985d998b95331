use ansible_roles_graph::utils::config::{self};
use std::fs;
use std::path::Path;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    fs::write(path, content).unwrap();
}

#[test]
fn parses_full_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_path = tmp.path().join("graph.toml");
    let data = r#"
targets = ["roles", "site.yml"]
output = "roles.svg"
format = "svg"
exclude = ["common", "ntp"]

[dot]
rankdir = "LR"
theme = "dark"
legend = true
"#;
    write(&cfg_path, data);

    let cfg = config::load_config_at(&cfg_path).expect("config parsed");
    assert_eq!(cfg.targets, Some(vec!["roles".to_string(), "site.yml".to_string()]));
    assert_eq!(cfg.output.as_deref(), Some("roles.svg"));
    assert_eq!(cfg.format.as_deref(), Some("svg"));
    assert_eq!(cfg.exclude, Some(vec!["common".to_string(), "ntp".to_string()]));
    assert_eq!(cfg.dot.as_ref().and_then(|d| d.rankdir.as_deref()), Some("LR"));
    assert_eq!(cfg.dot.as_ref().and_then(|d| d.theme.as_deref()), Some("dark"));
    assert_eq!(cfg.dot.as_ref().and_then(|d| d.legend), Some(true));
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_path = tmp.path().join("graph.toml");
    write(&cfg_path, "exclude = 'not-a-list'\n");
    assert!(config::load_config_at(&cfg_path).is_none());
}

#[test]
fn load_config_near_looks_for_default_name() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(config::load_config_near(tmp.path()).is_none());

    write(&tmp.path().join(config::DEFAULT_CONFIG_NAME), "output = 'x.pdf'\n");
    let cfg = config::load_config_near(tmp.path()).expect("found default config");
    assert_eq!(cfg.output, Some("x.pdf".to_string()));
}
