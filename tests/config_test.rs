// tests/config_test.rs
use gitversion::config::{load_config, Config, IncrementStrategy, VersioningMode, CONFIG_FILE_NAME};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.label_prefix, "[vV]?");
    assert_eq!(config.label_pre_release_weight, 60000);
    assert_eq!(config.next_version, None);

    let develop = config.archetype_configuration("develop");
    assert_eq!(develop.increment, Some(IncrementStrategy::Minor));
    assert_eq!(develop.label.as_deref(), Some("alpha"));
    assert_eq!(develop.mode, Some(VersioningMode::ContinuousDeployment));
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
label_prefix = "release-"
next_version = "2.0"

[branches.main]
increment = "minor"

[branches.experiment]
regex = "^exp/"
label = "exp"
source_branches = ["main"]

[overrides."feature/legacy"]
label = "legacy"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.label_prefix, "release-");
    assert_eq!(config.next_version.as_deref(), Some("2.0"));

    let main = config.archetype_configuration("main");
    assert_eq!(main.increment, Some(IncrementStrategy::Minor));
    // Unmentioned settings keep their defaults
    assert_eq!(main.is_mainline, Some(true));

    let experiment = config.archetype_configuration("experiment");
    assert_eq!(experiment.label.as_deref(), Some("exp"));
    // Global defaults fill in what the new archetype leaves out
    assert_eq!(experiment.increment, Some(IncrementStrategy::Inherit));

    assert_eq!(
        config.overrides["feature/legacy"].label.as_deref(),
        Some("legacy")
    );
}

#[test]
fn test_missing_explicit_file_is_error() {
    let err = load_config(Some("/nonexistent/gitversion.toml")).unwrap_err();
    assert!(
        err.to_string().contains("I/O error"),
        "Expected an I/O error, got: {}",
        err
    );
}

#[test]
fn test_malformed_file_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[branches.main\nincrement = 3").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.is_config(), "Expected a config error, got: {}", err);
}

#[test]
#[serial]
fn test_discovers_file_in_current_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[branches.develop]\nlabel = \"nightly\"\n",
    )
    .unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(temp_dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original_dir).unwrap();

    let config = result.expect("config in current directory should load");
    assert_eq!(
        config.archetype_configuration("develop").label.as_deref(),
        Some("nightly")
    );
}

#[test]
#[serial]
fn test_falls_back_to_defaults_without_file() {
    let temp_dir = TempDir::new().unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(temp_dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original_dir).unwrap();

    // A user-level file may exist on the machine running the tests, so only
    // check that loading succeeds and the built-in archetypes are present.
    let config = result.expect("defaults should load");
    for name in ["main", "develop", "release", "feature", "unknown"] {
        assert!(config.branches.contains_key(name), "missing archetype {}", name);
    }
}
