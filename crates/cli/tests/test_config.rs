//! Test the `cfgopen config` subcommand

mod common;

use cfgopen_config::Config;
use predicates::{prelude::predicate, str::PredicateStrExt};
#[cfg(not(windows))]
use pretty_assertions::assert_eq;
#[cfg(not(windows))]
use rstest::rstest;
#[cfg(not(windows))]
use std::fs;

/// `cfgopen config` prints the loaded config in YAML
#[test]
fn test_print_config() {
    let (mut command, dir) = common::cfgopen();
    command.args(["config"]);
    // There's no config file in the temp dir, so we'll just see the default
    let expected = serde_yaml::to_string(&Config::default()).unwrap();
    command.assert().success().stdout(predicate::eq(expected));
    // Loading creates the file
    assert!(common::config_path(&dir).is_file());
}

/// Overridden fields show up in the printed config
#[test]
fn test_print_config_custom() {
    let (mut command, _dir) =
        common::cfgopen_with_config("fallback_editor: [code, --wait]\n");
    command.args(["config"]);
    command
        .assert()
        .success()
        .stdout(predicate::str::contains("- code"))
        .stdout(predicate::str::contains("extension: .js"));
}

/// `cfgopen config` fails on an invalid config file
#[test]
fn test_print_config_invalid() {
    let (mut command, _dir) = common::cfgopen_with_config("editor: vim\n");
    command.args(["config"]);
    command
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error loading configuration"))
        .stderr(predicate::str::contains("unknown field `editor`"));
}

/// `cfgopen config --path` prints the config path
#[test]
fn test_print_path() {
    let (mut command, dir) = common::cfgopen();
    command.args(["config", "--path"]);
    let expected = common::config_path(&dir).display().to_string();
    command
        .assert()
        .success()
        .stdout(predicate::eq(expected).trim());
}

/// `cfgopen config --edit` fills an empty config file with the documented
/// template before opening it
#[cfg(not(windows))]
#[rstest]
#[case::missing(None)]
#[case::empty(Some(""))]
fn test_edit_writes_template(#[case] initial: Option<&str>) {
    let (mut command, dir) = match initial {
        Some(content) => common::cfgopen_with_config(content),
        None => common::cfgopen(),
    };
    common::without_programs(&mut command, &dir);
    command.args(["config", "--edit"]);
    command
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not open"));

    let path = common::config_path(&dir);
    let written = fs::read_to_string(&path).unwrap();
    assert!(
        written.starts_with("# cfgopen configuration."),
        "Unexpected content: {written:?}"
    );
    assert!(written.contains(&format!("# Path: {}\n", path.display())));
    assert!(written.contains("# fallback_editor:\n"));
}

/// `cfgopen config --edit` never replaces existing content, even if it isn't
/// valid config or valid UTF-8
#[cfg(not(windows))]
#[rstest]
#[case::valid(b"fallback_editor: [vim]\n")]
#[case::invalid(b"editor: vim\n")]
#[case::not_utf8(b"# caf\xe9 latin-1 comment\nfile: ~/.hyper.js\n")]
#[case::comments_only(b"# nothing here yet\n")]
fn test_edit_keeps_existing_content(#[case] content: &[u8]) {
    let (mut command, dir) = common::cfgopen();
    let path = common::config_path(&dir);
    fs::write(&path, content).unwrap();
    common::without_programs(&mut command, &dir);
    command.args(["config", "--edit"]);
    command
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not open"));
    assert_eq!(fs::read(&path).unwrap(), content);
}
