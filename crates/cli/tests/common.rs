#![allow(unused)]

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use cfgopen_util::{TempDir, temp_dir};
use std::{fs, path::PathBuf};

/// Get a command to run cfgopen. The config file is pointed into a fresh
/// temporary directory, which is also returned. Most tests can just ignore it.
pub fn cfgopen() -> (Command, TempDir) {
    let dir = temp_dir();
    let mut command = cargo_bin_cmd!("cfgopen_cli");
    command.env("CFGOPEN_CONFIG_PATH", config_path(&dir));
    (command, dir)
}

/// Get a command to run cfgopen, with the given config file content
pub fn cfgopen_with_config(content: &str) -> (Command, TempDir) {
    let (command, dir) = cfgopen();
    fs::write(config_path(&dir), content).unwrap();
    (command, dir)
}

/// Path to the config file used by [cfgopen]
pub fn config_path(dir: &TempDir) -> PathBuf {
    dir.join("config.yml")
}

/// Point `PATH` at an empty directory, so no opener or editor program can be
/// found and every open attempt fails
pub fn without_programs(command: &mut Command, dir: &TempDir) {
    let bin = dir.join("empty-bin");
    fs::create_dir_all(&bin).unwrap();
    command.env("PATH", bin);
}
