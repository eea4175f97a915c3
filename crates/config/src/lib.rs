//! Configuration for cfgopen itself: which file `cfgopen edit` opens by
//! default, which extension's OS association gets inspected, and which editor
//! to fall back to when that association is unsafe.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `cfgopen` crate version. If you choose to depend directly on this crate, you
//! do so at your own risk of breakage.

use anyhow::Context;
use cfgopen_util::{
    ResultTracedAnyhow,
    paths::{self, create_parent, expand_home},
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    fmt::Write,
    fs::{self, OpenOptions},
    path::PathBuf,
};
use tracing::info;

const PATH_ENV_VAR: &str = "CFGOPEN_CONFIG_PATH";
const FILE: &str = "config.yml";

/// App-level configuration. This is loaded once at startup; changes to the
/// file are picked up on the next invocation.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Configuration file opened by `cfgopen edit` when no path is given. A
    /// leading `~` is expanded to the home directory.
    pub file: PathBuf,
    /// Extension whose OS association is inspected before opening. This is
    /// fixed for the session; it is *not* taken from the opened file.
    pub extension: String,
    /// Program and leading arguments of the editor used when the OS default
    /// handler is unsafe. The file path is appended as the final argument.
    pub fallback_editor: Vec<String>,
}

impl Config {
    /// Path to the configuration file, in this precedence:
    /// - Value of `$CFGOPEN_CONFIG_PATH`
    /// - `$CONFIG_DIR/cfgopen/config.yml`, where `$CONFIG_DIR` is defined by
    ///   [dirs::config_dir]
    pub fn path() -> PathBuf {
        if let Ok(path) = env::var(PATH_ENV_VAR) {
            return expand_home(PathBuf::from(path)).into_owned();
        }
        paths::config_directory().join(FILE)
    }

    /// Load configuration from the file, if present. If not, create an empty
    /// file and return the default value. This only returns an error if the
    /// file couldn't be opened or its contents are invalid.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path();
        create_parent(&path)?;

        info!(?path, "Loading configuration file");

        (|| {
            // Create the file if it doesn't exist, but never truncate it
            OpenOptions::new().create(true).append(true).open(&path)?;
            let content = fs::read_to_string(&path)?;
            Self::parse(&content)
        })()
        .with_context(|| {
            format!("Error loading configuration from `{}`", path.display())
        })
        .traced()
    }

    /// Parse config from YAML. A document with no content (empty, or only
    /// comments) yields the default config.
    fn parse(content: &str) -> anyhow::Result<Self> {
        let is_blank = content
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'));
        if is_blank {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Commented template for a new config file. Every field is commented out,
    /// so it loads as the default config.
    pub fn default_content() -> String {
        let header = format!(
            "# cfgopen configuration. Uncomment a field to override it.\n\
            # Path: {path}\n",
            path = Self::path().display(),
        );
        serde_yaml::to_string(&Self::default())
            .unwrap_or_default()
            .lines()
            .fold(header, |mut content, line| {
                // Writing to a String can't fail
                let _ = writeln!(content, "# {line}");
                content
            })
    }

    /// Get the default file to edit, with `~` expanded
    pub fn file(&self) -> PathBuf {
        expand_home(&self.file).into_owned()
    }

    /// Get the inspected extension, normalized to include the leading dot
    pub fn extension(&self) -> String {
        if self.extension.starts_with('.') {
            self.extension.clone()
        } else {
            format!(".{}", self.extension)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // `notepad.exe` ships with every Windows install and is resolved via
        // PATH, so we never need a hardcoded location
        Self {
            file: PathBuf::from("~/.hyper.js"),
            extension: ".js".into(),
            fallback_editor: vec!["notepad.exe".into()],
        }
    }
}
