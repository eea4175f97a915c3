use path_clean::PathClean;
use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

/// Lock for the log file path. A random file name is generated once during
/// startup, then used for that session
static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Get the path of the directory to contain the config file. **Directory may
/// not exist yet**, caller must create it.
pub fn config_directory() -> PathBuf {
    // Config dir will be present on all supported platforms
    // https://docs.rs/dirs/latest/dirs/fn.config_dir.html
    debug_or(dirs::config_dir().unwrap_or_else(fallback_root).join("cfgopen"))
}

/// Get the path of the directory for data files (e.g. the dev log file).
/// **Directory may not exist yet**, caller must create it.
pub fn data_directory() -> PathBuf {
    debug_or(dirs::data_dir().unwrap_or_else(fallback_root).join("cfgopen"))
}

/// Get the path to the log file. Each session gets a unique file within a
/// temporary directory. The parent directory **may not exist yet.** Caller must
/// ensure it is created.
pub fn log_file() -> PathBuf {
    LOG_FILE
        .get_or_init(|| {
            // Use a static file in dev for easier access
            #[cfg(debug_assertions)]
            {
                data_directory().join("cfgopen.log")
            }
            #[cfg(not(debug_assertions))]
            {
                use std::env;
                use uuid::Uuid;

                let directory = env::temp_dir();
                // Temp dir isn't guaranteed to be unique, so make sure the file
                // name is
                let file_name = format!("cfgopen-{}.log", Uuid::new_v4());
                directory.join(file_name)
            }
        })
        .clone()
}

/// Used when the platform reports no config/data directory at all (e.g. no
/// `$HOME` on a bare container). The temp dir always exists.
fn fallback_root() -> PathBuf {
    std::env::temp_dir()
}

/// In debug mode, use a local directory for all files. In release, use the
/// given path.
fn debug_or(path: PathBuf) -> PathBuf {
    #[cfg(debug_assertions)]
    {
        let _ = path; // Remove unused warning
        get_repo_root().join("data/")
    }
    #[cfg(not(debug_assertions))]
    {
        path
    }
}

/// Ensure the parent directory of a file path exists
pub fn create_parent(path: &Path) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "Cannot create directory for path {path}; it has no parent",
                path = path.display()
            ),
        )
    })?;
    fs::create_dir_all(parent)
}

/// Get path to the root of the workspace. This crate lives at
/// `crates/util`, so the root is two levels above its manifest. Only used in
/// debug builds, which always run from a checkout.
#[cfg(any(debug_assertions, test))]
pub fn get_repo_root() -> &'static Path {
    static CACHE: OnceLock<PathBuf> = OnceLock::new();

    CACHE.get_or_init(|| {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").clean()
    })
}

/// Expand a leading `~` in a path into the user's home directory. Only expand
/// if the `~` is the sole component, or trailed by a slash. In other words,
/// `~test.txt` will *not* be expanded. Given path will be cloned only if it is
/// expanded.
pub fn expand_home<'a>(path: impl Into<Cow<'a, Path>>) -> Cow<'a, Path> {
    let path: Cow<_> = path.into();
    match path.strip_prefix("~") {
        Ok(rest) => {
            let Some(home_dir) = dirs::home_dir() else {
                return path;
            };
            home_dir.join(rest).into()
        }
        Err(_) => path,
    }
}

/// Normalize a file path given by the user, ensuring it is absolute and cannot
/// have any equivalent aliases (barring the existence of symlinks). This will:
/// - Make the path absolute by joining it with the given base path. If it's
///   already absolute, this will have no effect
/// - Expand a leading `~` to the home directory
/// - "Clean" the path by resolving `.` and `..` segments
///
/// This will *not* touch the filesystem in any way and therefore is infallible.
pub fn normalize_path(base_dir: &Path, file: &Path) -> PathBuf {
    base_dir.join(expand_home(file)).clean()
}
