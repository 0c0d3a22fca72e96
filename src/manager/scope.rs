//! System-wide vs per-user manager scope.

use std::path::{Path, PathBuf};

use crate::service_file::normalize_unit_name;

/// Directory holding system-wide unit files.
pub const SYSTEM_UNIT_DIR: &str = "/etc/systemd/system/";

/// Per-user unit-file directory, relative to the home directory.
const USER_UNIT_DIR: &str = ".local/share/systemd/user/";

/// Immutable per-instance configuration: which unit-file directory to use
/// and whether invocations get `--user` appended.
#[derive(Debug, Clone)]
pub struct Scope {
    dir: PathBuf,
    user: bool,
}

impl Scope {
    /// System-wide scope rooted at `/etc/systemd/system/`.
    pub fn system() -> Self {
        Self {
            dir: PathBuf::from(SYSTEM_UNIT_DIR),
            user: false,
        }
    }

    /// Per-user scope rooted under the invoking user's home directory.
    pub fn user() -> Self {
        Self {
            dir: resolve_user_dir(),
            user: true,
        }
    }

    /// Scope with an explicit unit-file directory. An empty directory is
    /// re-derived from the user flag.
    pub fn custom(dir: impl Into<PathBuf>, user: bool) -> Self {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            if user {
                Self::user()
            } else {
                Self::system()
            }
        } else {
            Self { dir, user }
        }
    }

    /// The unit-file directory for this scope.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether invocations run in user mode (`--user`).
    pub fn is_user(&self) -> bool {
        self.user
    }

    /// Full path of a unit file in this scope, with the `.service`
    /// suffix appended when absent.
    pub fn unit_path(&self, name: &str) -> PathBuf {
        self.dir.join(normalize_unit_name(name))
    }
}

fn resolve_user_dir() -> PathBuf {
    // Falls back to a literal "~" when the home directory is unresolvable.
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(USER_UNIT_DIR)
}
