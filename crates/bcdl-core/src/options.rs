//! Immutable run options handed from the input-collection stage to the engine.

use std::path::{Path, PathBuf};

use crate::format::FileType;

/// Storefront account whose collection is downloaded.
///
/// `identity` is the long-lived session cookie value; how it was obtained is
/// not this crate's concern.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub identity: String,
}

impl User {
    pub fn new(username: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            identity: identity.into(),
        }
    }
}

// Keep the session credential out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("identity", &"<redacted>")
            .finish()
    }
}

/// Everything the user selected for one run. Built once, then passed by value.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub user: User,
    pub output_dir: PathBuf,
    pub file_type: FileType,
    /// Collection search text; empty means the whole collection.
    pub filter: String,
}

impl DownloadOptions {
    pub fn new(user: User, output_dir: impl Into<PathBuf>, file_type: FileType) -> Self {
        Self {
            user,
            output_dir: output_dir.into(),
            file_type,
            filter: String::new(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Hidden bookkeeping directory inside the output directory.
    pub fn state_dir(&self) -> PathBuf {
        state_dir_for(&self.output_dir)
    }

    /// Path of the dedup history file.
    pub fn history_path(&self) -> PathBuf {
        history_path_for(&self.output_dir)
    }
}

/// Name of the hidden bookkeeping directory.
pub const STATE_DIR_NAME: &str = ".bcdl";
/// Name of the history file inside [`STATE_DIR_NAME`].
pub const HISTORY_FILE_NAME: &str = "downloaded";

pub fn state_dir_for(output_dir: &Path) -> PathBuf {
    output_dir.join(STATE_DIR_NAME)
}

pub fn history_path_for(output_dir: &Path) -> PathBuf {
    state_dir_for(output_dir).join(HISTORY_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_lives_under_hidden_dir() {
        let opts = DownloadOptions::new(User::new("jbeard", "secret"), "/music", FileType::Flac);
        assert_eq!(opts.state_dir(), Path::new("/music/.bcdl"));
        assert_eq!(opts.history_path(), Path::new("/music/.bcdl/downloaded"));
        assert!(opts.filter.is_empty());
    }

    #[test]
    fn debug_redacts_identity() {
        let user = User::new("jbeard", "very-secret-cookie");
        let dbg = format!("{:?}", user);
        assert!(dbg.contains("jbeard"));
        assert!(!dbg.contains("very-secret-cookie"));
    }
}
