use serde::Serialize;
use std::path::PathBuf;

/// A file the locator believes may hold an auth configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigCandidate {
    pub path: PathBuf,
    /// Directory levels below the scan root.
    pub depth: usize,
    pub size: u64,
    /// The file calls `betterAuth(`.
    pub has_better_auth: bool,
    pub error: Option<String>,
}

impl ConfigCandidate {
    pub fn new(path: PathBuf, depth: usize) -> Self {
        Self {
            path,
            depth,
            size: 0,
            has_better_auth: false,
            error: None,
        }
    }

    pub fn with_error(path: PathBuf, depth: usize, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(path, depth)
        }
    }
}
