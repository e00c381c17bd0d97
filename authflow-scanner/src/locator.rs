use crate::error::{Result, StoreError};
use crate::result::ConfigCandidate;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEEP_MAX_DEPTH: usize = 8;

/// Directories never worth descending into.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", ".next", "dist", "build", "target"];

/// File names that may hold an auth configuration.
pub const CONFIG_FILE_NAMES: &[&str] = &["auth.ts", "auth.js", "auth.mjs", "auth.cjs"];

const CONFIG_MARKER: &str = "betterAuth(";

/// Breadth-first search of a project tree for auth configuration files.
pub struct Locator {
    max_depth: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Locator {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_deep_scan(self, deep: bool) -> Self {
        self.with_max_depth(if deep { DEEP_MAX_DEPTH } else { DEFAULT_MAX_DEPTH })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Candidates under `root`, files calling `betterAuth(` first, then by
    /// depth and path. Unreadable subdirectories are skipped with a warning;
    /// an unreadable `root` is an error.
    pub async fn locate(&self, root: &Path) -> Result<Vec<ConfigCandidate>> {
        info!("Locating auth config under {} (depth {})", root.display(), self.max_depth);

        let metadata = tokio::fs::metadata(root)
            .await
            .map_err(|e| StoreError::from_io(root, e))?;
        if !metadata.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let mut queue: VecDeque<(PathBuf, usize)> = VecDeque::new();
        queue.push_back((root.to_path_buf(), 0));
        let mut candidates = Vec::new();
        let mut dirs_visited = 0;

        while let Some((dir, depth)) = queue.pop_front() {
            dirs_visited += 1;
            if let Some(ref callback) = self.progress_callback {
                callback(dirs_visited, dir.display().to_string());
            }

            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if depth == 0 => return Err(StoreError::from_io(&dir, e)),
                Err(e) => {
                    warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            let mut children = Vec::new();
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Error listing {}: {}", dir.display(), e);
                        break;
                    }
                };
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();

                if file_type.is_dir() {
                    if depth < self.max_depth && !SKIPPED_DIRS.contains(&name.as_str()) {
                        children.push(path);
                    }
                } else if file_type.is_file() && CONFIG_FILE_NAMES.contains(&name.as_str()) {
                    candidates.push(Self::inspect(path, depth).await);
                }
            }

            // read_dir order is platform dependent
            children.sort();
            queue.extend(children.into_iter().map(|child| (child, depth + 1)));
        }

        candidates.sort_by(|a, b| {
            b.has_better_auth
                .cmp(&a.has_better_auth)
                .then(a.depth.cmp(&b.depth))
                .then_with(|| a.path.cmp(&b.path))
        });

        info!(
            "Found {} candidate(s) in {} directories",
            candidates.len(),
            dirs_visited
        );
        Ok(candidates)
    }

    async fn inspect(path: PathBuf, depth: usize) -> ConfigCandidate {
        debug!("Inspecting {}", path.display());
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => ConfigCandidate {
                size: content.len() as u64,
                has_better_auth: content.contains(CONFIG_MARKER),
                ..ConfigCandidate::new(path, depth)
            },
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                ConfigCandidate::with_error(path, depth, e.to_string())
            }
        }
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}
