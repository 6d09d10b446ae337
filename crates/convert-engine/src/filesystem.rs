//! Filesystem helpers for the conversion pipeline.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Filesystem utility functions.
pub struct FsUtils;

impl FsUtils {
    /// Longest file name kept after sanitising.
    const MAX_NAME_LEN: usize = 200;
    /// Name used when nothing usable remains.
    const FALLBACK_NAME: &'static str = "upload";

    /// Reduce a client-supplied file name to a safe single path component.
    ///
    /// Directory parts are discarded, whitespace becomes `_`, characters
    /// other than ASCII alphanumerics, `-`, `_` and `.` are dropped, and
    /// leading dots are removed so the result is never hidden or `..`.
    pub fn sanitize_file_name(name: &str) -> String {
        let last = name.rsplit(['/', '\\']).next().unwrap_or(name);

        let sanitized: String = last
            .chars()
            .filter_map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    Some(c)
                } else if c.is_whitespace() {
                    Some('_')
                } else {
                    None
                }
            })
            .take(Self::MAX_NAME_LEN)
            .collect();

        let trimmed = sanitized.trim_start_matches('.');
        if trimmed.is_empty() {
            Self::FALLBACK_NAME.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Find a regular file in `dir` named `{base}.<anything>`.
    ///
    /// Some tools pick their own suffix. When several files match, the
    /// most recently modified one wins; equal times fall back to the
    /// lexicographically smallest name so the choice is deterministic.
    pub async fn find_by_base(dir: &Path, base: &str) -> std::io::Result<Option<PathBuf>> {
        let prefix = format!("{base}.");
        let mut best: Option<(SystemTime, String, PathBuf)> = None;

        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(&prefix) || name.len() == prefix.len() {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

            let better = match &best {
                None => true,
                Some((best_time, best_name, _)) => {
                    modified > *best_time || (modified == *best_time && name < *best_name)
                }
            };
            if better {
                best = Some((modified, name, entry.path()));
            }
        }

        Ok(best.map(|(_, _, path)| path))
    }
}
