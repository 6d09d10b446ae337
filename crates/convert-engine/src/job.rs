//! Scoped per-request conversion job.
//!
//! A job owns a fresh working directory under the configured temp root.
//! The directory and everything in it are removed when the job is closed
//! or dropped, so no exit path leaves files behind.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::ConversionError;
use crate::filesystem::FsUtils;
use crate::template::base_name;

/// Subdirectory holding the uploaded file, kept apart from tool outputs.
const INPUT_DIR: &str = "in";

/// An in-flight conversion's working area.
#[derive(Debug)]
pub struct ConversionJob {
    dir: TempDir,
    input_path: PathBuf,
}

impl ConversionJob {
    /// Create a job directory under `temp_root` for an upload named `upload_name`.
    ///
    /// The upload name is sanitised before it is used as a path component.
    pub async fn create(temp_root: &Path, upload_name: &str) -> Result<Self, ConversionError> {
        tokio::fs::create_dir_all(temp_root).await?;

        let dir = tempfile::Builder::new()
            .prefix("convert-")
            .tempdir_in(temp_root)?;

        let input_dir = dir.path().join(INPUT_DIR);
        tokio::fs::create_dir(&input_dir).await?;

        let input_path = input_dir.join(FsUtils::sanitize_file_name(upload_name));
        debug!(job_dir = %dir.path().display(), "Created conversion job directory");

        Ok(Self { dir, input_path })
    }

    /// Write the uploaded bytes to the input path.
    pub async fn write_input(&self, data: &[u8]) -> Result<(), ConversionError> {
        tokio::fs::write(&self.input_path, data).await?;
        Ok(())
    }

    /// The working directory tools write into.
    pub fn workdir(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of the uploaded file.
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Base name (sanitised upload name without extension).
    pub fn base(&self) -> String {
        base_name(&self.input_path)
    }

    /// Remove the job directory now.
    ///
    /// Removal errors are logged; dropping the inner `TempDir` afterwards
    /// retries whatever is left.
    pub async fn close(self) {
        let path = self.dir.path();
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => debug!(job_dir = %path.display(), "Removed conversion job directory"),
            Err(e) => warn!(
                job_dir = %path.display(),
                error = %e,
                "Failed to clean up job directory"
            ),
        }
    }
}
