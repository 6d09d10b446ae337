//! Conversion invoker: descriptor + input file → output file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use convert_core::types::ConverterDescriptor;
use tracing::{info, instrument, warn};

use crate::error::ConversionError;
use crate::executor::ProcessExecutor;
use crate::filesystem::FsUtils;
use crate::template::{ResolvedCommand, ResolvedPaths, base_name};

/// Outcome of a successful invocation.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    /// Path of the produced file.
    pub output_path: PathBuf,
    /// Size of the produced file in bytes.
    pub output_size: u64,
    /// Whether the output was found by the `{base}.*` scan rather than at
    /// the expected path.
    pub found_by_scan: bool,
    /// Tool run time.
    pub duration_ms: u64,
}

/// Runs a converter against one input and locates its output.
///
/// The invoker keeps no per-request state; one instance serves every
/// request concurrently.
#[derive(Debug, Clone)]
pub struct ConversionInvoker {
    executor: ProcessExecutor,
    min_output_bytes: u64,
}

impl ConversionInvoker {
    /// Create an invoker with the given timeout and minimum output size.
    pub fn new(timeout: Duration, min_output_bytes: u64) -> Self {
        Self {
            executor: ProcessExecutor::new(timeout),
            min_output_bytes,
        }
    }

    /// The per-run timeout.
    pub fn timeout(&self) -> Duration {
        self.executor.timeout()
    }

    /// Convert `input` with `descriptor`, writing into `workdir`.
    ///
    /// The output is expected at `{workdir}/{base}.{ext}`. When the tool
    /// exits successfully but chose a different suffix, the newest
    /// `{workdir}/{base}.*` file is used instead.
    #[instrument(skip(self, descriptor), fields(converter = %descriptor.name))]
    pub async fn invoke(
        &self,
        descriptor: &ConverterDescriptor,
        input: &Path,
        workdir: &Path,
    ) -> Result<InvocationResult, ConversionError> {
        let paths = ResolvedPaths::new(input, workdir, &descriptor.output_extension);
        let command = ResolvedCommand::resolve(descriptor, &paths);

        info!(command = %command, "Running converter");
        let process = self.executor.run(&command, workdir).await?;

        let (output_path, found_by_scan) = self.locate_output(&paths, input, workdir).await?;

        let output_size = tokio::fs::metadata(&output_path).await?.len();
        if output_size < self.min_output_bytes {
            warn!(
                output = %output_path.display(),
                size = output_size,
                min = self.min_output_bytes,
                "Converter produced an undersized output"
            );
            return Err(ConversionError::OutputTooSmall {
                path: output_path,
                size: output_size,
            });
        }

        info!(
            output = %output_path.display(),
            size = output_size,
            duration_ms = process.duration_ms,
            found_by_scan,
            "Converter finished"
        );

        Ok(InvocationResult {
            output_path,
            output_size,
            found_by_scan,
            duration_ms: process.duration_ms,
        })
    }

    async fn locate_output(
        &self,
        paths: &ResolvedPaths,
        input: &Path,
        workdir: &Path,
    ) -> Result<(PathBuf, bool), ConversionError> {
        if tokio::fs::try_exists(&paths.output).await? {
            return Ok((paths.output.clone(), false));
        }

        let base = base_name(input);
        match FsUtils::find_by_base(workdir, &base).await? {
            Some(found) if found != input => {
                info!(
                    expected = %paths.output.display(),
                    found = %found.display(),
                    "Output found under a different suffix"
                );
                Ok((found, true))
            }
            _ => Err(ConversionError::OutputMissing {
                expected: paths.output.clone(),
            }),
        }
    }
}
