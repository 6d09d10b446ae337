//! Request-level conversion service.
//!
//! Ties the registry, a scoped job directory and the invoker together:
//! one uploaded file in, one converted file out, nothing left on disk.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use convert_core::config::ConverterConfig;
use tracing::{info, instrument, warn};

use crate::error::ConversionError;
use crate::invoker::ConversionInvoker;
use crate::job::ConversionJob;
use crate::metrics::ConversionMetrics;
use crate::registry::ConverterRegistry;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name, unsanitised.
    pub file_name: String,
    /// File contents.
    pub data: Bytes,
}

/// A converted file ready to send back.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    /// Download name, `{base}.{output_extension}`.
    pub filename: String,
    /// Media type guessed from the extension.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Runs conversions for uploaded files.
#[derive(Debug, Clone)]
pub struct ConversionService {
    registry: Arc<ConverterRegistry>,
    invoker: ConversionInvoker,
    temp_root: PathBuf,
    metrics: Arc<ConversionMetrics>,
}

impl ConversionService {
    /// Create a service.
    pub fn new(
        registry: Arc<ConverterRegistry>,
        invoker: ConversionInvoker,
        temp_root: PathBuf,
    ) -> Self {
        Self {
            registry,
            invoker,
            temp_root,
            metrics: Arc::new(ConversionMetrics::new()),
        }
    }

    /// Create a service from the `[converters]` configuration section.
    pub fn from_config(config: &ConverterConfig, registry: Arc<ConverterRegistry>) -> Self {
        Self::new(
            registry,
            ConversionInvoker::new(config.timeout(), config.min_output_bytes),
            config.effective_temp_root(),
        )
    }

    /// The converter catalog.
    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    /// Shared metrics collector.
    pub fn metrics(&self) -> &Arc<ConversionMetrics> {
        &self.metrics
    }

    /// Convert `upload` with the converter called `converter`.
    ///
    /// An unknown name fails before anything is written to disk. The job
    /// directory is removed before this returns, whatever the outcome.
    #[instrument(skip(self, upload), fields(file = %upload.file_name, size = upload.data.len()))]
    pub async fn convert(
        &self,
        converter: &str,
        upload: UploadedFile,
    ) -> Result<ConvertedFile, ConversionError> {
        let descriptor = match self.registry.lookup(converter) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!(converter, "Unknown converter requested");
                self.metrics.record_failure(e.kind());
                return Err(e);
            }
        };

        let start = Instant::now();
        self.metrics.record_started(upload.data.len() as u64);

        let job = match ConversionJob::create(&self.temp_root, &upload.file_name).await {
            Ok(job) => job,
            Err(e) => {
                warn!(temp_root = %self.temp_root.display(), error = %e, "Failed to create job directory");
                self.metrics.record_failure(e.kind());
                return Err(e);
            }
        };
        let base = job.base();

        let result = async {
            job.write_input(&upload.data).await?;
            let invocation = self
                .invoker
                .invoke(&descriptor, job.input_path(), job.workdir())
                .await?;
            let data = tokio::fs::read(&invocation.output_path).await?;
            Ok::<_, ConversionError>(Bytes::from(data))
        }
        .await;

        job.close().await;

        match result {
            Ok(data) => {
                self.metrics
                    .record_success(start.elapsed(), data.len() as u64);

                let filename = format!("{base}.{}", descriptor.output_extension);
                let content_type = mime_guess::from_path(&filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string();

                info!(
                    converter = %descriptor.name,
                    output = %filename,
                    bytes = data.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Conversion succeeded"
                );

                Ok(ConvertedFile {
                    filename,
                    content_type,
                    data,
                })
            }
            Err(e) => {
                warn!(converter = %descriptor.name, error = %e, "Conversion failed");
                self.metrics.record_failure(e.kind());
                Err(e)
            }
        }
    }
}
