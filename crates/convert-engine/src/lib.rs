//! # convert-engine
//!
//! Converter catalog and external-tool invocation for Convert-Studio.
//!
//! A request resolves a converter name through the [`ConverterRegistry`],
//! gets a scoped [`ConversionJob`] directory, and hands the descriptor to
//! the [`ConversionInvoker`], which runs the tool as a child process with
//! a hard timeout and locates the produced file. Tools are executed with
//! an argument vector; no shell ever interprets an uploaded file name.

pub mod catalog;
pub mod error;
pub mod executor;
pub mod filesystem;
pub mod invoker;
pub mod job;
pub mod metrics;
pub mod probe;
pub mod registry;
pub mod service;
pub mod template;

pub use error::{ConversionError, ConversionErrorKind};
pub use executor::{ProcessExecutor, ProcessOutput};
pub use invoker::{ConversionInvoker, InvocationResult};
pub use job::ConversionJob;
pub use metrics::{ConversionMetrics, MetricsSnapshot};
pub use probe::{DependencyReport, ToolProbe, ToolStatus};
pub use registry::ConverterRegistry;
pub use service::{ConversionService, ConvertedFile, UploadedFile};
pub use template::{ResolvedCommand, ResolvedPaths};
