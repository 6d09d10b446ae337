//! Startup probe for the external tools the catalog relies on.
//!
//! The probe is advisory: it produces a [`DependencyReport`] for logs and
//! the health endpoint and never prevents a conversion from being tried.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use convert_core::types::ConverterDescriptor;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Install command covering every built-in tool.
pub const INSTALL_HINT: &str = "apt-get install libreoffice imagemagick ffmpeg webp poppler-utils tesseract-ocr python3-pandas";

/// Availability of one external program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStatus {
    /// Program name as used in converter templates.
    pub program: String,
    /// Human readable tool name.
    pub display_name: String,
    /// Resolved executable, when found.
    pub path: Option<PathBuf>,
    /// Converters that run this program.
    pub converters: Vec<String>,
}

impl ToolStatus {
    /// Whether the program was found.
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Result of probing all catalog programs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    /// One entry per distinct program, sorted by program name.
    pub tools: Vec<ToolStatus>,
}

impl DependencyReport {
    /// Programs that could not be found.
    pub fn missing(&self) -> impl Iterator<Item = &ToolStatus> {
        self.tools.iter().filter(|t| !t.is_available())
    }

    /// Programs that were found.
    pub fn available(&self) -> impl Iterator<Item = &ToolStatus> {
        self.tools.iter().filter(|t| t.is_available())
    }

    /// Whether every program was found.
    pub fn all_available(&self) -> bool {
        self.missing().next().is_none()
    }

    /// Emit the report to the log.
    pub fn log(&self) {
        let missing: Vec<String> = self
            .missing()
            .map(|t| format!("{} ({})", t.display_name, t.program))
            .collect();

        if missing.is_empty() {
            info!(tools = self.tools.len(), "All conversion tools are available");
        } else {
            warn!(
                missing = %missing.join(", "),
                install_hint = INSTALL_HINT,
                "Some conversion tools are missing; their converters will fail when used"
            );
        }
    }
}

/// Locates executables on a search path.
#[derive(Debug, Clone, Default)]
pub struct ToolProbe {
    search_path: Option<OsString>,
}

impl ToolProbe {
    /// Probe using the process `PATH`.
    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Probe using an explicit `PATH`-style value.
    pub fn with_search_path(path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(path.into()),
        }
    }

    /// Resolve `program` to an executable file.
    ///
    /// Names containing a path separator are checked as given.
    pub fn locate(&self, program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return is_executable(candidate).then(|| candidate.to_path_buf());
        }

        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .map(|dir| dir.join(program))
            .find(|path| is_executable(path))
    }

    /// Probe every distinct program used by `converters`.
    pub fn probe<'a>(
        &self,
        converters: impl IntoIterator<Item = &'a ConverterDescriptor>,
    ) -> DependencyReport {
        let mut by_program: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for descriptor in converters {
            by_program
                .entry(descriptor.program.as_str())
                .or_default()
                .push(descriptor.name.clone());
        }

        let tools = by_program
            .into_iter()
            .map(|(program, converters)| ToolStatus {
                program: program.to_string(),
                display_name: display_name(program).to_string(),
                path: self.locate(program),
                converters,
            })
            .collect();

        DependencyReport { tools }
    }
}

/// Human readable name for well-known conversion programs.
pub fn display_name(program: &str) -> &str {
    let name = Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program);

    match name {
        "soffice" => "LibreOffice",
        "convert" | "magick" => "ImageMagick",
        "ffmpeg" => "FFmpeg",
        "cwebp" => "WebP tools",
        "pdftotext" => "Poppler utils",
        "tesseract" => "Tesseract OCR",
        "python3" | "python" => "Python",
        _ => program,
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
        || ["exe", "bat", "cmd"]
            .iter()
            .any(|ext| path.with_extension(ext).is_file())
}
