//! Command template resolution.
//!
//! A converter's `args` are tokens with named slots. Resolution replaces
//! the slots token by token and yields an argument vector; a path that
//! contains spaces or shell metacharacters stays a single argument.

use std::fmt;
use std::path::{Path, PathBuf};

use convert_core::types::ConverterDescriptor;

/// Concrete paths substituted into a command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// `{input}`: the uploaded file.
    pub input: PathBuf,
    /// `{output}`: `{outdir}/{base}.{ext}`.
    pub output: PathBuf,
    /// `{outdir}`: the job working directory.
    pub outdir: PathBuf,
    /// `{output_base}`: `{outdir}/{base}`.
    pub output_base: PathBuf,
}

impl ResolvedPaths {
    /// Compute the paths for `input` converted into `workdir` with `extension`.
    ///
    /// The base is the input file name with its extension stripped.
    pub fn new(input: &Path, workdir: &Path, extension: &str) -> Self {
        let base = base_name(input);
        Self {
            input: input.to_path_buf(),
            output: workdir.join(format!("{base}.{extension}")),
            outdir: workdir.to_path_buf(),
            output_base: workdir.join(&base),
        }
    }
}

/// Stem of `path`'s file name, or `"output"` when it has none.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "output".to_string())
}

/// A program plus its fully substituted argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    /// Executable name or path.
    pub program: String,
    /// Arguments, one entry per process argument.
    pub args: Vec<String>,
}

impl ResolvedCommand {
    /// Substitute `paths` into `descriptor`'s template.
    pub fn resolve(descriptor: &ConverterDescriptor, paths: &ResolvedPaths) -> Self {
        let input = paths.input.to_string_lossy();
        let output = paths.output.to_string_lossy();
        let outdir = paths.outdir.to_string_lossy();
        let output_base = paths.output_base.to_string_lossy();

        let args = descriptor
            .args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output_base}", &output_base)
                    .replace("{output}", &output)
                    .replace("{outdir}", &outdir)
            })
            .collect();

        Self {
            program: descriptor.program.clone(),
            args,
        }
    }
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
