//! Converter descriptor: the static description of one conversion.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Placeholders recognised inside converter argument tokens.
///
/// - `{input}`: absolute path of the uploaded file
/// - `{output}`: absolute path of the expected output file
/// - `{outdir}`: absolute path of the job working directory
/// - `{output_base}`: `{outdir}/{base}`, the output path without extension
pub const PLACEHOLDERS: [&str; 4] = ["{input}", "{output}", "{outdir}", "{output_base}"];

/// Description of a single converter.
///
/// Descriptors are immutable once loaded into the registry. The command
/// is an argument vector: `program` is executed directly and every entry
/// of `args` is passed as one argument after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq, Validate, Serialize, Deserialize)]
pub struct ConverterDescriptor {
    /// Unique, case-sensitive catalog key (e.g. `png2jpeg`).
    #[validate(length(min = 1, max = 64), custom(function = "validate_name"))]
    pub name: String,

    /// Human readable title.
    #[serde(default)]
    pub label: String,

    /// Executable to run, resolved through `PATH` when not absolute.
    #[validate(length(min = 1))]
    pub program: String,

    /// Argument tokens with placeholders.
    #[serde(default)]
    #[validate(custom(function = "validate_template_args"))]
    pub args: Vec<String>,

    /// Extension of the produced file, without leading dot.
    #[validate(custom(function = "validate_extension"))]
    pub output_extension: String,

    /// MIME types this converter accepts (advisory).
    #[serde(default)]
    pub input_types: Vec<String>,

    /// Package names the converter needs installed (advisory).
    #[serde(default)]
    pub requires: Vec<String>,
}

impl ConverterDescriptor {
    /// Build a descriptor from borrowed parts.
    pub fn new(
        name: &str,
        label: &str,
        program: &str,
        args: &[&str],
        output_extension: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            output_extension: output_extension.to_string(),
            input_types: Vec::new(),
            requires: Vec::new(),
        }
    }

    /// Set accepted input MIME types.
    pub fn accepts(mut self, types: &[&str]) -> Self {
        self.input_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set required packages.
    pub fn requires(mut self, packages: &[&str]) -> Self {
        self.requires = packages.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Whether this converter advertises support for the given MIME type.
    ///
    /// Matches exactly or through a `type/*` wildcard on either side.
    pub fn accepts_type(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        let major = mime.split('/').next().unwrap_or_default();

        self.input_types.iter().any(|t| {
            let t = t.to_ascii_lowercase();
            t == mime
                || t.strip_suffix("/*").is_some_and(|m| m == major)
                || mime.strip_suffix("/*").is_some_and(|m| t.split('/').next() == Some(m))
        })
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        Ok(())
    } else {
        Err(ValidationError::new("converter_name")
            .with_message("name may only contain ASCII letters, digits, '-' and '_'".into()))
    }
}

fn validate_extension(ext: &str) -> Result<(), ValidationError> {
    if !ext.is_empty() && ext.len() <= 16 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("output_extension")
            .with_message("extension must be 1-16 ASCII alphanumerics without a dot".into()))
    }
}

fn validate_template_args(args: &[String]) -> Result<(), ValidationError> {
    for arg in args {
        let mut rest = arg.as_str();
        while let Some(open) = rest.find('{') {
            let Some(len) = rest[open..].find('}') else {
                return Err(ValidationError::new("placeholder")
                    .with_message(format!("unterminated placeholder in '{arg}'").into()));
            };
            let placeholder = &rest[open..=open + len];
            if !PLACEHOLDERS.contains(&placeholder) {
                return Err(ValidationError::new("placeholder")
                    .with_message(format!("unknown placeholder {placeholder}").into()));
            }
            rest = &rest[open + len + 1..];
        }
    }
    Ok(())
}
