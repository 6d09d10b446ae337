//! Converter registry: the immutable name → descriptor catalog.
//!
//! The registry is assembled once at startup (built-ins plus configured
//! extras) and shared read-only behind an `Arc`. Lookup is exact and
//! case-sensitive and never touches the filesystem.

use std::collections::BTreeMap;
use std::sync::Arc;

use convert_core::types::ConverterDescriptor;
use tracing::info;
use validator::Validate;

use crate::catalog::builtin_converters;
use crate::error::ConversionError;
use crate::probe::{DependencyReport, ToolProbe};

/// Immutable catalog of converters keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    converters: BTreeMap<String, Arc<ConverterDescriptor>>,
}

impl ConverterRegistry {
    /// Registry containing the built-in catalog.
    pub fn builtin() -> Self {
        let converters = builtin_converters()
            .into_iter()
            .map(|d| (d.name.clone(), Arc::new(d)))
            .collect();
        Self { converters }
    }

    /// Build a registry from explicit descriptors.
    ///
    /// Every descriptor is validated; duplicate names are rejected.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ConverterDescriptor>,
    ) -> Result<Self, ConversionError> {
        let mut converters = BTreeMap::new();
        for descriptor in descriptors {
            check(&descriptor)?;
            let name = descriptor.name.clone();
            if converters.insert(name.clone(), Arc::new(descriptor)).is_some() {
                return Err(ConversionError::DuplicateConverter { name });
            }
        }
        Ok(Self { converters })
    }

    /// Merge extra descriptors over this registry.
    ///
    /// An extra with the name of an existing converter replaces it.
    pub fn with_extra(
        mut self,
        extra: impl IntoIterator<Item = ConverterDescriptor>,
    ) -> Result<Self, ConversionError> {
        for descriptor in extra {
            check(&descriptor)?;
            let name = descriptor.name.clone();
            if self
                .converters
                .insert(name.clone(), Arc::new(descriptor))
                .is_some()
            {
                info!(converter = %name, "Configured converter overrides built-in");
            } else {
                info!(converter = %name, "Registered configured converter");
            }
        }
        Ok(self)
    }

    /// Find a converter by exact name.
    pub fn lookup(&self, name: &str) -> Result<Arc<ConverterDescriptor>, ConversionError> {
        self.get(name)
            .ok_or_else(|| ConversionError::UnknownConverter {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Find a converter by exact name, if present.
    pub fn get(&self, name: &str) -> Option<Arc<ConverterDescriptor>> {
        self.converters.get(name).cloned()
    }

    /// All converters, sorted by name.
    pub fn list(&self) -> impl Iterator<Item = &ConverterDescriptor> {
        self.converters.values().map(|d| d.as_ref())
    }

    /// All converter names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.converters.keys().cloned().collect()
    }

    /// Converters advertising support for the given MIME type.
    pub fn for_input_type(&self, mime: &str) -> Vec<&ConverterDescriptor> {
        self.list().filter(|d| d.accepts_type(mime)).collect()
    }

    /// Number of converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Probe the external programs this catalog needs.
    pub fn probe_dependencies(&self, probe: &ToolProbe) -> DependencyReport {
        probe.probe(self.list())
    }
}

fn check(descriptor: &ConverterDescriptor) -> Result<(), ConversionError> {
    descriptor
        .validate()
        .map_err(|e| ConversionError::InvalidConverter {
            name: descriptor.name.clone(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;

    fn copy_converter(name: &str) -> ConverterDescriptor {
        ConverterDescriptor::new(name, "Copy", "cp", &["{input}", "{output}"], "out")
    }

    #[test]
    fn test_png2jpeg_lookup() {
        let registry = ConverterRegistry::builtin();
        let descriptor = registry.lookup("png2jpeg").expect("png2jpeg exists");
        assert_eq!(descriptor.output_extension, "jpg");
        assert_eq!(descriptor.requires, vec!["imagemagick".to_string()]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = ConverterRegistry::builtin();
        let err = registry.lookup("PNG2JPEG").expect_err("case mismatch");
        assert_eq!(err.kind(), ConversionErrorKind::UnknownConverter);
    }

    #[test]
    fn test_unknown_converter_lists_available() {
        let registry = ConverterRegistry::builtin();
        match registry.lookup("not-a-real-converter") {
            Err(ConversionError::UnknownConverter { name, available }) => {
                assert_eq!(name, "not-a-real-converter");
                assert_eq!(available, registry.names());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_list_is_sorted_and_stable() {
        let registry = ConverterRegistry::builtin();
        let names: Vec<_> = registry.list().map(|d| d.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names, registry.names());
        assert_eq!(registry.len(), 14);
    }

    #[test]
    fn test_from_descriptors_rejects_duplicates() {
        let err = ConverterRegistry::from_descriptors([copy_converter("a"), copy_converter("a")])
            .expect_err("duplicate");
        assert!(matches!(err, ConversionError::DuplicateConverter { ref name } if name == "a"));
    }

    #[test]
    fn test_from_descriptors_rejects_invalid() {
        let mut bad = copy_converter("bad");
        bad.args.push("{format}".to_string());
        let err = ConverterRegistry::from_descriptors([bad]).expect_err("invalid");
        assert_eq!(err.kind(), ConversionErrorKind::Configuration);
    }

    #[test]
    fn test_with_extra_adds_and_overrides() {
        let mut replacement = copy_converter("png2jpeg");
        replacement.output_extension = "jpeg".to_string();

        let registry = ConverterRegistry::builtin()
            .with_extra([copy_converter("copy"), replacement])
            .expect("valid extras");

        assert_eq!(registry.len(), 15);
        assert!(registry.get("copy").is_some());
        assert_eq!(
            registry.lookup("png2jpeg").expect("exists").output_extension,
            "jpeg"
        );
    }

    #[test]
    fn test_for_input_type() {
        let registry = ConverterRegistry::builtin();
        let names: Vec<_> = registry
            .for_input_type("image/png")
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["jpeg2txt", "png2jpeg", "png2webp"]);
        assert!(registry.for_input_type("application/x-unknown").is_empty());
    }
}
