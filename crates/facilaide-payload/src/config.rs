//! # Engine Configuration
//!
//! The variable metadata catalog and the payload schema, loaded once at
//! process start and passed by reference to every pipeline call. Neither is
//! ever reloaded or mutated afterwards, so an [`EngineConfig`] is shared
//! across threads without locking.
//!
//! Loading never fails. An unusable metadata file degrades to an empty
//! catalog (every variable monthly, default entity placement); an unusable
//! schema file disables validation. Both log a warning.

use std::path::PathBuf;

use facilaide_core::VariableCatalog;
use facilaide_schema::PayloadSchema;

/// Where to load configuration from. `None` selects the bundled data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    /// Variable metadata JSON file.
    pub variables_meta: Option<PathBuf>,
    /// OpenAPI document holding the payload schema (JSON or YAML).
    pub schema: Option<PathBuf>,
}

/// Immutable configuration shared by the resolver and the assembler.
#[derive(Debug)]
pub struct EngineConfig {
    /// Variable metadata.
    pub catalog: VariableCatalog,
    /// Compiled payload schema; `None` skips validation.
    pub schema: Option<PayloadSchema>,
}

impl EngineConfig {
    /// Configuration from explicit parts.
    pub fn new(catalog: VariableCatalog, schema: Option<PayloadSchema>) -> Self {
        Self { catalog, schema }
    }

    /// Bundled metadata and schema.
    pub fn bundled() -> Self {
        Self::load(&ConfigSources::default())
    }

    /// Load each part from its source, falling back to bundled data when no
    /// source is given.
    pub fn load(sources: &ConfigSources) -> Self {
        let catalog = match &sources.variables_meta {
            Some(path) => VariableCatalog::load_or_degraded(path),
            None => VariableCatalog::bundled(),
        };
        let schema = match &sources.schema {
            Some(path) => PayloadSchema::load_or_skip(path),
            None => bundled_schema(),
        };
        tracing::info!(
            variables = catalog.len(),
            schema = ?schema.as_ref().map(PayloadSchema::component),
            "engine configuration loaded"
        );
        Self { catalog, schema }
    }

    /// True when metadata is missing and simplified periodicity rules apply.
    pub fn is_degraded(&self) -> bool {
        self.catalog.is_empty()
    }
}

fn bundled_schema() -> Option<PayloadSchema> {
    match PayloadSchema::bundled() {
        Ok(schema) => Some(schema),
        Err(e) => {
            tracing::warn!(error = %e, "bundled payload schema is unusable, validation will be skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_configuration() {
        let config = EngineConfig::bundled();
        assert!(!config.is_degraded());
        assert!(config.catalog.is_monthly("salaire_de_base"));
        assert!(config.schema.is_some());
    }

    #[test]
    fn test_unreadable_sources_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let sources = ConfigSources {
            variables_meta: Some(dir.path().join("missing.json")),
            schema: Some(dir.path().join("missing.yaml")),
        };
        let config = EngineConfig::load(&sources);
        assert!(config.is_degraded());
        assert!(config.schema.is_none());
    }

    #[test]
    fn test_external_metadata_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"loyer": {{"entity": "menage", "periodicity": "year"}}}}"#).unwrap();
        let config = EngineConfig::load(&ConfigSources {
            variables_meta: Some(file.path().to_path_buf()),
            schema: None,
        });
        assert_eq!(config.catalog.len(), 1);
        assert!(!config.catalog.is_monthly("loyer"));
        assert!(config.schema.is_some());
    }

    #[test]
    fn test_config_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineConfig>();
    }
}
