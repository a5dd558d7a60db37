//! Generator configuration.
//!
//! One `GeneratorConfig` drives a whole run. It can be loaded from a JSON
//! file and individual fields can then be overridden from the command line;
//! every field has a default so an empty config file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Naming convention for asynchronous methods in the generated output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsyncMode {
    /// Keep the schema method name as-is.
    #[default]
    Off,
    /// Append an `Async` suffix where the target convention uses one.
    Suffix,
}

/// Configuration consumed by the pipeline and the emitters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Namespace (C#) / module identity for the generated output.
    pub namespace: String,
    /// Output directory for the C# run; defaults to the schema directory.
    pub output_csharp: Option<PathBuf>,
    /// Output directory for the TypeScript run; defaults to the schema directory.
    pub output_typescript: Option<PathBuf>,
    /// Render description doc comments.
    pub use_descriptions: bool,
    /// Single-response methods return the response type directly instead of
    /// a synthesized wrapper class.
    pub simplified_response: bool,
    /// Async naming convention for generated method names.
    pub async_mode: AsyncMode,
    /// Append a trailing cancellation parameter to generated methods.
    pub cancellation_token: bool,
    /// Concatenate each language's output into one module file.
    pub bundle: bool,
    /// Class whose ingestion synthesizes the root interface.
    pub base_object_class: String,
    /// Name of the synthesized root interface every service extends.
    pub base_object_interface: String,
    /// Overlay dedup filter: `None` collapses same-named array entries
    /// unconditionally; a list restricts collapsing to duplicate groups
    /// carrying at least one of the listed fields.
    pub merge_fields: Option<Vec<String>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: "EngineApi".to_string(),
            output_csharp: None,
            output_typescript: None,
            use_descriptions: true,
            simplified_response: true,
            async_mode: AsyncMode::Off,
            cancellation_token: false,
            bundle: false,
            base_object_class: "ObjectInterface".to_string(),
            base_object_interface: "IObjectInterface".to_string(),
            merge_fields: None,
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("could not read config {}: {e}", path.display()))
        })?;
        let config: GeneratorConfig = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("could not parse config {}: {e}", path.display()))
        })?;
        Ok(config)
    }
}

/// Default overlay path for a schema file: `{stem}_change.json` next to it.
pub fn default_overlay_path(schema: &Path) -> PathBuf {
    let stem = schema
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    schema.with_file_name(format!("{stem}_change.json"))
}
