//! Generation pipeline.
//!
//! One run per schema document: load, merge the overlay, ingest
//! definitions and services into a fresh registry, link enum references,
//! then emit every requested language. A merge failure aborts the run
//! before ingestion; an ingestion failure keeps what was built so the
//! other sections still generate; an emission failure fails the run after
//! every language had its chance.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{GeneratorConfig, default_overlay_path};
use crate::emit::{self, Language};
use crate::error::{Error, Result};
use crate::ingest::{ingest_definitions, ingest_services};
use crate::link::{ModelIndex, link_enum_types};
use crate::model::Registry;
use crate::overlay::merge_documents;

/// Run the whole pipeline for one schema document.
///
/// Returns the paths written across all requested languages.
pub fn run(
    schema: &Path,
    overlay: Option<&Path>,
    config: &GeneratorConfig,
    languages: &[Language],
) -> Result<Vec<PathBuf>> {
    info!(schema = %schema.display(), "starting generation");
    let mut doc = load_json(schema)?;
    let overlay_doc = resolve_overlay(schema, overlay)?;
    merge_documents(&mut doc, overlay_doc, config.merge_fields.as_deref())?;

    let mut registry = Registry::new();
    if let Err(err) = ingest_definitions(&doc, config, &mut registry) {
        error!(%err, "definition ingestion failed, continuing with partial registry");
    }
    if let Err(err) = ingest_services(&doc, config, &mut registry) {
        error!(%err, "service ingestion failed, continuing with partial registry");
    }
    info!(entities = registry.len(), "registry built");

    let index = ModelIndex::build(&registry);
    link_enum_types(&mut registry, &index);

    let mut written = Vec::new();
    let mut failed_runs = 0usize;
    for &language in languages {
        let out_dir = output_dir(schema, config, language);
        match emit::emit_language(&registry, &index, config, language, &out_dir) {
            Ok(paths) => written.extend(paths),
            Err(err) => {
                error!(language = %language, %err, "emission run failed");
                failed_runs += 1;
            }
        }
    }
    if failed_runs > 0 {
        return Err(Error::emit(format!("{failed_runs} emission run(s) failed")));
    }
    Ok(written)
}

fn load_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("could not read schema {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&content)?)
}

/// Resolve the overlay document.
///
/// An explicitly given overlay must load; the conventional
/// `{stem}_change.json` sibling is picked up only when present.
fn resolve_overlay(schema: &Path, overlay: Option<&Path>) -> Result<Option<Value>> {
    match overlay {
        Some(path) => {
            info!(overlay = %path.display(), "applying overlay");
            Ok(Some(load_json(path)?))
        }
        None => {
            let candidate = default_overlay_path(schema);
            if candidate.exists() {
                info!(overlay = %candidate.display(), "applying conventional overlay");
                Ok(Some(load_json(&candidate)?))
            } else {
                debug!("no overlay found");
                Ok(None)
            }
        }
    }
}

fn output_dir(schema: &Path, config: &GeneratorConfig, language: Language) -> PathBuf {
    let configured = match language {
        Language::CSharp => config.output_csharp.as_ref(),
        Language::TypeScript => config.output_typescript.as_ref(),
    };
    match configured {
        Some(dir) => dir.clone(),
        None => schema
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}
