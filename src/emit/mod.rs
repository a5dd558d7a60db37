//! Output emission.
//!
//! Renders the linked registry into declaration files for one target
//! language. Entities are grouped into three markered sections (enums,
//! interfaces, classes) in registry order; enums and interfaces share one
//! file each while every class gets its own. An optional bundling step
//! concatenates a run's files into a single module file and removes the
//! partials.

pub mod csharp;
pub mod doc;
pub mod typescript;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::link::ModelIndex;
use crate::model::{EngineClass, EngineEnum, EngineInterface, Registry};

/// Target language of one emission run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    CSharp,
    TypeScript,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::CSharp => "C#",
            Language::TypeScript => "TypeScript",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Language::CSharp => "cs",
            Language::TypeScript => "d.ts",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csharp" | "cs" => Ok(Language::CSharp),
            "typescript" | "ts" => Ok(Language::TypeScript),
            other => Err(Error::config(format!(
                "unknown language '{other}', expected 'csharp' or 'typescript'"
            ))),
        }
    }
}

/// One output file ready to be written.
struct Artifact {
    path: PathBuf,
    content: String,
}

struct Sections<'a> {
    enums: Vec<&'a EngineEnum>,
    interfaces: Vec<&'a EngineInterface>,
    classes: Vec<&'a EngineClass>,
}

impl<'a> Sections<'a> {
    fn collect(registry: &'a Registry) -> Self {
        Self {
            enums: registry.enums().collect(),
            interfaces: registry.interfaces().collect(),
            classes: registry.classes().collect(),
        }
    }
}

/// Emit one language run into `out_dir`, returning the written paths.
pub fn emit_language(
    registry: &Registry,
    index: &ModelIndex,
    config: &GeneratorConfig,
    language: Language,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let sections = Sections::collect(registry);
    let artifacts = build_artifacts(&sections, index, config, language, out_dir);
    if artifacts.is_empty() {
        info!(language = %language, "nothing to emit");
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    for artifact in &artifacts {
        std::fs::write(&artifact.path, &artifact.content)?;
        debug!(path = %artifact.path.display(), "wrote declaration file");
        written.push(artifact.path.clone());
    }

    if config.bundle {
        let bundle_path = out_dir.join(bundle_file_name(config, language));
        let mut content = generated_header();
        for artifact in &artifacts {
            content.push_str(&artifact.content);
            content.push('\n');
        }
        std::fs::write(&bundle_path, content)?;
        for path in &written {
            std::fs::remove_file(path)?;
        }
        info!(
            language = %language,
            bundle = %bundle_path.display(),
            files = written.len(),
            "bundled output"
        );
        return Ok(vec![bundle_path]);
    }

    info!(language = %language, files = written.len(), "emission complete");
    Ok(written)
}

fn build_artifacts(
    sections: &Sections<'_>,
    index: &ModelIndex,
    config: &GeneratorConfig,
    language: Language,
    out_dir: &Path,
) -> Vec<Artifact> {
    let extension = language.file_extension();
    let mut artifacts = Vec::new();

    if !sections.enums.is_empty() {
        let blocks: Vec<String> = sections
            .enums
            .iter()
            .map(|e| render_enum(e, config, language))
            .collect();
        artifacts.push(Artifact {
            path: out_dir.join(format!("Enums.{extension}")),
            content: render_document(&section("Enums", &blocks, language), config, language),
        });
    }

    if !sections.interfaces.is_empty() {
        let blocks: Vec<String> = sections
            .interfaces
            .iter()
            .map(|i| render_interface(i, config, language))
            .collect();
        artifacts.push(Artifact {
            path: out_dir.join(format!("Interfaces.{extension}")),
            content: render_document(&section("Interfaces", &blocks, language), config, language),
        });
    }

    for class in &sections.classes {
        let block = render_class(class, config, index, language);
        artifacts.push(Artifact {
            path: out_dir.join(format!("{}.{extension}", class.name)),
            content: render_document(&section("Classes", &[block], language), config, language),
        });
    }

    artifacts
}

fn render_enum(entry: &EngineEnum, config: &GeneratorConfig, language: Language) -> String {
    match language {
        Language::CSharp => csharp::render_enum(entry, config),
        Language::TypeScript => typescript::render_enum(entry, config),
    }
}

fn render_interface(
    interface: &EngineInterface,
    config: &GeneratorConfig,
    language: Language,
) -> String {
    match language {
        Language::CSharp => csharp::render_interface(interface, config),
        Language::TypeScript => typescript::render_interface(interface, config),
    }
}

fn render_class(
    class: &EngineClass,
    config: &GeneratorConfig,
    index: &ModelIndex,
    language: Language,
) -> String {
    match language {
        Language::CSharp => csharp::render_class(class, config, index),
        Language::TypeScript => typescript::render_class(class, config),
    }
}

/// Wrap rendered blocks in a markered section.
fn section(name: &str, blocks: &[String], language: Language) -> String {
    let comment = match language {
        Language::CSharp => "",
        Language::TypeScript => "//",
    };
    let mut content = format!("    {comment}#region {name}\n");
    content.push_str(&blocks.join("\n\n"));
    content.push('\n');
    content.push_str(&format!("    {comment}#endregion\n"));
    content
}

/// Wrap section content into a complete file for the target.
fn render_document(content: &str, config: &GeneratorConfig, language: Language) -> String {
    match language {
        Language::CSharp => {
            let mut document = format!("namespace {}\n{{\n", config.namespace);
            document.push_str("    #region Usings\n");
            for using in [
                "System",
                "System.ComponentModel",
                "System.Collections.Generic",
                "System.Threading",
                "System.Threading.Tasks",
                "Newtonsoft.Json",
                "Newtonsoft.Json.Linq",
            ] {
                document.push_str(&format!("    using {using};\n"));
            }
            document.push_str("    #endregion\n\n");
            document.push_str(content);
            document.push_str("}\n");
            document
        }
        Language::TypeScript => {
            let mut document = content.to_string();
            if !document.ends_with('\n') {
                document.push('\n');
            }
            document
        }
    }
}

/// Header prepended to bundled module files.
fn generated_header() -> String {
    format!(
        "// <auto-generated>\n//     Generated by {} {}.\n//     Changes to this file will be lost if the code is regenerated.\n// </auto-generated>\n\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

fn bundle_file_name(config: &GeneratorConfig, language: Language) -> String {
    match language {
        Language::CSharp => format!("{}.cs", config.namespace),
        Language::TypeScript => "index.d.ts".to_string(),
    }
}
