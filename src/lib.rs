//! enginegen — strongly-typed C# and TypeScript declarations generated
//! from engine RPC API schema documents.
//!
//! The pipeline runs in fixed stages over one schema document: overlay
//! merge, definition and service ingestion into a flat registry, enum
//! reference linking, then one emission run per requested language.
#![deny(unsafe_code)]

pub mod config;
pub mod emit;
pub mod error;
pub mod ingest;
pub mod link;
pub mod model;
pub mod overlay;
pub mod pipeline;
pub mod util;

pub use config::{AsyncMode, GeneratorConfig};
pub use emit::Language;
pub use error::{Error, Result};
