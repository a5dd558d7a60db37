//! Ingestion of the merged schema document into the registry.

pub mod schema;
pub mod service;
pub mod types;

pub use schema::ingest_definitions;
pub use service::ingest_services;
pub use types::parse_type_shape;
