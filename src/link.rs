//! Entity index and enum-type linking.
//!
//! `ModelIndex` holds name-keyed maps over the finished registry so later
//! stages look entities up directly instead of scanning the registry. The
//! linking pass runs strictly after both ingestors: a property may
//! reference an enum registered later in traversal order.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{EngineEnum, EntityKind, Registry};

/// Name-indexed view over a fully populated registry.
#[derive(Debug, Default)]
pub struct ModelIndex {
    kinds: HashMap<String, EntityKind>,
    enums: HashMap<String, EngineEnum>,
}

impl ModelIndex {
    /// Build the index once ingestion completes.
    pub fn build(registry: &Registry) -> Self {
        let mut index = ModelIndex::default();
        for entity in registry.iter() {
            index
                .kinds
                .insert(entity.name().to_string(), entity.kind());
        }
        for entry in registry.enums() {
            index.enums.insert(entry.name.clone(), entry.clone());
        }
        index
    }

    pub fn kind_of(&self, name: &str) -> Option<EntityKind> {
        self.kinds.get(name).copied()
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.kind_of(name) == Some(EntityKind::Enum)
    }

    /// Qualify a property default against the enum it references,
    /// producing `Enum.Member`. Falls back to a prefix match on the enum
    /// name because folded enums keep the longer registered name.
    pub fn enum_default(&self, type_name: &str, default: &str) -> Option<String> {
        let entry = self.enums.get(type_name).or_else(|| {
            self.enums
                .values()
                .find(|e| type_name.starts_with(&e.name))
        })?;
        for value in &entry.values {
            let member = value.title.as_deref().unwrap_or(&value.name);
            if default.ends_with(member) {
                return Some(format!("{}.{member}", entry.name));
            }
            if default.ends_with(value.name.as_str()) {
                return Some(format!("{}.{}", entry.name, value.name));
            }
        }
        None
    }
}

/// Flag every class property whose reference target is an enum entity.
///
/// Affects default-value rendering during emission.
pub fn link_enum_types(registry: &mut Registry, index: &ModelIndex) {
    let mut flagged = 0usize;
    for class in registry.classes_mut() {
        for property in &mut class.properties {
            let Some(target) = property.ref_name() else {
                continue;
            };
            if index.is_enum(target) {
                property.enum_typed = true;
                flagged += 1;
            }
        }
    }
    debug!(flagged, "enum-typed properties linked");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ClassKind, EngineClass, EngineEnumValue, EngineProperty, Entity,
    };

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        registry.push(Entity::Class(EngineClass {
            name: "NxField".into(),
            kind: ClassKind::Object,
            properties: vec![
                EngineProperty {
                    name: "qType".into(),
                    reference: Some("#/components/schemas/NxGrpType".into()),
                    default: Some("GRP_NX_NONE".into()),
                    ..Default::default()
                },
                EngineProperty {
                    name: "qCell".into(),
                    reference: Some("#/components/schemas/NxCell".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }));
        registry.push(Entity::Class(EngineClass {
            name: "NxCell".into(),
            kind: ClassKind::Object,
            ..Default::default()
        }));
        // Enum registered after the class that references it.
        registry.push(Entity::Enum(EngineEnum {
            name: "NxGrpType".into(),
            description: None,
            values: vec![EngineEnumValue {
                name: "GRP_NX_NONE".into(),
                ..Default::default()
            }],
        }));
        registry
    }

    #[test]
    fn test_link_flags_enum_references_only() {
        let mut registry = sample_registry();
        let index = ModelIndex::build(&registry);
        link_enum_types(&mut registry, &index);

        let class = registry.classes().next().unwrap();
        assert!(class.properties[0].enum_typed);
        assert!(!class.properties[1].enum_typed);
    }

    #[test]
    fn test_index_kinds() {
        let registry = sample_registry();
        let index = ModelIndex::build(&registry);
        assert_eq!(index.kind_of("NxGrpType"), Some(EntityKind::Enum));
        assert_eq!(index.kind_of("NxCell"), Some(EntityKind::Class));
        assert_eq!(index.kind_of("Missing"), None);
        assert!(index.is_enum("NxGrpType"));
    }

    #[test]
    fn test_enum_default_qualification() {
        let registry = sample_registry();
        let index = ModelIndex::build(&registry);
        assert_eq!(
            index.enum_default("NxGrpType", "GRP_NX_NONE").as_deref(),
            Some("NxGrpType.GRP_NX_NONE")
        );
        assert_eq!(index.enum_default("NxGrpType", "UNRELATED"), None);
        assert_eq!(index.enum_default("Missing", "GRP_NX_NONE"), None);
    }
}
