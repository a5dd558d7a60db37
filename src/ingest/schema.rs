//! Schema ingestion.
//!
//! Walks the merged `components.schemas` map and classifies each named,
//! non-suppressed definition into a class (object or array kind) or an
//! enum. A definition that fails to ingest is logged and skipped; its
//! siblings still ingest.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::model::{
    ClassKind, EngineClass, EngineEnum, EngineEnumValue, EngineInterface, EngineProperty, Entity,
    Registry, literal_from_value,
};

/// Name of the dynamic-JSON type in the C# target runtime. A schema class
/// with this name would collide with it, so the definition is skipped.
const DYNAMIC_JSON_CLASS: &str = "JsonObject";

/// Ingest every type definition from the merged document into the registry.
pub fn ingest_definitions(
    doc: &Value,
    config: &GeneratorConfig,
    registry: &mut Registry,
) -> Result<()> {
    let Some(definitions) = doc.pointer("/components/schemas") else {
        warn!("document has no components.schemas section");
        return Ok(());
    };
    let definitions = definitions
        .as_object()
        .ok_or_else(|| Error::schema("components.schemas is not an object"))?;

    for (name, node) in definitions {
        let export = node.get("export").and_then(Value::as_bool).unwrap_or(true);
        if !export {
            continue;
        }
        match node.get("type").and_then(Value::as_str) {
            Some("object") => ingest_object(name, node, config, registry),
            Some("array") => ingest_array(name, node, registry),
            Some("string") => ingest_enum(name, node, registry),
            other => {
                error!(definition = %name, kind = ?other, "unknown definition type, entry skipped");
            }
        }
    }
    Ok(())
}

fn ingest_object(name: &str, node: &Value, config: &GeneratorConfig, registry: &mut Registry) {
    if name == DYNAMIC_JSON_CLASS {
        info!(
            "the class \"{DYNAMIC_JSON_CLASS}\" is ignored because the target runtime already provides a dynamic JSON type"
        );
        return;
    }
    let properties = read_properties(node, "properties", name);
    if properties.is_empty() {
        info!(class = %name, "the class has no properties");
    }
    let class = EngineClass {
        name: name.to_string(),
        description: string_field(node, "description"),
        see_also: string_list(node, "x-engine-see-also"),
        kind: ClassKind::Object,
        properties,
    };
    let is_root = class.name == config.base_object_class;
    let root_properties = class.properties.clone();
    registry.push(Entity::Class(class));

    // The root class additionally yields the interface every generated
    // service interface implicitly extends.
    if is_root {
        registry.push(Entity::Interface(EngineInterface {
            name: config.base_object_interface.clone(),
            description: Some("Generated interface".to_string()),
            properties: root_properties,
            methods: Vec::new(),
        }));
    }
}

fn ingest_array(name: &str, node: &Value, registry: &mut Registry) {
    let class = EngineClass {
        name: name.to_string(),
        description: string_field(node, "description"),
        see_also: string_list(node, "x-engine-see-also"),
        kind: ClassKind::Array,
        properties: read_properties(node, "items", name),
    };
    registry.push(Entity::Class(class));
}

fn ingest_enum(name: &str, node: &Value, registry: &mut Registry) {
    let values = enum_values(name, node);
    let new_enum = EngineEnum {
        name: name.to_string(),
        description: string_field(node, "description"),
        values,
    };
    if !fold_enum(registry, &new_enum) {
        registry.push(Entity::Enum(new_enum));
    }
}

fn enum_values(name: &str, node: &Value) -> Vec<EngineEnumValue> {
    let Some(members) = node.get("oneOf").and_then(Value::as_array) else {
        error!(definition = %name, "string definition without a oneOf value set");
        return Vec::new();
    };
    let mut values = Vec::new();
    for member in members {
        match serde_json::from_value::<EngineEnumValue>(member.clone()) {
            Ok(value) => values.push(value),
            Err(e) => error!(definition = %name, error = %e, "enum value skipped"),
        }
    }
    values
}

/// Fold `new_enum` into an already-registered enum when possible.
///
/// The match is a deliberate asymmetric subset check: an existing enum whose
/// name starts with the new enum's name and contains every new value by name
/// absorbs it, even if the existing enum has extra members. Shortcode
/// aliases from the new values are merged onto the surviving ones. Returns
/// true when the new enum was folded.
fn fold_enum(registry: &mut Registry, new_enum: &EngineEnum) -> bool {
    for existing in registry.enums_mut() {
        if !existing.name.starts_with(&new_enum.name) {
            continue;
        }
        let all_present = new_enum
            .values
            .iter()
            .all(|v| existing.values.iter().any(|e| e.name == v.name));
        if !all_present {
            continue;
        }
        for value in &new_enum.values {
            if let Some(shortcode) = &value.shortcode
                && let Some(hit) = existing.values.iter_mut().find(|e| e.name == value.name)
            {
                hit.shortcode = Some(shortcode.clone());
            }
        }
        return true;
    }
    false
}

/// Read the property set of a definition from `key` (`properties` for
/// object kinds, `items` for array kinds).
fn read_properties(node: &Value, key: &str, class_name: &str) -> Vec<EngineProperty> {
    let Some(map) = node.get(key).and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut results = Vec::new();
    for (prop_name, prop_node) in map {
        let mut property = EngineProperty {
            name: prop_name.clone(),
            ..Default::default()
        };

        // An `items` sub-tree of an array definition carries a bare pointer.
        if prop_name == "$ref" {
            property.reference = prop_node.as_str().map(String::from);
            results.push(property);
            continue;
        }

        property.description = string_field(prop_node, "description");
        property.ty = string_field(prop_node, "type");
        property.format = string_field(prop_node, "format");
        property.required = prop_node
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        property.default = prop_node.get("default").and_then(literal_from_value);

        if property.default.is_none() {
            property.default = match property.ty.as_deref() {
                Some("boolean") => Some("false".to_string()),
                Some("integer") | Some("number") => Some("0".to_string()),
                Some("object") => Some("null".to_string()),
                _ => None,
            };
        }

        if let Some(description) = &property.description
            && description.contains("The default value is")
        {
            match &property.default {
                Some(default) => property.default_from_description = Some(default.clone()),
                None => warn!(
                    property = %property.name,
                    class = %class_name,
                    "the description implies a default value but none was resolved"
                ),
            }
        }

        if let Some(pointer) = prop_node.get("$ref").and_then(Value::as_str) {
            property.reference = Some(pointer.to_string());
        }

        if property.ty.as_deref() == Some("array") {
            property.reference = prop_node
                .pointer("/items/$ref")
                .and_then(Value::as_str)
                .or_else(|| prop_node.pointer("/items/type").and_then(Value::as_str))
                .map(String::from);
        }

        results.push(property);
    }
    results
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(String::from)
}

fn string_list(node: &Value, key: &str) -> Vec<String> {
    node.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
