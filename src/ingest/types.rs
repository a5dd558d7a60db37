//! Type-shape parsing.
//!
//! One explicit parser over the heterogeneous schema nodes replaces
//! per-call-site probing for `schema.$ref`, `items.$ref`, `items.type`, and
//! plain `type`. Every property, parameter, and response funnels through
//! here so real-type resolution stays a pure function of the node.

use serde_json::Value;

use crate::model::{TypeShape, ref_target};

/// Parse the resolved type of a schema node.
///
/// Precedence mirrors the document conventions: an explicit `schema.$ref`
/// or `$ref` pointer wins, then array item resolution, then an inline
/// closed value set, then the declared primitive. A primitive `string`
/// whose `items` carry a reference is an enum-typed value and resolves to
/// that reference.
pub fn parse_type_shape(node: &Value) -> TypeShape {
    if let Some(pointer) = node.pointer("/schema/$ref").and_then(Value::as_str) {
        return TypeShape::Reference(ref_target(pointer));
    }
    if let Some(pointer) = node.get("$ref").and_then(Value::as_str) {
        return TypeShape::Reference(ref_target(pointer));
    }
    match node.get("type").and_then(Value::as_str) {
        Some("array") => {
            let items = node.get("items").map(item_shape).unwrap_or_default();
            TypeShape::ArrayOf(Box::new(items))
        }
        Some("string") if node.get("oneOf").is_some() => {
            let values = node
                .get("oneOf")
                .and_then(Value::as_array)
                .map(|members| {
                    members
                        .iter()
                        .filter_map(|m| m.get("name").and_then(Value::as_str))
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();
            TypeShape::InlineEnum(values)
        }
        Some(primitive) => {
            if let Some(pointer) = node.pointer("/items/$ref").and_then(Value::as_str) {
                return TypeShape::Reference(ref_target(pointer));
            }
            TypeShape::Primitive(primitive.to_string())
        }
        None => TypeShape::Unknown,
    }
}

fn item_shape(items: &Value) -> TypeShape {
    if let Some(pointer) = items.get("$ref").and_then(Value::as_str) {
        return TypeShape::Reference(ref_target(pointer));
    }
    match items.get("type").and_then(Value::as_str) {
        Some(primitive) => TypeShape::Primitive(primitive.to_string()),
        None => TypeShape::Unknown,
    }
}
