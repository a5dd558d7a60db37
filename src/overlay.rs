//! Overlay merge.
//!
//! Deep-merges an optional overlay document onto the base schema, then
//! collapses same-named duplicates inside method parameter and response
//! arrays that the concatenating merge may have produced. Any traversal
//! failure is fatal for the whole step; no partially merged document is
//! handed to ingestion.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Deep-merge `overlay` onto `base`.
///
/// Objects merge recursively, arrays concatenate, and scalar conflicts
/// resolve in favor of the overlay.
pub fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            base_items.extend(overlay_items);
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}

/// Collapse entries sharing a `name` key: later duplicates merge onto the
/// first occurrence (later field values win), are removed, and the first
/// occurrence keeps its position.
///
/// With a filter, a duplicate group is only collapsed when one of its
/// entries carries at least one of the filter field names; same-named
/// siblings without them are legitimate and left alone.
pub fn collapse_named_duplicates(array: &mut Vec<Value>, filter: Option<&[String]>) {
    let mut index = 0;
    while index < array.len() {
        let Some(name) = array[index]
            .get("name")
            .and_then(Value::as_str)
            .map(String::from)
        else {
            index += 1;
            continue;
        };
        let duplicate_positions: Vec<usize> = (index + 1..array.len())
            .filter(|&j| array[j].get("name").and_then(Value::as_str) == Some(name.as_str()))
            .collect();
        if duplicate_positions.is_empty() {
            index += 1;
            continue;
        }
        let qualifies = match filter {
            None => true,
            Some(fields) => std::iter::once(index)
                .chain(duplicate_positions.iter().copied())
                .any(|j| fields.iter().any(|f| array[j].get(f).is_some())),
        };
        if qualifies {
            debug!(name = %name, count = duplicate_positions.len() + 1, "collapsing duplicate entries");
            let duplicates: Vec<Value> = duplicate_positions
                .iter()
                .map(|&j| array[j].clone())
                .collect();
            for &j in duplicate_positions.iter().rev() {
                array.remove(j);
            }
            for duplicate in duplicates {
                merge(&mut array[index], duplicate);
            }
        }
        index += 1;
    }
}

/// Merge the overlay onto the base document and collapse duplicates inside
/// every method's parameter and response arrays.
pub fn merge_documents(
    base: &mut Value,
    overlay: Option<Value>,
    merge_fields: Option<&[String]>,
) -> Result<()> {
    if let Some(overlay) = overlay {
        merge(base, overlay);
    }
    collapse_method_arrays(base, merge_fields)
}

fn collapse_method_arrays(doc: &mut Value, filter: Option<&[String]>) -> Result<()> {
    let Some(services) = doc.get_mut("x-engine-services") else {
        return Ok(());
    };
    let services = services
        .as_object_mut()
        .ok_or_else(|| Error::merge("x-engine-services is not an object"))?;
    for (service_name, service) in services.iter_mut() {
        let Some(methods) = service.get_mut("methods") else {
            continue;
        };
        let methods = methods.as_object_mut().ok_or_else(|| {
            Error::merge(format!("methods of service {service_name} is not an object"))
        })?;
        for (method_name, method) in methods.iter_mut() {
            for key in ["parameters", "responses"] {
                let Some(node) = method.get_mut(key) else {
                    continue;
                };
                let array = node.as_array_mut().ok_or_else(|| {
                    Error::merge(format!(
                        "{key} of {service_name}.{method_name} is not an array"
                    ))
                })?;
                collapse_named_duplicates(array, filter);
            }
        }
    }
    Ok(())
}
