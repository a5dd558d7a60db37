//! Service ingestion.
//!
//! Walks the merged `x-engine-services` map and builds one interface per
//! named, non-suppressed service, resolving method parameter and response
//! types and synthesizing overload variants and response wrapper classes.
//!
//! Unlike definition ingestion, a failure here aborts the remaining service
//! walk; the caller logs it and continues the pipeline with what was
//! ingested.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::ingest::types::parse_type_shape;
use crate::model::{
    ClassKind, EngineClass, EngineInterface, EngineMethod, EngineParameter, EngineProperty,
    EngineResponse, Entity, Registry, TypeShape, literal_from_value,
};

/// Ingest every service definition from the merged document.
pub fn ingest_services(
    doc: &Value,
    config: &GeneratorConfig,
    registry: &mut Registry,
) -> Result<()> {
    let Some(services) = doc.get("x-engine-services") else {
        warn!("document has no x-engine-services section");
        return Ok(());
    };
    let services = services
        .as_object()
        .ok_or_else(|| Error::service("x-engine-services is not an object"))?;

    for (service_name, node) in services {
        let export = node.get("export").and_then(Value::as_bool).unwrap_or(true);
        if !export {
            continue;
        }
        let mut interface = EngineInterface {
            name: format!("I{service_name}"),
            description: string_field(node, "description"),
            properties: Vec::new(),
            methods: Vec::new(),
        };
        if let Some(methods) = node.get("methods") {
            let methods = methods.as_object().ok_or_else(|| {
                Error::service(format!("methods of service {service_name} is not an object"))
            })?;
            for (method_name, method_node) in methods {
                debug!(service = %service_name, method = %method_name, "ingesting method");
                let method =
                    read_method(service_name, method_name, method_node, config, registry)?;
                interface.methods.extend(synthesize_overloads(method));
            }
        }
        registry.push(Entity::Interface(interface));
    }
    Ok(())
}

fn read_method(
    service_name: &str,
    method_name: &str,
    node: &Value,
    config: &GeneratorConfig,
    registry: &mut Registry,
) -> Result<EngineMethod> {
    let mut method = EngineMethod {
        name: method_name.to_string(),
        description: string_field(node, "description"),
        see_also: string_list(node, "x-engine-see-also"),
        deprecated: node
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        deprecation_note: string_field(node, "x-engine-deprecation-description"),
        ..Default::default()
    };

    if let Some(parameters) = node.get("parameters") {
        let parameters = parameters.as_array().ok_or_else(|| {
            Error::service(format!(
                "parameters of {service_name}.{method_name} is not an array"
            ))
        })?;
        for node in parameters {
            method.parameters.push(read_parameter(
                service_name,
                method_name,
                node,
            )?);
        }
    }

    if let Some(responses) = node.get("responses") {
        let responses = responses.as_array().ok_or_else(|| {
            Error::service(format!(
                "responses of {service_name}.{method_name} is not an array"
            ))
        })?;
        for node in responses {
            method.responses.push(read_response(
                service_name,
                method_name,
                node,
            )?);
        }
    }

    // Tombstoned responses stay in the schema for history only.
    method.responses.retain(|r| !r.delete);

    for response in &method.responses {
        let root_typed = matches!(&response.shape,
            TypeShape::Reference(target) if *target == config.base_object_class);
        if root_typed && response.service.is_none() {
            warn!(
                interface = %format!("I{service_name}"),
                method = %method_name,
                "response returns the root interface without an x-engine-service annotation"
            );
        }
    }

    let needs_wrapper = method.responses.len() > 1
        || (!config.simplified_response && !method.responses.is_empty());
    if needs_wrapper {
        debug!(
            method = %method_name,
            responses = method.responses.len(),
            "synthesizing response wrapper class"
        );
        let wrapper_name = format!("{service_name}{method_name}Response");
        registry.push(Entity::Class(EngineClass {
            name: wrapper_name.clone(),
            description: None,
            see_also: Vec::new(),
            kind: ClassKind::Object,
            properties: method.responses.iter().map(response_property).collect(),
        }));
        method.wrapper = Some(wrapper_name);
    }

    Ok(method)
}

fn read_parameter(
    service_name: &str,
    method_name: &str,
    node: &Value,
) -> Result<EngineParameter> {
    let name = node.get("name").and_then(Value::as_str).ok_or_else(|| {
        Error::service(format!(
            "parameter of {service_name}.{method_name} has no name"
        ))
    })?;
    let mut parameter = EngineParameter {
        name: name.to_string(),
        description: string_field(node, "description"),
        required: node
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        default: node.get("default").and_then(literal_from_value),
        shape: parse_type_shape(node),
    };

    // A string parameter whose items reference an enum takes that enum as
    // its type; its default becomes the qualified member form.
    let enum_typed = node.get("type").and_then(Value::as_str) == Some("string")
        && node.pointer("/items/$ref").is_some();
    if enum_typed
        && let TypeShape::Reference(target) = &parameter.shape
        && let Some(default) = &parameter.default
    {
        let qualified = format!("{target}.{default}");
        parameter.default = Some(qualified);
    }
    Ok(parameter)
}

fn read_response(
    service_name: &str,
    method_name: &str,
    node: &Value,
) -> Result<EngineResponse> {
    let name = node.get("name").and_then(Value::as_str).ok_or_else(|| {
        Error::service(format!(
            "response of {service_name}.{method_name} has no name"
        ))
    })?;
    Ok(EngineResponse {
        name: name.to_string(),
        description: string_field(node, "description"),
        shape: parse_type_shape(node),
        service: string_field(node, "x-engine-service"),
        delete: node.get("delete").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Project a response onto the wrapper class property that mirrors it.
fn response_property(response: &EngineResponse) -> EngineProperty {
    let mut property = EngineProperty {
        name: response.name.clone(),
        description: response.description.clone(),
        ..Default::default()
    };
    match &response.shape {
        TypeShape::Primitive(p) => property.ty = Some(p.clone()),
        TypeShape::Reference(target) => property.reference = Some(target.clone()),
        TypeShape::ArrayOf(inner) => {
            property.ty = Some("array".to_string());
            property.reference = match inner.as_ref() {
                TypeShape::Primitive(p) => Some(p.clone()),
                TypeShape::Reference(target) => Some(target.clone()),
                _ => None,
            };
        }
        TypeShape::InlineEnum(_) => property.ty = Some("string".to_string()),
        TypeShape::Unknown => property.ty = Some("object".to_string()),
    }
    property
}

/// Build the emission-ordered overload set for a method.
///
/// Order: canonical method, generic-return variant, and for methods with at
/// least one parameter a variant taking a single JSON-object parameter plus
/// its generic-return counterpart. Every variant is an independent value
/// copy.
fn synthesize_overloads(method: EngineMethod) -> Vec<EngineMethod> {
    let mut generic = method.clone();
    generic.use_generic = true;

    let mut variants = vec![method.clone(), generic];
    if !method.parameters.is_empty() {
        let mut json_variant = method;
        json_variant.parameters = vec![EngineParameter {
            name: "param".to_string(),
            description: Some("Parameters as JSON object.".to_string()),
            required: true,
            default: None,
            shape: TypeShape::Primitive("object".to_string()),
        }];
        let mut json_generic = json_variant.clone();
        json_generic.use_generic = true;
        variants.push(json_variant);
        variants.push(json_generic);
    }
    variants
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
