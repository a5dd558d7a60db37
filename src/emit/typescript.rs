//! TypeScript declaration rendering.
//!
//! Declarations mirror the C# output as an ambient `.d.ts` surface: enums
//! become string-literal unions, classes and services become interfaces,
//! and methods return promises with first-letter-lowercased names.

use crate::config::GeneratorConfig;
use crate::emit::Language;
use crate::emit::doc::DocBuilder;
use crate::model::{
    ClassKind, EngineClass, EngineEnum, EngineInterface, EngineMethod, EngineProperty, TypeShape,
};
use crate::util::{indented, lower_first, split_to_lines};

/// Column budget for a union type line before it wraps.
const UNION_LINE_WIDTH: usize = 194;

/// Map a declared schema kind onto its TypeScript type. Unrecognized names
/// are entity references and pass through unchanged.
pub fn typescript_type(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "integer" | "int8" | "number" | "double" => "number".to_string(),
        "boolean" => "boolean".to_string(),
        "string" => "string".to_string(),
        "object" | "jsonobject" => "any".to_string(),
        _ => name.to_string(),
    }
}

/// TypeScript type for a resolved shape.
pub fn shape_type(shape: &TypeShape) -> String {
    match shape {
        TypeShape::Unknown => "any".to_string(),
        TypeShape::Primitive(kind) => typescript_type(kind),
        TypeShape::Reference(target) => typescript_type(target),
        TypeShape::ArrayOf(inner) => format!("{}[]", shape_type(inner)),
        TypeShape::InlineEnum(_) => "string".to_string(),
    }
}

/// Render one enum as a string-literal union type.
///
/// Member names and display titles both become literals. The line wraps at
/// the union column budget with tab-indented continuations.
pub fn render_enum(entry: &EngineEnum, config: &GeneratorConfig) -> String {
    let mut builder = DocBuilder::new(config.use_descriptions, Language::TypeScript);
    builder.summary = entry.description.clone();
    let mut block = builder.generate(1);
    if !block.is_empty() {
        block.push('\n');
    }

    let mut literals = Vec::new();
    for value in &entry.values {
        literals.push(format!("\"{}\"", value.name));
        if let Some(title) = &value.title
            && title != &value.name
        {
            literals.push(format!("\"{title}\""));
        }
    }
    let type_line = format!("type {} = {};", entry.name, literals.join(" | "));
    let lines = split_to_lines(&type_line, UNION_LINE_WIDTH);
    let mut iter = lines.into_iter();
    if let Some(first) = iter.next() {
        block.push_str(&indented(&first, 1));
    }
    for continuation in iter {
        block.push('\n');
        block.push('\t');
        block.push_str(&continuation);
    }
    block
}

/// Render one service interface declaration.
pub fn render_interface(
    interface: &EngineInterface,
    config: &GeneratorConfig,
) -> String {
    let root = interface.name == config.base_object_interface;
    let mut builder = DocBuilder::new(config.use_descriptions, Language::TypeScript);
    builder.summary = interface.description.clone();
    let mut block = builder.generate(1);
    if !block.is_empty() {
        block.push('\n');
    }
    let declaration = if root {
        format!("interface {} {{", interface.name)
    } else {
        format!(
            "interface {} extends {} {{",
            interface.name, config.base_object_interface
        )
    };
    block.push_str(&indented(&declaration, 1));
    block.push('\n');

    for property in &interface.properties {
        block.push_str(&render_property(property, config));
    }
    for method in &interface.methods {
        block.push_str(&render_method(method, config));
    }
    if root {
        block.push_str(&root_members(config));
    }

    block.push_str(&indented("}", 1));
    block
}

/// Change and close subscriptions plus the manual trigger, only on the
/// root interface.
fn root_members(config: &GeneratorConfig) -> String {
    let mut block = String::new();
    let mut changed = DocBuilder::new(config.use_descriptions, Language::TypeScript);
    changed.summary =
        Some("This event fires to notify subscribers that a change has occurred.".to_string());
    block.push_str(&changed.generate(2));
    if config.use_descriptions {
        block.push('\n');
    }
    block.push_str(&indented("changed(fn: () => void): void;", 2));
    block.push('\n');

    let mut closed = DocBuilder::new(config.use_descriptions, Language::TypeScript);
    closed.summary =
        Some("This event fires when the entity has been removed or deleted.".to_string());
    block.push_str(&closed.generate(2));
    if config.use_descriptions {
        block.push('\n');
    }
    block.push_str(&indented("closed(fn: () => void): void;", 2));
    block.push('\n');

    let mut on_changed = DocBuilder::new(config.use_descriptions, Language::TypeScript);
    on_changed.summary = Some("Manually raises the change notification.".to_string());
    block.push_str(&on_changed.generate(2));
    if config.use_descriptions {
        block.push('\n');
    }
    block.push_str(&indented("onChanged(): void;", 2));
    block.push('\n');
    block
}

fn render_method(method: &EngineMethod, config: &GeneratorConfig) -> String {
    let mut block = String::new();
    let doc = method_doc(method, config).generate(2);
    if !doc.is_empty() {
        block.push_str(&doc);
        block.push('\n');
    }

    let mut name = lower_first(&method.name);
    if method.use_generic {
        name.push_str("<T>");
    }

    // Optional parameters must trail required ones in a signature.
    let mut parameters: Vec<_> = method.parameters.iter().collect();
    parameters.sort_by_key(|p| !p.required);
    let rendered: Vec<String> = parameters
        .iter()
        .map(|p| {
            let marker = if p.required { "" } else { "?" };
            format!("{}{marker}: {}", p.name, shape_type(&p.shape))
        })
        .collect();

    block.push_str(&indented(
        &format!("{name}({}): {};", rendered.join(", "), return_type(method, config)),
        2,
    ));
    block.push('\n');
    block
}

fn return_type(method: &EngineMethod, config: &GeneratorConfig) -> String {
    if method.use_generic {
        return "Promise<T>".to_string();
    }
    if let Some(wrapper) = &method.wrapper {
        return format!("Promise<{wrapper}>");
    }
    match method.responses.first() {
        Some(response) => {
            let inner = match (&response.shape, &response.service) {
                (TypeShape::Reference(target), Some(service))
                    if *target == config.base_object_class =>
                {
                    format!("I{service}")
                }
                (shape, _) => shape_type(shape),
            };
            format!("Promise<{inner}>")
        }
        None => "Promise<void>".to_string(),
    }
}

fn method_doc(method: &EngineMethod, config: &GeneratorConfig) -> DocBuilder {
    let mut builder = DocBuilder::new(config.use_descriptions, Language::TypeScript);
    builder.summary = method.description.clone();
    builder.see_also = method.see_also.clone();
    builder.params = method
        .parameters
        .iter()
        .map(|p| (p.name.clone(), p.description.clone().unwrap_or_default()))
        .collect();
    builder.returns = method
        .responses
        .first()
        .and_then(|r| r.description.clone());
    if method.deprecated {
        builder.deprecation = Some(
            method
                .deprecation_note
                .clone()
                .unwrap_or_else(|| "Deprecated.".to_string()),
        );
    }
    builder
}

fn render_property(property: &EngineProperty, config: &GeneratorConfig) -> String {
    let mut block = String::new();
    let mut builder = DocBuilder::new(config.use_descriptions, Language::TypeScript);
    builder.summary = property.description.clone();
    let doc = builder.generate(2);
    if !doc.is_empty() {
        block.push_str(&doc);
        block.push('\n');
    }
    block.push_str(&indented(
        &format!("{}: {};", property.name, property_type(property)),
        2,
    ));
    block.push('\n');
    block
}

fn property_type(property: &EngineProperty) -> String {
    if property.ty.as_deref() == Some("array") {
        let item = property
            .ref_name()
            .map(typescript_type)
            .unwrap_or_else(|| "any".to_string());
        return format!("{item}[]");
    }
    match property.ref_name() {
        Some(target) => typescript_type(target),
        None => typescript_type(property.ty.as_deref().unwrap_or("object")),
    }
}

/// Render one class as an ambient interface declaration.
pub fn render_class(class: &EngineClass, config: &GeneratorConfig) -> String {
    let mut builder = DocBuilder::new(config.use_descriptions, Language::TypeScript);
    builder.summary = class.description.clone();
    builder.see_also = class.see_also.clone();
    let mut block = builder.generate(1);
    if !block.is_empty() {
        block.push('\n');
    }

    if class.kind == ClassKind::Array {
        let item = class
            .properties
            .first()
            .map(|p| match p.ref_name() {
                Some(target) => typescript_type(target),
                None => typescript_type(p.ty.as_deref().unwrap_or("object")),
            })
            .unwrap_or_else(|| "any".to_string());
        block.push_str(&indented(
            &format!("interface {} extends Array<{item}> {{", class.name),
            1,
        ));
        block.push('\n');
        block.push_str(&indented("}", 1));
        return block;
    }

    block.push_str(&indented(&format!("interface {} {{", class.name), 1));
    block.push('\n');
    for property in &class.properties {
        block.push_str(&render_property(property, config));
    }
    block.push_str(&indented("}", 1));
    block
}
