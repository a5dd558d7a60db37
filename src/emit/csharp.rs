//! C# declaration rendering.
//!
//! Every entity renders as a block indented one level, ready to drop into
//! the namespace body the emitter driver wraps around a run. Methods render
//! as `Task`-returning interface members; properties carry `DefaultValue`
//! attributes and initializers when the schema declares a default.

use crate::config::{AsyncMode, GeneratorConfig};
use crate::emit::Language;
use crate::emit::doc::DocBuilder;
use crate::link::ModelIndex;
use crate::model::{
    ClassKind, EngineClass, EngineEnum, EngineInterface, EngineMethod, EngineProperty, TypeShape,
};
use crate::util::indented;

/// Map a declared schema kind onto its C# type. Unrecognized names are
/// entity references and pass through unchanged.
pub fn dotnet_type(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "integer" | "int8" => "int".to_string(),
        "boolean" => "bool".to_string(),
        "number" | "double" => "double".to_string(),
        "object" | "jsonobject" => "JObject".to_string(),
        "string" => "string".to_string(),
        _ => name.to_string(),
    }
}

/// C# type for a resolved shape.
pub fn shape_type(shape: &TypeShape) -> String {
    match shape {
        TypeShape::Unknown => "JObject".to_string(),
        TypeShape::Primitive(kind) => dotnet_type(kind),
        TypeShape::Reference(target) => dotnet_type(target),
        TypeShape::ArrayOf(inner) => format!("List<{}>", shape_type(inner)),
        TypeShape::InlineEnum(_) => "string".to_string(),
    }
}

/// Literal used for an optional parameter's default.
///
/// An explicit schema default wins; otherwise the kind's zero value is
/// used so every optional parameter stays optional in the signature.
pub fn default_literal(shape: &TypeShape, default: Option<&str>) -> String {
    if let Some(value) = default {
        // IEEE sentinel the schema uses for "not a number".
        if value == "-1e+300" {
            return "double.NaN".to_string();
        }
        return value.to_string();
    }
    match shape {
        TypeShape::Primitive(kind) => match kind.to_lowercase().as_str() {
            "integer" | "int8" => "0".to_string(),
            "boolean" => "false".to_string(),
            "number" | "double" => "0.0D".to_string(),
            _ => "null".to_string(),
        },
        _ => "null".to_string(),
    }
}

/// Render one enum declaration.
pub fn render_enum(entry: &EngineEnum, config: &GeneratorConfig) -> String {
    let mut builder = DocBuilder::new(config.use_descriptions, Language::CSharp);
    builder.summary = entry.description.clone();
    let mut block = builder.generate(1);
    if !block.is_empty() {
        block.push('\n');
    }
    block.push_str(&indented(&format!("public enum {}", entry.name), 1));
    block.push('\n');
    block.push_str(&indented("{", 1));
    block.push('\n');
    for value in &entry.values {
        match value.constant {
            Some(constant) => {
                block.push_str(&indented(&format!("{} = {constant},", value.name), 2))
            }
            None => block.push_str(&indented(&format!("{},", value.name), 2)),
        }
        block.push('\n');
        if let Some(title) = &value.title
            && title != &value.name
        {
            block.push_str(&indented(&format!("{title} = {},", value.name), 2));
            block.push('\n');
        }
        if let Some(shortcode) = &value.shortcode
            && shortcode != &value.name
        {
            block.push_str(&indented(&format!("{shortcode} = {},", value.name), 2));
            block.push('\n');
        }
    }
    block.push_str(&indented("}", 1));
    block
}

/// Render one service interface declaration.
pub fn render_interface(
    interface: &EngineInterface,
    config: &GeneratorConfig,
) -> String {
    let root = interface.name == config.base_object_interface;
    let mut builder = DocBuilder::new(config.use_descriptions, Language::CSharp);
    builder.summary = interface.description.clone();
    let mut block = builder.generate(1);
    if !block.is_empty() {
        block.push('\n');
    }
    let declaration = if root {
        format!("public interface {}", interface.name)
    } else {
        format!(
            "public interface {} : {}",
            interface.name, config.base_object_interface
        )
    };
    block.push_str(&indented(&declaration, 1));
    block.push('\n');
    block.push_str(&indented("{", 1));
    block.push('\n');

    for property in &interface.properties {
        let doc = property_doc(property, config).generate(2);
        if !doc.is_empty() {
            block.push_str(&doc);
            block.push('\n');
        }
        let result = property_type(property);
        block.push_str(&indented(
            &format!("{result} {} {{ get; set; }}", property.name),
            2,
        ));
        block.push('\n');
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

/// Extra members only the root interface carries: change and close
/// notifications plus a manual change trigger.
fn root_members(config: &GeneratorConfig) -> String {
    let mut block = String::new();
    let mut changed = DocBuilder::new(config.use_descriptions, Language::CSharp);
    changed.summary =
        Some("This event fires to notify subscribers that a change has occurred.".to_string());
    block.push_str(&changed.generate(2));
    if config.use_descriptions {
        block.push('\n');
    }
    block.push_str(&indented("event EventHandler Changed;", 2));
    block.push('\n');

    let mut closed = DocBuilder::new(config.use_descriptions, Language::CSharp);
    closed.summary =
        Some("This event fires when the entity has been removed or deleted.".to_string());
    block.push_str(&closed.generate(2));
    if config.use_descriptions {
        block.push('\n');
    }
    block.push_str(&indented("event EventHandler Closed;", 2));
    block.push('\n');

    let mut on_changed = DocBuilder::new(config.use_descriptions, Language::CSharp);
    on_changed.summary = Some("Manually raises the change notification.".to_string());
    block.push_str(&on_changed.generate(2));
    if config.use_descriptions {
        block.push('\n');
    }
    block.push_str(&indented("void OnChanged();", 2));
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
    if method.deprecated {
        let attribute = match &method.deprecation_note {
            Some(note) => format!("[ObsoleteAttribute(\"{note}\")]"),
            None => "[ObsoleteAttribute]".to_string(),
        };
        block.push_str(&indented(&attribute, 2));
        block.push('\n');
    }

    let mut name = method.name.clone();
    if config.async_mode == AsyncMode::Suffix {
        name.push_str("Async");
    }
    if method.use_generic {
        name.push_str("<T>");
    }

    // Required parameters first; C# rejects optional-before-required.
    let mut parameters: Vec<_> = method.parameters.iter().collect();
    parameters.sort_by_key(|p| !p.required);
    let mut rendered: Vec<String> = parameters
        .iter()
        .map(|p| {
            let ty = shape_type(&p.shape);
            if p.required {
                format!("{ty} {}", p.name)
            } else {
                format!("{ty} {} = {}", p.name, default_literal(&p.shape, p.default.as_deref()))
            }
        })
        .collect();
    if config.cancellation_token {
        rendered.push("CancellationToken? token = null".to_string());
    }

    block.push_str(&indented(
        &format!("{} {name}({});", return_type(method, config), rendered.join(", ")),
        2,
    ));
    block.push('\n');
    block
}

/// Return type of a generated method: the wrapper class when one was
/// synthesized, the single response type otherwise, `Task` for none.
fn return_type(method: &EngineMethod, config: &GeneratorConfig) -> String {
    if method.use_generic {
        return "Task<T>".to_string();
    }
    if let Some(wrapper) = &method.wrapper {
        return format!("Task<{wrapper}>");
    }
    match method.responses.first() {
        Some(response) => {
            let inner = match (&response.shape, &response.service) {
                // Root-typed response exposed as the concrete service interface.
                (TypeShape::Reference(target), Some(service))
                    if *target == config.base_object_class =>
                {
                    format!("I{service}")
                }
                (shape, _) => shape_type(shape),
            };
            format!("Task<{inner}>")
        }
        None => "Task".to_string(),
    }
}

fn method_doc(method: &EngineMethod, config: &GeneratorConfig) -> DocBuilder {
    let mut builder = DocBuilder::new(config.use_descriptions, Language::CSharp);
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
    builder
}

fn property_doc(property: &EngineProperty, config: &GeneratorConfig) -> DocBuilder {
    let mut builder = DocBuilder::new(config.use_descriptions, Language::CSharp);
    builder.summary = property.description.clone();
    builder
}

/// C# type of a property: array properties become typed lists, references
/// win over the declared kind.
fn property_type(property: &EngineProperty) -> String {
    if property.ty.as_deref() == Some("array") {
        let item = property.ref_name().map(dotnet_type);
        return format!("List<{}>", item.unwrap_or_else(|| "JObject".to_string()));
    }
    match property.ref_name() {
        Some(target) => dotnet_type(target),
        None => dotnet_type(property.ty.as_deref().unwrap_or("object")),
    }
}

/// Render one class declaration.
pub fn render_class(
    class: &EngineClass,
    config: &GeneratorConfig,
    index: &ModelIndex,
) -> String {
    let mut builder = DocBuilder::new(config.use_descriptions, Language::CSharp);
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
                Some(target) => dotnet_type(target),
                None => dotnet_type(p.ty.as_deref().unwrap_or("object")),
            })
            .unwrap_or_else(|| "JObject".to_string());
        block.push_str(&indented(
            &format!("public class {} : List<{item}>", class.name),
            1,
        ));
        block.push('\n');
        block.push_str(&indented("{", 1));
        block.push('\n');
        block.push_str(&indented("}", 1));
        return block;
    }

    block.push_str(&indented(&format!("public class {}", class.name), 1));
    block.push('\n');
    block.push_str(&indented("{", 1));
    block.push('\n');
    if !class.properties.is_empty() {
        block.push_str(&indented("#region Properties", 2));
        block.push('\n');
        for property in &class.properties {
            block.push_str(&render_property(property, config, index));
        }
        block.push_str(&indented("#endregion", 2));
        block.push('\n');
    }
    block.push_str(&indented("}", 1));
    block
}

fn render_property(
    property: &EngineProperty,
    config: &GeneratorConfig,
    index: &ModelIndex,
) -> String {
    let mut block = String::new();
    let doc = property_doc(property, config).generate(2);
    if !doc.is_empty() {
        block.push_str(&doc);
        block.push('\n');
    }

    let d_value = property.default.as_ref().map(|default| {
        if property.enum_typed {
            property
                .ref_name()
                .and_then(|target| index.enum_default(target, default))
                .unwrap_or_else(|| default.clone())
        } else {
            default.to_lowercase()
        }
    });

    if let Some(value) = &d_value {
        block.push_str(&indented(&format!("[DefaultValue({value})]"), 2));
        block.push('\n');
    }

    let result = property_type(property);
    let mut line = format!("public {result} {} {{ get; set; }}", property.name);
    if let Some(value) = &d_value {
        line.push_str(&format!(" = {value};"));
    }
    block.push_str(&indented(&line, 2));
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EngineEnumValue, EngineParameter, EngineResponse, Entity, Registry};

    fn quiet_config() -> GeneratorConfig {
        GeneratorConfig {
            use_descriptions: false,
            ..Default::default()
        }
    }

    fn empty_index() -> ModelIndex {
        ModelIndex::build(&Registry::new())
    }

    #[test]
    fn test_dotnet_type_map() {
        assert_eq!(dotnet_type("integer"), "int");
        assert_eq!(dotnet_type("int8"), "int");
        assert_eq!(dotnet_type("boolean"), "bool");
        assert_eq!(dotnet_type("number"), "double");
        assert_eq!(dotnet_type("object"), "JObject");
        assert_eq!(dotnet_type("JsonObject"), "JObject");
        assert_eq!(dotnet_type("NxCell"), "NxCell");
    }

    #[test]
    fn test_render_enum_member_forms() {
        let entry = EngineEnum {
            name: "NxGrpType".into(),
            description: None,
            values: vec![
                EngineEnumValue {
                    name: "GRP_NX_NONE".into(),
                    constant: Some(0),
                    title: Some("None".into()),
                    shortcode: Some("N".into()),
                    ..Default::default()
                },
                EngineEnumValue {
                    name: "GRP_NX_COLLECTION".into(),
                    ..Default::default()
                },
            ],
        };
        let block = render_enum(&entry, &quiet_config());
        assert!(block.contains("    public enum NxGrpType"));
        assert!(block.contains("        GRP_NX_NONE = 0,"));
        assert!(block.contains("        None = GRP_NX_NONE,"));
        assert!(block.contains("        N = GRP_NX_NONE,"));
        assert!(block.contains("        GRP_NX_COLLECTION,"));
    }

    #[test]
    fn test_method_signature_with_optional_parameter() {
        let method = EngineMethod {
            name: "GetLayout".into(),
            parameters: vec![
                EngineParameter {
                    name: "qPath".into(),
                    required: false,
                    shape: TypeShape::Primitive("string".into()),
                    ..Default::default()
                },
                EngineParameter {
                    name: "qId".into(),
                    required: true,
                    shape: TypeShape::Primitive("string".into()),
                    ..Default::default()
                },
            ],
            responses: vec![EngineResponse {
                name: "qLayout".into(),
                shape: TypeShape::Reference("GenericObjectLayout".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let block = render_method(&method, &quiet_config());
        // Required parameter ordered first, optional gets its zero default.
        assert!(block.contains(
            "        Task<GenericObjectLayout> GetLayout(string qId, string qPath = null);"
        ));
    }

    #[test]
    fn test_generic_overload_returns_task_t() {
        let method = EngineMethod {
            name: "GetLayout".into(),
            use_generic: true,
            ..Default::default()
        };
        let block = render_method(&method, &quiet_config());
        assert!(block.contains("Task<T> GetLayout<T>();"));
    }

    #[test]
    fn test_wrapper_overrides_return_type() {
        let method = EngineMethod {
            name: "GetHyperCubeData".into(),
            wrapper: Some("DocGetHyperCubeDataResponse".into()),
            responses: vec![EngineResponse::default(), EngineResponse::default()],
            ..Default::default()
        };
        let block = render_method(&method, &quiet_config());
        assert!(block.contains("Task<DocGetHyperCubeDataResponse> GetHyperCubeData();"));
    }

    #[test]
    fn test_root_typed_response_uses_service_interface() {
        let method = EngineMethod {
            name: "CreateObject".into(),
            responses: vec![EngineResponse {
                name: "qReturn".into(),
                shape: TypeShape::Reference("ObjectInterface".into()),
                service: Some("GenericObject".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let block = render_method(&method, &quiet_config());
        assert!(block.contains("Task<IGenericObject> CreateObject();"));
    }

    #[test]
    fn test_async_suffix_and_cancellation_token() {
        let config = GeneratorConfig {
            use_descriptions: false,
            async_mode: AsyncMode::Suffix,
            cancellation_token: true,
            ..Default::default()
        };
        let method = EngineMethod {
            name: "Abort".into(),
            ..Default::default()
        };
        let block = render_method(&method, &config);
        assert!(block.contains("Task AbortAsync(CancellationToken? token = null);"));
    }

    #[test]
    fn test_deprecated_method_gets_obsolete_attribute() {
        let method = EngineMethod {
            name: "Old".into(),
            deprecated: true,
            deprecation_note: Some("Use New instead.".into()),
            ..Default::default()
        };
        let block = render_method(&method, &quiet_config());
        assert!(block.contains("        [ObsoleteAttribute(\"Use New instead.\")]"));
    }

    #[test]
    fn test_class_with_enum_default() {
        let mut registry = Registry::new();
        registry.push(Entity::Enum(EngineEnum {
            name: "NxGrpType".into(),
            description: None,
            values: vec![EngineEnumValue {
                name: "GRP_NX_NONE".into(),
                ..Default::default()
            }],
        }));
        let index = ModelIndex::build(&registry);

        let class = EngineClass {
            name: "NxField".into(),
            properties: vec![
                EngineProperty {
                    name: "qType".into(),
                    reference: Some("#/components/schemas/NxGrpType".into()),
                    default: Some("GRP_NX_NONE".into()),
                    enum_typed: true,
                    ..Default::default()
                },
                EngineProperty {
                    name: "qHidden".into(),
                    ty: Some("boolean".into()),
                    default: Some("false".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let block = render_class(&class, &quiet_config(), &index);
        assert!(block.contains("        #region Properties"));
        assert!(block.contains("        [DefaultValue(NxGrpType.GRP_NX_NONE)]"));
        assert!(block.contains(
            "        public NxGrpType qType { get; set; } = NxGrpType.GRP_NX_NONE;"
        ));
        assert!(block.contains("        public bool qHidden { get; set; } = false;"));
        assert!(block.contains("        #endregion"));
    }

    #[test]
    fn test_array_class_extends_list() {
        let class = EngineClass {
            name: "NxCells".into(),
            kind: ClassKind::Array,
            properties: vec![EngineProperty {
                name: "items".into(),
                reference: Some("#/components/schemas/NxCell".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let block = render_class(&class, &quiet_config(), &empty_index());
        assert!(block.contains("    public class NxCells : List<NxCell>"));
    }

    #[test]
    fn test_array_property_renders_as_list() {
        let class = EngineClass {
            name: "NxPage".into(),
            properties: vec![EngineProperty {
                name: "qCells".into(),
                ty: Some("array".into()),
                reference: Some("NxCell".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let block = render_class(&class, &quiet_config(), &empty_index());
        assert!(block.contains("        public List<NxCell> qCells { get; set; }"));
    }

    #[test]
    fn test_root_interface_members() {
        let config = quiet_config();
        let interface = EngineInterface {
            name: "IObjectInterface".into(),
            ..Default::default()
        };
        let block = render_interface(&interface, &config);
        assert!(block.contains("    public interface IObjectInterface\n"));
        assert!(!block.contains(": IObjectInterface\n"));
        assert!(block.contains("        event EventHandler Changed;"));
        assert!(block.contains("        event EventHandler Closed;"));
        assert!(block.contains("        void OnChanged();"));
    }

    #[test]
    fn test_service_interface_extends_root() {
        let interface = EngineInterface {
            name: "IDoc".into(),
            ..Default::default()
        };
        let block = render_interface(&interface, &quiet_config());
        assert!(block.contains("    public interface IDoc : IObjectInterface"));
        assert!(!block.contains("event EventHandler"));
    }
}
