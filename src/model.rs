//! In-memory model built from the merged schema document.
//!
//! The registry is a flat, ordered collection of top-level entities tagged
//! enum / class / interface. It is rebuilt from empty on every run, filled
//! by the two ingestors, annotated by the linker, and read-only during
//! emission.

use serde::Deserialize;
use serde_json::Value;

/// Tag for a top-level registry entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Enum,
    Class,
    Interface,
}

/// Fully resolved type of a property, parameter, or response after
/// following array / reference / schema indirections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// No type information on the node.
    Unknown,
    /// Plain primitive kind as declared (`string`, `integer`, ...).
    Primitive(String),
    /// Array of an element shape.
    ArrayOf(Box<TypeShape>),
    /// Reference to a named schema entity.
    Reference(String),
    /// Closed string value set declared inline.
    InlineEnum(Vec<String>),
}

impl Default for TypeShape {
    fn default() -> Self {
        TypeShape::Unknown
    }
}

/// One member of an enum definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineEnumValue {
    pub name: String,
    pub description: Option<String>,
    pub title: Option<String>,
    /// Explicit numeric constant.
    #[serde(rename = "x-engine-const")]
    pub constant: Option<i64>,
    /// Shortcode alias.
    #[serde(rename = "enumShort")]
    pub shortcode: Option<String>,
}

/// A named closed value set.
#[derive(Debug, Clone, Default)]
pub struct EngineEnum {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EngineEnumValue>,
}

/// Whether a class definition declares an object or an array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassKind {
    #[default]
    Object,
    Array,
}

/// A property inside a class or interface.
#[derive(Debug, Clone, Default)]
pub struct EngineProperty {
    pub name: String,
    pub description: Option<String>,
    /// Declared primitive kind (`boolean`, `array`, ...).
    pub ty: Option<String>,
    pub format: Option<String>,
    pub required: bool,
    pub default: Option<String>,
    /// Default recorded because the description implied one.
    pub default_from_description: Option<String>,
    /// Reference target: a `$ref` pointer or a resolved array item type.
    pub reference: Option<String>,
    /// Set by the linker when the reference target is an enum entity.
    pub enum_typed: bool,
}

impl EngineProperty {
    /// Last segment of the reference pointer, if any.
    pub fn ref_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .map(|r| r.rsplit('/').next().unwrap_or(r))
    }
}

/// A method parameter.
#[derive(Debug, Clone, Default)]
pub struct EngineParameter {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub default: Option<String>,
    pub shape: TypeShape,
}

/// A method response.
#[derive(Debug, Clone, Default)]
pub struct EngineResponse {
    pub name: String,
    pub description: Option<String>,
    pub shape: TypeShape,
    /// Concrete interface a root-typed reference should be exposed as.
    pub service: Option<String>,
    /// Tombstone: kept in the schema for history, excluded from output.
    pub delete: bool,
}

/// A service method with its synthesized overload state.
#[derive(Debug, Clone, Default)]
pub struct EngineMethod {
    pub name: String,
    pub description: Option<String>,
    pub see_also: Vec<String>,
    pub deprecated: bool,
    pub deprecation_note: Option<String>,
    pub parameters: Vec<EngineParameter>,
    pub responses: Vec<EngineResponse>,
    /// Caller supplies the return type parameter.
    pub use_generic: bool,
    /// Name of the synthesized response wrapper class, when one exists.
    pub wrapper: Option<String>,
}

/// An object-or-array class definition.
#[derive(Debug, Clone, Default)]
pub struct EngineClass {
    pub name: String,
    pub description: Option<String>,
    pub see_also: Vec<String>,
    pub kind: ClassKind,
    pub properties: Vec<EngineProperty>,
}

/// A service interface.
#[derive(Debug, Clone, Default)]
pub struct EngineInterface {
    pub name: String,
    pub description: Option<String>,
    pub properties: Vec<EngineProperty>,
    pub methods: Vec<EngineMethod>,
}

/// A top-level registry entity.
#[derive(Debug, Clone)]
pub enum Entity {
    Enum(EngineEnum),
    Class(EngineClass),
    Interface(EngineInterface),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Enum(_) => EntityKind::Enum,
            Entity::Class(_) => EntityKind::Class,
            Entity::Interface(_) => EntityKind::Interface,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Enum(e) => &e.name,
            Entity::Class(c) => &c.name,
            Entity::Interface(i) => &i.name,
        }
    }
}

/// Flat ordered collection of all ingested entities for one run.
#[derive(Debug, Default)]
pub struct Registry {
    entities: Vec<Entity>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EngineEnum> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Enum(v) => Some(v),
            _ => None,
        })
    }

    pub fn enums_mut(&mut self) -> impl Iterator<Item = &mut EngineEnum> {
        self.entities.iter_mut().filter_map(|e| match e {
            Entity::Enum(v) => Some(v),
            _ => None,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &EngineClass> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Class(v) => Some(v),
            _ => None,
        })
    }

    pub fn classes_mut(&mut self) -> impl Iterator<Item = &mut EngineClass> {
        self.entities.iter_mut().filter_map(|e| match e {
            Entity::Class(v) => Some(v),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &EngineInterface> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Interface(v) => Some(v),
            _ => None,
        })
    }
}

/// Render a JSON scalar as the literal string the emitters work with.
pub fn literal_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null => Some("null".to_string()),
        _ => None,
    }
}

/// Last segment of a `$ref` pointer (`#/components/schemas/X` -> `X`).
pub fn ref_target(pointer: &str) -> String {
    pointer.rsplit('/').next().unwrap_or(pointer).to_string()
}
