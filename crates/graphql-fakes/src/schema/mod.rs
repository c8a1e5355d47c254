//! Type-system facts the resolvers consult: kinds, wrapping types, possible types and the
//! markers telling which types and fields come from the extension SDL.

mod builder;

use indexmap::IndexMap;
use serde_json::Value;

pub(crate) const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// An output or input type with its list and non-null wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrappedType {
    Named(String),
    List(Box<WrappedType>),
    NonNull(Box<WrappedType>),
}

impl WrappedType {
    pub fn named(name: impl Into<String>) -> Self {
        WrappedType::Named(name.into())
    }

    pub fn list(inner: WrappedType) -> Self {
        WrappedType::List(Box::new(inner))
    }

    pub fn non_null(inner: WrappedType) -> Self {
        WrappedType::NonNull(Box::new(inner))
    }

    /// The innermost type name, with every wrapper removed.
    pub fn named_type(&self) -> &str {
        match self {
            WrappedType::Named(name) => name,
            WrappedType::List(inner) | WrappedType::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, WrappedType::NonNull(_))
    }

    /// The type with its outermost non-null wrapper removed.
    pub fn nullable(&self) -> &WrappedType {
        match self {
            WrappedType::NonNull(inner) => inner,
            other => other,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.nullable(), WrappedType::List(_))
    }

    /// The element type of a (possibly non-null) list.
    pub fn list_item(&self) -> Option<&WrappedType> {
        match self.nullable() {
            WrappedType::List(inner) => Some(inner),
            _ => None,
        }
    }
}

impl std::fmt::Display for WrappedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WrappedType::Named(name) => f.write_str(name),
            WrappedType::List(inner) => write!(f, "[{inner}]"),
            WrappedType::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Scalar,
    Enum(Vec<String>),
    Object { implements: Vec<String> },
    Interface { implements: Vec<String> },
    Union { members: Vec<String> },
    InputObject,
}

impl TypeKind {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Enum(_) => "enum",
            TypeKind::Object { .. } => "type",
            TypeKind::Interface { .. } => "interface",
            TypeKind::Union { .. } => "union",
            TypeKind::InputObject => "input",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDefinition {
    pub name: String,
    pub ty: WrappedType,
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: WrappedType,
    pub arguments: Vec<InputValueDefinition>,
    /// Declared in the extension SDL, so the generated records don't carry it.
    pub is_extension_field: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    /// Output fields of objects and interfaces.
    pub fields: IndexMap<String, FieldDefinition>,
    /// Fields of input objects.
    pub input_fields: IndexMap<String, InputValueDefinition>,
    pub is_new_type: bool,
}

impl TypeDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }
}

/// The merged schema: base SDL plus the optional extension SDL.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    types: IndexMap<String, TypeDefinition>,
    query_type: String,
    mutation_type: Option<String>,
}

impl SchemaModel {
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.types.get(type_name).and_then(|ty| ty.field(field_name))
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        name == self.query_type || self.is_mutation_type(name)
    }

    pub fn is_mutation_type(&self, name: &str) -> bool {
        self.mutation_type.as_deref() == Some(name)
    }

    pub fn is_abstract(&self, name: &str) -> bool {
        matches!(
            self.types.get(name).map(|ty| &ty.kind),
            Some(TypeKind::Interface { .. } | TypeKind::Union { .. })
        )
    }

    pub fn is_object(&self, name: &str) -> bool {
        matches!(self.types.get(name).map(|ty| &ty.kind), Some(TypeKind::Object { .. }))
    }

    pub fn is_composite(&self, name: &str) -> bool {
        self.is_object(name) || self.is_abstract(name)
    }

    /// Scalars, including the built-in ones, and enums.
    pub fn is_leaf(&self, name: &str) -> bool {
        match self.types.get(name) {
            Some(ty) => matches!(ty.kind, TypeKind::Scalar | TypeKind::Enum(_)),
            None => BUILTIN_SCALARS.contains(&name),
        }
    }

    pub fn enum_values(&self, name: &str) -> Option<&[String]> {
        match self.types.get(name).map(|ty| &ty.kind) {
            Some(TypeKind::Enum(values)) => Some(values),
            _ => None,
        }
    }

    /// Concrete object types an abstract type can resolve to, in declaration order.
    ///
    /// Union members come in the order of the union definition, interface implementors in the
    /// order the objects are defined. An object type is its own single possible type.
    pub fn possible_types<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        match self.types.get(name).map(|ty| &ty.kind) {
            Some(TypeKind::Union { members }) => members.iter().map(String::as_str).collect(),
            Some(TypeKind::Interface { .. }) => self
                .types
                .values()
                .filter(|ty| matches!(&ty.kind, TypeKind::Object { implements } if implements.iter().any(|i| i == name)))
                .map(|ty| ty.name.as_str())
                .collect(),
            Some(TypeKind::Object { .. }) => vec![name],
            _ => Vec::new(),
        }
    }

    /// Types declared in the extension SDL, as sent to the mock data generator.
    pub fn new_types(&self) -> IndexMap<String, bool> {
        self.types
            .values()
            .filter(|ty| ty.is_new_type)
            .map(|ty| (ty.name.clone(), true))
            .collect()
    }

    /// Fields declared in the extension SDL, grouped by their parent type.
    pub fn extended_fields(&self) -> IndexMap<String, IndexMap<String, bool>> {
        self.types
            .values()
            .filter_map(|ty| {
                let fields = ty
                    .fields
                    .values()
                    .filter(|field| field.is_extension_field)
                    .map(|field| (field.name.clone(), true))
                    .collect::<IndexMap<_, _>>();

                (!fields.is_empty()).then(|| (ty.name.clone(), fields))
            })
            .collect()
    }
}
