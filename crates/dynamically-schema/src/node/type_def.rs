use crate::prelude::*;
use std::ops::Not;

///
/// TypeDef
///
/// One named type in a module's type graph. Only `Record` kinds are
/// candidates for factory generation; the others exist so record fields can
/// point at them.
///
/// `extendable` is set by the host when the type is declared in the
/// generating module and can therefore receive a generated inherent `impl`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeDef {
    pub id: TypeId,

    #[serde(default)]
    pub kind: TypeKind,

    #[serde(default)]
    pub accessibility: Accessibility,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub extendable: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<Constructor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<Method>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<TypeDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl TypeDef {
    #[must_use]
    pub const fn new(id: TypeId) -> Self {
        Self {
            id,
            kind: TypeKind::Record,
            accessibility: Accessibility::Public,
            extendable: false,
            constructors: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
            location: None,
        }
    }

    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record)
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.id.module
    }
}

///
/// Constructor
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Constructor {
    #[serde(default)]
    pub kind: ConstructorKind,

    #[serde(default)]
    pub accessibility: Accessibility,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
}

impl Constructor {
    #[must_use]
    pub const fn new(kind: ConstructorKind, params: Vec<Param>) -> Self {
        Self {
            kind,
            accessibility: Accessibility::Public,
            params,
        }
    }

    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name.eq_ignore_ascii_case(name))
    }
}

///
/// ConstructorKind
///
/// How the constructor is invoked:
/// - `Struct`: `T { a, b }` with parameter names as field names
/// - `Tuple`: `T(a, b)`
/// - `Function(name)`: `T::name(a, b)`
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorKind {
    #[default]
    Struct,
    Tuple,
    Function(String),
}

///
/// Param
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

///
/// Property
/// A named member that can be assigned after construction.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub ty: TypeRef,

    #[serde(default = "settable_default")]
    pub settable: bool,

    #[serde(default)]
    pub accessibility: Accessibility,
}

const fn settable_default() -> bool {
    true
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            settable: true,
            accessibility: Accessibility::Public,
        }
    }
}

///
/// Method
///
/// A declared method. Factories are associated functions (no receiver)
/// taking exactly one `Dynamic` parameter.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Method {
    pub name: String,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub receiver: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeRef>,

    #[serde(default)]
    pub accessibility: Accessibility,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Method {
    /// An associated function `name(value: &Value)` with the given visibility.
    pub fn factory(name: impl Into<String>, accessibility: Accessibility) -> Self {
        Self {
            name: name.into(),
            receiver: false,
            params: vec![TypeRef::Dynamic],
            accessibility,
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Associated, single-parameter, untyped.
    #[must_use]
    pub fn is_factory_shaped(&self) -> bool {
        !self.receiver && matches!(self.params.as_slice(), [TypeRef::Dynamic])
    }
}
