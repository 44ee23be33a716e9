use crate::prelude::*;
use std::fmt;

///
/// TypeRef
///
/// The declared type of a constructor parameter, property, or method
/// parameter.
///
/// - `Array` is a fixed, materialized sequence (`Box<[T]>`).
/// - `Generic` covers every parameterized type; whether it counts as a
///   sequence shape is decided by the generator configuration.
/// - `Dynamic` is the untyped field-bag (`&dynamically::Value`).
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Scalar(Scalar),
    Record(TypeId),
    Array(Box<TypeRef>),
    Generic { path: String, args: Vec<TypeRef> },
    Dynamic,
    Opaque(String),
}

impl TypeRef {
    #[must_use]
    pub const fn scalar(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }

    #[must_use]
    pub const fn record(id: TypeId) -> Self {
        Self::Record(id)
    }

    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn generic(path: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Generic {
            path: path.into(),
            args,
        }
    }

    #[must_use]
    pub const fn as_record(&self) -> Option<&TypeId> {
        match self {
            Self::Record(id) => Some(id),
            _ => None,
        }
    }

    /// Container path and element of a single-parameter generic.
    #[must_use]
    pub fn single_parameter(&self) -> Option<(&str, &Self)> {
        match self {
            Self::Generic { path, args } if args.len() == 1 => Some((path.as_str(), &args[0])),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{scalar}"),
            Self::Record(id) => write!(f, "{id}"),
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Generic { path, args } => {
                write!(f, "{path}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            Self::Dynamic => write!(f, "dynamic"),
            Self::Opaque(path) => write!(f, "{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_shapes() {
        let json = r#"[
            {"scalar": "i32"},
            {"record": "app::shapes::Line"},
            {"array": {"record": "app::shapes::Line"}},
            {"generic": {"path": "Vec", "args": [{"scalar": "String"}]}},
            "dynamic",
            {"opaque": "std::time::Duration"}
        ]"#;

        let types: Vec<TypeRef> = serde_json::from_str(json).unwrap();
        let rendered: Vec<String> = types.iter().map(ToString::to_string).collect();

        assert_eq!(
            rendered,
            vec![
                "i32",
                "app::shapes::Line",
                "[app::shapes::Line]",
                "Vec<String>",
                "dynamic",
                "std::time::Duration",
            ]
        );
    }

    #[test]
    fn single_parameter_only_matches_one_argument() {
        let line: TypeId = "app::shapes::Line".parse().unwrap();
        let ty = TypeRef::generic("Vec", vec![TypeRef::array(TypeRef::record(line))]);
        let pair = TypeRef::generic(
            "HashMap",
            vec![TypeRef::scalar(Scalar::String), TypeRef::scalar(Scalar::I32)],
        );

        assert_eq!(ty.single_parameter().map(|(path, _)| path), Some("Vec"));
        assert!(pair.single_parameter().is_none());
    }
}
