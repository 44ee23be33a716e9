use crate::prelude::*;
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// TypeId
///
/// Identity of a type: owning module, namespace path, and name. Ordering
/// follows the canonical full name, so sorted collections of ids are stable
/// across passes.
///
/// Serialized as `module::namespace::Name`.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeId {
    pub module: String,
    pub namespace: Vec<String>,
    pub name: String,
}

impl TypeId {
    pub fn new<I, S>(module: impl Into<String>, namespace: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module: module.into(),
            namespace: namespace.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.module)?;
        for segment in &self.namespace {
            write!(f, "::{segment}")?;
        }

        write!(f, "::{}", self.name)
    }
}

///
/// ParseTypeIdError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
#[error("invalid type id '{0}': expected `module::namespace::Name`")]
pub struct ParseTypeIdError(pub String);

impl FromStr for TypeId {
    type Err = ParseTypeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split("::").map(str::trim).collect();
        if segments.len() < 2 || segments.iter().any(|seg| seg.is_empty()) {
            return Err(ParseTypeIdError(s.to_string()));
        }

        let last = segments.len() - 1;

        Ok(Self::new(
            segments[0],
            segments[1..last].iter().copied(),
            segments[last],
        ))
    }
}

impl TryFrom<String> for TypeId {
    type Error = ParseTypeIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TypeId> for String {
    fn from(id: TypeId) -> Self {
        id.to_string()
    }
}
