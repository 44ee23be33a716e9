use crate::prelude::*;
use derive_more::Display;

///
/// Accessibility
///
/// Declared visibility of a type, constructor, property, or method, as seen
/// by the host. `Crate` members are only reachable from their own module.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    #[default]
    Public,
    Crate,
    Private,
}

impl Accessibility {
    /// Whether a constructor with this visibility may be invoked by code
    /// generated into the declaring module.
    #[must_use]
    pub const fn is_module_internal(self) -> bool {
        matches!(self, Self::Public | Self::Crate)
    }
}

///
/// TypeKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Record,
    Enum,
    Opaque,
}

///
/// Scalar
///
/// Well-known scalar types that convert by plain deserialization.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Scalar {
    #[display("bool")]
    #[serde(rename = "bool")]
    Bool,
    #[display("char")]
    #[serde(rename = "char")]
    Char,
    #[display("f32")]
    #[serde(rename = "f32")]
    F32,
    #[display("f64")]
    #[serde(rename = "f64")]
    F64,
    #[display("i128")]
    #[serde(rename = "i128")]
    I128,
    #[display("i16")]
    #[serde(rename = "i16")]
    I16,
    #[display("i32")]
    #[serde(rename = "i32")]
    I32,
    #[display("i64")]
    #[serde(rename = "i64")]
    I64,
    #[display("i8")]
    #[serde(rename = "i8")]
    I8,
    #[display("isize")]
    #[serde(rename = "isize")]
    Isize,
    #[display("String")]
    #[serde(rename = "String")]
    String,
    #[display("u128")]
    #[serde(rename = "u128")]
    U128,
    #[display("u16")]
    #[serde(rename = "u16")]
    U16,
    #[display("u32")]
    #[serde(rename = "u32")]
    U32,
    #[display("u64")]
    #[serde(rename = "u64")]
    U64,
    #[display("u8")]
    #[serde(rename = "u8")]
    U8,
    #[display("usize")]
    #[serde(rename = "usize")]
    Usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_names_round_trip_through_serde() {
        for scalar in [Scalar::Bool, Scalar::I32, Scalar::String, Scalar::Usize] {
            let json = serde_json::to_string(&scalar).unwrap();
            assert_eq!(json, format!("\"{scalar}\""));

            let back: Scalar = serde_json::from_str(&json).unwrap();
            assert_eq!(back, scalar);
        }
    }

    #[test]
    fn only_public_and_crate_are_module_internal() {
        assert!(Accessibility::Public.is_module_internal());
        assert!(Accessibility::Crate.is_module_internal());
        assert!(!Accessibility::Private.is_module_internal());
    }
}
