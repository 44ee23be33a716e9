use crate::{alias::CompanionPath, path::RustPath};
use derive_more::Display;
use dynamically_schema::prelude::*;

///
/// Variant
/// The two factory entry points every record gets.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Variant {
    Single,
    Many,
}

impl Variant {
    pub const ALL: [Self; 2] = [Self::Single, Self::Many];
}

///
/// FactoryOrigin
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum FactoryOrigin {
    /// Declared by the type's author and reused as-is.
    HandWritten,
    /// Synthesized into an inherent `impl` on the type.
    Augmented,
    /// Synthesized on a `<Name>Factory` unit struct.
    Companion,
}

///
/// FactoryRef
/// Fully qualified path to one factory method plus how it came to exist.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FactoryRef {
    pub target: TypeId,
    pub variant: Variant,
    pub origin: FactoryOrigin,
    pub path: RustPath,
}

///
/// MappingKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MappingKind {
    Direct,
    ArrayMaterialize(Box<MappingKind>),
    FactorySingle(FactoryRef),
    FactoryMany(FactoryRef),
    Unmapped,
}

impl MappingKind {
    #[must_use]
    pub const fn is_mapped(&self) -> bool {
        !matches!(self, Self::Unmapped)
    }
}

///
/// FieldMapping
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMapping {
    pub name: String,
    pub ty: TypeRef,
    pub kind: MappingKind,
}

///
/// FactoryPlan
///
/// The construction recipe for one record. Constructor parameters keep
/// declaration order; properties are sorted by name. `constructor` is
/// `None` when the record is only reached through a hand-written single
/// factory.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FactoryPlan {
    pub target: TypeId,
    pub type_path: RustPath,
    pub constructor: Option<ConstructorKind>,
    pub params: Vec<FieldMapping>,
    pub properties: Vec<FieldMapping>,
    pub single: Option<FactoryRef>,
    pub many: Option<FactoryRef>,
    pub companion: Option<CompanionPath>,
}

impl FactoryPlan {
    #[must_use]
    pub const fn factory(&self, variant: Variant) -> Option<&FactoryRef> {
        match variant {
            Variant::Single => self.single.as_ref(),
            Variant::Many => self.many.as_ref(),
        }
    }

    /// Whether any variant is synthesized with the given origin.
    #[must_use]
    pub fn has_origin(&self, origin: FactoryOrigin) -> bool {
        Variant::ALL
            .into_iter()
            .filter_map(|v| self.factory(v))
            .any(|r| r.origin == origin)
    }
}
