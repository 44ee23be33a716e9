mod plan;


pub use plan::*;

use crate::{
    alias::{AliasResolver, CompanionPath},
    cancel::{Cancellation, Cancelled},
    config::Config,
    diagnostics::Diagnostic,
    visit::collect_candidates,
};
use dynamically_schema::prelude::*;
use std::collections::{BTreeMap, btree_map::Entry};

///
/// Placement
/// Where a variant's factory method comes from, before availability checks.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Placement {
    HandWritten,
    Augment,
    Companion,
}

///
/// Resolver
///
/// Decides, once per catalog snapshot, which records are candidates, which
/// constructor each one uses, and which companion paths are claimed. After
/// construction every question it answers is a pure lookup, so plans and
/// dispatch entries agree on the same `FactoryRef`s.
///

pub struct Resolver<'a, C: ?Sized> {
    catalog: &'a C,
    config: &'a Config,
    aliases: AliasResolver<'a, C>,
    candidates: BTreeMap<&'a TypeId, &'a TypeDef>,
    constructors: BTreeMap<&'a TypeId, &'a Constructor>,
    companions: BTreeMap<&'a TypeId, CompanionPath>,
}

impl<'a, C: TypeCatalog + ?Sized> Resolver<'a, C> {
    pub fn new(
        catalog: &'a C,
        config: &'a Config,
        cancel: &'a Cancellation,
    ) -> Result<Self, Cancelled> {
        let found = collect_candidates(catalog, cancel)?;

        let mut resolver = Self {
            catalog,
            config,
            aliases: AliasResolver::new(catalog, config),
            candidates: found.iter().map(|&ty| (&ty.id, ty)).collect(),
            constructors: BTreeMap::new(),
            companions: BTreeMap::new(),
        };

        for &ty in &found {
            if let Some(ctor) = select_constructor(ty) {
                resolver.constructors.insert(&ty.id, ctor);
            } else {
                tracing::trace!(ty = %ty.id, "no eligible constructor");
            }
        }

        resolver.claim_companions(&found);

        Ok(resolver)
    }

    /// Candidate ids in canonical order.
    pub fn candidates(&self) -> impl Iterator<Item = &'a TypeId> + '_ {
        self.candidates.keys().copied()
    }

    #[must_use]
    pub const fn aliases(&self) -> &AliasResolver<'a, C> {
        &self.aliases
    }

    // Companion paths are claimed in module priority order (current module,
    // then references as listed, ids sorted within a module). A path already
    // taken stays with its first claimant.
    fn claim_companions(&mut self, found: &[&'a TypeDef]) {
        let rank = |module: &str| {
            if module == self.catalog.current_module() {
                return 0;
            }
            self.catalog
                .referenced_modules()
                .iter()
                .position(|r| r.module == module)
                .map_or(usize::MAX, |i| i + 1)
        };

        let mut ordered: Vec<&'a TypeDef> = found
            .iter()
            .copied()
            .filter(|ty| self.constructors.contains_key(&ty.id))
            .filter(|ty| {
                Variant::ALL
                    .into_iter()
                    .any(|v| self.placement(ty, v) == Placement::Companion)
            })
            .collect();
        ordered.sort_by(|a, b| (rank(a.module()), &a.id).cmp(&(rank(b.module()), &b.id)));

        let mut claims: BTreeMap<CompanionPath, &TypeId> = BTreeMap::new();
        for ty in ordered {
            let path = self.aliases.namespace_for(&ty.id);

            match claims.entry(path.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(&ty.id);
                    self.companions.insert(&ty.id, path);
                }
                Entry::Occupied(slot) => {
                    tracing::warn!(
                        ty = %ty.id,
                        winner = %slot.get(),
                        companion = %path,
                        "companion namespace already claimed; alias the referenced module to keep both"
                    );
                }
            }
        }
    }

    fn placement(&self, ty: &TypeDef, variant: Variant) -> Placement {
        let name = self.config.method(variant);

        match self.catalog.find_method(ty, name) {
            Some(method) if self.catalog.is_accessible(method.accessibility, ty.module()) => {
                Placement::HandWritten
            }
            // an inaccessible method still owns the name on the type
            Some(_) => Placement::Companion,
            // only records of the generating crate accept inherent impls
            None if ty.extendable && ty.module() == self.catalog.current_module() => {
                Placement::Augment
            }
            None => Placement::Companion,
        }
    }

    // `create_many` only maps the single factory over an array, so a
    // hand-written single is enough even without a constructor.
    fn maps_hand_written(&self, ty: &TypeDef, variant: Variant) -> bool {
        variant == Variant::Many && self.placement(ty, Variant::Single) == Placement::HandWritten
    }

    /// Resolve the factory for one variant of a record, or `None` when no
    /// factory can exist for it.
    #[must_use]
    pub fn factory_ref(&self, id: &TypeId, variant: Variant) -> Option<FactoryRef> {
        let ty = self.candidates.get(id)?;
        let method = self.config.method(variant);
        let has_ctor = self.constructors.contains_key(id);

        let (origin, owner) = match self.placement(ty, variant) {
            Placement::HandWritten => (FactoryOrigin::HandWritten, self.aliases.type_path(id)),
            Placement::Augment if has_ctor || self.maps_hand_written(ty, variant) => {
                (FactoryOrigin::Augmented, self.aliases.type_path(id))
            }
            Placement::Companion if has_ctor => {
                let companion = self.companions.get(id)?;
                (
                    FactoryOrigin::Companion,
                    companion.under(self.aliases.mount()),
                )
            }
            Placement::Augment | Placement::Companion => return None,
        };

        Some(FactoryRef {
            target: id.clone(),
            variant,
            origin,
            path: owner.join(method),
        })
    }

    /// How a value of `ty` is obtained from an untyped field.
    #[must_use]
    pub fn mapping(&self, ty: &TypeRef) -> MappingKind {
        let kind = match ty {
            TypeRef::Scalar(_) => MappingKind::Direct,

            TypeRef::Array(element) => match &**element {
                TypeRef::Scalar(_) => MappingKind::ArrayMaterialize(Box::new(MappingKind::Direct)),
                TypeRef::Record(id) => self
                    .factory_ref(id, Variant::Many)
                    .map_or(MappingKind::Unmapped, |r| {
                        MappingKind::ArrayMaterialize(Box::new(MappingKind::FactoryMany(r)))
                    }),
                _ => MappingKind::Unmapped,
            },

            TypeRef::Generic { .. } => match ty.single_parameter() {
                Some((path, element)) if self.config.is_sequence(path) => match element {
                    TypeRef::Scalar(_) => MappingKind::Direct,
                    TypeRef::Record(id) => self
                        .factory_ref(id, Variant::Many)
                        .map_or(MappingKind::Unmapped, MappingKind::FactoryMany),
                    _ => MappingKind::Unmapped,
                },
                _ => MappingKind::Unmapped,
            },

            TypeRef::Record(id) => self
                .factory_ref(id, Variant::Single)
                .map_or(MappingKind::Unmapped, MappingKind::FactorySingle),

            TypeRef::Dynamic | TypeRef::Opaque(_) => MappingKind::Unmapped,
        };

        tracing::trace!(%ty, ?kind, "mapped field type");

        kind
    }

    /// Build the plan for a candidate. Without an eligible constructor a plan
    /// exists only to carry an augmented `create_many` over a hand-written
    /// single factory.
    #[must_use]
    pub fn resolve(&self, id: &TypeId) -> Option<FactoryPlan> {
        let ty = self.candidates.get(id)?;
        let single = self.factory_ref(id, Variant::Single);
        let many = self.factory_ref(id, Variant::Many);

        let Some(ctor) = self.constructors.get(id) else {
            let many = many.filter(|r| r.origin == FactoryOrigin::Augmented)?;

            return Some(FactoryPlan {
                target: id.clone(),
                type_path: self.aliases.type_path(id),
                constructor: None,
                params: Vec::new(),
                properties: Vec::new(),
                single,
                many: Some(many),
                companion: None,
            });
        };

        let params = ctor
            .params
            .iter()
            .map(|p| self.field(&p.name, &p.ty))
            .collect();

        let mut properties: Vec<FieldMapping> = ty
            .properties
            .iter()
            .filter(|p| {
                p.settable
                    && self.catalog.is_accessible(p.accessibility, ty.module())
                    && !ctor.has_param(&p.name)
            })
            .map(|p| self.field(&p.name, &p.ty))
            .collect();
        properties.sort_by(|a, b| a.name.cmp(&b.name));

        let plan = FactoryPlan {
            target: id.clone(),
            type_path: self.aliases.type_path(id),
            constructor: Some(ctor.kind.clone()),
            params,
            properties,
            single,
            many,
            companion: self.companions.get(id).cloned(),
        };

        tracing::debug!(
            ty = %plan.target,
            params = plan.params.len(),
            properties = plan.properties.len(),
            companion = plan.companion.is_some(),
            "resolved factory plan"
        );

        Some(plan)
    }

    fn field(&self, name: &str, ty: &TypeRef) -> FieldMapping {
        FieldMapping {
            name: name.to_string(),
            ty: ty.clone(),
            kind: self.mapping(ty),
        }
    }

    /// `FactoryNotAccessible` for every candidate whose single or many
    /// method exists but cannot be called from the current module.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let module = self.catalog.current_module();
        let mut out = Vec::new();

        for ty in self.candidates.values() {
            for variant in Variant::ALL {
                let name = self.config.method(variant);
                if let Some(method) = self.catalog.find_method(ty, name)
                    && !self.catalog.is_accessible(method.accessibility, ty.module())
                {
                    out.push(Diagnostic::factory_not_accessible(ty, method, module));
                }
            }
        }

        out
    }
}

/// The accessible constructor with the most parameters; the first declared
/// wins a tie.
#[must_use]
pub fn select_constructor(ty: &TypeDef) -> Option<&Constructor> {
    ty.constructors
        .iter()
        .filter(|c| c.accessibility.is_module_internal())
        .fold(None, |best: Option<&Constructor>, c| match best {
            Some(b) if b.params.len() >= c.params.len() => Some(b),
            _ => Some(c),
        })
}
