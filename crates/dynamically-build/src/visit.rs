use crate::cancel::{Cancellation, Cancelled};
use dynamically_schema::prelude::*;
use std::collections::BTreeSet;

///
/// TypeVisitor
///
/// Pre-order walk over module type graphs: child namespaces, then the
/// namespace's own types, then (for included types only) their nested
/// types. Identity-keyed, so a type reachable through several paths is
/// collected once, at its first sighting. One visitor can walk several
/// modules; the visited set spans all of them.
///

pub struct TypeVisitor<'a, P> {
    predicate: P,
    cancel: &'a Cancellation,
    visited: BTreeSet<&'a TypeId>,
    found: Vec<&'a TypeDef>,
}

impl<'a, P> TypeVisitor<'a, P>
where
    P: FnMut(&TypeDef) -> bool,
{
    pub const fn new(predicate: P, cancel: &'a Cancellation) -> Self {
        Self {
            predicate,
            cancel,
            visited: BTreeSet::new(),
            found: Vec::new(),
        }
    }

    pub fn visit_module(&mut self, module: &'a ModuleDef) -> Result<(), Cancelled> {
        self.visit_namespace(&module.root)
    }

    fn visit_namespace(&mut self, ns: &'a Namespace) -> Result<(), Cancelled> {
        self.cancel.check()?;

        for child in &ns.namespaces {
            self.visit_namespace(child)?;
        }
        for ty in &ns.types {
            self.visit_type(ty)?;
        }

        Ok(())
    }

    fn visit_type(&mut self, ty: &'a TypeDef) -> Result<(), Cancelled> {
        self.cancel.check()?;

        if self.visited.contains(&ty.id) || !(self.predicate)(ty) {
            tracing::trace!(ty = %ty.id, "type not collected");
            return Ok(());
        }

        self.visited.insert(&ty.id);
        self.found.push(ty);

        for nested in &ty.nested {
            self.visit_type(nested)?;
        }

        Ok(())
    }

    /// Collected types in visit order.
    #[must_use]
    pub fn finish(self) -> Vec<&'a TypeDef> {
        self.found
    }
}

/// Collect the types of a single module root that satisfy `predicate`.
pub fn visit<'a>(
    module: &'a ModuleDef,
    predicate: impl FnMut(&TypeDef) -> bool,
    cancel: &'a Cancellation,
) -> Result<Vec<&'a TypeDef>, Cancelled> {
    let mut visitor = TypeVisitor::new(predicate, cancel);
    visitor.visit_module(module)?;

    Ok(visitor.finish())
}

/// Candidate records across the current module and its references, in
/// priority order: current module first, then references as listed.
pub fn collect_candidates<'a, C>(
    catalog: &'a C,
    cancel: &'a Cancellation,
) -> Result<Vec<&'a TypeDef>, Cancelled>
where
    C: TypeCatalog + ?Sized,
{
    let predicate = |ty: &TypeDef| ty.is_record() && catalog.is_accessible(ty.accessibility, ty.module());
    let mut visitor = TypeVisitor::new(predicate, cancel);

    let order = std::iter::once(catalog.current_module())
        .chain(catalog.referenced_modules().iter().map(|r| r.module.as_str()));
    for id in order {
        for module in catalog.module_roots().iter().filter(|m| m.id == id) {
            visitor.visit_module(module)?;
        }
    }

    Ok(visitor.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(id: &str) -> TypeDef {
        TypeDef::new(id.parse().unwrap())
    }

    #[test]
    fn walks_namespaces_before_types_and_skips_nested_of_excluded() {
        let mut outer = ty("app::Outer");
        outer.nested.push(ty("app::Outer::Inner"));

        let mut hidden = ty("app::Hidden");
        hidden.accessibility = Accessibility::Private;
        hidden.nested.push(ty("app::Hidden::Inner"));

        let mut module = ModuleDef::new("app");
        module.root.types.push(outer);
        module.root.types.push(hidden);
        module.root.path_mut(&["shapes"]).types.push(ty("app::shapes::Point"));

        let cancel = Cancellation::new();
        let found = visit(&module, |t| t.accessibility == Accessibility::Public, &cancel)
            .unwrap();
        let ids: Vec<String> = found.iter().map(|t| t.id.to_string()).collect();

        assert_eq!(
            ids,
            vec!["app::shapes::Point", "app::Outer", "app::Outer::Inner"]
        );
    }

    #[test]
    fn reexported_types_are_collected_once() {
        let point = ty("app::shapes::Point");
        let catalog = CatalogBuilder::new("app")
            .record(point.clone())
            .reexport("app", &["prelude"], point)
            .build();

        let cancel = Cancellation::new();
        let found = collect_candidates(&catalog, &cancel).unwrap();

        assert_eq!(found.len(), 1);
    }

    #[test]
    fn only_accessible_records_are_candidates() {
        let mut internal = ty("lib::Internal");
        internal.accessibility = Accessibility::Crate;
        let mut color = ty("lib::Color");
        color.kind = TypeKind::Enum;

        let catalog = CatalogBuilder::new("app")
            .reference(ModuleReference::new("lib"))
            .record(internal)
            .record(color)
            .record(ty("lib::Point"))
            .record(ty("unreferenced::Point"))
            .build();

        let cancel = Cancellation::new();
        let ids: Vec<String> = collect_candidates(&catalog, &cancel)
            .unwrap()
            .iter()
            .map(|t| t.id.to_string())
            .collect();

        assert_eq!(ids, vec!["lib::Point"]);
    }

    #[test]
    fn cancelled_walk_returns_nothing() {
        let catalog = CatalogBuilder::new("app").record(ty("app::Point")).build();
        let cancel = Cancellation::new();
        cancel.cancel();

        assert_eq!(collect_candidates(&catalog, &cancel), Err(Cancelled));
    }
}
