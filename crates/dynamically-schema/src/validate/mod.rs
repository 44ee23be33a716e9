//! Catalog validation.
//!
//! Only structural problems that would make emitted code unparsable are
//! errors here. Unknown record references are not: they degrade to unmapped
//! members during resolution.

pub mod naming;

pub use naming::validate_ident;

use crate::prelude::*;
use std::collections::BTreeMap;

/// Run every validation pass over a catalog and aggregate the failures.
pub fn validate_catalog(catalog: &(impl TypeCatalog + ?Sized)) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    validate_modules(catalog, &mut errs);
    validate_references(catalog, &mut errs);

    let mut seen: BTreeMap<&TypeId, &TypeDef> = BTreeMap::new();
    for module in catalog.module_roots() {
        for ty in module.root.all_types() {
            let mut type_errs = ErrorTree::new();
            validate_type(catalog.current_module(), module, ty, &mut type_errs);

            if let Some(prev) = seen.insert(&ty.id, ty)
                && prev != ty
            {
                err!(type_errs, "conflicting declarations share this id");
            }

            errs.merge_for(ty.id.to_string(), type_errs);
        }
    }

    errs.result()
}

fn validate_modules(catalog: &(impl TypeCatalog + ?Sized), errs: &mut ErrorTree) {
    let current = catalog.current_module();
    if current.is_empty() {
        err!(errs, "current module id is empty");
    } else if !catalog.module_roots().iter().any(|m| m.id == current) {
        err!(errs, "current module '{current}' has no type graph");
    }

    let mut ids = BTreeMap::new();
    for module in catalog.module_roots() {
        if let Err(e) = validate_ident(&crate_ident(&module.id)) {
            errs.add_for(&module.id, e);
        }
        if ids.insert(module.id.as_str(), ()).is_some() {
            errs.add_for(&module.id, "module declared twice");
        }
    }
}

fn validate_references(catalog: &(impl TypeCatalog + ?Sized), errs: &mut ErrorTree) {
    let mut aliases: BTreeMap<&str, &str> = BTreeMap::new();

    for reference in catalog.referenced_modules() {
        if reference.module == catalog.current_module() {
            errs.add_for(&reference.module, "module references itself");
        }

        for alias in &reference.aliases {
            if let Err(e) = validate_ident(alias) {
                errs.add_for(&reference.module, format!("alias: {e}"));
            }
            if let Some(prev) = aliases.insert(alias, &reference.module)
                && prev != reference.module
            {
                errs.add_for(
                    &reference.module,
                    format!("alias '{alias}' is already used by '{prev}'"),
                );
            }
        }
    }
}

fn validate_type(current: &str, module: &ModuleDef, ty: &TypeDef, errs: &mut ErrorTree) {
    if ty.id.module != module.id {
        err!(
            errs,
            "declared in module '{}' but owned by '{}'",
            module.id,
            ty.id.module
        );
    }

    // inherent impls can only be added inside the generating crate
    if ty.extendable && ty.id.module != current {
        err!(errs, "only records of '{current}' can be extendable");
    }

    if let Err(e) = validate_ident(&ty.id.name) {
        errs.add(e);
    }
    for segment in &ty.id.namespace {
        if let Err(e) = validate_ident(segment) {
            errs.add_for("namespace", e);
        }
    }

    for ctor in &ty.constructors {
        if let ConstructorKind::Function(name) = &ctor.kind
            && let Err(e) = validate_ident(name)
        {
            errs.add_for("constructor", e);
        }
        for param in &ctor.params {
            // tuple parameters are positional; their names only key field lookup
            let checked = match ctor.kind {
                ConstructorKind::Tuple if param.name.is_empty() => {
                    Err("parameter name is empty".to_string())
                }
                ConstructorKind::Tuple => Ok(()),
                _ => validate_ident(&param.name),
            };
            if let Err(e) = checked {
                errs.add_for("constructor", e);
            }
        }
    }

    for prop in &ty.properties {
        if let Err(e) = validate_ident(&prop.name) {
            errs.add_for("property", e);
        }
    }
}
