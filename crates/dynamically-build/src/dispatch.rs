use crate::{
    alias::AliasResolver,
    config::Config,
    emit::{SourceUnit, UnitKind},
    path::RustPath,
    resolve::{FactoryRef, Resolver, Variant},
};
use derive_more::{Deref, IntoIterator};
use dynamically_schema::prelude::*;
use quote::{format_ident, quote};
use std::collections::{BTreeMap, BTreeSet};

/// Distinct record types requested through the generic entry point, in
/// canonical order.
#[must_use]
pub fn collect_dispatch_targets(sites: &[CallSite]) -> BTreeSet<TypeId> {
    sites
        .iter()
        .filter_map(|site| site.ty.as_record().cloned())
        .collect()
}

///
/// DispatchTable
/// Target record to the single factory its dispatcher forwards to.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct DispatchTable(BTreeMap<TypeId, FactoryRef>);

impl DispatchTable {
    /// Resolve every target through the same resolver that produced the
    /// plans. Targets without a factory are dropped.
    #[must_use]
    pub fn build<C>(targets: BTreeSet<TypeId>, resolver: &Resolver<'_, C>) -> Self
    where
        C: TypeCatalog + ?Sized,
    {
        let mut table = BTreeMap::new();

        for target in targets {
            if let Some(factory) = resolver.factory_ref(&target, Variant::Single) {
                table.insert(target, factory);
            } else {
                tracing::trace!(ty = %target, "dispatch target has no resolvable factory");
            }
        }

        Self(table)
    }
}

/// The fixed generic entry point: a trait plus a free function bound on it.
#[must_use]
pub fn declaration(config: &Config) -> SourceUnit {
    let module = format_ident!("{}", config.entry_module);
    let function = format_ident!("{}", config.entry_fn);
    let trait_ident = format_ident!("{}", config.entry_trait);

    SourceUnit {
        name: format!("{}.g", config.entry_module),
        kind: UnitKind::Declaration,
        tokens: quote! {
            pub mod #module {
                pub trait #trait_ident: ::core::marker::Sized {
                    fn #function(
                        data: &::dynamically::Value,
                    ) -> ::core::result::Result<Self, ::dynamically::Error>;
                }

                pub fn #function<T: #trait_ident>(
                    data: &::dynamically::Value,
                ) -> ::core::result::Result<T, ::dynamically::Error> {
                    T::#function(data)
                }
            }
        },
    }
}

/// One `impl <entry trait> for T` per table entry.
#[must_use]
pub fn dispatcher<C>(
    table: &DispatchTable,
    aliases: &AliasResolver<'_, C>,
    config: &Config,
) -> SourceUnit
where
    C: TypeCatalog + ?Sized,
{
    let function = format_ident!("{}", config.entry_fn);
    let trait_path: RustPath = aliases
        .mount()
        .join(config.entry_module.clone())
        .join(config.entry_trait.clone());

    let impls = table.iter().map(|(target, factory)| {
        let ty = aliases.type_path(target);
        let path = &factory.path;

        quote! {
            impl #trait_path for #ty {
                fn #function(
                    data: &::dynamically::Value,
                ) -> ::core::result::Result<Self, ::dynamically::Error> {
                    #path(data)
                }
            }
        }
    });

    SourceUnit {
        name: format!("{}.{}.g", config.entry_module, config.entry_fn),
        kind: UnitKind::Dispatcher,
        tokens: quote! {
            #(#impls)*
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_are_deduplicated_records_only() {
        let point: TypeId = "app::Point".parse().unwrap();
        let line: TypeId = "app::Line".parse().unwrap();
        let sites = vec![
            CallSite::new(TypeRef::record(point.clone()), None),
            CallSite::new(TypeRef::scalar(Scalar::I32), None),
            CallSite::new(TypeRef::record(line.clone()), None),
            CallSite::new(TypeRef::record(point.clone()), None),
            CallSite::new(TypeRef::Opaque("Vec".to_string()), None),
        ];

        let targets: Vec<TypeId> = collect_dispatch_targets(&sites).into_iter().collect();

        assert_eq!(targets, vec![line, point]);
    }

    #[test]
    fn declaration_uses_configured_names() {
        let config = Config {
            entry_module: "factories".to_string(),
            entry_fn: "build".to_string(),
            entry_trait: "Build".to_string(),
            ..Config::default()
        };

        let unit = declaration(&config);
        let text = unit.tokens.to_string();

        assert_eq!(unit.name, "factories.g");
        assert!(text.starts_with("pub mod factories {"));
        assert!(text.contains("pub trait Build"));
        assert!(text.contains("pub fn build < T : Build >"));
    }
}
