use crate::{config::Config, path::RustPath};
use dynamically_schema::prelude::*;
use std::fmt;

///
/// CompanionPath
///
/// Where a synthesized companion factory lives, relative to the mount:
/// `<private root>[::<alias>]::<namespace...>::<Name>Factory`.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CompanionPath {
    pub namespace: Vec<String>,
    pub ident: String,
}

impl CompanionPath {
    /// Absolute path to the companion type under `mount`.
    #[must_use]
    pub fn under(&self, mount: &RustPath) -> RustPath {
        mount.join_all(&self.namespace).join(self.ident.clone())
    }
}

impl fmt::Display for CompanionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.namespace {
            write!(f, "{segment}::")?;
        }

        write!(f, "{}", self.ident)
    }
}

///
/// AliasResolver
/// Maps record identities to the paths generated code uses for them.
///

pub struct AliasResolver<'a, C: ?Sized> {
    catalog: &'a C,
    config: &'a Config,
    mount: RustPath,
}

impl<'a, C: TypeCatalog + ?Sized> AliasResolver<'a, C> {
    pub fn new(catalog: &'a C, config: &'a Config) -> Self {
        Self {
            catalog,
            config,
            mount: RustPath::parse(&config.mount),
        }
    }

    #[must_use]
    pub const fn mount(&self) -> &RustPath {
        &self.mount
    }

    /// The first alias of the owning module, if it is a referenced one.
    #[must_use]
    pub fn alias_for(&self, module: &str) -> Option<&'a str> {
        self.catalog.reference(module).and_then(ModuleReference::alias)
    }

    /// Companion namespace for a type, keyed by its owner's alias so equal
    /// names from different aliased modules never meet.
    #[must_use]
    pub fn namespace_for(&self, id: &TypeId) -> CompanionPath {
        let mut namespace = vec![self.config.private_root.clone()];
        if let Some(alias) = self.alias_for(&id.module) {
            namespace.push(alias.to_string());
        }
        namespace.extend(id.namespace.iter().cloned());

        CompanionPath {
            namespace,
            ident: format!("{}Factory", id.name),
        }
    }

    /// Path generated code names the type by.
    #[must_use]
    pub fn type_path(&self, id: &TypeId) -> RustPath {
        let base = if id.module == self.catalog.current_module() {
            self.mount.clone()
        } else {
            let ident = self
                .catalog
                .reference(&id.module)
                .map_or_else(|| crate_ident(&id.module), ModuleReference::crate_ident);

            RustPath::new(true, [ident])
        };

        base.join_all(&id.namespace).join(id.name.clone())
    }
}
