use crate::{Error, prelude::*, validate::validate_catalog};
use std::collections::BTreeMap;

///
/// TypeCatalog
///
/// Read-only oracle over one snapshot of the type graph and the modules the
/// generating module references. The generator only ever asks these
/// questions; any host (a schema file, a compiler plugin, a test fixture)
/// can answer them.
///

pub trait TypeCatalog {
    /// Id of the module code is being generated for.
    fn current_module(&self) -> &str;

    fn referenced_modules(&self) -> &[ModuleReference];

    /// Type graphs of the current module and its references.
    fn module_roots(&self) -> &[ModuleDef];

    fn record(&self, id: &TypeId) -> Option<&TypeDef>;

    /// Uses of the generic creation entry point.
    fn call_sites(&self) -> &[CallSite];

    fn reference(&self, module: &str) -> Option<&ModuleReference> {
        self.referenced_modules()
            .iter()
            .find(|reference| reference.module == module)
    }

    /// Whether a member with `accessibility`, declared in `owner`, can be
    /// named from the current module.
    fn is_accessible(&self, accessibility: Accessibility, owner: &str) -> bool {
        match accessibility {
            Accessibility::Public => true,
            Accessibility::Crate => owner == self.current_module(),
            Accessibility::Private => false,
        }
    }

    /// First declared associated function named `name` taking one untyped
    /// parameter.
    fn find_method<'a>(&self, ty: &'a TypeDef, name: &str) -> Option<&'a Method> {
        ty.methods
            .iter()
            .find(|method| method.name == name && method.is_factory_shaped())
    }
}

///
/// Catalog
///
/// In-memory `TypeCatalog`, loadable from JSON. Records are indexed by id on
/// load; the first declaration of an id is authoritative.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Catalog {
    pub module: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ModuleReference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleDef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_sites: Vec<CallSite>,

    #[serde(skip)]
    index: BTreeMap<TypeId, TypeDef>,
}

impl Catalog {
    #[must_use]
    pub fn new(
        module: impl Into<String>,
        references: Vec<ModuleReference>,
        modules: Vec<ModuleDef>,
        call_sites: Vec<CallSite>,
    ) -> Self {
        let mut catalog = Self {
            module: module.into(),
            references,
            modules,
            call_sites,
            index: BTreeMap::new(),
        };
        catalog.reindex();

        catalog
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let mut catalog: Self = serde_json::from_str(json)?;
        catalog.reindex();
        validate_catalog(&catalog).map_err(Error::Validation)?;

        tracing::debug!(
            module = %catalog.module,
            records = catalog.index.len(),
            references = catalog.references.len(),
            "loaded type catalog"
        );

        Ok(catalog)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append call sites discovered after load (e.g. by the scanner).
    pub fn extend_call_sites(&mut self, sites: impl IntoIterator<Item = CallSite>) {
        self.call_sites.extend(sites);
    }

    fn reindex(&mut self) {
        self.index.clear();
        for module in &self.modules {
            for ty in module.root.all_types() {
                self.index
                    .entry(ty.id.clone())
                    .or_insert_with(|| ty.clone());
            }
        }
    }
}

impl TypeCatalog for Catalog {
    fn current_module(&self) -> &str {
        &self.module
    }

    fn referenced_modules(&self) -> &[ModuleReference] {
        &self.references
    }

    fn module_roots(&self) -> &[ModuleDef] {
        &self.modules
    }

    fn record(&self, id: &TypeId) -> Option<&TypeDef> {
        self.index.get(id)
    }

    fn call_sites(&self) -> &[CallSite] {
        &self.call_sites
    }
}

///
/// CatalogBuilder
/// Hand-fed catalog construction for build scripts and fixtures.
///

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    module: String,
    references: Vec<ModuleReference>,
    modules: Vec<ModuleDef>,
    call_sites: Vec<CallSite>,
}

impl CatalogBuilder {
    pub fn new(module: impl Into<String>) -> Self {
        let module = module.into();

        Self {
            modules: vec![ModuleDef::new(module.clone())],
            module,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn reference(mut self, reference: ModuleReference) -> Self {
        if !self.modules.iter().any(|m| m.id == reference.module) {
            self.modules.push(ModuleDef::new(reference.module.clone()));
        }
        self.references.push(reference);
        self
    }

    /// Declare a type in the namespace named by its id, creating the
    /// module and namespaces on first use.
    #[must_use]
    pub fn record(mut self, ty: TypeDef) -> Self {
        let module = self.module_mut(&ty.id.module);
        module.root.path_mut(&ty.id.namespace).types.push(ty);
        self
    }

    /// Declare an already-declared type again under another namespace path,
    /// the way a re-export makes one type reachable twice.
    #[must_use]
    pub fn reexport<S: AsRef<str>>(mut self, module: &str, path: &[S], ty: TypeDef) -> Self {
        let module = self.module_mut(module);
        module.root.path_mut(path).types.push(ty);
        self
    }

    #[must_use]
    pub fn call_site(mut self, ty: TypeRef, location: Option<Location>) -> Self {
        self.call_sites.push(CallSite::new(ty, location));
        self
    }

    #[must_use]
    pub fn build(self) -> Catalog {
        Catalog::new(self.module, self.references, self.modules, self.call_sites)
    }

    fn module_mut(&mut self, id: &str) -> &mut ModuleDef {
        let pos = match self.modules.iter().position(|m| m.id == id) {
            Some(pos) => pos,
            None => {
                self.modules.push(ModuleDef::new(id));
                self.modules.len() - 1
            }
        };

        &mut self.modules[pos]
    }
}
