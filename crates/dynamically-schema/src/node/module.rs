use crate::prelude::*;

///
/// ModuleReference
///
/// An external compiled dependency of the generating module. Aliases are
/// Cargo dependency renames; the first alias is the name the dependency is
/// reachable under and keys its synthesized namespace.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ModuleReference {
    pub module: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl ModuleReference {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            aliases: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.aliases.first().map(String::as_str)
    }

    /// The identifier generated code uses to reach the dependency.
    #[must_use]
    pub fn crate_ident(&self) -> String {
        self.alias()
            .map_or_else(|| crate_ident(&self.module), ToString::to_string)
    }
}

/// Crate identifier for a package name (`library-a` -> `library_a`).
#[must_use]
pub fn crate_ident(module: &str) -> String {
    module.replace('-', "_")
}

///
/// ModuleDef
/// The type graph exported by one module, rooted at its unnamed namespace.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ModuleDef {
    pub id: String,

    #[serde(default)]
    pub root: Namespace,
}

impl ModuleDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            root: Namespace::default(),
        }
    }
}

///
/// Namespace
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Namespace {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<Self>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDef>,
}

impl Namespace {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Child namespace by name, created on first use.
    pub fn child_mut(&mut self, name: &str) -> &mut Self {
        let pos = match self.namespaces.iter().position(|ns| ns.name == name) {
            Some(pos) => pos,
            None => {
                self.namespaces.push(Self::named(name));
                self.namespaces.len() - 1
            }
        };

        &mut self.namespaces[pos]
    }

    /// Walk (creating as needed) down a namespace path.
    pub fn path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Self {
        path.iter()
            .fold(self, |ns, segment| ns.child_mut(segment.as_ref()))
    }

    /// Every type declaration reachable from here, including nested types
    /// and repeated declarations.
    #[must_use]
    pub fn all_types(&self) -> Vec<&TypeDef> {
        fn push_type<'a>(ty: &'a TypeDef, out: &mut Vec<&'a TypeDef>) {
            out.push(ty);
            for nested in &ty.nested {
                push_type(nested, out);
            }
        }

        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(ns) = stack.pop() {
            for ty in &ns.types {
                push_type(ty, &mut out);
            }
            stack.extend(ns.namespaces.iter().rev());
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_wins_over_package_name() {
        let plain = ModuleReference::new("library-a");
        let aliased = ModuleReference::new("library-a").with_alias("lib1");

        assert_eq!(plain.crate_ident(), "library_a");
        assert_eq!(plain.alias(), None);
        assert_eq!(aliased.crate_ident(), "lib1");
    }

    #[test]
    fn path_mut_reuses_existing_children() {
        let mut root = Namespace::default();
        root.path_mut(&["shapes", "geo"]);
        root.path_mut(&["shapes"]);

        assert_eq!(root.namespaces.len(), 1);
        assert_eq!(root.namespaces[0].namespaces[0].name, "geo");
    }
}
