//! Call-site discovery over Rust source.
//!
//! Finds `<module>::<function>::<T>(..)` calls and maps `T` back to a
//! catalog record. Calls written inside macro invocations are token trees,
//! not expressions, and are not seen.

use crate::{Error, prelude::*};
use std::fmt;
use syn::{
    Expr, ExprCall, GenericArgument, PathArguments, Type,
    visit::{self, Visit},
};

///
/// ScannedPath
/// A type path as written at the call site.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScannedPath {
    pub leading_colon: bool,
    pub segments: Vec<String>,
}

impl fmt::Display for ScannedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leading_colon {
            write!(f, "::")?;
        }

        write!(f, "{}", self.segments.join("::"))
    }
}

///
/// ScannedCall
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScannedCall {
    pub path: ScannedPath,
    pub location: Location,
}

/// Parse `source` and collect every turbofish call to `module::function`.
pub fn scan_calls(
    source: &str,
    file: &str,
    module: &str,
    function: &str,
) -> Result<Vec<ScannedCall>, syn::Error> {
    let ast = syn::parse_file(source)?;
    let mut visitor = CallVisitor {
        file,
        module,
        function,
        calls: Vec::new(),
    };
    visitor.visit_file(&ast);

    Ok(visitor.calls)
}

/// Scan a source file and turn its calls into catalog call sites. Paths that
/// do not name a known record are kept as opaque so they are reported but
/// never dispatched.
pub fn scan_call_sites(
    catalog: &(impl TypeCatalog + ?Sized),
    source: &str,
    file: &str,
    module: &str,
    function: &str,
) -> Result<Vec<CallSite>, Error> {
    let calls = scan_calls(source, file, module, function).map_err(|error| Error::Scan {
        file: file.to_string(),
        error,
    })?;

    let sites = calls
        .into_iter()
        .map(|call| {
            let ty = match resolve_type_path(catalog, &call.path) {
                Some(id) => TypeRef::record(id),
                None => {
                    tracing::debug!(
                        path = %call.path,
                        location = %call.location,
                        "call-site type does not name a catalog record"
                    );
                    TypeRef::Opaque(call.path.to_string())
                }
            };

            CallSite::new(ty, Some(call.location))
        })
        .collect();

    Ok(sites)
}

/// Map a written type path to a record id.
///
/// `crate::` paths resolve in the current module. A first segment naming a
/// referenced crate (by alias or package) resolves in that module. Anything
/// else is tried relative to the current module root and then, as a last
/// resort, as a unique suffix match across all modules (covers `use`d
/// names).
#[must_use]
pub fn resolve_type_path(
    catalog: &(impl TypeCatalog + ?Sized),
    path: &ScannedPath,
) -> Option<TypeId> {
    let (first, rest) = path.segments.split_first()?;

    let exact = |module: &str, segments: &[String]| {
        let (name, namespace) = segments.split_last()?;
        let id = TypeId::new(module, namespace.iter().cloned(), name.clone());

        catalog.record(&id).map(|_| id)
    };

    if first == "crate" {
        return exact(catalog.current_module(), rest);
    }

    if let Some(reference) = catalog.referenced_modules().iter().find(|r| {
        r.aliases.iter().any(|a| a == first) || crate_ident(&r.module) == *first
    }) {
        return exact(&reference.module, rest);
    }

    if path.leading_colon {
        return None;
    }

    let segments = if first == "self" { rest } else { &path.segments[..] };
    exact(catalog.current_module(), segments).or_else(|| suffix_match(catalog, segments))
}

fn suffix_match(catalog: &(impl TypeCatalog + ?Sized), segments: &[String]) -> Option<TypeId> {
    let mut found: Option<TypeId> = None;

    for module in catalog.module_roots() {
        for ty in module.root.all_types() {
            let mut full = ty.id.namespace.clone();
            full.push(ty.id.name.clone());
            if !full.ends_with(segments) {
                continue;
            }

            match &found {
                Some(prev) if *prev != ty.id => return None,
                _ => found = Some(ty.id.clone()),
            }
        }
    }

    found
}

///
/// CallVisitor
///

struct CallVisitor<'a> {
    file: &'a str,
    module: &'a str,
    function: &'a str,
    calls: Vec<ScannedCall>,
}

impl CallVisitor<'_> {
    fn match_call(&self, call: &ExprCall) -> Option<ScannedCall> {
        let Expr::Path(func) = &*call.func else {
            return None;
        };

        let segments = &func.path.segments;
        let len = segments.len();
        if len < 2 || segments[len - 1].ident != self.function || segments[len - 2].ident != self.module
        {
            return None;
        }

        let PathArguments::AngleBracketed(args) = &segments[len - 1].arguments else {
            return None;
        };
        let mut types = args.args.iter().filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        });
        let (Some(Type::Path(ty)), None) = (types.next(), types.next()) else {
            return None;
        };

        let start = segments[len - 1].ident.span().start();
        let location = Location::new(
            self.file,
            u32::try_from(start.line).unwrap_or(u32::MAX),
            u32::try_from(start.column + 1).unwrap_or(u32::MAX),
        );

        Some(ScannedCall {
            path: ScannedPath {
                leading_colon: ty.path.leading_colon.is_some(),
                segments: ty
                    .path
                    .segments
                    .iter()
                    .map(|s| s.ident.to_string())
                    .collect(),
            },
            location,
        })
    }
}

impl<'ast> Visit<'ast> for CallVisitor<'_> {
    fn visit_expr_call(&mut self, call: &'ast ExprCall) {
        if let Some(found) = self.match_call(call) {
            self.calls.push(found);
        }

        visit::visit_expr_call(self, call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
fn build(value: &Value) {
    let a = crate::dynamically::create::<lib1::library::Drawing>(value);
    let b = dynamically::create::<crate::shapes::Point>(value);
    let c = other::create::<Point>(value);
    let d = dynamically::create::<Point>(value);
    let e = dynamically::create::<Vec<u8>>(value);
}
"#;

    fn catalog() -> Catalog {
        CatalogBuilder::new("records")
            .reference(ModuleReference::new("library-a").with_alias("lib1"))
            .record(TypeDef::new("records::shapes::Point".parse().unwrap()))
            .record(TypeDef::new("library-a::library::Drawing".parse().unwrap()))
            .build()
    }

    #[test]
    fn finds_turbofish_calls_with_locations() {
        let calls = scan_calls(SOURCE, "src/lib.rs", "dynamically", "create").unwrap();

        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].path.to_string(), "lib1::library::Drawing");
        assert_eq!(calls[0].location.line, 3);
        assert_eq!(calls[0].location.column, 33);
        assert_eq!(calls[3].path.segments, vec!["Vec"]);
    }

    #[test]
    fn resolves_alias_crate_relative_and_imported_paths() {
        let catalog = catalog();
        let sites = scan_call_sites(&catalog, SOURCE, "src/lib.rs", "dynamically", "create")
            .unwrap();

        let resolved: Vec<String> = sites.iter().map(|s| s.ty.to_string()).collect();
        assert_eq!(
            resolved,
            vec![
                "library-a::library::Drawing",
                "records::shapes::Point",
                "records::shapes::Point",
                "Vec",
            ]
        );
        assert!(matches!(sites[3].ty, TypeRef::Opaque(_)));
    }

    #[test]
    fn absolute_unknown_crate_does_not_resolve() {
        let path = ScannedPath {
            leading_colon: true,
            segments: vec!["serde".into(), "Point".into()],
        };

        assert_eq!(resolve_type_path(&catalog(), &path), None);
    }

    #[test]
    fn ambiguous_suffix_does_not_resolve() {
        let catalog = CatalogBuilder::new("records")
            .record(TypeDef::new("records::a::Point".parse().unwrap()))
            .record(TypeDef::new("records::b::Point".parse().unwrap()))
            .build();
        let path = ScannedPath {
            leading_colon: false,
            segments: vec!["Point".into()],
        };

        assert_eq!(resolve_type_path(&catalog, &path), None);
    }

    #[test]
    fn unparsable_source_is_a_scan_error() {
        let err = scan_call_sites(&catalog(), "fn (", "bad.rs", "dynamically", "create")
            .unwrap_err();

        assert!(matches!(err, Error::Scan { ref file, .. } if file == "bad.rs"));
    }
}
