use crate::{
    config::Config,
    emit::{SourceUnit, UnitKind},
    resolve::{FactoryOrigin, FactoryPlan, FactoryRef, FieldMapping, MappingKind, Variant},
};
use dynamically_schema::prelude::*;
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

///
/// Synthesizer
///
/// Turns a `FactoryPlan` into the units that carry its synthesized methods:
/// an inherent `impl` for augmented variants and a `<Name>Factory` unit for
/// companion ones. Output is a pure function of the plan.
///

pub struct Synthesizer<'a> {
    config: &'a Config,
}

impl<'a> Synthesizer<'a> {
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn render(&self, plan: &FactoryPlan) -> Vec<SourceUnit> {
        let mut units = Vec::new();

        if plan.has_origin(FactoryOrigin::Augmented) {
            units.push(self.augmentation(plan));
        }
        if let Some(unit) = self.companion(plan) {
            units.push(unit);
        }

        units
    }

    fn augmentation(&self, plan: &FactoryPlan) -> SourceUnit {
        let ty = &plan.type_path;
        let methods = Variant::ALL
            .into_iter()
            .filter(|v| {
                plan.factory(*v)
                    .is_some_and(|r| r.origin == FactoryOrigin::Augmented)
            })
            .filter_map(|v| self.method(plan, v, FactoryOrigin::Augmented));

        SourceUnit {
            name: format!("{}.g", plan.target),
            kind: UnitKind::Augmentation,
            tokens: quote! {
                impl #ty {
                    #(#methods)*
                }
            },
        }
    }

    fn companion(&self, plan: &FactoryPlan) -> Option<SourceUnit> {
        let path = plan.companion.as_ref()?;
        let ident = format_ident!("{}", path.ident);

        // the companion always offers both entry points
        let methods = Variant::ALL
            .into_iter()
            .filter_map(|v| self.method(plan, v, FactoryOrigin::Companion));

        Some(SourceUnit {
            name: format!("{}.factory.g", plan.target),
            kind: UnitKind::Companion(path.clone()),
            tokens: quote! {
                pub struct #ident;

                impl #ident {
                    #(#methods)*
                }
            },
        })
    }

    // One factory method for the unit of the given origin. The single variant
    // constructs when the unit is where the single factory lives and
    // otherwise forwards to it; the many variant maps the single factory
    // over an array.
    fn method(
        &self,
        plan: &FactoryPlan,
        variant: Variant,
        unit: FactoryOrigin,
    ) -> Option<TokenStream> {
        let ty = &plan.type_path;
        let name = format_ident!("{}", self.config.method(variant));
        let single = plan.single.as_ref()?;

        let (ret, body) = match variant {
            Variant::Single => {
                let body = if single.origin == unit {
                    self.construct(plan)?
                } else {
                    let path = &single.path;
                    quote!(#path(data))
                };

                (quote!(#ty), body)
            }
            Variant::Many => {
                let path = &single.path;

                (
                    quote!(::std::vec::Vec<#ty>),
                    quote!(::dynamically::__private::many(data, #path)),
                )
            }
        };

        Some(quote! {
            pub fn #name(
                data: &::dynamically::Value,
            ) -> ::core::result::Result<#ret, ::dynamically::Error> {
                #body
            }
        })
    }

    fn construct(&self, plan: &FactoryPlan) -> Option<TokenStream> {
        let ty = &plan.type_path;
        let constructor = plan.constructor.as_ref()?;

        let args: Vec<TokenStream> = plan
            .params
            .iter()
            .map(|param| {
                let name = Literal::string(&param.name);
                let source = quote!(::dynamically::__private::field(object, #name)?);

                value(&param.kind, &source, &param.name)
                    .unwrap_or_else(|| quote!(::core::default::Default::default()))
            })
            .collect();

        let record = match constructor {
            ConstructorKind::Struct => {
                let fields = plan.params.iter().map(|p| format_ident!("{}", p.name));
                quote!(#ty { #(#fields: #args),* })
            }
            ConstructorKind::Tuple => quote!(#ty(#(#args),*)),
            ConstructorKind::Function(f) => {
                let f = format_ident!("{f}");
                quote!(#ty::#f(#(#args),*))
            }
        };

        let assignments: Vec<TokenStream> = plan
            .properties
            .iter()
            .filter_map(assignment)
            .collect();
        let binding = if assignments.is_empty() {
            quote!(record)
        } else {
            quote!(mut record)
        };

        // still reject non-object input when no member reads from it
        let uses_object =
            !assignments.is_empty() || plan.params.iter().any(|p| p.kind.is_mapped());
        let object = if uses_object {
            quote!(let object = ::dynamically::__private::object(data)?;)
        } else {
            quote!(::dynamically::__private::object(data)?;)
        };

        Some(quote! {
            #object
            let #binding = #record;
            #(#assignments)*
            ::core::result::Result::Ok(record)
        })
    }
}

fn assignment(prop: &FieldMapping) -> Option<TokenStream> {
    let name = Literal::string(&prop.name);
    let field = format_ident!("{}", prop.name);
    let value = value(&prop.kind, &quote!(field), &prop.name)?;

    Some(quote! {
        if let ::core::option::Option::Some(field) = ::dynamically::__private::optional(object, #name) {
            record.#field = #value;
        }
    })
}

// Expression producing the member value from `source` (a `&Value`), or
// `None` when the member is not populated from the input.
fn value(kind: &MappingKind, source: &TokenStream, name: &str) -> Option<TokenStream> {
    let name = Literal::string(name);

    let tokens = match kind {
        MappingKind::Direct => quote!(::dynamically::__private::direct(#source, #name)?),
        MappingKind::FactorySingle(r) => {
            let path = &r.path;
            quote!(::dynamically::__private::nested(#source, #name, #path)?)
        }
        MappingKind::FactoryMany(r) => {
            let path = &r.path;
            quote! {
                ::dynamically::__private::nested(#source, #name, #path)?
                    .into_iter()
                    .collect()
            }
        }
        MappingKind::ArrayMaterialize(inner) => {
            let elements = materialized(inner, source, &name)?;
            quote!(::dynamically::__private::materialize(#elements))
        }
        MappingKind::Unmapped => return None,
    };

    Some(tokens)
}

fn materialized(inner: &MappingKind, source: &TokenStream, name: &Literal) -> Option<TokenStream> {
    match inner {
        MappingKind::Direct => Some(quote! {
            ::dynamically::__private::direct::<::std::vec::Vec<_>>(#source, #name)?
        }),
        MappingKind::FactoryMany(FactoryRef { path, .. }) => Some(quote! {
            ::dynamically::__private::nested(#source, #name, #path)?
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{alias::CompanionPath, path::RustPath};

    fn id(s: &str) -> TypeId {
        s.parse().unwrap()
    }

    fn fref(target: &str, variant: Variant, origin: FactoryOrigin, path: &str) -> FactoryRef {
        FactoryRef {
            target: id(target),
            variant,
            origin,
            path: RustPath::parse(path),
        }
    }

    fn compact(tokens: &TokenStream) -> String {
        tokens.to_string().split_whitespace().collect()
    }

    fn line_plan() -> FactoryPlan {
        let point = |variant, method| {
            fref(
                "records::shapes::Point",
                variant,
                FactoryOrigin::Augmented,
                &format!("crate::shapes::Point::{method}"),
            )
        };

        FactoryPlan {
            target: id("records::shapes::Line"),
            type_path: RustPath::parse("crate::shapes::Line"),
            constructor: Some(ConstructorKind::Function("new".to_string())),
            params: vec![
                FieldMapping {
                    name: "start".to_string(),
                    ty: TypeRef::record(id("records::shapes::Point")),
                    kind: MappingKind::FactorySingle(point(Variant::Single, "create")),
                },
                FieldMapping {
                    name: "end".to_string(),
                    ty: TypeRef::record(id("records::shapes::Point")),
                    kind: MappingKind::FactorySingle(point(Variant::Single, "create")),
                },
            ],
            properties: vec![],
            single: Some(fref(
                "records::shapes::Line",
                Variant::Single,
                FactoryOrigin::Augmented,
                "crate::shapes::Line::create",
            )),
            many: Some(fref(
                "records::shapes::Line",
                Variant::Many,
                FactoryOrigin::Augmented,
                "crate::shapes::Line::create_many",
            )),
            companion: None,
        }
    }

    #[test]
    fn augmentation_constructs_through_named_constructor() {
        let config = Config::default();
        let units = Synthesizer::new(&config).render(&line_plan());

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].kind, UnitKind::Augmentation);

        let text = compact(&units[0].tokens);
        assert!(text.starts_with("implcrate::shapes::Line{"));
        assert!(text.contains(
            "letrecord=crate::shapes::Line::new(::dynamically::__private::nested(\
             ::dynamically::__private::field(object,\"start\")?,\"start\",\
             crate::shapes::Point::create)?,"
        ));
        assert!(text.contains("pubfncreate_many("));
        assert!(text.contains("::dynamically::__private::many(data,crate::shapes::Line::create)"));
    }

    #[test]
    fn companion_delegates_to_hand_written_single() {
        let mut plan = line_plan();
        plan.single = Some(fref(
            "records::shapes::Line",
            Variant::Single,
            FactoryOrigin::HandWritten,
            "crate::shapes::Line::create",
        ));
        plan.many = Some(fref(
            "records::shapes::Line",
            Variant::Many,
            FactoryOrigin::Companion,
            "crate::__dynamically::shapes::LineFactory::create_many",
        ));
        plan.companion = Some(CompanionPath {
            namespace: vec!["__dynamically".to_string(), "shapes".to_string()],
            ident: "LineFactory".to_string(),
        });

        let config = Config::default();
        let units = Synthesizer::new(&config).render(&plan);

        assert_eq!(units.len(), 1);
        let text = compact(&units[0].tokens);
        assert!(text.starts_with("pubstructLineFactory;"));
        assert!(text.contains("{crate::shapes::Line::create(data)}"));
        assert!(!text.contains("letobject"));
    }

    #[test]
    fn properties_assign_only_when_mapped() {
        let mut plan = line_plan();
        plan.properties = vec![
            FieldMapping {
                name: "title".to_string(),
                ty: TypeRef::scalar(Scalar::String),
                kind: MappingKind::Direct,
            },
            FieldMapping {
                name: "when".to_string(),
                ty: TypeRef::Opaque("std::time::Instant".to_string()),
                kind: MappingKind::Unmapped,
            },
        ];

        let config = Config::default();
        let text = compact(&Synthesizer::new(&config).render(&plan)[0].tokens);

        assert!(text.contains("letmutrecord="));
        assert!(text.contains("record.title=::dynamically::__private::direct(field,\"title\")?;"));
        assert!(!text.contains("record.when"));
    }

    #[test]
    fn unmapped_param_defaults_and_arrays_materialize() {
        let mut plan = line_plan();
        plan.constructor = Some(ConstructorKind::Struct);
        plan.params = vec![
            FieldMapping {
                name: "lines".to_string(),
                ty: TypeRef::array(TypeRef::record(id("records::shapes::Line"))),
                kind: MappingKind::ArrayMaterialize(Box::new(MappingKind::FactoryMany(fref(
                    "records::shapes::Line",
                    Variant::Many,
                    FactoryOrigin::Augmented,
                    "crate::shapes::Line::create_many",
                )))),
            },
            FieldMapping {
                name: "weights".to_string(),
                ty: TypeRef::array(TypeRef::scalar(Scalar::F64)),
                kind: MappingKind::ArrayMaterialize(Box::new(MappingKind::Direct)),
            },
            FieldMapping {
                name: "cache".to_string(),
                ty: TypeRef::Dynamic,
                kind: MappingKind::Unmapped,
            },
        ];

        let config = Config::default();
        let text = compact(&Synthesizer::new(&config).render(&plan)[0].tokens);

        assert!(text.contains("lines:::dynamically::__private::materialize(::dynamically::__private::nested("));
        assert!(text.contains("direct::<::std::vec::Vec<_>>("));
        assert!(text.contains("cache:::core::default::Default::default()"));
    }

    #[test]
    fn hand_written_single_without_constructor_gets_only_many() {
        let plan = FactoryPlan {
            target: id("records::time::Clock"),
            type_path: RustPath::parse("crate::time::Clock"),
            constructor: None,
            params: vec![],
            properties: vec![],
            single: Some(fref(
                "records::time::Clock",
                Variant::Single,
                FactoryOrigin::HandWritten,
                "crate::time::Clock::create",
            )),
            many: Some(fref(
                "records::time::Clock",
                Variant::Many,
                FactoryOrigin::Augmented,
                "crate::time::Clock::create_many",
            )),
            companion: None,
        };

        let config = Config::default();
        let units = Synthesizer::new(&config).render(&plan);

        assert_eq!(units.len(), 1);
        let text = compact(&units[0].tokens);
        assert!(!text.contains("pubfncreate("));
        assert!(text.contains("::dynamically::__private::many(data,crate::time::Clock::create)"));
    }
}
