use dynamically_build::{
    Cancellation, Config, DiagnosticSink, FactoryOrigin, GenerateError, Generator, MappingKind,
    SourceUnit, UnitKind, generate,
};
use dynamically_schema::prelude::*;

fn id(s: &str) -> TypeId {
    s.parse().unwrap()
}

fn point(module: &str, extendable: bool) -> TypeDef {
    let mut ty = TypeDef::new(id(&format!("{module}::library::Point")));
    ty.extendable = extendable;
    ty.constructors.push(Constructor::new(
        ConstructorKind::Struct,
        vec![
            Param::new("x", TypeRef::scalar(Scalar::I32)),
            Param::new("y", TypeRef::scalar(Scalar::I32)),
        ],
    ));
    ty
}

fn line(module: &str) -> TypeDef {
    let point = TypeRef::record(id(&format!("{module}::library::Point")));
    let mut ty = TypeDef::new(id(&format!("{module}::library::Line")));
    ty.constructors.push(Constructor::new(
        ConstructorKind::Struct,
        vec![Param::new("start", point.clone()), Param::new("end", point)],
    ));
    ty
}

fn shape() -> TypeDef {
    let mut ty = TypeDef::new(id("records::shapes::Shape"));
    ty.extendable = true;
    ty.constructors.push(Constructor::new(
        ConstructorKind::Struct,
        vec![Param::new(
            "lines",
            TypeRef::array(TypeRef::record(id("library-a::library::Line"))),
        )],
    ));
    ty
}

fn catalog() -> Catalog {
    let mut tag = TypeDef::new(id("records::shapes::Tag"));
    tag.extendable = true;
    tag.constructors.push(Constructor::new(
        ConstructorKind::Tuple,
        vec![Param::new("name", TypeRef::scalar(Scalar::String))],
    ));
    tag.methods
        .push(Method::factory("create", Accessibility::Private));

    CatalogBuilder::new("records")
        .reference(ModuleReference::new("library-a").with_alias("lib1"))
        .reference(ModuleReference::new("library-b").with_alias("lib2"))
        .record(point("library-a", false))
        .record(line("library-a"))
        .record(point("library-b", false))
        .record(line("library-b"))
        .record(shape())
        .record(tag)
        .call_site(TypeRef::record(id("records::shapes::Shape")), None)
        .call_site(TypeRef::record(id("library-b::library::Line")), None)
        .call_site(TypeRef::record(id("records::shapes::Shape")), None)
        .call_site(TypeRef::scalar(Scalar::Bool), None)
        .build()
}

#[test]
fn shapes_scenario_resolves_nested_arrays_through_companions() {
    let catalog = catalog();
    let generation = generate(&catalog, &Config::default()).unwrap();

    let shape = generation
        .plans
        .iter()
        .find(|p| p.target == id("records::shapes::Shape"))
        .unwrap();

    let MappingKind::ArrayMaterialize(inner) = &shape.params[0].kind else {
        panic!("lines should materialize an array");
    };
    let MappingKind::FactoryMany(line_many) = &**inner else {
        panic!("lines should map through the many factory");
    };
    assert_eq!(line_many.origin, FactoryOrigin::Companion);
    assert_eq!(
        line_many.path.to_string(),
        "crate::__dynamically::lib1::library::LineFactory::create_many"
    );
    assert_eq!(shape.single.as_ref().unwrap().origin, FactoryOrigin::Augmented);
}

#[test]
fn generation_is_idempotent() {
    let catalog = catalog();
    let config = Config::default();

    let first = generate(&catalog, &config).unwrap().render();
    let second = generate(&catalog, &config).unwrap().render();

    assert_eq!(first, second);
}

#[test]
fn units_come_in_a_fixed_order() {
    let catalog = catalog();
    let generation = generate(&catalog, &Config::default()).unwrap();

    let names: Vec<&str> = generation.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "dynamically.g",
            "dynamically.create.g",
            "library-a::library::Line.factory.g",
            "library-a::library::Point.factory.g",
            "library-b::library::Line.factory.g",
            "library-b::library::Point.factory.g",
            "records::shapes::Shape.g",
            "records::shapes::Tag.g",
            "records::shapes::Tag.factory.g",
        ]
    );
    assert!(matches!(generation.units[0].kind, UnitKind::Declaration));
}

#[test]
fn dispatcher_covers_distinct_record_call_sites() {
    let catalog = catalog();
    let generation = generate(&catalog, &Config::default()).unwrap();

    let targets: Vec<String> = generation.dispatch.keys().map(ToString::to_string).collect();
    assert_eq!(
        targets,
        vec!["library-b::library::Line", "records::shapes::Shape"]
    );

    let text = generation.render();
    assert!(text.contains("impl crate :: dynamically :: Create for :: lib2 :: library :: Line"));
    assert!(text.contains("impl crate :: dynamically :: Create for crate :: shapes :: Shape"));
}

#[test]
fn inaccessible_factory_is_reported_once() {
    let catalog = catalog();
    let generation = generate(&catalog, &Config::default()).unwrap();

    let mut sink: Vec<dynamically_build::Diagnostic> = Vec::new();
    generation.report(&mut sink);

    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].type_name, "records::shapes::Tag");
    assert!(sink[0].message().contains("is not accessible from module 'records'"));

    // the sink trait is usable directly too
    sink.report(sink[0].clone());
    assert_eq!(sink.len(), 2);
}

#[test]
fn emitted_units_match_render_input() {
    let catalog = catalog();
    let generation = generate(&catalog, &Config::default()).unwrap();

    let mut units: Vec<SourceUnit> = Vec::new();
    generation.emit(&mut units);

    assert_eq!(units.len(), generation.units.len());
    let companions = units
        .iter()
        .filter(|u| matches!(u.kind, UnitKind::Companion(_)))
        .count();
    assert_eq!(companions, 5);
}

#[test]
fn cancelled_pass_emits_nothing() {
    let catalog = catalog();
    let config = Config::default();
    let cancel = Cancellation::new();
    cancel.cancel();

    let result = Generator::new(&catalog, &config)
        .with_cancellation(cancel)
        .generate();

    assert!(matches!(result, Err(GenerateError::Cancelled)));
}

#[test]
fn invalid_config_is_rejected_before_work() {
    let catalog = catalog();
    let config = Config {
        entry_trait: "impl".to_string(),
        ..Config::default()
    };

    assert!(matches!(
        generate(&catalog, &config),
        Err(GenerateError::Config(_))
    ));
}

#[test]
fn referenced_record_marked_extendable_is_rejected() {
    let catalog = CatalogBuilder::new("records")
        .reference(ModuleReference::new("library-a").with_alias("lib1"))
        .record(point("library-a", true))
        .call_site(TypeRef::record(id("library-a::library::Point")), None)
        .build();

    let result = generate(&catalog, &Config::default());

    assert!(matches!(result, Err(GenerateError::Validation(_))));
}

#[test]
fn catalog_from_json_drives_generation() {
    let json = catalog().to_json().unwrap();
    let loaded = Catalog::from_json(&json).unwrap();

    let from_json = generate(&loaded, &Config::default()).unwrap().render();
    let direct = generate(&catalog(), &Config::default()).unwrap().render();

    assert_eq!(from_json, direct);
}
