//! Integration tests for the ModelBuilder API

use scenaria::{
    ModelBuilder, ScenariaError,
    config::{AppConfig, ExportConfig, ParserConfig, RedeclarationPolicy},
    create_parser,
    identifier::Id,
    model::PropertyKey,
};

const SHOP: &str = "
    user 'Shopper' as s;
    container 'Shop' as shop {
        agent 'Web' as web is @Frontend
        store 'Orders' as orders
        web --> orders
    };
    @Frontend { color: 'blue' };
    s -('browse')-> web;
    'Checkout' {
        s -('pay')-> web
        web -'order'-> orders
        s --('receipt')--< web
    };
";

#[test]
fn test_parse_model() {
    let builder = ModelBuilder::default();
    let model = builder.parse(SHOP).expect("Failed to parse model");

    assert_eq!(model.actors().len(), 3);
    assert_eq!(model.channels().len(), 1);
    assert_eq!(model.data_flows().len(), 1);
    assert_eq!(model.scenarios()[0].steps().len(), 3);
    assert_eq!(
        model.actor(Id::new("web")).unwrap().property(PropertyKey::Color),
        Some("blue")
    );
}

#[test]
fn test_parse_error_keeps_source() {
    let source = "agent 'A' as a; note for b: 'who?';";
    let err = ModelBuilder::default().parse(source).unwrap_err();

    let ScenariaError::Parse { err, src } = err else {
        panic!("expected a parse error, got {err:?}");
    };
    assert_eq!(src, source);
    let span = err.diagnostics()[0].primary_span().unwrap();
    assert_eq!(&source[span.start()..span.end()], "b");
}

#[test]
fn test_config_controls_elaboration() {
    let source = "agent 'A' as a is @Red; @Red { color: 'red' }; agent 'Again' as a;";

    let lenient = ModelBuilder::default().parse(source).unwrap();
    assert_eq!(lenient.actors()[0].caption(), "Again");

    let strict = ModelBuilder::new(AppConfig::new(
        ParserConfig::new(true, RedeclarationPolicy::Reject),
        ExportConfig::default(),
    ));
    assert!(matches!(
        strict.parse(source),
        Err(ScenariaError::Parse { .. })
    ));

    let unresolved = ModelBuilder::new(AppConfig::new(
        ParserConfig::new(false, RedeclarationPolicy::Replace),
        ExportConfig::default(),
    ));
    let model = unresolved.parse("agent 'A' as a is @Red; @Red { color: 'red' };").unwrap();
    assert_eq!(model.actors()[0].property(PropertyKey::Color), None);
}

#[test]
fn test_to_json() {
    let builder = ModelBuilder::new(AppConfig::new(
        ParserConfig::default(),
        ExportConfig::new(false),
    ));
    let model = builder.parse(SHOP).unwrap();
    let json = builder.to_json(&model).unwrap();

    assert!(!json.contains('\n'));
    assert!(json.contains(r#""id":"s-req_res->web""#));
    assert!(json.contains(r#""kind":"data_write""#));
}

#[test]
fn test_create_parser_is_reusable() {
    let parse = create_parser();

    let first = parse(SHOP).unwrap();
    let second = parse(SHOP).unwrap();
    assert_eq!(first, second);

    let other = parse("user 'U' as u;").unwrap();
    assert_eq!(other.actors().len(), 1);
    assert!(parse("this is not scenaria").is_err());
}
