//! Integration tests for full locale resolution.
//!
//! These tests exercise the resolver end to end over small record graphs:
//! shared subgraphs, cycles, fallback to the default locale, required-field
//! validation, per-element degrade in reference arrays, breadcrumb
//! accumulation, and the partial-result contract across locales.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use localize::{
    testing::{MockApi, MockCall},
    ConfigError, ContentType, Field, Locale, Record, RecordSet, ResolveError, Resolver,
    ResolvedValue, Value,
};

fn three_locales() -> Vec<Locale> {
    vec![
        Locale::new("en", true),
        Locale::new("de", false),
        Locale::new("fr", false),
    ]
}

/// Helper to connect a resolver over a mock with the standard locale set.
async fn connect(api: MockApi) -> Resolver<MockApi> {
    Resolver::connect(api.with_locales(three_locales()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_shared_record_resolves_to_the_identical_node() {
    let api = MockApi::new()
        .with_content_type(
            ContentType::new("page")
                .with_field(Field::new("a", "Link").localized())
                .with_field(Field::new("b", "Link").localized()),
        )
        .with_content_type(
            ContentType::new("widget").with_field(Field::new("name", "Symbol").localized()),
        );
    let resolver = connect(api).await;

    let records: RecordSet = [
        Record::entry("root", "page")
            .with_field("a", [("de", Value::link("child")), ("en", Value::link("child"))])
            .with_field("b", [("de", Value::link("child")), ("en", Value::link("child"))]),
        Record::entry("child", "widget")
            .with_field("name", [("de", Value::scalar("Kind")), ("en", Value::scalar("child"))]),
    ]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();
    let tree = &result.data["de"];

    let a = tree.get("a").unwrap().as_node().unwrap();
    let b = tree.get("b").unwrap().as_node().unwrap();
    assert!(Arc::ptr_eq(a, b));
    assert_eq!(a.get("name").unwrap().as_scalar(), Some(&json!("Kind")));
}

#[tokio::test]
async fn test_cycles_terminate_in_both_resolvers() {
    let api = MockApi::new().with_content_type(
        ContentType::new("page")
            .with_field(Field::new("title", "Symbol").localized())
            .with_field(Field::new("next", "Link").localized()),
    );
    let resolver = connect(api).await;

    let records: RecordSet = [Record::entry("root", "page")
        .with_field("title", [("en", Value::scalar("Loop")), ("de", Value::scalar("Schleife"))])
        .with_field("next", [("en", Value::link("root")), ("de", Value::link("root"))])]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();

    // Default pass: revisiting beyond the depth bound flattens to null.
    assert!(result.data["en"].get("next").unwrap().is_null());

    // Locale pass: the revisit resolves to a back-reference via the seen map.
    assert_eq!(
        result.data["de"].get("next").unwrap(),
        &ResolvedValue::Circular { id: "root".into() }
    );
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_non_localized_fields_resolve_from_the_default_locale() {
    let api = MockApi::new().with_content_type(
        ContentType::new("page")
            .with_field(Field::new("title", "Symbol").localized())
            .with_field(Field::new("slug", "Symbol")),
    );
    let resolver = connect(api).await;

    let records: RecordSet = [Record::entry("root", "page")
        .with_field("title", [("en", Value::scalar("Home")), ("de", Value::scalar("Start"))])
        .with_field("slug", [("en", Value::scalar("home"))])]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();

    assert_eq!(
        result.data["de"].get("slug").unwrap().as_scalar(),
        Some(&json!("home"))
    );
    assert_eq!(
        result.data["de"].get("title").unwrap().as_scalar(),
        Some(&json!("Start"))
    );
}

#[tokio::test]
async fn test_asset_fields_fall_back_field_by_field() {
    let api = MockApi::new().with_content_type(
        ContentType::new("page").with_field(Field::new("hero", "Link").localized()),
    );
    let resolver = connect(api).await;

    let records: RecordSet = [
        Record::entry("root", "page")
            .with_field("hero", [("en", Value::link("img")), ("de", Value::link("img"))]),
        Record::asset("img")
            .with_field(
                "title",
                [("en", Value::scalar("A tree")), ("de", Value::scalar("Ein Baum"))],
            )
            .with_field("file", [("en", Value::scalar(json!({"url": "/tree.png"})))]),
    ]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();
    let hero = result.data["de"].get("hero").unwrap().as_node().unwrap();

    assert_eq!(hero.locale, "de");
    assert_eq!(hero.get("title").unwrap().as_scalar(), Some(&json!("Ein Baum")));
    // No German file: falls back to the default locale's value.
    assert_eq!(
        hero.get("file").unwrap().as_scalar(),
        Some(&json!({"url": "/tree.png"}))
    );
}

#[tokio::test]
async fn test_optional_localized_field_resolves_to_null() {
    let api = MockApi::new().with_content_type(
        ContentType::new("page").with_field(Field::new("teaser", "Symbol").localized()),
    );
    let resolver = connect(api).await;

    let records: RecordSet = [Record::entry("root", "page")
        .with_field("teaser", [("en", Value::scalar("Read more"))])]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();

    assert!(result.data["de"].get("teaser").unwrap().is_null());
}

#[tokio::test]
async fn test_missing_required_localization_fails_only_that_locale() {
    let api = MockApi::new().with_content_type(
        ContentType::new("page").with_field(Field::new("title", "Symbol").localized().required()),
    );
    let resolver = connect(api).await;

    let records: RecordSet = [Record::entry("root", "page")
        .with_field("title", [("en", Value::scalar("Home")), ("fr", Value::scalar("Accueil"))])]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();

    let message = &result.errors["de"];
    assert!(message.contains("required, localized field \"title\""));
    assert!(message.contains("of type \"Symbol\""));
    assert!(message.contains("for key \"title\""));
    assert!(message.contains("for locale \"de\""));
    assert!(message.ends_with("for locale de"));

    // Sibling locales are unaffected.
    assert_eq!(
        result.data["fr"].get("title").unwrap().as_scalar(),
        Some(&json!("Accueil"))
    );
    assert!(result.data.contains_key("en"));
    assert!(!result.data.contains_key("de"));
}

#[tokio::test]
async fn test_failing_array_element_degrades_to_default_locale() {
    let api = MockApi::new()
        .with_content_type(
            ContentType::new("page").with_field(Field::new("items", "Array").localized()),
        )
        .with_content_type(
            ContentType::new("widget")
                .with_field(Field::new("name", "Symbol").localized().required()),
        );
    let resolver = connect(api).await;

    let links = || {
        Value::array([Value::link("a"), Value::link("b"), Value::link("c")])
    };
    let records: RecordSet = [
        Record::entry("root", "page").with_field("items", [("en", links()), ("de", links())]),
        Record::entry("a", "widget")
            .with_field("name", [("en", Value::scalar("first")), ("de", Value::scalar("erstes"))]),
        // No German name: this element fails at "de" and falls back.
        Record::entry("b", "widget").with_field("name", [("en", Value::scalar("second"))]),
        Record::entry("c", "widget")
            .with_field("name", [("en", Value::scalar("third")), ("de", Value::scalar("drittes"))]),
    ]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();
    assert!(!result.errors.contains_key("de"));

    let items = result.data["de"].get("items").unwrap().as_many().unwrap();
    assert_eq!(items.len(), 3);

    let first = items[0].as_node().unwrap();
    assert_eq!(first.locale, "de");
    assert_eq!(first.get("name").unwrap().as_scalar(), Some(&json!("erstes")));

    // The failing element is the default-locale node, tagged accordingly.
    let second = items[1].as_node().unwrap();
    assert_eq!(second.locale, "en");
    assert_eq!(second.get("name").unwrap().as_scalar(), Some(&json!("second")));

    let third = items[2].as_node().unwrap();
    assert_eq!(third.locale, "de");
    assert_eq!(third.get("name").unwrap().as_scalar(), Some(&json!("drittes")));
}

#[tokio::test]
async fn test_error_path_accumulates_across_three_levels() {
    let api = MockApi::new()
        .with_content_type(
            ContentType::new("page").with_field(Field::new("a", "Link").localized()),
        )
        .with_content_type(
            ContentType::new("section").with_field(Field::new("b", "Link").localized()),
        )
        .with_content_type(
            ContentType::new("widget")
                .with_field(Field::new("c", "Symbol").localized().required()),
        );
    let resolver = connect(api).await;

    let records: RecordSet = [
        Record::entry("root", "page")
            .with_field("a", [("en", Value::link("mid")), ("de", Value::link("mid"))]),
        Record::entry("mid", "section")
            .with_field("b", [("en", Value::link("leaf")), ("de", Value::link("leaf"))]),
        Record::entry("leaf", "widget").with_field("c", [("en", Value::scalar("deep"))]),
    ]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();
    let message = &result.errors["de"];

    let c = message.find("field \"c\"").unwrap();
    let b = message.find("in localized field \"b\"").unwrap();
    let a = message.find("in localized field \"a\"").unwrap();
    assert!(c < b && b < a, "breadcrumb must read innermost first: {message}");
}

#[tokio::test]
async fn test_partial_result_contract() {
    let api = MockApi::new().with_content_type(
        ContentType::new("page").with_field(Field::new("title", "Symbol").localized().required()),
    );
    let resolver = connect(api).await;

    let records: RecordSet = [Record::entry("root", "page")
        .with_field("title", [("en", Value::scalar("Home")), ("fr", Value::scalar("Accueil"))])]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();

    let data_keys: Vec<_> = result.data.keys().cloned().collect();
    let error_keys: Vec<_> = result.errors.keys().cloned().collect();
    assert!(data_keys.contains(&"en".to_string()));
    assert!(data_keys.contains(&"fr".to_string()));
    assert_eq!(error_keys, vec!["de"]);
    assert!(!data_keys.contains(&"de".to_string()));
}

#[tokio::test]
async fn test_provider_failure_is_isolated_to_the_affected_locale() {
    let api = MockApi::new()
        .with_content_type(
            ContentType::new("page").with_field(Field::new("w", "Link").localized()),
        )
        .failing_content_type("widget");
    let resolver = connect(api).await;

    // Only the German tree references the widget, so only "de" needs its
    // (failing) schema.
    let records: RecordSet = [
        Record::entry("root", "page").with_field("w", [("de", Value::link("gadget"))]),
        Record::entry("gadget", "widget"),
    ]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();

    let message = &result.errors["de"];
    assert!(message.contains("provider error"));
    assert!(message.contains("in localized field \"w\""));
    assert!(result.data.contains_key("fr"));
    assert!(result.data.contains_key("en"));
}

#[tokio::test]
async fn test_schema_lookups_are_shared_across_concurrent_locales() {
    let api = MockApi::new()
        .with_content_type(
            ContentType::new("page").with_field(Field::new("title", "Symbol").localized()),
        )
        .with_delay(Duration::from_millis(10));
    let handle = api.clone();
    let resolver = connect(api).await;

    let records: RecordSet = [Record::entry("root", "page").with_field(
        "title",
        [
            ("en", Value::scalar("Home")),
            ("de", Value::scalar("Start")),
            ("fr", Value::scalar("Accueil")),
        ],
    )]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();
    assert_eq!(result.data.len(), 3);

    // Both alternative locales run concurrently; the in-flight lookup for
    // "page" collapses to a single request, and the space was fetched once.
    assert_eq!(handle.content_type_lookups("page"), 1);
    assert_eq!(
        handle
            .calls()
            .iter()
            .filter(|call| **call == MockCall::GetSpace)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_resolved_field_order_matches_source_order() {
    let api = MockApi::new().with_content_type(
        ContentType::new("page")
            .with_field(Field::new("z", "Symbol").localized())
            .with_field(Field::new("a", "Symbol").localized())
            .with_field(Field::new("m", "Symbol").localized()),
    );
    let resolver = connect(api).await;

    let records: RecordSet = [Record::entry("root", "page")
        .with_field("z", [("de", Value::scalar(1)), ("en", Value::scalar(1))])
        .with_field("a", [("de", Value::scalar(2)), ("en", Value::scalar(2))])
        .with_field("m", [("de", Value::scalar(3)), ("en", Value::scalar(3))])]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();

    let keys: Vec<_> = result.data["de"].fields.keys().cloned().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[tokio::test]
async fn test_connect_rejects_unusable_locale_sets() {
    let none = MockApi::new().with_locales([Locale::new("en", false)]);
    let error = Resolver::connect(none).await.unwrap_err();
    assert!(matches!(
        error,
        ResolveError::Config(ConfigError::NoDefaultLocale)
    ));

    let two = MockApi::new().with_locales([Locale::new("en", true), Locale::new("de", true)]);
    let error = Resolver::connect(two).await.unwrap_err();
    assert!(matches!(
        error,
        ResolveError::Config(ConfigError::MultipleDefaultLocales { count: 2 })
    ));
}

#[tokio::test]
async fn test_unknown_root_is_an_error() {
    let api = MockApi::new();
    let resolver = connect(api).await;
    let records = RecordSet::new();

    let error = resolver.resolve(&records, "missing").await.unwrap_err();
    assert!(matches!(error, ResolveError::UnknownRecord { .. }));
}

#[tokio::test]
async fn test_dangling_single_reference_fails_with_field_path() {
    let api = MockApi::new().with_content_type(
        ContentType::new("page").with_field(Field::new("next", "Link").localized()),
    );
    let resolver = connect(api).await;

    let records: RecordSet = [Record::entry("root", "page")
        .with_field("next", [("de", Value::link("nowhere")), ("en", Value::scalar("n/a"))])]
    .into_iter()
    .collect();

    let result = resolver.resolve(&records, "root").await.unwrap();

    let message = &result.errors["de"];
    assert!(message.contains("no record with id \"nowhere\""));
    assert!(message.contains("in localized field \"next\""));
}
