//! End-to-end tests for the extraction pipeline.
//!
//! Resolves podcast-style models against fixture documents, covering
//! namespaced queries, nested repeated models, fallback locations, and
//! the lenient HTML front end.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use docpluck::{ExpectedType, ExtractError, Field, FieldList, Model, Resolver, Value};

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn itunes_namespaces() -> HashMap<String, String> {
    HashMap::from([(
        "itunes".to_string(),
        "http://www.itunes.com/dtds/podcast-1.0.dtd".to_string(),
    )])
}

fn episode_model() -> Model {
    Model::builder()
        .field("title", Field::new(["./title/text()"]))
        .field("description", Field::new(["./description/text()"]))
        .field("published", Field::new(["./pubDate/text()"]))
        .field("duration", Field::new(["./itunes:duration/text()"]))
        .field(
            "size",
            Field::new(["./enclosure/@length"]).expect_type(ExpectedType::Int),
        )
        .field("url", Field::new(["./enclosure/@url"]))
        .build()
        .expect("valid episode model")
}

fn podcast_model() -> Model {
    Model::builder()
        .field("title", Field::new(["channel/title/text()"]))
        .field(
            "description",
            Field::new(["channel/itunes:summary/text()"]).or("channel/description/text()"),
        )
        .field(
            "website",
            Field::new(["channel/link/text()"]).or("channel/docs/text()"),
        )
        .field("author", Field::new(["channel/itunes:author/text()"]))
        .list("episodes", FieldList::new("channel/item", episode_model()))
        .build()
        .expect("valid podcast model")
}

#[test]
fn test_podcast_feed_end_to_end() {
    let feed = load_fixture("revolutions_feed.xml");
    let resolver = Resolver::from_str(&feed, "xml", Some(itunes_namespaces())).expect("parse feed");
    let record = resolver.parse(&podcast_model()).expect("resolve podcast");

    assert_eq!(
        record.get("title"),
        Some(&Value::Str("Revolutions".to_string()))
    );
    // itunes:summary is absent, so the fallback location supplies the value.
    assert_eq!(
        record.get("description"),
        Some(&Value::Str(
            "A weekly podcast examining great political revolutions.".to_string()
        ))
    );
    assert_eq!(
        record.get("author"),
        Some(&Value::Str("Mike Duncan".to_string()))
    );

    let episodes = record
        .field("episodes")
        .expect("episodes present")
        .as_records()
        .expect("episodes are records");
    assert_eq!(episodes.len(), 3);

    assert_eq!(
        episodes[0].get("title"),
        Some(&Value::Str("6.05- The Barricades".to_string()))
    );
    assert_eq!(
        episodes[0].get("duration"),
        Some(&Value::Str("31:12".to_string()))
    );
    assert_eq!(episodes[0].get("size"), Some(&Value::Int(30_018_224)));
    assert_eq!(
        episodes[2].get("url"),
        Some(&Value::Str(
            "https://example.com/revolutions_607.mp3".to_string()
        ))
    );
}

#[test]
fn test_resolution_is_idempotent() {
    let feed = load_fixture("revolutions_feed.xml");
    let resolver = Resolver::from_str(&feed, "xml", Some(itunes_namespaces())).expect("parse feed");
    let model = podcast_model();

    let first = resolver.parse(&model).expect("first pass");
    let second = resolver.parse(&model).expect("second pass");
    assert_eq!(first, second);
}

#[test]
fn test_missing_field_uses_default() {
    let feed = load_fixture("revolutions_feed.xml");
    let resolver = Resolver::from_str(&feed, "xml", None).expect("parse feed");

    let model = Model::builder()
        .field(
            "copyright",
            Field::new(["channel/copyright/text()"]).default("N/A"),
        )
        .build()
        .expect("valid model");

    let record = resolver.parse(&model).expect("resolve");
    assert_eq!(record.get("copyright"), Some(&Value::Str("N/A".to_string())));
}

#[test]
fn test_malformed_html_is_recovered() {
    let html = load_fixture("malformed.html");

    let model = Model::builder()
        .field("title", Field::new(["body/h1/text()"]))
        .field("second_para", Field::new(["body/div/p/text()"]))
        .build()
        .expect("valid model");

    let resolver = Resolver::from_str(&html, "html", None).expect("lenient parse");
    let record = resolver.parse(&model).expect("resolve");

    assert_eq!(
        record.get("title"),
        Some(&Value::Str("Heading".to_string()))
    );
    assert_eq!(
        record.get("second_para"),
        Some(&Value::Str(
            "paragraph in div with id as 'second'".to_string()
        ))
    );
}

#[test]
fn test_xml_front_end_rejects_malformed_input() {
    let html = load_fixture("malformed.html");
    let err = Resolver::from_str(&html, "xml", None).unwrap_err();
    assert!(matches!(err, ExtractError::Xml(_)));
}

#[test]
fn test_unknown_format_tag() {
    let err = Resolver::from_str("<a/>", "yaml", None).unwrap_err();
    assert!(matches!(err, ExtractError::UnknownFormat(tag) if tag == "yaml"));
}

#[test]
fn test_registry_bypass_with_explicit_builder() {
    let resolver = Resolver::with_builder("<body><h1>Heading</h1>", &docpluck::HtmlTreeBuilder, None)
        .expect("lenient parse");
    let model = Model::builder()
        .field("title", Field::new(["body/h1/text()"]))
        .build()
        .expect("valid model");
    let record = resolver.parse(&model).expect("resolve");
    assert_eq!(
        record.get("title"),
        Some(&Value::Str("Heading".to_string()))
    );
}

#[test]
fn test_record_serializes_in_declaration_order() {
    let feed = load_fixture("revolutions_feed.xml");
    let resolver = Resolver::from_str(&feed, "xml", None).expect("parse feed");

    let model = Model::builder()
        .field("title", Field::new(["channel/title/text()"]))
        .field("website", Field::new(["channel/link/text()"]))
        .build()
        .expect("valid model");

    let record = resolver.parse(&model).expect("resolve");
    let json = serde_json::to_value(&record).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "title": "Revolutions",
            "website": "https://www.revolutionspodcast.com/"
        })
    );
}

#[test]
fn test_custom_parse_fn_supersedes_conversion() {
    let feed = load_fixture("revolutions_feed.xml");
    let resolver = Resolver::from_str(&feed, "xml", None).expect("parse feed");

    let model = Model::builder()
        .field(
            "title",
            Field::new(["channel/title/text()"])
                .expect_type(ExpectedType::Int)
                .parse_with(|raw| Ok(Value::Str(raw.to_uppercase()))),
        )
        .build()
        .expect("valid model");

    let record = resolver.parse(&model).expect("resolve");
    assert_eq!(
        record.get("title"),
        Some(&Value::Str("REVOLUTIONS".to_string()))
    );
}
