//! Fetch a podcast RSS feed and print the extracted fields.
//!
//! Usage: `cargo run --example podcast [feed-url]`

use std::collections::HashMap;

use docpluck::{ExpectedType, Field, FieldList, Model, Resolver, Value};

const DEFAULT_FEED: &str = "http://feeds.feedburner.com/freakonomicsradio";

fn episode_model() -> docpluck::Result<Model> {
    Model::builder()
        .field("title", Field::new(["./title/text()"]))
        .field("published", Field::new(["./pubDate/text()"]))
        .field("duration", Field::new(["./itunes:duration/text()"]))
        .field(
            "size",
            Field::new(["./enclosure/@length"]).expect_type(ExpectedType::Int),
        )
        .field("url", Field::new(["./enclosure/@url"]))
        .build()
}

fn podcast_model() -> docpluck::Result<Model> {
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
        .field(
            "author",
            Field::new(["channel/itunes:author/text()"])
                .or("channel/itunes:author/itunes:name/text()"),
        )
        .list("episodes", FieldList::new("channel/item", episode_model()?))
        .build()
}

fn main() -> docpluck::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_FEED.to_string());

    let namespaces = HashMap::from([(
        "itunes".to_string(),
        "http://www.itunes.com/dtds/podcast-1.0.dtd".to_string(),
    )]);

    let resolver = Resolver::from_url(&url, "xml", Some(namespaces))?;
    let record = resolver.parse(&podcast_model()?)?;

    let untitled = Value::Str("(untitled)".to_string());
    for (name, value) in record.iter() {
        match value {
            Value::Records(episodes) => {
                println!("{name}: {} episodes", episodes.len());
                for episode in episodes.iter().take(5) {
                    let title = episode.get_or("title", &untitled);
                    println!("  - {title}");
                }
            }
            scalar => println!("{name}: {scalar}"),
        }
    }

    Ok(())
}
