//! Relationship population walkthrough.
//!
//! Builds a tiny blog schema, hands the engine a post document full of
//! reference ids, and prints the document before and after population at
//! a few depths.
//!
//! Run with: cargo run

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{json, to_string_pretty, Value};

use folio::{
    CollectionDef, CollectionRegistry, Document, LoadCache, LoadKey, LoadResult, Loader,
    Populator, RelationField, RelationTarget, RequestContext,
};

/// A loader over an in-memory document set.
struct DemoLoader {
    docs: HashMap<(String, String), Value>,
}

impl DemoLoader {
    fn new() -> Arc<Self> {
        let mut docs = HashMap::new();
        docs.insert(
            ("authors".to_string(), "a1".to_string()),
            json!({ "id": "a1", "name": "Ada Lovelace" }),
        );
        docs.insert(
            ("categories".to_string(), "c1".to_string()),
            json!({ "id": "c1", "title": "Engineering" }),
        );
        docs.insert(
            ("categories".to_string(), "c2".to_string()),
            json!({ "id": "c2", "title": "History" }),
        );
        Arc::new(Self { docs })
    }
}

impl Loader for DemoLoader {
    fn load<'a>(&'a self, key: &'a LoadKey) -> BoxFuture<'a, LoadResult> {
        let found = self
            .docs
            .get(&(key.collection.clone(), key.id.to_string()))
            .cloned();
        Box::pin(async move { Ok(found) })
    }
}

fn site_registry() -> CollectionRegistry {
    let posts = CollectionDef::new("posts")
        .with_field(RelationField::relationship(
            "author",
            RelationTarget::single("authors"),
        ))
        .with_field(
            RelationField::relationship("categories", RelationTarget::single("categories"))
                .with_has_many(true),
        );

    CollectionRegistry::new()
        .with_collection(posts)
        .with_collection(CollectionDef::new("authors"))
        .with_collection(CollectionDef::new("categories"))
}

fn post_document() -> Document {
    json!({
        "id": "p1",
        "title": "Notes on the analytical engine",
        "author": "a1",
        "categories": ["c1", "c2"]
    })
    .as_object()
    .unwrap()
    .clone()
}

#[tokio::main]
async fn main() -> Result<(), folio::Error> {
    let registry = site_registry();
    let posts = registry.lookup("posts").unwrap().clone();

    for depth in [0u32, 1] {
        let cache = LoadCache::new(DemoLoader::new());
        let ctx = RequestContext::new(depth);
        let populator = Populator::new(&ctx, &registry, &cache);

        let mut doc = post_document();
        populator.populate_document(&posts, &mut doc, 1).await?;

        println!("=== depth {depth} ===");
        println!("{}", to_string_pretty(&Value::Object(doc)).unwrap());
        println!();
    }

    Ok(())
}
