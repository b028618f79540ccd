use std::sync::Arc;

use crate::collection::{CollectionConfig, Document, DocumentCollection};
use crate::common::Value;
use crate::errors::InkstoreResult;
use crate::inkstore::Inkstore;
use crate::transaction::TransactionOptions;

/// Name of the blog post collection.
pub const BLOG_COLLECTION: &str = "blogs";

/// The indexed field blog posts are looked up by.
pub const SLUG_FIELD: &str = "slug";

/// The collection configuration for blog posts: a slug index and nothing
/// else. Posts carry their own editorial timestamp field.
pub fn blog_collection() -> CollectionConfig {
    CollectionConfig::new(BLOG_COLLECTION).with_index(SLUG_FIELD)
}

/// Serves blog posts by slug.
///
/// Lookup goes through the collection's precomputed slug index. Nothing
/// stops two posts from sharing a slug; when that happens the first match
/// in index order wins and the rest are ignored. An unknown slug is a
/// normal outcome, not an error.
#[derive(Clone)]
pub struct BlogService {
    inner: Arc<BlogServiceInner>,
}

impl BlogService {
    /// Creates the service on top of an open database.
    pub fn new(db: &Inkstore) -> InkstoreResult<Self> {
        Ok(BlogService {
            inner: Arc::new(BlogServiceInner {
                collection: db.collection(BLOG_COLLECTION)?,
            }),
        })
    }

    /// Finds the first blog post carrying the given slug, or `None` when
    /// no post matches.
    pub fn lookup_by_slug(&self, slug: &str) -> InkstoreResult<Option<Document>> {
        log::debug!("Look up post: {}", slug);
        self.inner
            .collection
            .find_first_by(SLUG_FIELD, &Value::from(slug))
    }

    /// Stores a post document under the given id, creating it when absent
    /// and merging over the current body otherwise. Going through the
    /// transactional path keeps the slug index current.
    pub fn publish(&self, id: &str, post: &Document) -> InkstoreResult<Document> {
        let post = post.clone();
        let options = TransactionOptions::new(true, false, TransactionOptions::default().max_retries());
        self.inner.collection.run_transaction(id, &options, move |mut doc| {
            doc.merge(&post)?;
            Ok(doc)
        })
    }
}

struct BlogServiceInner {
    collection: DocumentCollection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn test_db() -> Inkstore {
        Inkstore::builder()
            .collection(blog_collection())
            .open_or_create()
            .unwrap()
    }

    #[test]
    fn test_lookup_unknown_slug_is_none() {
        let db = test_db();
        let service = BlogService::new(&db).unwrap();
        assert!(service.lookup_by_slug("nothing-here").unwrap().is_none());
        db.close().unwrap();
    }

    #[test]
    fn test_publish_then_lookup() {
        let db = test_db();
        let service = BlogService::new(&db).unwrap();

        service
            .publish(
                "post-1",
                &doc!{
                    slug: "hello-world",
                    title: "Hello World",
                    body: "The first post.",
                    timestamp: "2016-05-04"
                },
            )
            .unwrap();

        let found = service.lookup_by_slug("hello-world").unwrap().unwrap();
        assert_eq!(found.get("title"), "Hello World".into());
        assert_eq!(found.get("body"), "The first post.".into());
        db.close().unwrap();
    }

    #[test]
    fn test_republish_updates_post() {
        let db = test_db();
        let service = BlogService::new(&db).unwrap();

        service
            .publish("post-1", &doc!{ slug: "hello", title: "Draft" })
            .unwrap();
        let updated = service
            .publish("post-1", &doc!{ slug: "hello", title: "Final" })
            .unwrap();
        assert_eq!(updated.revision(), 2);

        let found = service.lookup_by_slug("hello").unwrap().unwrap();
        assert_eq!(found.get("title"), "Final".into());
        db.close().unwrap();
    }

    #[test]
    fn test_duplicate_slug_first_match_wins() {
        let db = test_db();
        let service = BlogService::new(&db).unwrap();

        service
            .publish("post-1", &doc!{ slug: "dup", title: "older" })
            .unwrap();
        service
            .publish("post-2", &doc!{ slug: "dup", title: "newer" })
            .unwrap();

        let found = service.lookup_by_slug("dup").unwrap().unwrap();
        assert_eq!(found.get("title"), "older".into());
        db.close().unwrap();
    }

    #[test]
    fn test_slug_change_moves_lookup() {
        let db = test_db();
        let service = BlogService::new(&db).unwrap();

        service
            .publish("post-1", &doc!{ slug: "before", title: "Post" })
            .unwrap();
        service
            .publish("post-1", &doc!{ slug: "after", title: "Post" })
            .unwrap();

        assert!(service.lookup_by_slug("before").unwrap().is_none());
        assert!(service.lookup_by_slug("after").unwrap().is_some());
        db.close().unwrap();
    }
}
