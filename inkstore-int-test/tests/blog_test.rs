use inkstore::cms::BlogService;
use inkstore::doc;
use inkstore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_lookup_unknown_slug_is_not_an_error() {
    run_test(
        create_test_context,
        |ctx| {
            let service = BlogService::new(&ctx.db())?;
            // A missing post renders as a 404 upstream; down here it is a
            // plain empty result.
            assert!(service.lookup_by_slug("no-such-post")?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_publish_then_render_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let service = BlogService::new(&ctx.db())?;

            service.publish(
                "post-1",
                &doc!{
                    slug: "hello-world",
                    title: "Hello World",
                    body: "Welcome to the blog.",
                    timestamp: "2016-05-04T12:00:00Z"
                },
            )?;

            let post = service.lookup_by_slug("hello-world")?.expect("post missing");
            // The handler upstream renders title, timestamp, and body.
            assert_eq!(post.get("title"), "Hello World".into());
            assert_eq!(post.get("timestamp"), "2016-05-04T12:00:00Z".into());
            assert_eq!(post.get("body"), "Welcome to the blog.".into());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_slugs_resolve_to_first_match() {
    run_test(
        create_test_context,
        |ctx| {
            let service = BlogService::new(&ctx.db())?;

            service.publish("post-1", &doc!{ slug: "shared", title: "first" })?;
            service.publish("post-2", &doc!{ slug: "shared", title: "second" })?;

            let post = service.lookup_by_slug("shared")?.expect("post missing");
            assert_eq!(post.get("title"), "first".into());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_republishing_keeps_single_index_entry() {
    run_test(
        create_test_context,
        |ctx| {
            let service = BlogService::new(&ctx.db())?;

            service.publish("post-1", &doc!{ slug: "evolving", title: "v1" })?;
            service.publish("post-1", &doc!{ slug: "evolving", title: "v2" })?;

            let post = service.lookup_by_slug("evolving")?.expect("post missing");
            assert_eq!(post.get("title"), "v2".into());

            let db = ctx.db();
            let blogs = db.collection("blogs")?;
            let matches = blogs.find_by("slug", &inkstore::common::Value::from("evolving"))?;
            assert_eq!(matches.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_slug_rename_is_reflected_in_lookup() {
    run_test(
        create_test_context,
        |ctx| {
            let service = BlogService::new(&ctx.db())?;

            service.publish("post-1", &doc!{ slug: "draft-title", title: "Post" })?;
            service.publish("post-1", &doc!{ slug: "final-title", title: "Post" })?;

            assert!(service.lookup_by_slug("draft-title")?.is_none());
            assert!(service.lookup_by_slug("final-title")?.is_some());
            Ok(())
        },
        cleanup,
    )
}
