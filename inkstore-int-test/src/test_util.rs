use inkstore::cms::{blog_collection, preferences_collection};
use inkstore::errors::InkstoreResult;
use inkstore::inkstore::Inkstore;
use inkstore::store::memory::{InMemoryStore, InMemoryStoreConfig};

// Each test binary initializes logging once, before any test runs.
#[ctor::ctor]
fn init_logging() {
    colog::init();
    log::set_max_level(log::LevelFilter::Debug);
}

/// Shared state handed to every integration test.
#[derive(Clone)]
pub struct TestContext {
    db: Inkstore,
}

impl TestContext {
    pub fn new(db: Inkstore) -> Self {
        TestContext { db }
    }

    pub fn db(&self) -> Inkstore {
        self.db.clone()
    }
}

/// Opens a fresh in-memory database with the preferences and blog
/// collections configured.
pub fn create_test_context() -> InkstoreResult<TestContext> {
    let db = Inkstore::builder()
        .store(InMemoryStore::new(InMemoryStoreConfig::with_name("int-test")))
        .collection(preferences_collection())
        .collection(blog_collection())
        .open_or_create()?;
    Ok(TestContext::new(db))
}

pub fn cleanup(ctx: TestContext) -> InkstoreResult<()> {
    ctx.db().close()
}

/// Runs a test with setup and teardown around it.
pub fn run_test<B, T, A>(before: B, test: T, after: A)
where
    B: Fn() -> InkstoreResult<TestContext>,
    T: Fn(TestContext) -> InkstoreResult<()>,
    A: Fn(TestContext) -> InkstoreResult<()>,
{
    let ctx = before().expect("Before run failed");
    let result = test(ctx.clone());
    let after_result = after(ctx);
    if let Err(e) = result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}
