use inkstore::cms::PREFS_COLLECTION;
use inkstore::errors::ErrorKind;
use inkstore::transaction::TransactionOptions;
use inkstore_int_test::test_util::{cleanup, create_test_context, run_test};
use std::thread;

#[test]
fn test_concurrent_increments_converge() {
    run_test(
        create_test_context,
        |ctx| {
            const WRITERS: usize = 8;

            let db = ctx.db();
            let collection = db.collection(PREFS_COLLECTION)?;

            // Each failed attempt implies some other writer committed, so a
            // budget of WRITERS attempts is always enough for everyone.
            let options = TransactionOptions::new(true, true, WRITERS as u32);

            thread::scope(|scope| {
                let mut handles = Vec::with_capacity(WRITERS);
                for _ in 0..WRITERS {
                    let collection = collection.clone();
                    let options = options.clone();
                    handles.push(scope.spawn(move || {
                        collection.run_transaction("counter", &options, |mut doc| {
                            let count = doc.get("count").as_i64().unwrap_or(0);
                            doc.put("count", count + 1)?;
                            Ok(doc)
                        })
                    }));
                }
                for handle in handles {
                    handle.join().expect("writer panicked").expect("writer failed");
                }
            });

            // Every increment survived; none were lost to races.
            let doc = collection.get("counter")?.expect("counter missing");
            assert_eq!(doc.get("count").as_i64(), Some(WRITERS as i64));
            assert_eq!(doc.revision(), WRITERS as u64);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transactions_on_different_ids_are_independent() {
    run_test(
        create_test_context,
        |ctx| {
            const WRITERS: usize = 6;

            let db = ctx.db();
            let collection = db.collection(PREFS_COLLECTION)?;
            // No contention across ids, so a zero retry budget suffices.
            let options = TransactionOptions::new(true, false, 0);

            thread::scope(|scope| {
                let mut handles = Vec::with_capacity(WRITERS);
                for writer in 0..WRITERS {
                    let collection = collection.clone();
                    let options = options.clone();
                    handles.push(scope.spawn(move || {
                        let id = format!("user-{}", writer);
                        collection.run_transaction(&id, &options, move |mut doc| {
                            doc.put("writer", writer as i64)?;
                            Ok(doc)
                        })
                    }));
                }
                for handle in handles {
                    handle.join().expect("writer panicked").expect("writer failed");
                }
            });

            for writer in 0..WRITERS {
                let id = format!("user-{}", writer);
                let doc = collection.get(&id)?.expect("document missing");
                assert_eq!(doc.get("writer").as_i64(), Some(writer as i64));
                assert_eq!(doc.revision(), 1);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_exhausted_budget_surfaces_too_many_conflicts() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let collection = db.collection(PREFS_COLLECTION)?;

            collection.transaction("contended", Ok)?;

            // A zero budget combined with a saboteur that always commits
            // between our fetch and our put forces the failure path.
            let saboteur = collection.clone();
            let options = TransactionOptions::new(false, false, 0);
            let result = collection.run_transaction("contended", &options, move |mut doc| {
                // Commit a competing write while this transaction is
                // between fetch and put.
                saboteur
                    .transaction("contended", |mut other| {
                        let bumps = other.get("bumps").as_i64().unwrap_or(0);
                        other.put("bumps", bumps + 1)?;
                        Ok(other)
                    })
                    .expect("saboteur failed");
                doc.put("loser", true)?;
                Ok(doc)
            });

            assert!(result.is_err());
            assert_eq!(result.unwrap_err().kind(), &ErrorKind::TooManyConflicts);
            Ok(())
        },
        cleanup,
    )
}
