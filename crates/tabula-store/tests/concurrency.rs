use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tabula_store::{DocumentStore, DocumentStoreExt, FsDocumentStore};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Payload {
    writer: u32,
    values: Vec<u32>,
}

impl Payload {
    fn filled(writer: u32, len: usize) -> Self {
        Self {
            writer,
            values: vec![writer; len],
        }
    }

    fn is_uniform(&self) -> bool {
        self.values.iter().all(|v| *v == self.writer)
    }
}

fn temp_store() -> (tempfile::TempDir, Arc<FsDocumentStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDocumentStore::open(dir.path().join("db")).unwrap();
    (dir, Arc::new(store))
}

#[test]
fn readers_never_observe_partial_documents() {
    let (_dir, store) = temp_store();
    // Large enough that a non-atomic write would be observable.
    let len = 20_000;
    store.write("docs", "hot", &Payload::filled(1, len)).unwrap();

    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for round in 0..200u32 {
                let writer = 1 + round % 2;
                store.write("docs", "hot", &Payload::filled(writer, len)).unwrap();
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut reads = 0usize;
                while !done.load(Ordering::SeqCst) || reads == 0 {
                    let doc: Payload = store.read("docs", "hot").unwrap();
                    assert_eq!(doc.values.len(), len);
                    assert!(doc.is_uniform(), "mixed document from writer {}", doc.writer);
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    writer.join().expect("writer should not panic");
    for r in readers {
        assert!(r.join().expect("reader should not panic") > 0);
    }
}

#[test]
fn concurrent_writes_to_one_key_leave_one_whole_document() {
    let (_dir, store) = temp_store();
    let writers = 8u32;

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.write("docs", "contended", &Payload::filled(i, 1_000)).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().expect("writer should not panic");
    }

    let doc: Payload = store.read("docs", "contended").unwrap();
    assert!(doc.writer < writers);
    assert!(doc.is_uniform());
    assert_eq!(store.list_resources("docs").unwrap(), vec!["contended"]);

    let leftovers: Vec<_> = std::fs::read_dir(store.root().join("docs"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|n| n.to_string_lossy().ends_with(".temp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}

#[test]
fn parallel_writes_across_collections() {
    let (_dir, store) = temp_store();

    let handles: Vec<_> = (0..6u32)
        .map(|c| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let collection = format!("col{c}");
                for r in 0..20u32 {
                    store
                        .write(&collection, &format!("r{r}"), &Payload::filled(r, 8))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("writer should not panic");
    }

    let collections = store.list_collections().unwrap();
    assert_eq!(collections.len(), 6);
    for collection in &collections {
        let docs: Vec<Payload> = store.read_all_as(collection).unwrap();
        assert_eq!(docs.len(), 20);
        assert!(docs.iter().all(Payload::is_uniform));
    }
    assert_eq!(store.collection_lock_count(), 6);
}

#[test]
fn deletes_and_writes_interleave_safely() {
    let (_dir, store) = temp_store();
    for r in 0..50u32 {
        store.write("queue", &format!("job{r}"), &r).unwrap();
    }

    let deleter = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for r in 0..50u32 {
                store.delete("queue", &format!("job{r}")).unwrap();
            }
        })
    };
    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for r in 50..100u32 {
                store.write("queue", &format!("job{r}"), &r).unwrap();
            }
        })
    };
    deleter.join().expect("deleter should not panic");
    writer.join().expect("writer should not panic");

    let mut remaining: Vec<u32> = store.read_all_as("queue").unwrap();
    remaining.sort();
    assert_eq!(remaining, (50..100).collect::<Vec<_>>());
}

#[test]
fn racing_deletes_of_one_record_yield_one_success() {
    let (_dir, store) = temp_store();
    store.write("users", "John", &1).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.delete("users", "John"))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("deleter should not panic"))
        .collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.is_not_found()));
}
