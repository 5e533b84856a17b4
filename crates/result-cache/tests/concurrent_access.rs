//! Concurrent use of one cache from many tasks

use std::sync::Arc;

use result_cache::{ResultCache, PREFIX_ANALYSIS};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_never_corrupt_entries() {
    let cache = Arc::new(ResultCache::in_memory());
    let mut handles = Vec::new();

    for worker in 0..8u32 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for doc in 0..25u32 {
                let id = format!("doc-{}", doc);
                let payload = vec![worker; 16];
                cache.set(PREFIX_ANALYSIS, &id, &payload, 60).await;

                // Last writer wins, but every read is a complete payload
                let read: Option<Vec<u32>> = cache.get(PREFIX_ANALYSIS, &id).await;
                let read = read.expect("entry present after set");
                assert_eq!(read.len(), 16);
                assert!(read.iter().all(|v| *v == read[0]));
            }
        }));
    }

    for handle in handles {
        handle.await.expect("worker panicked");
    }

    let stats = cache.stats();
    assert_eq!(stats.sets, 200);
    assert_eq!(stats.hits, 200);
    assert_eq!(stats.errors, 0);
}
