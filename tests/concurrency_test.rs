//! Test to verify interning stays correct under concurrent access

use libintern::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

fn car(brand: &str, model: &str, color: &str) -> SharedRecord {
    SharedRecord::new([brand.into(), model.into(), color.into()]).unwrap()
}

#[test]
fn test_concurrent_same_key_single_insert() {
    const NUM_THREADS: usize = 8;

    let cache: InternCache<SharedRecord> = InternCache::new();
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let mut handles = vec![];

    for _ in 0..NUM_THREADS {
        let cache_clone = cache.clone();
        let barrier_clone = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            // All threads race the same candidate through the cache
            barrier_clone.wait();
            cache_clone.get_or_create(car("BMW", "M5", "red"))
        }));
    }

    let interned: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Exactly one canonical record, shared by every thread
    assert_eq!(cache.len(), 1);
    for record in &interned[1..] {
        assert!(Intern::shares_storage(&interned[0], record));
    }

    // One thread minted the record, the rest were served it
    assert_eq!(cache.stats().misses(), 1);
    assert_eq!(cache.stats().hits(), (NUM_THREADS - 1) as u64);
}

#[test]
fn test_concurrent_distinct_keys() {
    const NUM_THREADS: usize = 8;

    let cache: InternCache<SharedRecord> = InternCache::new();
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let mut handles = vec![];

    for i in 0..NUM_THREADS {
        let cache_clone = cache.clone();
        let barrier_clone = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            barrier_clone.wait();
            cache_clone.get_or_create(car("BMW", &format!("M{}", i), "red"))
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), NUM_THREADS);
    assert_eq!(cache.stats().misses(), NUM_THREADS as u64);
    assert_eq!(cache.stats().hits(), 0);
}

#[test]
fn test_concurrent_repeated_mix() {
    // Many threads hammer a small key space; the cache must end up with
    // exactly one record per distinct key no matter the interleaving.
    const NUM_THREADS: usize = 8;
    const ROUNDS: usize = 100;
    const MODELS: [&str; 4] = ["M5", "X1", "X6", "C300"];

    let cache: InternCache<SharedRecord> = InternCache::new();
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let mut handles = vec![];

    for i in 0..NUM_THREADS {
        let cache_clone = cache.clone();
        let barrier_clone = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            barrier_clone.wait();
            for j in 0..ROUNDS {
                let model = MODELS[(i + j) % MODELS.len()];
                let record = cache_clone.get_or_create(car("BMW", model, "red"));
                assert_eq!(record.field(1).unwrap().as_text(), Some(model));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), MODELS.len());
    assert_eq!(
        cache.stats().lookups(),
        (NUM_THREADS * ROUNDS) as u64,
    );
    assert_eq!(cache.stats().misses(), MODELS.len() as u64);
}

#[test]
fn test_concurrent_readers_during_writes() {
    const NUM_WRITERS: usize = 4;
    const NUM_READERS: usize = 4;
    const ROUNDS: usize = 50;

    let cache: InternCache<SharedRecord> = InternCache::with_seeds([car("BMW", "M5", "red")]);
    let barrier = Arc::new(Barrier::new(NUM_WRITERS + NUM_READERS));

    let mut handles = vec![];

    for i in 0..NUM_WRITERS {
        let cache_clone = cache.clone();
        let barrier_clone = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            barrier_clone.wait();
            for j in 0..ROUNDS {
                cache_clone.get_or_create(car("Writer", &format!("{}-{}", i, j), "blue"));
            }
        }));
    }

    let seeded_key = car("BMW", "M5", "red").intern_key();
    for _ in 0..NUM_READERS {
        let cache_clone = cache.clone();
        let barrier_clone = Arc::clone(&barrier);
        let key = seeded_key.clone();

        handles.push(thread::spawn(move || {
            barrier_clone.wait();
            for _ in 0..ROUNDS {
                // The seeded record stays visible and intact throughout
                let record = cache_clone.get(&key).unwrap();
                assert_eq!(record.to_string(), "[BMW, M5, red]");
                assert!(cache_clone.len() >= 1);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 1 + NUM_WRITERS * ROUNDS);
}
