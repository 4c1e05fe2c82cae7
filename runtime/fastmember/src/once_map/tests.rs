use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_first_insert_wins() {
    let map: OnceMap<&str, u32> = OnceMap::new();

    assert_eq!(map.insert_if_absent("k", 1), (1, true));
    assert_eq!(map.insert_if_absent("k", 2), (1, false));
    assert_eq!(map.get("k"), Some(1));
}

#[test]
fn test_build_runs_only_on_miss() {
    let map: OnceMap<u32, u32> = OnceMap::new();
    let builds = AtomicUsize::new(0);
    let build = || {
        builds.fetch_add(1, Ordering::SeqCst);
        Ok::<_, ()>(10)
    };

    assert_eq!(map.get_or_try_insert_with(&1, build), Ok(10));
    assert_eq!(map.get_or_try_insert_with(&1, build), Ok(10));

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    let stats = map.stats();
    assert_eq!((stats.entries, stats.hits, stats.misses), (1, 1, 1));
}

#[test]
fn test_infallible_build_counts_hits() {
    let map: OnceMap<u32, &str> = OnceMap::new();

    assert_eq!(map.get_or_insert_with(&1, || "first"), "first");
    assert_eq!(map.get_or_insert_with(&1, || "second"), "first");
    assert_eq!(map.stats().hits, 1);
}

#[test]
fn test_failed_build_inserts_nothing() {
    let map: OnceMap<u32, u32> = OnceMap::new();

    assert_eq!(map.get_or_try_insert_with(&7, || Err("nope")), Err("nope"));
    assert!(!map.contains_key(&7));
    assert!(map.is_empty());
}

#[test]
fn test_borrowed_lookup() {
    let map: OnceMap<Arc<str>, u32> = OnceMap::new();
    map.insert_if_absent(Arc::from("name"), 3);

    assert_eq!(map.get("name"), Some(3));
    assert!(map.contains_key("name"));
}

#[test]
fn test_racing_builders_agree_on_one_value() {
    const THREADS: usize = 8;
    let map: Arc<OnceMap<u32, usize>> = Arc::new(OnceMap::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let map = Arc::clone(&map);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                map.get_or_try_insert_with(&0, || Ok::<_, ()>(i)).unwrap()
            })
        })
        .collect();

    let seen: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let retained = map.get(&0).unwrap();
    assert!(seen.iter().all(|v| *v == retained));
    assert_eq!(map.len(), 1);
}
