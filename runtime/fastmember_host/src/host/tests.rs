use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::module::Module;

#[test]
fn test_load_notifies_subscribers_with_module() {
    let host = ModuleHost::new();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    host.subscribe(move |m| sink.lock().push(m.name().to_string()));

    host.load(Module::builder("alpha").build());
    host.load(Module::builder("beta").build());

    assert_eq!(*seen.lock(), vec!["alpha".to_string(), "beta".to_string()]);
    assert_eq!(host.module_count(), 2);
}

#[test]
fn test_modules_snapshot_in_load_order() {
    let host = ModuleHost::new();
    host.load(Module::builder("first").build());
    host.load(Module::builder("second").build());

    let names: Vec<String> = host.modules().iter().map(|m| m.name().to_string()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let host = ModuleHost::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let id = host.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    host.load(Module::builder("one").build());
    assert!(host.unsubscribe(id));
    assert!(!host.unsubscribe(id));
    host.load(Module::builder("two").build());

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(host.subscriber_count(), 0);
}

#[test]
fn test_handler_may_read_host_during_notification() {
    let host = Arc::new(ModuleHost::new());
    let observed = Arc::new(AtomicUsize::new(0));
    let weak = Arc::downgrade(&host);
    let sink = Arc::clone(&observed);
    host.subscribe(move |_| {
        if let Some(host) = weak.upgrade() {
            sink.store(host.module_count(), Ordering::SeqCst);
        }
    });

    host.load(Module::builder("m").build());

    assert_eq!(observed.load(Ordering::SeqCst), 1);
}
