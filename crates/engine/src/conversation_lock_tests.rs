// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex as PMutex;
use tokio::sync::oneshot;

use super::*;

fn handler_that_waits(rx: oneshot::Receiver<()>, order: Arc<PMutex<Vec<&'static str>>>, tag: &'static str) -> Handler {
    Box::new(move || {
        Box::pin(async move {
            let _ = rx.await;
            order.lock().push(tag);
            Ok(())
        })
    })
}

fn immediate(order: Arc<PMutex<Vec<&'static str>>>, tag: &'static str) -> Handler {
    Box::new(move || {
        Box::pin(async move {
            order.lock().push(tag);
            Ok(())
        })
    })
}

#[tokio::test]
async fn same_key_handlers_run_strictly_fifo() {
    let lock = ConversationLock::new(8);
    let order = Arc::new(PMutex::new(Vec::new()));
    let (tx1, rx1) = oneshot::channel();

    lock.acquire("conv-1", handler_that_waits(rx1, order.clone(), "first"));
    lock.acquire("conv-1", immediate(order.clone(), "second"));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(lock.stats().active, 1);
    assert!(order.lock().is_empty());

    tx1.send(()).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(*order.lock(), vec!["first", "second"]);
}

#[tokio::test]
async fn distinct_keys_run_concurrently_under_ceiling() {
    let lock = ConversationLock::new(8);
    let counter = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    for i in 0..4 {
        let counter = counter.clone();
        let max_seen = max_seen.clone();
        let handler: Handler = Box::new(move || {
            Box::pin(async move {
                let cur = counter.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(cur, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(15)).await;
                counter.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })
        });
        lock.acquire(format!("conv-{i}"), handler);
    }

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(max_seen.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn global_ceiling_queues_excess_handlers() {
    let lock = ConversationLock::new(2);
    let order = Arc::new(PMutex::new(Vec::new()));
    let (tx1, rx1) = oneshot::channel();
    let (tx2, rx2) = oneshot::channel();

    lock.acquire("a", handler_that_waits(rx1, order.clone(), "a"));
    lock.acquire("b", handler_that_waits(rx2, order.clone(), "b"));
    lock.acquire("c", immediate(order.clone(), "c"));

    tokio::time::sleep(Duration::from_millis(20)).await;
    let stats = lock.stats();
    assert_eq!(stats.active, 2);
    assert_eq!(stats.queued_total, 1);

    tx1.send(()).unwrap();
    tx2.send(()).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(order.lock().contains(&"c"));
    assert_eq!(lock.stats().active, 0);
    assert_eq!(lock.stats().queued_total, 0);
}

#[tokio::test]
async fn handler_error_does_not_stop_the_queue() {
    let lock = ConversationLock::new(8);
    let order = Arc::new(PMutex::new(Vec::new()));

    let failing: Handler = Box::new(|| Box::pin(async { Err(HandlerError("boom".into())) }));
    lock.acquire("conv-1", failing);
    lock.acquire("conv-1", immediate(order.clone(), "after-failure"));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(*order.lock(), vec!["after-failure"]);
    assert_eq!(lock.stats().active, 0);
}

#[tokio::test]
async fn stats_reports_queue_depth_per_key() {
    let lock = ConversationLock::new(1);
    let order = Arc::new(PMutex::new(Vec::new()));
    let (tx, rx) = oneshot::channel();

    lock.acquire("a", handler_that_waits(rx, order.clone(), "a"));
    lock.acquire("b", immediate(order.clone(), "b1"));
    lock.acquire("b", immediate(order.clone(), "b2"));

    tokio::time::sleep(Duration::from_millis(20)).await;
    let stats = lock.stats();
    assert_eq!(stats.active, 1);
    assert_eq!(stats.queued_by_key, vec![("b".to_string(), 2)]);

    tx.send(()).unwrap();
}
