//! Readers racing writers always observe a complete snapshot.

mod common;

use common::{Fixture, source_of};
use nsroute_core::{NsPath, Provider};
use nsroute_tree::NamespaceTree;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn test_tree_is_send_sync() {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NamespaceTree>();
}

#[test]
fn test_merger_moves_across_threads() {
    const fn assert_send<T: Send>() {}
    assert_send::<nsroute_tree::ChildMerger>();

    let tree = NamespaceTree::new(Fixture::new("R").with("/apps").shared());
    tree.mount("/libs", Fixture::new("L").with("/libs/b.js").shared())
        .unwrap();
    let root = tree.resolve_str("/").unwrap().unwrap();
    let merger = tree.list_children(&root);

    let paths = thread::spawn(move || {
        merger
            .map(|child| child.unwrap().path().to_string())
            .collect::<Vec<_>>()
    })
    .join()
    .unwrap();
    assert_eq!(paths, vec!["/apps", "/libs"]);
}

#[test]
fn test_readers_see_whole_mounts() {
    let tree = Arc::new(NamespaceTree::new(
        Fixture::new("R").with("/rootel/html.js").with("/rootel/child/html.js").shared(),
    ));
    let a = Fixture::new("A")
        .with("/rootel/html.js")
        .with("/rootel/child/html.js")
        .shared();
    let b = Fixture::new("B").with("/rootel/child/html.js").shared();
    tree.mount("/rootel/child", b).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let tree = Arc::clone(&tree);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut checks = 0_u32;
                while !stop.load(Ordering::Relaxed) || checks == 0 {
                    let top = source_of(&tree, "/rootel/html.js");
                    assert!(matches!(top, Some("A" | "R")), "unexpected source {top:?}");
                    assert_eq!(source_of(&tree, "/rootel/child/html.js"), Some("B"));
                    checks += 1;
                }
                checks
            })
        })
        .collect();

    for _ in 0..200 {
        tree.mount("/rootel", Arc::clone(&a)).unwrap();
        assert!(tree.unmount("/rootel").unwrap());
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(tree.mount_count(), 2);
}

#[test]
fn test_concurrent_register_is_atomic() {
    let tree = Arc::new(NamespaceTree::new(Fixture::new("R").shared()));
    let multi: Arc<dyn Provider> = Fixture::new("multi")
        .root("/one")
        .root("/two")
        .root("/three")
        .shared();

    let stop = Arc::new(AtomicBool::new(false));
    let observer = {
        let tree = Arc::clone(&tree);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                let snapshot = tree.snapshot();
                let count = snapshot.children().len();
                assert!(count == 0 || count == 3, "partial registration: {count}");
            }
        })
    };

    for _ in 0..100 {
        tree.register(Arc::clone(&multi)).unwrap();
        assert_eq!(tree.unregister(&multi), 3);
    }
    stop.store(true, Ordering::Relaxed);
    observer.join().unwrap();
}

#[test]
fn test_conflicting_writers_one_wins() {
    let tree = Arc::new(NamespaceTree::new(Fixture::new("R").shared()));

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                let name = if i % 2 == 0 { "even" } else { "odd" };
                tree.mount("/contested", Fixture::new(name).shared()).is_ok()
            })
        })
        .collect();
    let results: Vec<bool> = writers.into_iter().map(|w| w.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
    assert!(tree.is_mounted(&NsPath::new("/contested").unwrap()));
}
